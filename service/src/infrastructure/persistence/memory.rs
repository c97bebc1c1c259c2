//! Repository kept in process memory, used by the unit and HTTP tests.
//!
//! It enforces the same write rules as the Postgres adapter: version checked
//! submission updates, one SUBMITTED row per target and unique dedupe keys.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vernissage_common::{
    ArtistId, ArtworkId, EventId, OnboardingFlag, Role, SubmissionId, SubmissionStatus, UserId,
    VenueId, VenueRole,
};

use crate::domain::content::{Artist, Artwork, ContentRef, Event, PublicationChange, Venue};
use crate::domain::identity::{Actor, User};
use crate::domain::notification::{Notification, OutboxEntry};
use crate::domain::page::Page;
use crate::domain::repository::{
    ContentRepository, NotificationOutbox, OnboardingFlags, RepositoryError, Sessions,
    SubmissionFilter, SubmissionRepository, Transition,
};
use crate::domain::submission::{Submission, SubmissionTarget};

#[derive(Debug, Clone)]
pub struct OutboxRow {
    pub entry: OutboxEntry,
    pub claimed: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    sessions: HashMap<String, (UserId, DateTime<Utc>)>,
    artists: HashMap<ArtistId, Artist>,
    venues: HashMap<VenueId, Venue>,
    venue_members: HashMap<(VenueId, UserId), VenueRole>,
    events: HashMap<EventId, Event>,
    artworks: HashMap<ArtworkId, Artwork>,
    submissions: Vec<Submission>,
    outbox: Vec<OutboxRow>,
    flags: HashSet<(UserId, OnboardingFlag)>,
    fail_outbox: bool,
    fail_flags: bool,
    fail_marks: HashSet<String>,
    writes: usize,
}

#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn add_user(&self, email: &str, role: Role) -> Actor {
        let user = User {
            id: UserId::generate(),
            email: email.to_string(),
            display_name: None,
            role,
        };
        let actor = Actor {
            user_id: user.id,
            email: user.email.clone(),
            role,
        };
        self.lock().users.insert(user.id, user);
        actor
    }

    pub fn add_session(&self, token: &str, user_id: UserId, expires_at: DateTime<Utc>) {
        self.lock()
            .sessions
            .insert(token.to_string(), (user_id, expires_at));
    }

    pub fn put_artist(&self, artist: Artist) {
        self.lock().artists.insert(artist.id, artist);
    }

    pub fn put_venue(&self, venue: Venue) {
        self.lock().venues.insert(venue.id, venue);
    }

    pub fn put_event(&self, event: Event) {
        self.lock().events.insert(event.id, event);
    }

    pub fn put_artwork(&self, artwork: Artwork) {
        self.lock().artworks.insert(artwork.id, artwork);
    }

    pub fn put_submission(&self, submission: Submission) {
        self.lock().submissions.push(submission);
    }

    pub fn add_venue_member(&self, venue_id: VenueId, user_id: UserId, role: VenueRole) {
        self.lock().venue_members.insert((venue_id, user_id), role);
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Queued notifications in insertion order
    pub fn outbox(&self) -> Vec<Notification> {
        self.lock()
            .outbox
            .iter()
            .map(|row| row.entry.notification.clone())
            .collect()
    }

    pub fn outbox_rows(&self) -> Vec<OutboxRow> {
        self.lock().outbox.clone()
    }

    pub fn has_flag(&self, user_id: UserId, flag: OnboardingFlag) -> bool {
        self.lock().flags.contains(&(user_id, flag))
    }

    pub fn fail_outbox(&self, fail: bool) {
        self.lock().fail_outbox = fail;
    }

    pub fn fail_flags(&self, fail: bool) {
        self.lock().fail_flags = fail;
    }

    /// Queues a notification outside any transition. Returns false for a known dedupe key.
    pub fn enqueue(&self, notification: &Notification) -> Result<bool, RepositoryError> {
        self.lock().enqueue(notification)
    }

    /// Makes marking the entry with this dedupe key fail
    pub fn fail_marks_for(&self, dedupe_key: &str) {
        self.lock().fail_marks.insert(dedupe_key.to_string());
    }
}

impl Tables {
    fn enqueue(&mut self, notification: &Notification) -> Result<bool, RepositoryError> {
        if self.fail_outbox {
            return Err(RepositoryError::DatabaseError("outbox unavailable".to_string()));
        }
        if self
            .outbox
            .iter()
            .any(|row| row.entry.notification.dedupe_key == notification.dedupe_key)
        {
            return Ok(false);
        }
        self.outbox.push(OutboxRow {
            entry: OutboxEntry {
                id: Uuid::new_v4(),
                notification: notification.clone(),
                attempts: 0,
                created_at: Utc::now(),
            },
            claimed: false,
            delivered_at: None,
            last_error: None,
        });
        self.writes += 1;
        Ok(true)
    }

    fn set_publication(&mut self, change: PublicationChange) -> Result<(), RepositoryError> {
        let PublicationChange {
            content,
            is_published,
            published_at,
        } = change;
        match content {
            ContentRef::Artist(id) => {
                let artist = self.artists.get_mut(&id).ok_or(RepositoryError::NotFound)?;
                artist.is_published = is_published;
            }
            ContentRef::Venue(id) => {
                let venue = self.venues.get_mut(&id).ok_or(RepositoryError::NotFound)?;
                venue.is_published = is_published;
            }
            ContentRef::Event(id) => {
                let event = self.events.get_mut(&id).ok_or(RepositoryError::NotFound)?;
                event.is_published = is_published;
                event.published_at = published_at;
            }
            ContentRef::Artwork(id) => {
                let artwork = self.artworks.get_mut(&id).ok_or(RepositoryError::NotFound)?;
                artwork.is_published = is_published;
            }
        }
        Ok(())
    }
}

fn replace<K, V>(map: &mut HashMap<K, V>, key: K, value: V) -> Result<(), RepositoryError>
where
    K: std::hash::Hash + Eq,
{
    match map.get_mut(&key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(RepositoryError::NotFound),
    }
}

impl ContentRepository for InMemoryRepository {
    async fn find_artist(&self, id: ArtistId) -> Result<Option<Artist>, RepositoryError> {
        Ok(self.lock().artists.get(&id).cloned())
    }

    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, RepositoryError> {
        Ok(self.lock().venues.get(&id).cloned())
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        Ok(self.lock().events.get(&id).cloned())
    }

    async fn find_artwork(&self, id: ArtworkId) -> Result<Option<Artwork>, RepositoryError> {
        Ok(self.lock().artworks.get(&id).cloned())
    }

    async fn venue_role(
        &self,
        venue_id: VenueId,
        user_id: UserId,
    ) -> Result<Option<VenueRole>, RepositoryError> {
        Ok(self.lock().venue_members.get(&(venue_id, user_id)).copied())
    }

    async fn insert_artist(&self, artist: &Artist, draft: &Submission) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        tables.artists.insert(artist.id, artist.clone());
        tables.submissions.push(draft.clone());
        tables.writes += 1;
        Ok(())
    }

    async fn insert_venue(&self, venue: &Venue, draft: &Submission) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        tables.venues.insert(venue.id, venue.clone());
        tables
            .venue_members
            .insert((venue.id, venue.owner_user_id), VenueRole::Owner);
        tables.submissions.push(draft.clone());
        tables.writes += 1;
        Ok(())
    }

    async fn insert_event(&self, event: &Event, draft: &Submission) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        tables.events.insert(event.id, event.clone());
        tables.submissions.push(draft.clone());
        tables.writes += 1;
        Ok(())
    }

    async fn insert_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        tables.artworks.insert(artwork.id, artwork.clone());
        tables.writes += 1;
        Ok(())
    }

    async fn update_artist(&self, artist: &Artist) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        replace(&mut tables.artists, artist.id, artist.clone())?;
        tables.writes += 1;
        Ok(())
    }

    async fn update_venue(&self, venue: &Venue) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        replace(&mut tables.venues, venue.id, venue.clone())?;
        tables.writes += 1;
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        replace(&mut tables.events, event.id, event.clone())?;
        tables.writes += 1;
        Ok(())
    }

    async fn update_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        replace(&mut tables.artworks, artwork.id, artwork.clone())?;
        tables.writes += 1;
        Ok(())
    }

    async fn set_publication(&self, change: PublicationChange) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        tables.set_publication(change)?;
        tables.writes += 1;
        Ok(())
    }
}

impl SubmissionRepository for InMemoryRepository {
    async fn find_submission(&self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.lock().submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn latest_submission(
        &self,
        target: SubmissionTarget,
    ) -> Result<Option<Submission>, RepositoryError> {
        Ok(self
            .lock()
            .submissions
            .iter()
            .filter(|s| s.target == target)
            .max_by_key(|s| (s.created_at, s.id.as_uuid()))
            .cloned())
    }

    async fn list_submissions(
        &self,
        filter: SubmissionFilter,
        page: Page,
    ) -> Result<Vec<Submission>, RepositoryError> {
        let tables = self.lock();
        let mut rows: Vec<Submission> = match filter {
            SubmissionFilter::Status(status) => tables
                .submissions
                .iter()
                .filter(|s| s.status == status)
                .cloned()
                .collect(),
            SubmissionFilter::Submitter(user_id) => tables
                .submissions
                .iter()
                .filter(|s| s.submitter_user_id == user_id)
                .cloned()
                .collect(),
        };
        match filter {
            SubmissionFilter::Status(_) => rows.sort_by_key(|s| (s.submitted_at, s.created_at)),
            SubmissionFilter::Submitter(_) => {
                rows.sort_by_key(|s| std::cmp::Reverse(s.created_at))
            }
        }
        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn record_transition(&self, transition: Transition) -> Result<(), RepositoryError> {
        let Transition {
            submission,
            expected_version,
            publication,
            notification,
        } = transition;
        let mut tables = self.lock();

        let position = tables.submissions.iter().position(|s| s.id == submission.id);
        match (expected_version, position) {
            (Some(expected), Some(index)) => {
                if tables.submissions[index].version != expected {
                    return Err(RepositoryError::Conflict);
                }
            }
            (Some(_), None) => return Err(RepositoryError::NotFound),
            (None, Some(_)) => {
                return Err(RepositoryError::UniqueViolation("submissions_pkey".to_string()));
            }
            (None, None) => {}
        }

        if submission.status == SubmissionStatus::Submitted
            && tables.submissions.iter().any(|s| {
                s.id != submission.id
                    && s.target == submission.target
                    && s.status == SubmissionStatus::Submitted
            })
        {
            return Err(RepositoryError::UniqueViolation(
                "submissions_submission_type_target_id_key".to_string(),
            ));
        }

        if let Some(change) = publication {
            tables.set_publication(change)?;
        }
        match position {
            Some(index) => tables.submissions[index] = submission,
            None => tables.submissions.push(submission),
        }
        tables.writes += 1;

        if let Some(notification) = notification {
            if let Err(err) = tables.enqueue(&notification) {
                tracing::warn!(dedupe_key = %notification.dedupe_key, error = %err, "notification not queued");
            }
        }
        Ok(())
    }
}

impl NotificationOutbox for InMemoryRepository {
    async fn claim_pending(
        &self,
        limit: u32,
        max_attempts: i32,
    ) -> Result<Vec<OutboxEntry>, RepositoryError> {
        let mut tables = self.lock();
        let claimed = tables
            .outbox
            .iter_mut()
            .filter(|row| row.delivered_at.is_none() && !row.claimed && row.entry.attempts < max_attempts)
            .take(limit as usize)
            .map(|row| {
                row.claimed = true;
                row.entry.attempts += 1;
                row.entry.clone()
            })
            .collect();
        Ok(claimed)
    }

    async fn mark_delivered(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let Tables { outbox, fail_marks, .. } = &mut *tables;
        let row = outbox
            .iter_mut()
            .find(|row| row.entry.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if fail_marks.contains(&row.entry.notification.dedupe_key) {
            return Err(RepositoryError::DatabaseError("outbox unavailable".to_string()));
        }
        row.delivered_at = Some(at);
        row.claimed = false;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let Tables { outbox, fail_marks, .. } = &mut *tables;
        let row = outbox
            .iter_mut()
            .find(|row| row.entry.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if fail_marks.contains(&row.entry.notification.dedupe_key) {
            return Err(RepositoryError::DatabaseError("outbox unavailable".to_string()));
        }
        row.last_error = Some(error.to_string());
        row.claimed = false;
        Ok(())
    }
}

impl OnboardingFlags for InMemoryRepository {
    async fn set_flag(&self, user_id: UserId, flag: OnboardingFlag) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if tables.fail_flags {
            return Err(RepositoryError::DatabaseError("flags unavailable".to_string()));
        }
        if tables.flags.insert((user_id, flag)) {
            tables.writes += 1;
        }
        Ok(())
    }
}

impl Sessions for InMemoryRepository {
    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Actor>, RepositoryError> {
        let tables = self.lock();
        let actor = tables
            .sessions
            .get(token)
            .filter(|(_, expires_at)| *expires_at > now)
            .and_then(|(user_id, _)| tables.users.get(user_id))
            .map(|user| Actor {
                user_id: user.id,
                email: user.email.clone(),
                role: user.role,
            });
        Ok(actor)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(&id).cloned())
    }
}
