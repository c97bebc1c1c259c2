use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vernissage_common::{
    ArtistId, ArtworkId, EventId, OnboardingFlag, SubmissionId, SubmissionStatus, UserId, VenueId,
    VenueRole,
};

use crate::domain::content::{Artist, Artwork, Event, PublicationChange, Venue};
use crate::domain::identity::{Actor, User};
use crate::domain::notification::{Notification, OutboxEntry};
use crate::domain::page::Page;
use crate::domain::submission::{Submission, SubmissionTarget};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("row not found")]
    NotFound,
    /// The row changed since it was read
    #[error("row was modified concurrently")]
    Conflict,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("stored row is invalid: {0}")]
    Corrupted(String),
    #[error("database error: {0}")]
    DatabaseError(String),
}

/// Storage of the publishable records themselves
pub trait ContentRepository: Clone + Send + Sync + 'static {
    fn find_artist(
        &self,
        id: ArtistId,
    ) -> impl Future<Output = Result<Option<Artist>, RepositoryError>> + Send;

    fn find_venue(
        &self,
        id: VenueId,
    ) -> impl Future<Output = Result<Option<Venue>, RepositoryError>> + Send;

    fn find_event(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, RepositoryError>> + Send;

    fn find_artwork(
        &self,
        id: ArtworkId,
    ) -> impl Future<Output = Result<Option<Artwork>, RepositoryError>> + Send;

    /// Role of the user inside the venue team, if any
    fn venue_role(
        &self,
        venue_id: VenueId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<VenueRole>, RepositoryError>> + Send;

    /// Create artist and its draft submission together
    fn insert_artist(
        &self,
        artist: &Artist,
        draft: &Submission,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Create venue, its draft submission and the owner membership together
    fn insert_venue(
        &self,
        venue: &Venue,
        draft: &Submission,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Create event and its draft submission together
    fn insert_event(
        &self,
        event: &Event,
        draft: &Submission,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn insert_artwork(
        &self,
        artwork: &Artwork,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_artist(
        &self,
        artist: &Artist,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_venue(&self, venue: &Venue)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_event(&self, event: &Event)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_artwork(
        &self,
        artwork: &Artwork,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Write only the published flag (and event publish time) of a record
    fn set_publication(
        &self,
        change: PublicationChange,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Which submissions to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionFilter {
    /// Oldest submitted first
    Status(SubmissionStatus),
    /// Newest first
    Submitter(UserId),
}

/// A submission state change written as one unit.
///
/// `expected_version` is the version read before the change; `None` inserts a
/// new row. The write fails with `RepositoryError::Conflict` when the stored
/// version differs. The notification is appended best-effort: a failure to
/// enqueue it never fails the transition.
#[derive(Debug, Clone)]
pub struct Transition {
    pub submission: Submission,
    pub expected_version: Option<i32>,
    pub publication: Option<PublicationChange>,
    pub notification: Option<Notification>,
}

pub trait SubmissionRepository: Clone + Send + Sync + 'static {
    fn find_submission(
        &self,
        id: SubmissionId,
    ) -> impl Future<Output = Result<Option<Submission>, RepositoryError>> + Send;

    /// Most recent submission for the target, by creation time then id
    fn latest_submission(
        &self,
        target: SubmissionTarget,
    ) -> impl Future<Output = Result<Option<Submission>, RepositoryError>> + Send;

    fn list_submissions(
        &self,
        filter: SubmissionFilter,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Submission>, RepositoryError>> + Send;

    fn record_transition(
        &self,
        transition: Transition,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Durable queue of notifications, at most one row per dedupe key.
/// Entries are appended by `SubmissionRepository::record_transition`.
pub trait NotificationOutbox: Clone + Send + Sync + 'static {
    /// Takes undelivered entries below the attempt limit and counts an attempt on each
    fn claim_pending(
        &self,
        limit: u32,
        max_attempts: i32,
    ) -> impl Future<Output = Result<Vec<OutboxEntry>, RepositoryError>> + Send;

    fn mark_delivered(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn mark_failed(
        &self,
        id: Uuid,
        error: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

pub trait OnboardingFlags: Clone + Send + Sync + 'static {
    /// Idempotent per user and flag
    fn set_flag(
        &self,
        user_id: UserId,
        flag: OnboardingFlag,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

pub trait Sessions: Clone + Send + Sync + 'static {
    /// The actor behind an unexpired session token
    fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Actor>, RepositoryError>> + Send;

    fn find_user(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;
}

/// Everything the publication workflow reads and writes
pub trait Repository:
    ContentRepository + SubmissionRepository + NotificationOutbox + OnboardingFlags + Sessions
{
}

impl<T> Repository for T where
    T: ContentRepository + SubmissionRepository + NotificationOutbox + OnboardingFlags + Sessions
{
}
