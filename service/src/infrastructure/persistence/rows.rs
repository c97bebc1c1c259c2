use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vernissage_common::{
    ArtistId, ArtworkId, AssetId, EventId, Role, SubmissionId, SubmissionKind, SubmissionType,
    UserId, VenueId,
};

use crate::domain::content::{Artist, Artwork, Event, Venue};
use crate::domain::identity::{Actor, User};
use crate::domain::notification::{Notification, OutboxEntry};
use crate::domain::repository::RepositoryError;
use crate::domain::submission::{Submission, SubmissionTarget};

/// Text columns holding enum values
pub(super) fn parse_column<T>(value: &str) -> Result<T, RepositoryError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|err: T::Err| RepositoryError::Corrupted(err.to_string()))
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ArtistRow {
    pub id: ArtistId,
    pub owner_user_id: UserId,
    pub name: String,
    pub bio: Option<String>,
    pub avatar_asset_id: Option<AssetId>,
    pub avatar_url: Option<String>,
    pub website_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArtistRow {
    pub fn into_artist(self, gallery: Vec<AssetId>) -> Artist {
        Artist {
            id: self.id,
            owner_user_id: self.owner_user_id,
            name: self.name,
            bio: self.bio,
            avatar_asset_id: self.avatar_asset_id,
            avatar_url: self.avatar_url,
            website_url: self.website_url,
            gallery,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct VenueRow {
    pub id: VenueId,
    pub owner_user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub cover_asset_id: Option<AssetId>,
    pub cover_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VenueRow> for Venue {
    fn from(row: VenueRow) -> Self {
        Venue {
            id: row.id,
            owner_user_id: row.owner_user_id,
            name: row.name,
            description: row.description,
            address_line: row.address_line,
            city: row.city,
            country: row.country,
            cover_asset_id: row.cover_asset_id,
            cover_url: row.cover_url,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct EventRow {
    pub id: EventId,
    pub owner_user_id: UserId,
    pub venue_id: Option<VenueId>,
    pub title: String,
    pub description: Option<String>,
    pub ticket_url: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            owner_user_id: row.owner_user_id,
            venue_id: row.venue_id,
            title: row.title,
            description: row.description,
            ticket_url: row.ticket_url,
            starts_at: row.starts_at,
            is_published: row.is_published,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ArtworkRow {
    pub id: ArtworkId,
    pub artist_id: ArtistId,
    pub title: String,
    pub description: Option<String>,
    pub featured_asset_id: Option<AssetId>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArtworkRow {
    pub fn into_artwork(self, images: Vec<AssetId>) -> Artwork {
        Artwork {
            id: self.id,
            artist_id: self.artist_id,
            title: self.title,
            description: self.description,
            featured_asset_id: self.featured_asset_id,
            images,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SubmissionRow {
    pub id: SubmissionId,
    pub submission_type: String,
    pub kind: Option<String>,
    pub status: String,
    pub submitter_user_id: UserId,
    pub target_id: Uuid,
    pub note: Option<String>,
    pub decision_reason: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by_user_id: Option<UserId>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = RepositoryError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let submission_type = parse_column::<SubmissionType>(&row.submission_type)?;
        let kind = row
            .kind
            .as_deref()
            .map(parse_column::<SubmissionKind>)
            .transpose()?;

        Ok(Submission {
            id: row.id,
            target: SubmissionTarget::from_parts(submission_type, row.target_id),
            kind,
            status: parse_column(&row.status)?,
            submitter_user_id: row.submitter_user_id,
            note: row.note,
            decision_reason: row.decision_reason,
            submitted_at: row.submitted_at,
            decided_at: row.decided_at,
            decided_by_user_id: row.decided_by_user_id,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(super) const SUBMISSION_COLUMNS: &str = "id, submission_type, kind, status, \
    submitter_user_id, target_id, note, decision_reason, submitted_at, decided_at, \
    decided_by_user_id, version, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct OutboxRow {
    pub id: Uuid,
    pub notification_type: String,
    pub to_email: String,
    pub dedupe_key: String,
    pub payload: serde_json::Value,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OutboxRow> for OutboxEntry {
    type Error = RepositoryError;

    fn try_from(row: OutboxRow) -> Result<Self, Self::Error> {
        Ok(OutboxEntry {
            id: row.id,
            notification: Notification {
                notification_type: parse_column(&row.notification_type)?,
                to_email: row.to_email,
                dedupe_key: row.dedupe_key,
                payload: row.payload,
            },
            attempts: row.attempts,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            role: parse_column::<Role>(&row.role)?,
        })
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Actor {
            user_id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}
