//! Self-serve creation and editing of directory records.

use chrono::{DateTime, Utc};
use vernissage_common::{ArtistId, EventId, UserId, VenueId};

use crate::domain::content::patch::{
    ArtistPatch, EventPatch, NewArtist, NewArtwork, NewEvent, NewVenue, VenuePatch,
};
use crate::domain::content::{Artist, Artwork, ContentRef, Event, Target, Venue};
use crate::domain::error::DomainError;
use crate::domain::identity::Actor;
use crate::domain::readiness::{Readiness, Snapshot, evaluate};
use crate::domain::repository::{ContentRepository, RepositoryError};
use crate::domain::submission::{Submission, SubmissionTarget};

pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor, DomainError> {
    actor.ok_or(DomainError::Unauthorized)
}

/// Moderators, the record owner and editing members of the venue team may edit.
pub async fn can_edit<R: ContentRepository>(
    repo: &R,
    actor: &Actor,
    owner: UserId,
    venue: Option<VenueId>,
) -> Result<bool, RepositoryError> {
    if actor.is_moderator() || actor.user_id == owner {
        return Ok(true);
    }
    match venue {
        Some(venue_id) => Ok(repo
            .venue_role(venue_id, actor.user_id)
            .await?
            .is_some_and(|role| role.can_edit())),
        None => Ok(false),
    }
}

async fn ensure_can_edit<R: ContentRepository>(
    repo: &R,
    actor: &Actor,
    owner: UserId,
    venue: Option<VenueId>,
) -> Result<(), DomainError> {
    if can_edit(repo, actor, owner, venue).await? {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Events may only be attached to venues the caller can edit
async fn ensure_venue_editable<R: ContentRepository>(
    repo: &R,
    actor: &Actor,
    venue_id: VenueId,
) -> Result<(), DomainError> {
    let venue = repo
        .find_venue(venue_id)
        .await?
        .ok_or(DomainError::NotFound("venue"))?;
    ensure_can_edit(repo, actor, venue.owner_user_id, Some(venue.id)).await
}

pub async fn load_target<R: ContentRepository>(
    repo: &R,
    target: SubmissionTarget,
) -> Result<Option<Target>, RepositoryError> {
    let loaded = match target {
        SubmissionTarget::Artist(id) => repo.find_artist(id).await?.map(Target::Artist),
        SubmissionTarget::Venue(id) => repo.find_venue(id).await?.map(Target::Venue),
        SubmissionTarget::Event(id) => repo.find_event(id).await?.map(Target::Event),
    };
    Ok(loaded)
}

async fn load_artist<R: ContentRepository>(repo: &R, id: ArtistId) -> Result<Artist, DomainError> {
    repo.find_artist(id)
        .await?
        .ok_or(DomainError::NotFound("artist"))
}

async fn load_venue<R: ContentRepository>(repo: &R, id: VenueId) -> Result<Venue, DomainError> {
    repo.find_venue(id)
        .await?
        .ok_or(DomainError::NotFound("venue"))
}

async fn load_event<R: ContentRepository>(repo: &R, id: EventId) -> Result<Event, DomainError> {
    repo.find_event(id)
        .await?
        .ok_or(DomainError::NotFound("event"))
}

pub async fn create_artist<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    input: NewArtist,
    now: DateTime<Utc>,
) -> Result<(Artist, Submission), DomainError> {
    let actor = require_actor(actor)?;

    let artist = Artist::new(actor.user_id, input, now);
    let draft = Submission::draft(SubmissionTarget::Artist(artist.id), actor.user_id, now);
    repo.insert_artist(&artist, &draft).await?;

    tracing::info!(artist_id = %artist.id, submission_id = %draft.id, "artist created");
    Ok((artist, draft))
}

pub async fn create_venue<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    input: NewVenue,
    now: DateTime<Utc>,
) -> Result<(Venue, Submission), DomainError> {
    let actor = require_actor(actor)?;

    let venue = Venue::new(actor.user_id, input, now);
    let draft = Submission::draft(SubmissionTarget::Venue(venue.id), actor.user_id, now);
    repo.insert_venue(&venue, &draft).await?;

    tracing::info!(venue_id = %venue.id, submission_id = %draft.id, "venue created");
    Ok((venue, draft))
}

pub async fn create_event<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    input: NewEvent,
    now: DateTime<Utc>,
) -> Result<(Event, Submission), DomainError> {
    let actor = require_actor(actor)?;
    if let Some(venue_id) = input.venue_id {
        ensure_venue_editable(repo, actor, venue_id).await?;
    }

    let event = Event::new(actor.user_id, input, now);
    let draft = Submission::draft(SubmissionTarget::Event(event.id), actor.user_id, now);
    repo.insert_event(&event, &draft).await?;

    tracing::info!(event_id = %event.id, submission_id = %draft.id, "event created");
    Ok((event, draft))
}

pub async fn create_artwork<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    input: NewArtwork,
    now: DateTime<Utc>,
) -> Result<Artwork, DomainError> {
    let actor = require_actor(actor)?;
    let artist = load_artist(repo, input.artist_id).await?;
    ensure_can_edit(repo, actor, artist.owner_user_id, None).await?;

    let artwork = Artwork::new(input, now);
    repo.insert_artwork(&artwork).await?;

    tracing::info!(artwork_id = %artwork.id, artist_id = %artist.id, "artwork created");
    Ok(artwork)
}

pub async fn update_artist<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    id: ArtistId,
    patch: ArtistPatch,
    now: DateTime<Utc>,
) -> Result<Artist, DomainError> {
    let actor = require_actor(actor)?;
    let mut artist = load_artist(repo, id).await?;
    ensure_can_edit(repo, actor, artist.owner_user_id, None).await?;

    artist.apply(patch, now);
    repo.update_artist(&artist).await?;
    Ok(artist)
}

pub async fn update_venue<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    id: VenueId,
    patch: VenuePatch,
    now: DateTime<Utc>,
) -> Result<Venue, DomainError> {
    let actor = require_actor(actor)?;
    let mut venue = load_venue(repo, id).await?;
    ensure_can_edit(repo, actor, venue.owner_user_id, Some(venue.id)).await?;

    venue.apply(patch, now);
    repo.update_venue(&venue).await?;
    Ok(venue)
}

/// Editing a published event takes it offline until a new submission is approved.
pub async fn update_event<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    id: EventId,
    patch: EventPatch,
    now: DateTime<Utc>,
) -> Result<Event, DomainError> {
    let actor = require_actor(actor)?;
    let mut event = load_event(repo, id).await?;
    ensure_can_edit(repo, actor, event.owner_user_id, event.venue_id).await?;
    if let Some(Some(venue_id)) = patch.venue_id {
        ensure_venue_editable(repo, actor, venue_id).await?;
    }

    let was_published = event.is_published;
    event.apply(patch, now);
    repo.update_event(&event).await?;

    if was_published && !event.is_published {
        tracing::info!(event_id = %event.id, "published event edited, unpublished until approved again");
    }
    Ok(event)
}

/// Checklist preview for anyone who may edit the record
pub async fn readiness<R: ContentRepository>(
    repo: &R,
    actor: Option<&Actor>,
    content: ContentRef,
) -> Result<Readiness, DomainError> {
    let actor = require_actor(actor)?;

    let readiness = match content {
        ContentRef::Artist(id) => {
            let artist = load_artist(repo, id).await?;
            ensure_can_edit(repo, actor, artist.owner_user_id, None).await?;
            evaluate(Snapshot::Artist(&artist))
        }
        ContentRef::Venue(id) => {
            let venue = load_venue(repo, id).await?;
            ensure_can_edit(repo, actor, venue.owner_user_id, Some(venue.id)).await?;
            evaluate(Snapshot::Venue(&venue))
        }
        ContentRef::Event(id) => {
            let event = load_event(repo, id).await?;
            ensure_can_edit(repo, actor, event.owner_user_id, event.venue_id).await?;
            evaluate(Snapshot::Event(&event))
        }
        ContentRef::Artwork(id) => {
            let artwork = repo
                .find_artwork(id)
                .await?
                .ok_or(DomainError::NotFound("artwork"))?;
            let artist = load_artist(repo, artwork.artist_id).await?;
            ensure_can_edit(repo, actor, artist.owner_user_id, None).await?;
            evaluate(Snapshot::Artwork(&artwork))
        }
    };

    Ok(readiness)
}

impl Target {
    pub fn readiness(&self) -> Readiness {
        match self {
            Target::Artist(artist) => evaluate(Snapshot::Artist(artist)),
            Target::Venue(venue) => evaluate(Snapshot::Venue(venue)),
            Target::Event(event) => evaluate(Snapshot::Event(event)),
        }
    }
}
