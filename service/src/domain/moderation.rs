//! Submission lifecycle: submit for review, moderator decisions and the
//! moderator-only publication controls.
//!
//! Every status change goes through `Repository::record_transition`, which
//! writes the submission, the target's published flag and the outbox entry in
//! one transaction guarded by the submission version. A stale version means a
//! concurrent request won and is reported as the state that request left.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use vernissage_common::{ArtworkId, DecisionReason, Note, OnboardingFlag, SubmissionId, SubmissionStatus};

use crate::domain::authoring::{load_target, require_actor};
use crate::domain::content::{Artwork, ContentRef, Publishable, PublicationChange};
use crate::domain::error::DomainError;
use crate::domain::identity::Actor;
use crate::domain::notification::Notification;
use crate::domain::page::Page;
use crate::domain::readiness::{Snapshot, evaluate};
use crate::domain::repository::{Repository, RepositoryError, SubmissionFilter, Transition};
use crate::domain::submission::{Submission, SubmissionTarget};

pub const DEFAULT_REJECTION_REASON: &str =
    "Your submission needs changes before it can be published.";

#[derive(Debug, Clone, Deserialize)]
pub struct ModerationSettings {
    #[serde(default = "default_rejection_reason")]
    pub default_rejection_reason: String,
}

fn default_rejection_reason() -> String {
    DEFAULT_REJECTION_REASON.to_string()
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            default_rejection_reason: default_rejection_reason(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approve,
    Reject { reason: Option<DecisionReason> },
}

fn require_moderator(actor: Option<&Actor>) -> Result<&Actor, DomainError> {
    let actor = require_actor(actor)?;
    if actor.is_moderator() {
        Ok(actor)
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Moves the target's editable submission to SUBMITTED, creating a fresh one
/// when the previous request was settled.
///
/// Checks run in a fixed order and nothing is written unless all pass:
/// session, target exists, caller may act, readiness, no pending review,
/// not already live.
pub async fn submit_for_review<R: Repository>(
    repo: &R,
    actor: Option<&Actor>,
    target: SubmissionTarget,
    note: Option<Note>,
    now: DateTime<Utc>,
) -> Result<Submission, DomainError> {
    let actor = require_actor(actor)?;

    let record = load_target(repo, target)
        .await?
        .ok_or(DomainError::NotFound("target"))?;
    let latest = repo.latest_submission(target).await?;

    let is_submitter = latest
        .as_ref()
        .is_some_and(|s| s.submitter_user_id == actor.user_id);
    let is_owner = record.owner_user_id() == actor.user_id;
    let is_team = match record.venue_scope() {
        Some(venue_id) => repo
            .venue_role(venue_id, actor.user_id)
            .await?
            .is_some_and(|role| role.can_edit()),
        None => false,
    };
    if !(is_submitter || is_owner || is_team) {
        return Err(DomainError::Forbidden);
    }

    let readiness = record.readiness();
    if !readiness.ready {
        return Err(DomainError::NotReady(readiness));
    }

    let (mut submission, expected_version) = match latest {
        Some(latest) if latest.status == SubmissionStatus::Submitted => {
            return Err(DomainError::AlreadySubmitted);
        }
        Some(latest)
            if latest.status == SubmissionStatus::Approved
                && record.publishable().is_published() =>
        {
            return Err(DomainError::AlreadyApproved);
        }
        Some(latest) if latest.status.is_editable() => {
            let version = latest.version;
            (latest, Some(version))
        }
        // approved earlier but taken offline since
        _ => (Submission::draft(target, actor.user_id, now), None),
    };

    submission.submit(actor.user_id, note, now)?;

    let notification =
        Notification::submission_received(&submission, &actor.email, record.display_name());
    let transition = Transition {
        submission: submission.clone(),
        expected_version,
        publication: None,
        notification: Some(notification),
    };
    match repo.record_transition(transition).await {
        Ok(()) => {}
        Err(RepositoryError::Conflict | RepositoryError::UniqueViolation(_)) => {
            return Err(DomainError::AlreadySubmitted);
        }
        Err(err) => return Err(err.into()),
    }

    tracing::info!(
        submission_id = %submission.id,
        submission_type = %target.submission_type(),
        target_id = %target.target_id(),
        "submitted for review"
    );

    if let Err(err) = repo
        .set_flag(actor.user_id, OnboardingFlag::HasSubmitted)
        .await
    {
        tracing::warn!(user_id = %actor.user_id, error = %err, "failed to record onboarding flag");
    }

    Ok(submission)
}

/// Approves or rejects a SUBMITTED submission. Approval publishes the target
/// in the same write.
pub async fn decide<R: Repository>(
    repo: &R,
    settings: &ModerationSettings,
    actor: Option<&Actor>,
    id: SubmissionId,
    decision: Decision,
    now: DateTime<Utc>,
) -> Result<Submission, DomainError> {
    let actor = require_moderator(actor)?;

    let current = repo
        .find_submission(id)
        .await?
        .ok_or(DomainError::NotFound("submission"))?;
    if current.status != SubmissionStatus::Submitted {
        return Err(DomainError::InvalidState(current.status));
    }
    let mut record = load_target(repo, current.target)
        .await?
        .ok_or(DomainError::NotFound("target"))?;

    let mut submission = current.clone();
    let publication = match decision {
        Decision::Approve => {
            submission.approve(actor.user_id, now)?;
            record.publishable_mut().publish(now);
            Some(record.publication())
        }
        Decision::Reject { reason } => {
            let reason = reason
                .map(DecisionReason::into_inner)
                .unwrap_or_else(|| settings.default_rejection_reason.clone());
            submission.reject(actor.user_id, reason, now)?;
            None
        }
    };

    let notification = match repo.find_user(submission.submitter_user_id).await {
        Ok(Some(user)) => {
            Notification::submission_decided(&submission, &user.email, record.display_name())
        }
        Ok(None) => {
            tracing::warn!(user_id = %submission.submitter_user_id, "submitter missing, decision not notified");
            None
        }
        Err(err) => {
            tracing::warn!(user_id = %submission.submitter_user_id, error = %err, "submitter lookup failed, decision not notified");
            None
        }
    };

    let transition = Transition {
        submission: submission.clone(),
        expected_version: Some(current.version),
        publication,
        notification,
    };
    match repo.record_transition(transition).await {
        Ok(()) => {}
        Err(RepositoryError::Conflict) => {
            let status = repo
                .find_submission(id)
                .await?
                .map_or(current.status, |s| s.status);
            return Err(DomainError::InvalidState(status));
        }
        Err(err) => return Err(err.into()),
    }

    tracing::info!(
        submission_id = %submission.id,
        status = %submission.status,
        moderator = %actor.user_id,
        "submission decided"
    );
    Ok(submission)
}

/// Submissions waiting for review, oldest first
pub async fn moderation_queue<R: Repository>(
    repo: &R,
    actor: Option<&Actor>,
    page: Page,
) -> Result<Vec<Submission>, DomainError> {
    require_moderator(actor)?;
    let submissions = repo
        .list_submissions(SubmissionFilter::Status(SubmissionStatus::Submitted), page)
        .await?;
    Ok(submissions)
}

pub async fn my_submissions<R: Repository>(
    repo: &R,
    actor: Option<&Actor>,
    page: Page,
) -> Result<Vec<Submission>, DomainError> {
    let actor = require_actor(actor)?;
    let submissions = repo
        .list_submissions(SubmissionFilter::Submitter(actor.user_id), page)
        .await?;
    Ok(submissions)
}

/// Artworks skip the review queue: a moderator publishes them once they pass
/// their checklist. Publishing twice returns the record unchanged.
pub async fn publish_artwork<R: Repository>(
    repo: &R,
    actor: Option<&Actor>,
    id: ArtworkId,
    now: DateTime<Utc>,
) -> Result<Artwork, DomainError> {
    require_moderator(actor)?;

    let mut artwork = repo
        .find_artwork(id)
        .await?
        .ok_or(DomainError::NotFound("artwork"))?;
    if artwork.is_published {
        return Ok(artwork);
    }

    let readiness = evaluate(Snapshot::Artwork(&artwork));
    if !readiness.ready {
        return Err(DomainError::NotReady(readiness));
    }

    artwork.publish(now);
    repo.update_artwork(&artwork).await?;

    tracing::info!(artwork_id = %artwork.id, "artwork published");
    Ok(artwork)
}

/// Takes a record offline. A later submission is required to publish it again.
pub async fn force_unpublish<R: Repository>(
    repo: &R,
    actor: Option<&Actor>,
    content: ContentRef,
) -> Result<PublicationChange, DomainError> {
    let actor = require_moderator(actor)?;

    let found = match content {
        ContentRef::Artist(id) => repo.find_artist(id).await?.is_some(),
        ContentRef::Venue(id) => repo.find_venue(id).await?.is_some(),
        ContentRef::Event(id) => repo.find_event(id).await?.is_some(),
        ContentRef::Artwork(id) => repo.find_artwork(id).await?.is_some(),
    };
    if !found {
        return Err(DomainError::NotFound("content"));
    }

    let change = PublicationChange {
        content,
        is_published: false,
        published_at: None,
    };
    repo.set_publication(change).await?;

    tracing::info!(content = ?content, moderator = %actor.user_id, "content unpublished");
    Ok(change)
}
