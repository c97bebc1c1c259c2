use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use vernissage_common::{
    ArtistId, EventId, Note, SubmissionId, SubmissionKind, SubmissionStatus, SubmissionType, UserId,
    VenueId,
};

/// The record a submission asks to publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionTarget {
    Artist(ArtistId),
    Venue(VenueId),
    Event(EventId),
}

impl SubmissionTarget {
    pub fn submission_type(&self) -> SubmissionType {
        match self {
            SubmissionTarget::Artist(_) => SubmissionType::Artist,
            SubmissionTarget::Venue(_) => SubmissionType::Venue,
            SubmissionTarget::Event(_) => SubmissionType::Event,
        }
    }

    pub fn target_id(&self) -> Uuid {
        match self {
            SubmissionTarget::Artist(id) => id.as_uuid(),
            SubmissionTarget::Venue(id) => id.as_uuid(),
            SubmissionTarget::Event(id) => id.as_uuid(),
        }
    }

    pub fn from_parts(submission_type: SubmissionType, target_id: Uuid) -> Self {
        match submission_type {
            SubmissionType::Artist => SubmissionTarget::Artist(target_id.into()),
            SubmissionType::Venue => SubmissionTarget::Venue(target_id.into()),
            SubmissionType::Event => SubmissionTarget::Event(target_id.into()),
        }
    }
}

/// A status change the lifecycle does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("submission cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
}

/// One request to publish a target record
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: SubmissionId,
    pub target: SubmissionTarget,
    pub kind: Option<SubmissionKind>,
    pub status: SubmissionStatus,
    pub submitter_user_id: UserId,
    pub note: Option<String>,
    pub decision_reason: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by_user_id: Option<UserId>,
    /// Bumped by every transition, checked when the row is written back
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    pub fn draft(target: SubmissionTarget, submitter: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: SubmissionId::generate(),
            target,
            kind: Some(SubmissionKind::Publish),
            status: SubmissionStatus::Draft,
            submitter_user_id: submitter,
            note: None,
            decision_reason: None,
            submitted_at: None,
            decided_at: None,
            decided_by_user_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(
        &mut self,
        allowed: bool,
        to: SubmissionStatus,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !allowed {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.version += 1;
        self.updated_at = now;
        Ok(())
    }

    /// DRAFT or REJECTED -> SUBMITTED. A previous decision and note are cleared.
    pub fn submit(
        &mut self,
        submitter: UserId,
        note: Option<Note>,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.transition(self.status.is_editable(), SubmissionStatus::Submitted, now)?;
        self.kind = Some(SubmissionKind::Publish);
        self.submitter_user_id = submitter;
        self.note = note.map(Note::into_inner);
        self.submitted_at = Some(now);
        self.decision_reason = None;
        self.decided_at = None;
        self.decided_by_user_id = None;
        Ok(())
    }

    /// SUBMITTED -> APPROVED
    pub fn approve(&mut self, moderator: UserId, now: DateTime<Utc>) -> Result<(), TransitionError> {
        let allowed = self.status == SubmissionStatus::Submitted;
        self.transition(allowed, SubmissionStatus::Approved, now)?;
        self.decided_by_user_id = Some(moderator);
        self.decided_at = Some(now);
        self.decision_reason = None;
        Ok(())
    }

    /// SUBMITTED -> REJECTED
    pub fn reject(
        &mut self,
        moderator: UserId,
        reason: String,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        let allowed = self.status == SubmissionStatus::Submitted;
        self.transition(allowed, SubmissionStatus::Rejected, now)?;
        self.decided_by_user_id = Some(moderator);
        self.decided_at = Some(now);
        self.decision_reason = Some(reason);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::content::fixtures::at;

    use super::*;

    fn submitted() -> Submission {
        let mut submission = Submission::draft(
            SubmissionTarget::Venue(VenueId::generate()),
            UserId::generate(),
            at(9),
        );
        let submitter = submission.submitter_user_id;
        submission.submit(submitter, None, at(10)).unwrap();
        submission
    }

    #[test]
    fn draft_is_submitted_with_note() {
        let owner = UserId::generate();
        let mut submission = Submission::draft(SubmissionTarget::Artist(ArtistId::generate()), owner, at(9));

        submission
            .submit(owner, Some(Note::try_new("First show in May").unwrap()), at(10))
            .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.submitted_at, Some(at(10)));
        assert_eq!(submission.note.as_deref(), Some("First show in May"));
        assert_eq!(submission.version, 2);
    }

    #[test]
    fn submitted_cannot_be_submitted_again() {
        let mut submission = submitted();
        let submitter = submission.submitter_user_id;

        let err = submission.submit(submitter, None, at(11)).unwrap_err();

        assert_eq!(err.from, SubmissionStatus::Submitted);
        assert_eq!(submission.version, 2);
    }

    #[test]
    fn approval_is_terminal() {
        let moderator = UserId::generate();
        let mut submission = submitted();

        submission.approve(moderator, at(12)).unwrap();
        assert_eq!(submission.status, SubmissionStatus::Approved);
        assert_eq!(submission.decided_by_user_id, Some(moderator));

        let err = submission.approve(moderator, at(13)).unwrap_err();
        assert_eq!(
            err,
            TransitionError {
                from: SubmissionStatus::Approved,
                to: SubmissionStatus::Approved
            }
        );
        assert!(submission.reject(moderator, "late".into(), at(13)).is_err());
        let submitter = submission.submitter_user_id;
        assert!(submission.submit(submitter, None, at(13)).is_err());
    }

    #[test]
    fn rejected_can_be_resubmitted_and_loses_decision() {
        let moderator = UserId::generate();
        let mut submission = submitted();
        submission
            .reject(moderator, "Add more photos".to_string(), at(12))
            .unwrap();
        assert_eq!(submission.decision_reason.as_deref(), Some("Add more photos"));

        let submitter = submission.submitter_user_id;
        submission.submit(submitter, None, at(14)).unwrap();

        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.decision_reason, None);
        assert_eq!(submission.decided_at, None);
        assert_eq!(submission.submitted_at, Some(at(14)));
        assert_eq!(submission.version, 4);
    }

    #[test]
    fn resubmission_replaces_the_previous_note() {
        let owner = UserId::generate();
        let mut submission = Submission::draft(SubmissionTarget::Artist(ArtistId::generate()), owner, at(9));
        submission
            .submit(owner, Some(Note::try_new("First show in May").unwrap()), at(10))
            .unwrap();
        submission
            .reject(UserId::generate(), "Add more photos".to_string(), at(11))
            .unwrap();

        submission.submit(owner, None, at(12)).unwrap();

        assert_eq!(submission.note, None);
    }

    #[test]
    fn draft_cannot_be_decided() {
        let mut submission = Submission::draft(
            SubmissionTarget::Event(EventId::generate()),
            UserId::generate(),
            at(9),
        );
        assert!(submission.approve(UserId::generate(), at(10)).is_err());
        assert_eq!(submission.status, SubmissionStatus::Draft);
    }

    #[test]
    fn target_round_trips_through_columns() {
        let target = SubmissionTarget::Event(EventId::generate());
        let restored = SubmissionTarget::from_parts(target.submission_type(), target.target_id());
        assert_eq!(restored, target);
    }
}
