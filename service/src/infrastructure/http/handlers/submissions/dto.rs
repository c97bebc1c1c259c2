use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vernissage_common::{
    DecisionReason, Note, SubmissionId, SubmissionKind, SubmissionStatus, SubmissionType, UserId,
};

use crate::domain::moderation::Decision;
use crate::domain::submission::Submission;
use crate::infrastructure::http::api::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    id: SubmissionId,
    #[serde(rename = "type")]
    submission_type: SubmissionType,
    target_id: Uuid,
    kind: Option<SubmissionKind>,
    status: SubmissionStatus,
    submitter_user_id: UserId,
    note: Option<String>,
    decision_reason: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
    decided_at: Option<DateTime<Utc>>,
    decided_by_user_id: Option<UserId>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Submission> for SubmissionResponse {
    fn from(value: &Submission) -> Self {
        Self {
            id: value.id,
            submission_type: value.target.submission_type(),
            target_id: value.target.target_id(),
            kind: value.kind,
            status: value.status,
            submitter_user_id: value.submitter_user_id,
            note: value.note.clone(),
            decision_reason: value.decision_reason.clone(),
            submitted_at: value.submitted_at,
            decided_at: value.decided_at,
            decided_by_user_id: value.decided_by_user_id,
            version: value.version,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManySubmissionsResponse {
    data: Vec<SubmissionResponse>,
    meta: PageMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    limit: u32,
    offset: u32,
    count: usize,
}

impl ManySubmissionsResponse {
    pub fn new(submissions: &[Submission], limit: u32, offset: u32) -> Self {
        Self {
            data: submissions.iter().map(SubmissionResponse::from).collect(),
            meta: PageMeta {
                limit,
                offset,
                count: submissions.len(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub note: Option<String>,
}

impl SubmitRequest {
    pub fn note(self) -> Result<Option<Note>, ApiError> {
        self.note
            .filter(|note| !note.trim().is_empty())
            .map(Note::try_new)
            .transpose()
            .map_err(|err| ApiError::UnprocessableEntity(format!("note: {}", err)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub action: DecisionAction,
    pub decision_reason: Option<String>,
}

impl TryFrom<DecisionRequest> for Decision {
    type Error = ApiError;

    fn try_from(value: DecisionRequest) -> Result<Self, Self::Error> {
        match value.action {
            DecisionAction::Approve => Ok(Decision::Approve),
            DecisionAction::Reject => {
                let reason = value
                    .decision_reason
                    .filter(|reason| !reason.trim().is_empty())
                    .map(DecisionReason::try_new)
                    .transpose()
                    .map_err(|err| {
                        ApiError::UnprocessableEntity(format!("decisionReason: {}", err))
                    })?;
                Ok(Decision::Reject { reason })
            }
        }
    }
}
