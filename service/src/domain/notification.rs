use std::fmt;
use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use vernissage_common::SubmissionStatus;

use crate::domain::submission::Submission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    SubmissionReceived,
    SubmissionApproved,
    SubmissionRejected,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::SubmissionReceived => "SUBMISSION_RECEIVED",
            NotificationType::SubmissionApproved => "SUBMISSION_APPROVED",
            NotificationType::SubmissionRejected => "SUBMISSION_REJECTED",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMISSION_RECEIVED" => Ok(NotificationType::SubmissionReceived),
            "SUBMISSION_APPROVED" => Ok(NotificationType::SubmissionApproved),
            "SUBMISSION_REJECTED" => Ok(NotificationType::SubmissionRejected),
            _ => Err(anyhow::anyhow!("Invalid notification type: {}", s)),
        }
    }
}

/// A message to deliver once per dedupe key
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub to_email: String,
    pub dedupe_key: String,
    pub payload: serde_json::Value,
}

impl Notification {
    /// Confirmation to the submitter that the request reached the review queue
    pub fn submission_received(submission: &Submission, to_email: &str, title: &str) -> Self {
        Self::about(
            submission,
            NotificationType::SubmissionReceived,
            "submitted",
            to_email,
            title,
        )
    }

    /// Outcome of a moderation decision. `None` while the submission is undecided.
    pub fn submission_decided(submission: &Submission, to_email: &str, title: &str) -> Option<Self> {
        let (notification_type, event) = match submission.status {
            SubmissionStatus::Approved => (NotificationType::SubmissionApproved, "approved"),
            SubmissionStatus::Rejected => (NotificationType::SubmissionRejected, "rejected"),
            SubmissionStatus::Draft | SubmissionStatus::Submitted => return None,
        };
        Some(Self::about(submission, notification_type, event, to_email, title))
    }

    fn about(
        submission: &Submission,
        notification_type: NotificationType,
        event: &str,
        to_email: &str,
        title: &str,
    ) -> Self {
        let target = submission.target;
        Self {
            notification_type,
            to_email: to_email.to_string(),
            dedupe_key: dedupe_key(submission, event),
            payload: json!({
                "submissionId": submission.id,
                "submissionType": target.submission_type(),
                "targetId": target.target_id(),
                "title": title,
                "status": submission.status,
                "decisionReason": submission.decision_reason,
            }),
        }
    }
}

/// Stable per submission row, lifecycle event and row version, so a retried
/// request maps onto the same key while a later resubmission gets a new one.
pub fn dedupe_key(submission: &Submission, event: &str) -> String {
    format!("submission:{}:{}:v{}", submission.id, event, submission.version)
}

/// A notification waiting in the outbox
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEntry {
    pub id: Uuid,
    pub notification: Notification,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}

/// Delivery transport for outbox entries
pub trait Notifier: Send + Sync + 'static {
    fn deliver(&self, entry: &OutboxEntry) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}
