use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::values::UnknownValue;

/// Which kind of entity a submission targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionType {
    Artist,
    Venue,
    Event,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Artist => "ARTIST",
            SubmissionType::Venue => "VENUE",
            SubmissionType::Event => "EVENT",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ARTIST" => Ok(SubmissionType::Artist),
            "VENUE" => Ok(SubmissionType::Venue),
            "EVENT" => Ok(SubmissionType::Event),
            _ => Err(UnknownValue::new("submission type", s)),
        }
    }
}

/// What the submitter asks for. Legacy rows carry no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionKind {
    Publish,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Publish => "PUBLISH",
        }
    }
}

impl FromStr for SubmissionKind {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLISH" => Ok(SubmissionKind::Publish),
            _ => Err(UnknownValue::new("submission kind", s)),
        }
    }
}

/// Lifecycle status of one submission row
///
/// DRAFT -> SUBMITTED -> APPROVED | REJECTED, REJECTED -> SUBMITTED on resubmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "DRAFT",
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::Rejected => "REJECTED",
        }
    }

    /// The submitter may still edit and (re)submit
    pub fn is_editable(&self) -> bool {
        matches!(self, SubmissionStatus::Draft | SubmissionStatus::Rejected)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(SubmissionStatus::Draft),
            "SUBMITTED" => Ok(SubmissionStatus::Submitted),
            "APPROVED" => Ok(SubmissionStatus::Approved),
            "REJECTED" => Ok(SubmissionStatus::Rejected),
            _ => Err(UnknownValue::new("submission status", s)),
        }
    }
}
