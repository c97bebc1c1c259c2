use vernissage_common::SubmissionStatus;

use crate::domain::readiness::Readiness;
use crate::domain::repository::RepositoryError;
use crate::domain::submission::TransitionError;

/// Outcomes of publication operations other than success.
///
/// Everything except `Repository` is a business answer the caller branches on.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("authentication required")]
    Unauthorized,
    #[error("not allowed to act on this record")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("not ready for publication")]
    NotReady(Readiness),
    #[error("a submission is already waiting for review")]
    AlreadySubmitted,
    #[error("already approved and published")]
    AlreadyApproved,
    #[error("submission is {0}, only SUBMITTED submissions can be decided")]
    InvalidState(SubmissionStatus),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<TransitionError> for DomainError {
    fn from(value: TransitionError) -> Self {
        DomainError::InvalidState(value.from)
    }
}
