use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use itertools::Itertools;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::readiness::{Issue, Readiness};
use crate::domain::repository::RepositoryError;

// ApiSuccess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Unauthorized,
    Forbidden,
    NotFound(String),
    NotReady(Readiness),
    Conflict { code: &'static str, message: String },
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound("not found".to_string()),
            RepositoryError::Conflict => Self::Conflict {
                code: "invalid_state",
                message: value.to_string(),
            },
            RepositoryError::UniqueViolation(_) => Self::Conflict {
                code: "conflict",
                message: value.to_string(),
            },
            RepositoryError::Corrupted(_) | RepositoryError::DatabaseError(_) => {
                Self::InternalServerError(value.to_string())
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Unauthorized => Self::Unauthorized,
            DomainError::Forbidden => Self::Forbidden,
            DomainError::NotFound(_) => Self::NotFound(value.to_string()),
            DomainError::InvalidRequest(message) => Self::UnprocessableEntity(message),
            DomainError::NotReady(readiness) => Self::NotReady(readiness),
            DomainError::AlreadySubmitted => Self::Conflict {
                code: "ALREADY_SUBMITTED",
                message: value.to_string(),
            },
            DomainError::AlreadyApproved => Self::Conflict {
                code: "ALREADY_APPROVED",
                message: value.to_string(),
            },
            DomainError::InvalidState(_) => Self::Conflict {
                code: "invalid_state",
                message: value.to_string(),
            },
            DomainError::Repository(err) => Self::from(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::UnprocessableEntity(value.body_text())
    }
}

/// Unwraps a JSON body, reporting malformed input as 422
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// Parses a uuid path segment into a typed id
pub fn parse_id<T: From<Uuid>>(value: &str) -> Result<T, ApiError> {
    Uuid::parse_str(value)
        .map(T::from)
        .map_err(|_| ApiError::UnprocessableEntity(format!("'{}' is not a valid id", value)))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorData::new("internal_error", "Internal server error".to_string()),
                )
            }
            UnprocessableEntity(message) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorData::new("invalid_request", message),
            ),
            Unauthorized => error_response(
                StatusCode::UNAUTHORIZED,
                ApiErrorData::new("unauthorized", "Authentication required".to_string()),
            ),
            Forbidden => error_response(
                StatusCode::FORBIDDEN,
                ApiErrorData::new("forbidden", "Not allowed to act on this record".to_string()),
            ),
            NotFound(message) => error_response(
                StatusCode::NOT_FOUND,
                ApiErrorData::new("not_found", message),
            ),
            NotReady(readiness) => {
                let message = format!(
                    "Not ready for publication: {}",
                    readiness.blocking.iter().map(|issue| issue.id).join(", ")
                );
                error_response(
                    StatusCode::BAD_REQUEST,
                    ApiErrorData {
                        code: "NOT_READY",
                        message,
                        blocking: Some(readiness.blocking),
                        warnings: Some(readiness.warnings),
                    },
                )
            }
            Conflict { code, message } => {
                error_response(StatusCode::CONFLICT, ApiErrorData::new(code, message))
            }
        }
    }
}

fn error_response(status: StatusCode, data: ApiErrorData) -> Response {
    (status, Json(ApiResponseBody::new_error(status, data))).into_response()
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, data: ApiErrorData) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<Vec<Issue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<Issue>>,
}

impl ApiErrorData {
    fn new(code: &'static str, message: String) -> Self {
        Self {
            code,
            message,
            blocking: None,
            warnings: None,
        }
    }
}
