use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use vernissage_common::SubmissionId;

use crate::domain::AppState;
use crate::domain::authoring::require_actor;
use crate::domain::moderation::{self, Decision};
use crate::domain::page::{Page, PageParams};
use crate::infrastructure::http::api::{ApiError, ApiSuccess, json_body, parse_id};
use crate::infrastructure::http::auth::CurrentActor;
use crate::infrastructure::http::handlers::submissions::dto::{
    DecisionRequest, ManySubmissionsResponse, SubmissionResponse,
};
use crate::infrastructure::http::querystring::QueryString;

pub mod dto;

pub async fn my_submissions<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    QueryString(params): QueryString<PageParams>,
) -> Result<ApiSuccess<ManySubmissionsResponse>, ApiError> {
    let page = Page::from(params);
    let submissions =
        moderation::my_submissions(state.repository(), actor.as_ref(), page).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ManySubmissionsResponse::new(&submissions, page.limit, page.offset),
    ))
}

pub async fn moderation_queue<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    QueryString(params): QueryString<PageParams>,
) -> Result<ApiSuccess<ManySubmissionsResponse>, ApiError> {
    let page = Page::from(params);
    let submissions =
        moderation::moderation_queue(state.repository(), actor.as_ref(), page).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ManySubmissionsResponse::new(&submissions, page.limit, page.offset),
    ))
}

pub async fn decide_submission<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<ApiSuccess<SubmissionResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let id: SubmissionId = parse_id(&id)?;
    let decision = Decision::try_from(json_body(body)?)?;

    let submission = moderation::decide(
        state.repository(),
        state.moderation(),
        actor.as_ref(),
        id,
        decision,
        Utc::now(),
    )
    .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SubmissionResponse::from(&submission),
    ))
}
