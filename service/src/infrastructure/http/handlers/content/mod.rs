use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use vernissage_common::{ArtistId, ArtworkId, EventId, VenueId};

use crate::domain::AppState;
use crate::domain::authoring::{self, require_actor};
use crate::domain::content::ContentRef;
use crate::domain::content::patch::{
    ArtistPatch, EventPatch, NewArtist, NewArtwork, NewEvent, NewVenue, VenuePatch,
};
use crate::domain::moderation;
use crate::domain::readiness::Readiness;
use crate::infrastructure::http::api::{ApiError, ApiSuccess, json_body, parse_id};
use crate::infrastructure::http::auth::CurrentActor;
use crate::infrastructure::http::handlers::content::dto::{
    ArtistResponse, ArtworkResponse, CreateArtistRequest, CreateArtworkRequest,
    CreateEventRequest, CreateVenueRequest, DraftCreatedResponse, EventResponse,
    PublicationResponse, UpdateArtistRequest, UpdateEventRequest, UpdateVenueRequest,
    VenueResponse,
};
use crate::infrastructure::http::handlers::submissions::dto::{SubmissionResponse, SubmitRequest};

mod dto;

type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub async fn create_artist<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    body: JsonBody<CreateArtistRequest>,
) -> Result<ApiSuccess<DraftCreatedResponse<ArtistResponse>>, ApiError> {
    require_actor(actor.as_ref())?;
    let input: NewArtist = json_body(body)?.try_into()?;

    let (artist, draft) =
        authoring::create_artist(state.repository(), actor.as_ref(), input, Utc::now()).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        DraftCreatedResponse::new(ArtistResponse::from(&artist), &draft),
    ))
}

pub async fn create_venue<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    body: JsonBody<CreateVenueRequest>,
) -> Result<ApiSuccess<DraftCreatedResponse<VenueResponse>>, ApiError> {
    require_actor(actor.as_ref())?;
    let input: NewVenue = json_body(body)?.try_into()?;

    let (venue, draft) =
        authoring::create_venue(state.repository(), actor.as_ref(), input, Utc::now()).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        DraftCreatedResponse::new(VenueResponse::from(&venue), &draft),
    ))
}

pub async fn create_event<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    body: JsonBody<CreateEventRequest>,
) -> Result<ApiSuccess<DraftCreatedResponse<EventResponse>>, ApiError> {
    require_actor(actor.as_ref())?;
    let input: NewEvent = json_body(body)?.try_into()?;

    let (event, draft) =
        authoring::create_event(state.repository(), actor.as_ref(), input, Utc::now()).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        DraftCreatedResponse::new(EventResponse::from(&event), &draft),
    ))
}

pub async fn create_artwork<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    body: JsonBody<CreateArtworkRequest>,
) -> Result<ApiSuccess<ArtworkResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let input: NewArtwork = json_body(body)?.try_into()?;

    let artwork =
        authoring::create_artwork(state.repository(), actor.as_ref(), input, Utc::now()).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        ArtworkResponse::from(&artwork),
    ))
}

pub async fn update_artist<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: JsonBody<UpdateArtistRequest>,
) -> Result<ApiSuccess<ArtistResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let id: ArtistId = parse_id(&id)?;
    let patch: ArtistPatch = json_body(body)?.try_into()?;

    let artist =
        authoring::update_artist(state.repository(), actor.as_ref(), id, patch, Utc::now())
            .await?;

    Ok(ApiSuccess::new(StatusCode::OK, ArtistResponse::from(&artist)))
}

pub async fn update_venue<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: JsonBody<UpdateVenueRequest>,
) -> Result<ApiSuccess<VenueResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let id: VenueId = parse_id(&id)?;
    let patch: VenuePatch = json_body(body)?.try_into()?;

    let venue =
        authoring::update_venue(state.repository(), actor.as_ref(), id, patch, Utc::now())
            .await?;

    Ok(ApiSuccess::new(StatusCode::OK, VenueResponse::from(&venue)))
}

pub async fn update_event<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: JsonBody<UpdateEventRequest>,
) -> Result<ApiSuccess<EventResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let id: EventId = parse_id(&id)?;
    let patch: EventPatch = json_body(body)?.try_into()?;

    let event =
        authoring::update_event(state.repository(), actor.as_ref(), id, patch, Utc::now())
            .await?;

    Ok(ApiSuccess::new(StatusCode::OK, EventResponse::from(&event)))
}

pub async fn readiness<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path((kind, id)): Path<(String, String)>,
) -> Result<ApiSuccess<Readiness>, ApiError> {
    require_actor(actor.as_ref())?;
    let content = ContentRef::parse(&kind, &id)?;

    let readiness = authoring::readiness(state.repository(), actor.as_ref(), content).await?;

    Ok(ApiSuccess::new(StatusCode::OK, readiness))
}

/// An empty body submits without a note.
pub async fn submit<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path((kind, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<ApiSuccess<SubmissionResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let target = ContentRef::parse(&kind, &id)?
        .submission_target()
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!("{} are published without review", kind))
        })?;
    let request = if body.is_empty() {
        SubmitRequest::default()
    } else {
        serde_json::from_slice::<SubmitRequest>(&body)
            .map_err(|err| ApiError::UnprocessableEntity(err.to_string()))?
    };
    let note = request.note()?;

    let submission =
        moderation::submit_for_review(state.repository(), actor.as_ref(), target, note, Utc::now())
            .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SubmissionResponse::from(&submission),
    ))
}

pub async fn publish_artwork<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<ApiSuccess<ArtworkResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let id: ArtworkId = parse_id(&id)?;

    let artwork =
        moderation::publish_artwork(state.repository(), actor.as_ref(), id, Utc::now()).await?;

    Ok(ApiSuccess::new(StatusCode::OK, ArtworkResponse::from(&artwork)))
}

pub async fn force_unpublish<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path((kind, id)): Path<(String, String)>,
) -> Result<ApiSuccess<PublicationResponse>, ApiError> {
    require_actor(actor.as_ref())?;
    let content = ContentRef::parse(&kind, &id)?;

    let change = moderation::force_unpublish(state.repository(), actor.as_ref(), content).await?;

    Ok(ApiSuccess::new(StatusCode::OK, PublicationResponse::from(change)))
}
