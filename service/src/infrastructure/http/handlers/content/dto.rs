use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use vernissage_common::{
    ArtistId, ArtworkId, AssetId, DisplayText, EventId, UserId, VenueId, WebUrl,
};

use crate::domain::content::patch::{
    ArtistPatch, EventPatch, NewArtist, NewArtwork, NewEvent, NewVenue, VenuePatch,
};
use crate::domain::content::{Artist, Artwork, ContentRef, Event, PublicationChange, Venue};
use crate::domain::submission::Submission;
use crate::infrastructure::http::api::ApiError;
use crate::infrastructure::http::handlers::submissions::dto::SubmissionResponse;

/// Keeps an explicit `null` apart from a missing field: `Some(None)` clears.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn display_text(field: &str, value: String) -> Result<DisplayText, ApiError> {
    DisplayText::try_new(value)
        .map_err(|err| ApiError::UnprocessableEntity(format!("{}: {}", field, err)))
}

fn web_url(field: &str, value: Option<String>) -> Result<Option<WebUrl>, ApiError> {
    value
        .filter(|url| !url.trim().is_empty())
        .map(WebUrl::try_new)
        .transpose()
        .map_err(|err| ApiError::UnprocessableEntity(format!("{}: {}", field, err)))
}

fn patch_url(field: &str, value: Option<Option<String>>) -> Result<Option<Option<WebUrl>>, ApiError> {
    value.map(|url| web_url(field, url)).transpose()
}

// requests

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtistRequest {
    name: String,
    bio: Option<String>,
    avatar_asset_id: Option<AssetId>,
    website_url: Option<String>,
    #[serde(default)]
    gallery: Vec<AssetId>,
}

impl TryFrom<CreateArtistRequest> for NewArtist {
    type Error = ApiError;

    fn try_from(value: CreateArtistRequest) -> Result<Self, Self::Error> {
        Ok(NewArtist {
            name: display_text("name", value.name)?,
            bio: value.bio,
            avatar_asset_id: value.avatar_asset_id,
            website_url: web_url("websiteUrl", value.website_url)?,
            gallery: value.gallery,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    name: String,
    description: Option<String>,
    address_line: Option<String>,
    city: Option<String>,
    country: Option<String>,
    cover_asset_id: Option<AssetId>,
}

impl TryFrom<CreateVenueRequest> for NewVenue {
    type Error = ApiError;

    fn try_from(value: CreateVenueRequest) -> Result<Self, Self::Error> {
        Ok(NewVenue {
            name: display_text("name", value.name)?,
            description: value.description,
            address_line: value.address_line,
            city: value.city,
            country: value.country,
            cover_asset_id: value.cover_asset_id,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    title: String,
    venue_id: Option<VenueId>,
    description: Option<String>,
    ticket_url: Option<String>,
    starts_at: Option<DateTime<Utc>>,
}

impl TryFrom<CreateEventRequest> for NewEvent {
    type Error = ApiError;

    fn try_from(value: CreateEventRequest) -> Result<Self, Self::Error> {
        Ok(NewEvent {
            title: display_text("title", value.title)?,
            venue_id: value.venue_id,
            description: value.description,
            ticket_url: web_url("ticketUrl", value.ticket_url)?,
            starts_at: value.starts_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtworkRequest {
    artist_id: ArtistId,
    title: String,
    description: Option<String>,
    featured_asset_id: Option<AssetId>,
    #[serde(default)]
    images: Vec<AssetId>,
}

impl TryFrom<CreateArtworkRequest> for NewArtwork {
    type Error = ApiError;

    fn try_from(value: CreateArtworkRequest) -> Result<Self, Self::Error> {
        Ok(NewArtwork {
            artist_id: value.artist_id,
            title: display_text("title", value.title)?,
            description: value.description,
            featured_asset_id: value.featured_asset_id,
            images: value.images,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtistRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    avatar_asset_id: Option<Option<AssetId>>,
    #[serde(default, deserialize_with = "double_option")]
    avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    website_url: Option<Option<String>>,
    gallery: Option<Vec<AssetId>>,
}

impl TryFrom<UpdateArtistRequest> for ArtistPatch {
    type Error = ApiError;

    fn try_from(value: UpdateArtistRequest) -> Result<Self, Self::Error> {
        Ok(ArtistPatch {
            name: value.name.map(|name| display_text("name", name)).transpose()?,
            bio: value.bio,
            avatar_asset_id: value.avatar_asset_id,
            avatar_url: patch_url("avatarUrl", value.avatar_url)?,
            website_url: patch_url("websiteUrl", value.website_url)?,
            gallery: value.gallery,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenueRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    address_line: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    cover_asset_id: Option<Option<AssetId>>,
    #[serde(default, deserialize_with = "double_option")]
    cover_url: Option<Option<String>>,
}

impl TryFrom<UpdateVenueRequest> for VenuePatch {
    type Error = ApiError;

    fn try_from(value: UpdateVenueRequest) -> Result<Self, Self::Error> {
        Ok(VenuePatch {
            name: value.name.map(|name| display_text("name", name)).transpose()?,
            description: value.description,
            address_line: value.address_line,
            city: value.city,
            country: value.country,
            cover_asset_id: value.cover_asset_id,
            cover_url: patch_url("coverUrl", value.cover_url)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    venue_id: Option<Option<VenueId>>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    ticket_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    starts_at: Option<Option<DateTime<Utc>>>,
}

impl TryFrom<UpdateEventRequest> for EventPatch {
    type Error = ApiError;

    fn try_from(value: UpdateEventRequest) -> Result<Self, Self::Error> {
        Ok(EventPatch {
            title: value.title.map(|title| display_text("title", title)).transpose()?,
            venue_id: value.venue_id,
            description: value.description,
            ticket_url: patch_url("ticketUrl", value.ticket_url)?,
            starts_at: value.starts_at,
        })
    }
}

// responses

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistResponse {
    id: ArtistId,
    owner_user_id: UserId,
    name: String,
    bio: Option<String>,
    avatar_asset_id: Option<AssetId>,
    avatar_url: Option<String>,
    website_url: Option<String>,
    gallery: Vec<AssetId>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Artist> for ArtistResponse {
    fn from(value: &Artist) -> Self {
        Self {
            id: value.id,
            owner_user_id: value.owner_user_id,
            name: value.name.clone(),
            bio: value.bio.clone(),
            avatar_asset_id: value.avatar_asset_id,
            avatar_url: value.avatar_url.clone(),
            website_url: value.website_url.clone(),
            gallery: value.gallery.clone(),
            is_published: value.is_published,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponse {
    id: VenueId,
    owner_user_id: UserId,
    name: String,
    description: Option<String>,
    address_line: Option<String>,
    city: Option<String>,
    country: Option<String>,
    cover_asset_id: Option<AssetId>,
    cover_url: Option<String>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Venue> for VenueResponse {
    fn from(value: &Venue) -> Self {
        Self {
            id: value.id,
            owner_user_id: value.owner_user_id,
            name: value.name.clone(),
            description: value.description.clone(),
            address_line: value.address_line.clone(),
            city: value.city.clone(),
            country: value.country.clone(),
            cover_asset_id: value.cover_asset_id,
            cover_url: value.cover_url.clone(),
            is_published: value.is_published,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    id: EventId,
    owner_user_id: UserId,
    venue_id: Option<VenueId>,
    title: String,
    description: Option<String>,
    ticket_url: Option<String>,
    starts_at: Option<DateTime<Utc>>,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Event> for EventResponse {
    fn from(value: &Event) -> Self {
        Self {
            id: value.id,
            owner_user_id: value.owner_user_id,
            venue_id: value.venue_id,
            title: value.title.clone(),
            description: value.description.clone(),
            ticket_url: value.ticket_url.clone(),
            starts_at: value.starts_at,
            is_published: value.is_published,
            published_at: value.published_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkResponse {
    id: ArtworkId,
    artist_id: ArtistId,
    title: String,
    description: Option<String>,
    featured_asset_id: Option<AssetId>,
    images: Vec<AssetId>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Artwork> for ArtworkResponse {
    fn from(value: &Artwork) -> Self {
        Self {
            id: value.id,
            artist_id: value.artist_id,
            title: value.title.clone(),
            description: value.description.clone(),
            featured_asset_id: value.featured_asset_id,
            images: value.images.clone(),
            is_published: value.is_published,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// A new record together with the draft submission created for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftCreatedResponse<T: Serialize> {
    entity: T,
    submission: SubmissionResponse,
}

impl<T: Serialize> DraftCreatedResponse<T> {
    pub fn new(entity: T, submission: &Submission) -> Self {
        Self {
            entity,
            submission: SubmissionResponse::from(submission),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationResponse {
    #[serde(rename = "type")]
    content_type: &'static str,
    id: Uuid,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
}

impl From<PublicationChange> for PublicationResponse {
    fn from(value: PublicationChange) -> Self {
        let (content_type, id) = match value.content {
            ContentRef::Artist(id) => ("artists", id.as_uuid()),
            ContentRef::Venue(id) => ("venues", id.as_uuid()),
            ContentRef::Event(id) => ("events", id.as_uuid()),
            ContentRef::Artwork(id) => ("artworks", id.as_uuid()),
        };
        Self {
            content_type,
            id,
            is_published: value.is_published,
            published_at: value.published_at,
        }
    }
}
