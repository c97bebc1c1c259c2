use chrono::{DateTime, Utc};
use vernissage_common::{
    ArtistId, ArtworkId, AssetId, DisplayText, EventId, UserId, VenueId, WebUrl,
};

use crate::domain::content::{Artist, Artwork, Event, Publishable, Venue};

/// Fields a self-serve user provides when creating an artist profile
#[derive(Debug, Clone)]
pub struct NewArtist {
    pub name: DisplayText,
    pub bio: Option<String>,
    pub avatar_asset_id: Option<AssetId>,
    pub website_url: Option<WebUrl>,
    pub gallery: Vec<AssetId>,
}

#[derive(Debug, Clone)]
pub struct NewVenue {
    pub name: DisplayText,
    pub description: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub cover_asset_id: Option<AssetId>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: DisplayText,
    pub venue_id: Option<VenueId>,
    pub description: Option<String>,
    pub ticket_url: Option<WebUrl>,
    pub starts_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewArtwork {
    pub artist_id: ArtistId,
    pub title: DisplayText,
    pub description: Option<String>,
    pub featured_asset_id: Option<AssetId>,
    pub images: Vec<AssetId>,
}

/// Partial update. `None` leaves a field alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ArtistPatch {
    pub name: Option<DisplayText>,
    pub bio: Option<Option<String>>,
    pub avatar_asset_id: Option<Option<AssetId>>,
    pub avatar_url: Option<Option<WebUrl>>,
    pub website_url: Option<Option<WebUrl>>,
    pub gallery: Option<Vec<AssetId>>,
}

#[derive(Debug, Clone, Default)]
pub struct VenuePatch {
    pub name: Option<DisplayText>,
    pub description: Option<Option<String>>,
    pub address_line: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub cover_asset_id: Option<Option<AssetId>>,
    pub cover_url: Option<Option<WebUrl>>,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<DisplayText>,
    pub venue_id: Option<Option<VenueId>>,
    pub description: Option<Option<String>>,
    pub ticket_url: Option<Option<WebUrl>>,
    pub starts_at: Option<Option<DateTime<Utc>>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.venue_id.is_none()
            && self.description.is_none()
            && self.ticket_url.is_none()
            && self.starts_at.is_none()
    }
}

fn url_text(url: Option<WebUrl>) -> Option<String> {
    url.map(WebUrl::into_inner)
}

/// Blank text is stored as missing
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Artist {
    pub fn new(owner: UserId, input: NewArtist, now: DateTime<Utc>) -> Self {
        Self {
            id: ArtistId::generate(),
            owner_user_id: owner,
            name: input.name.into_inner(),
            bio: text(input.bio),
            avatar_asset_id: input.avatar_asset_id,
            avatar_url: None,
            website_url: url_text(input.website_url),
            gallery: input.gallery,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ArtistPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.into_inner();
        }
        if let Some(bio) = patch.bio {
            self.bio = text(bio);
        }
        if let Some(avatar_asset_id) = patch.avatar_asset_id {
            self.avatar_asset_id = avatar_asset_id;
        }
        if let Some(avatar_url) = patch.avatar_url {
            self.avatar_url = url_text(avatar_url);
        }
        if let Some(website_url) = patch.website_url {
            self.website_url = url_text(website_url);
        }
        if let Some(gallery) = patch.gallery {
            self.gallery = gallery;
        }
        self.updated_at = now;
    }
}

impl Venue {
    pub fn new(owner: UserId, input: NewVenue, now: DateTime<Utc>) -> Self {
        Self {
            id: VenueId::generate(),
            owner_user_id: owner,
            name: input.name.into_inner(),
            description: text(input.description),
            address_line: text(input.address_line),
            city: text(input.city),
            country: text(input.country),
            cover_asset_id: input.cover_asset_id,
            cover_url: None,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: VenuePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.into_inner();
        }
        if let Some(description) = patch.description {
            self.description = text(description);
        }
        if let Some(address_line) = patch.address_line {
            self.address_line = text(address_line);
        }
        if let Some(city) = patch.city {
            self.city = text(city);
        }
        if let Some(country) = patch.country {
            self.country = text(country);
        }
        if let Some(cover_asset_id) = patch.cover_asset_id {
            self.cover_asset_id = cover_asset_id;
        }
        if let Some(cover_url) = patch.cover_url {
            self.cover_url = url_text(cover_url);
        }
        self.updated_at = now;
    }
}

impl Event {
    pub fn new(owner: UserId, input: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: EventId::generate(),
            owner_user_id: owner,
            venue_id: input.venue_id,
            title: input.title.into_inner(),
            description: text(input.description),
            ticket_url: url_text(input.ticket_url),
            starts_at: input.starts_at,
            is_published: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Any edit takes a published event offline until it is approved again.
    pub fn apply(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if patch.is_empty() {
            return;
        }
        if let Some(title) = patch.title {
            self.title = title.into_inner();
        }
        if let Some(venue_id) = patch.venue_id {
            self.venue_id = venue_id;
        }
        if let Some(description) = patch.description {
            self.description = text(description);
        }
        if let Some(ticket_url) = patch.ticket_url {
            self.ticket_url = url_text(ticket_url);
        }
        if let Some(starts_at) = patch.starts_at {
            self.starts_at = starts_at;
        }
        if self.is_published {
            self.unpublish();
        }
        self.updated_at = now;
    }
}

impl Artwork {
    pub fn new(input: NewArtwork, now: DateTime<Utc>) -> Self {
        Self {
            id: ArtworkId::generate(),
            artist_id: input.artist_id,
            title: input.title.into_inner(),
            description: text(input.description),
            featured_asset_id: input.featured_asset_id,
            images: input.images,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }
}
