//! Publish readiness checklists.
//!
//! Evaluation is a pure function of the record passed in: no storage access,
//! and issues always come out in the order they are declared below.

use serde::Serialize;

use crate::domain::content::{Artist, Artwork, Event, Venue};

pub const ARTIST_BIO_MIN_CHARS: usize = 20;
pub const EVENT_DESCRIPTION_MIN_CHARS: usize = 40;

/// One condition standing between a record and publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Stable key, safe for clients to branch on
    pub id: &'static str,
    pub label: &'static str,
    /// Field the client should send the user to
    pub field: &'static str,
}

pub const ARTIST_BIO: Issue = Issue {
    id: "artist-bio",
    label: "Add a bio of at least 20 characters",
    field: "bio",
};
pub const ARTIST_AVATAR: Issue = Issue {
    id: "artist-avatar",
    label: "Add a profile image or a gallery image",
    field: "avatarAssetId",
};
pub const ARTIST_WEBSITE: Issue = Issue {
    id: "artist-website",
    label: "Add a website link",
    field: "websiteUrl",
};
pub const VENUE_CITY: Issue = Issue {
    id: "venue-city",
    label: "Add the city",
    field: "city",
};
pub const VENUE_COUNTRY: Issue = Issue {
    id: "venue-country",
    label: "Add the country",
    field: "country",
};
pub const VENUE_COVER: Issue = Issue {
    id: "venue-cover",
    label: "Add a cover image",
    field: "coverAssetId",
};
pub const VENUE_DESCRIPTION: Issue = Issue {
    id: "venue-description",
    label: "Add a description",
    field: "description",
};
pub const EVENT_VENUE: Issue = Issue {
    id: "event-venue",
    label: "Choose the venue hosting the event",
    field: "venueId",
};
pub const EVENT_DESCRIPTION: Issue = Issue {
    id: "event-description",
    label: "Describe the event in at least 40 characters",
    field: "description",
};
pub const EVENT_TICKET_URL: Issue = Issue {
    id: "event-ticket-url",
    label: "Add a ticket or RSVP link",
    field: "ticketUrl",
};
pub const EVENT_START: Issue = Issue {
    id: "event-start",
    label: "Add the start time",
    field: "startsAt",
};
pub const ARTWORK_IMAGES: Issue = Issue {
    id: "artwork-images",
    label: "Add at least one image",
    field: "images",
};
pub const ARTWORK_DESCRIPTION: Issue = Issue {
    id: "artwork-description",
    label: "Add a description",
    field: "description",
};

/// Outcome of a readiness check. `ready` iff nothing blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub blocking: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

#[cfg(test)]
impl Readiness {
    pub fn blocking_ids(&self) -> Vec<&'static str> {
        self.blocking.iter().map(|issue| issue.id).collect()
    }
}

/// Borrowed view of the record being checked
#[derive(Debug, Clone, Copy)]
pub enum Snapshot<'a> {
    Artist(&'a Artist),
    Venue(&'a Venue),
    Event(&'a Event),
    Artwork(&'a Artwork),
}

pub fn evaluate(snapshot: Snapshot<'_>) -> Readiness {
    match snapshot {
        Snapshot::Artist(artist) => evaluate_artist(artist),
        Snapshot::Venue(venue) => evaluate_venue(venue),
        Snapshot::Event(event) => evaluate_event(event),
        Snapshot::Artwork(artwork) => evaluate_artwork(artwork),
    }
}

#[derive(Default)]
struct Checklist {
    blocking: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl Checklist {
    fn require(mut self, satisfied: bool, issue: Issue) -> Self {
        if !satisfied {
            self.blocking.push(issue);
        }
        self
    }

    fn recommend(mut self, satisfied: bool, issue: Issue) -> Self {
        if !satisfied {
            self.warnings.push(issue);
        }
        self
    }

    fn finish(self) -> Readiness {
        Readiness {
            ready: self.blocking.is_empty(),
            blocking: self.blocking,
            warnings: self.warnings,
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn at_least(value: &Option<String>, chars: usize) -> bool {
    value
        .as_deref()
        .is_some_and(|v| v.trim().chars().count() >= chars)
}

fn evaluate_artist(artist: &Artist) -> Readiness {
    let has_avatar = artist.avatar_asset_id.is_some()
        || present(&artist.avatar_url)
        || !artist.gallery.is_empty();

    Checklist::default()
        .require(at_least(&artist.bio, ARTIST_BIO_MIN_CHARS), ARTIST_BIO)
        .require(has_avatar, ARTIST_AVATAR)
        .recommend(present(&artist.website_url), ARTIST_WEBSITE)
        .finish()
}

fn evaluate_venue(venue: &Venue) -> Readiness {
    // a full address line stands in for city and country
    let has_address = present(&venue.address_line);
    let has_cover = venue.cover_asset_id.is_some() || present(&venue.cover_url);

    Checklist::default()
        .require(has_address || present(&venue.city), VENUE_CITY)
        .require(has_address || present(&venue.country), VENUE_COUNTRY)
        .require(has_cover, VENUE_COVER)
        .recommend(present(&venue.description), VENUE_DESCRIPTION)
        .finish()
}

fn evaluate_event(event: &Event) -> Readiness {
    Checklist::default()
        .require(event.venue_id.is_some(), EVENT_VENUE)
        .recommend(
            at_least(&event.description, EVENT_DESCRIPTION_MIN_CHARS),
            EVENT_DESCRIPTION,
        )
        .recommend(present(&event.ticket_url), EVENT_TICKET_URL)
        .recommend(event.starts_at.is_some(), EVENT_START)
        .finish()
}

fn evaluate_artwork(artwork: &Artwork) -> Readiness {
    let has_image = artwork.featured_asset_id.is_some() || !artwork.images.is_empty();

    Checklist::default()
        .require(has_image, ARTWORK_IMAGES)
        .recommend(present(&artwork.description), ARTWORK_DESCRIPTION)
        .finish()
}
