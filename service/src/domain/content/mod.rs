use chrono::{DateTime, Utc};
use vernissage_common::{ArtistId, ArtworkId, AssetId, EventId, UserId, VenueId};

use crate::domain::error::DomainError;
use crate::domain::submission::SubmissionTarget;

pub mod patch;

/// Content whose public visibility is controlled by a published flag
pub trait Publishable {
    fn is_published(&self) -> bool;

    /// Make publicly visible. The first publish timestamp is kept across re-publishing.
    fn publish(&mut self, now: DateTime<Utc>);

    fn unpublish(&mut self);

    fn published_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub id: ArtistId,
    pub owner_user_id: UserId,
    pub name: String,
    pub bio: Option<String>,
    pub avatar_asset_id: Option<AssetId>,
    /// Avatar from before the asset store existed
    pub avatar_url: Option<String>,
    pub website_url: Option<String>,
    pub gallery: Vec<AssetId>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: VenueId,
    pub owner_user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub cover_asset_id: Option<AssetId>,
    pub cover_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub owner_user_id: UserId,
    pub venue_id: Option<VenueId>,
    pub title: String,
    pub description: Option<String>,
    pub ticket_url: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub id: ArtworkId,
    pub artist_id: ArtistId,
    pub title: String,
    pub description: Option<String>,
    pub featured_asset_id: Option<AssetId>,
    pub images: Vec<AssetId>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Publishable for Artist {
    fn is_published(&self) -> bool {
        self.is_published
    }

    fn publish(&mut self, now: DateTime<Utc>) {
        self.is_published = true;
        self.updated_at = now;
    }

    fn unpublish(&mut self) {
        self.is_published = false;
    }
}

impl Publishable for Venue {
    fn is_published(&self) -> bool {
        self.is_published
    }

    fn publish(&mut self, now: DateTime<Utc>) {
        self.is_published = true;
        self.updated_at = now;
    }

    fn unpublish(&mut self) {
        self.is_published = false;
    }
}

impl Publishable for Event {
    fn is_published(&self) -> bool {
        self.is_published
    }

    fn publish(&mut self, now: DateTime<Utc>) {
        if self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.is_published = true;
        self.updated_at = now;
    }

    fn unpublish(&mut self) {
        self.is_published = false;
        self.published_at = None;
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}

impl Publishable for Artwork {
    fn is_published(&self) -> bool {
        self.is_published
    }

    /// The first gallery image becomes the cover when none was chosen.
    fn publish(&mut self, now: DateTime<Utc>) {
        if self.featured_asset_id.is_none() {
            self.featured_asset_id = self.images.first().copied();
        }
        self.is_published = true;
        self.updated_at = now;
    }

    fn unpublish(&mut self) {
        self.is_published = false;
    }
}

/// Reference to any publishable record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRef {
    Artist(ArtistId),
    Venue(VenueId),
    Event(EventId),
    Artwork(ArtworkId),
}

impl ContentRef {
    /// Parses the `{kind}/{id}` pair used in urls: `artists`, `venues`, `events`, `artworks`.
    pub fn parse(kind: &str, id: &str) -> Result<Self, DomainError> {
        let invalid_id = |_| DomainError::InvalidRequest(format!("'{}' is not a valid id", id));
        match kind {
            "artists" => ArtistId::try_from(id).map(Self::Artist).map_err(invalid_id),
            "venues" => VenueId::try_from(id).map(Self::Venue).map_err(invalid_id),
            "events" => EventId::try_from(id).map(Self::Event).map_err(invalid_id),
            "artworks" => ArtworkId::try_from(id).map(Self::Artwork).map_err(invalid_id),
            _ => Err(DomainError::InvalidRequest(format!(
                "unknown content type '{}'",
                kind
            ))),
        }
    }

    /// Artworks are published directly and have no submission flow.
    pub fn submission_target(&self) -> Option<SubmissionTarget> {
        match *self {
            ContentRef::Artist(id) => Some(SubmissionTarget::Artist(id)),
            ContentRef::Venue(id) => Some(SubmissionTarget::Venue(id)),
            ContentRef::Event(id) => Some(SubmissionTarget::Event(id)),
            ContentRef::Artwork(_) => None,
        }
    }
}

impl From<SubmissionTarget> for ContentRef {
    fn from(value: SubmissionTarget) -> Self {
        match value {
            SubmissionTarget::Artist(id) => ContentRef::Artist(id),
            SubmissionTarget::Venue(id) => ContentRef::Venue(id),
            SubmissionTarget::Event(id) => ContentRef::Event(id),
        }
    }
}

/// New published state of one record, written next to a submission change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationChange {
    pub content: ContentRef,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

/// A loaded record that can be submitted for review
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Artist(Artist),
    Venue(Venue),
    Event(Event),
}

impl Target {
    pub fn reference(&self) -> SubmissionTarget {
        match self {
            Target::Artist(artist) => SubmissionTarget::Artist(artist.id),
            Target::Venue(venue) => SubmissionTarget::Venue(venue.id),
            Target::Event(event) => SubmissionTarget::Event(event.id),
        }
    }

    pub fn owner_user_id(&self) -> UserId {
        match self {
            Target::Artist(artist) => artist.owner_user_id,
            Target::Venue(venue) => venue.owner_user_id,
            Target::Event(event) => event.owner_user_id,
        }
    }

    /// The venue whose team may act on this record
    pub fn venue_scope(&self) -> Option<VenueId> {
        match self {
            Target::Artist(_) => None,
            Target::Venue(venue) => Some(venue.id),
            Target::Event(event) => event.venue_id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Target::Artist(artist) => &artist.name,
            Target::Venue(venue) => &venue.name,
            Target::Event(event) => &event.title,
        }
    }

    pub fn publication(&self) -> PublicationChange {
        PublicationChange {
            content: self.reference().into(),
            is_published: self.publishable().is_published(),
            published_at: self.publishable().published_at(),
        }
    }

    pub fn publishable(&self) -> &dyn Publishable {
        match self {
            Target::Artist(artist) => artist,
            Target::Venue(venue) => venue,
            Target::Event(event) => event,
        }
    }

    pub fn publishable_mut(&mut self) -> &mut dyn Publishable {
        match self {
            Target::Artist(artist) => artist,
            Target::Venue(venue) => venue,
            Target::Event(event) => event,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    pub fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    pub fn artist(owner: UserId) -> Artist {
        Artist {
            id: ArtistId::generate(),
            owner_user_id: owner,
            name: "Mira Okafor".to_string(),
            bio: Some("Painter working with layered pigment and found paper.".to_string()),
            avatar_asset_id: Some(AssetId::generate()),
            avatar_url: None,
            website_url: Some("https://mira.example.com".to_string()),
            gallery: Vec::new(),
            is_published: false,
            created_at: at(9),
            updated_at: at(9),
        }
    }

    pub fn venue(owner: UserId) -> Venue {
        Venue {
            id: VenueId::generate(),
            owner_user_id: owner,
            name: "Harbour Hall".to_string(),
            description: Some("Former boat shed turned gallery.".to_string()),
            address_line: None,
            city: Some("Lisbon".to_string()),
            country: Some("PT".to_string()),
            cover_asset_id: Some(AssetId::generate()),
            cover_url: None,
            is_published: false,
            created_at: at(9),
            updated_at: at(9),
        }
    }

    pub fn event(owner: UserId, venue_id: Option<VenueId>) -> Event {
        Event {
            id: EventId::generate(),
            owner_user_id: owner,
            venue_id,
            title: "Salt and Ochre".to_string(),
            description: Some("A group show of coastal landscapes by six painters.".to_string()),
            ticket_url: Some("https://tickets.example.com/salt".to_string()),
            starts_at: Some(at(18)),
            is_published: false,
            published_at: None,
            created_at: at(9),
            updated_at: at(9),
        }
    }

    pub fn artwork(artist_id: ArtistId) -> Artwork {
        Artwork {
            id: ArtworkId::generate(),
            artist_id,
            title: "Low Tide".to_string(),
            description: Some("Oil on linen".to_string()),
            featured_asset_id: None,
            images: vec![AssetId::generate(), AssetId::generate()],
            is_published: false,
            created_at: at(9),
            updated_at: at(9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn first_publish_sets_timestamp_once() {
        let mut event = event(UserId::generate(), None);

        event.publish(at(10));
        assert_eq!(event.published_at, Some(at(10)));

        event.publish(at(12));
        assert!(event.is_published);
        assert_eq!(event.published_at, Some(at(10)));
    }

    #[test]
    fn unpublishing_an_event_clears_timestamp() {
        let mut event = event(UserId::generate(), None);
        event.publish(at(10));

        event.unpublish();

        assert!(!event.is_published);
        assert_eq!(event.published_at, None);
    }

    #[test]
    fn publishing_artwork_assigns_first_image_as_cover() {
        let mut artwork = artwork(ArtistId::generate());
        let first = artwork.images[0];

        artwork.publish(at(10));

        assert!(artwork.is_published);
        assert_eq!(artwork.featured_asset_id, Some(first));
    }

    #[test]
    fn publishing_artwork_keeps_chosen_cover() {
        let mut artwork = artwork(ArtistId::generate());
        let chosen = artwork.images[1];
        artwork.featured_asset_id = Some(chosen);

        artwork.publish(at(10));

        assert_eq!(artwork.featured_asset_id, Some(chosen));
    }

    #[test]
    fn parses_content_refs() {
        let id = "3b241101-e2bb-4255-8caf-4136c566a962";
        assert!(matches!(ContentRef::parse("venues", id), Ok(ContentRef::Venue(_))));
        assert!(matches!(
            ContentRef::parse("galleries", id),
            Err(DomainError::InvalidRequest(_))
        ));
        assert!(matches!(
            ContentRef::parse("events", "42"),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn event_team_is_its_venue() {
        let venue_id = VenueId::generate();
        let target = Target::Event(event(UserId::generate(), Some(venue_id)));
        assert_eq!(target.venue_scope(), Some(venue_id));
        assert_eq!(target.display_name(), "Salt and Ochre");
    }
}
