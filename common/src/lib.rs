mod domain;
mod infrastructure;

// Table names shared by migration and service

pub const USERS_TABLE: &'static str = "users";
pub const SESSIONS_TABLE: &'static str = "sessions";
pub const ARTISTS_TABLE: &'static str = "artists";
pub const ARTIST_IMAGES_TABLE: &'static str = "artist_images";
pub const VENUES_TABLE: &'static str = "venues";
pub const VENUE_MEMBERS_TABLE: &'static str = "venue_members";
pub const EVENTS_TABLE: &'static str = "events";
pub const ARTWORKS_TABLE: &'static str = "artworks";
pub const ARTWORK_IMAGES_TABLE: &'static str = "artwork_images";
pub const SUBMISSIONS_TABLE: &'static str = "submissions";
pub const OUTBOX_TABLE: &'static str = "notification_outbox";
pub const ONBOARDING_FLAGS_TABLE: &'static str = "onboarding_flags";

// Common column names

pub const ID_FIELD_NAME: &'static str = "id";
pub const CREATED_FIELD_NAME: &'static str = "created_at";
pub const UPDATED_FIELD_NAME: &'static str = "updated_at";
pub const PUBLISHED_FIELD_NAME: &'static str = "published_at";
pub const IS_PUBLISHED_FIELD_NAME: &'static str = "is_published";
pub const VERSION_FIELD_NAME: &'static str = "version";

// expose domain module

pub use domain::*;

// expose infrastructure modules

pub use infrastructure::database;
pub use infrastructure::settings;
