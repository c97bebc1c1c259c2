use crate::domain::moderation::ModerationSettings;
use crate::domain::repository::Repository;

pub mod authoring;
pub mod content;
pub mod error;
pub mod identity;
pub mod moderation;
pub mod notification;
pub mod page;
pub mod readiness;
pub mod repository;
pub mod submission;

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type R: Repository;

    fn repository(&self) -> &Self::R;

    fn moderation(&self) -> &ModerationSettings;
}
