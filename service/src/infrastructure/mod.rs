use crate::domain::AppState;
use crate::domain::moderation::ModerationSettings;
use crate::domain::repository::Repository;

pub mod http;
pub mod outbox;
pub mod persistence;
pub mod settings;

#[derive(Clone)]
pub struct AppStateImpl<R: Repository> {
    repository: R,
    moderation: ModerationSettings,
}

impl<R: Repository> AppStateImpl<R> {
    pub fn new(repository: R, moderation: ModerationSettings) -> Self {
        Self {
            repository,
            moderation,
        }
    }
}

impl<R: Repository> AppState for AppStateImpl<R> {
    type R = R;

    fn repository(&self) -> &Self::R {
        &self.repository
    }

    fn moderation(&self) -> &ModerationSettings {
        &self.moderation
    }
}
