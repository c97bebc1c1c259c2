use serde::Deserialize;
use vernissage_common::database::DatabaseSettings;
use vernissage_common::settings::load_settings;

use crate::domain::moderation::ModerationSettings;
use crate::infrastructure::outbox::OutboxSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub moderation: ModerationSettings,
    #[serde(default)]
    pub outbox: OutboxSettings,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        load_settings()
    }
}
