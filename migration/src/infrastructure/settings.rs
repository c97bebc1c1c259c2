use serde::Deserialize;
use vernissage_common::database::DatabaseSettings;
use vernissage_common::settings::load_settings;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        load_settings()
    }
}
