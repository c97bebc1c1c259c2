use std::env;

use anyhow::Context;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::de::DeserializeOwned;

/// Reads layered settings: `config/default`, `config/{RUN_MODE}`, then
/// `APP_*` environment variables (`APP_DATABASE__HOST` sets `database.host`).
pub fn load_settings<T: DeserializeOwned>() -> anyhow::Result<T> {
    dotenv().ok();
    let run_mode = load_env("RUN_MODE", "development");

    let s = Config::builder()
        .add_source(File::with_name("./config/default"))
        .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
        .add_source(
            Environment::with_prefix("app")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    s.try_deserialize().with_context(|| "failed to read config")
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
