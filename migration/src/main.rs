use crate::{
    domain::migration::Migration,
    infrastructure::{persistence::PersistenceAdapter, settings::Settings},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vernissage_common::database;

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    tracing::info!("Configuration loaded");

    let database = database::connect(&settings.database).await?;
    tracing::info!("Connected to DB");
    let persistence = PersistenceAdapter::new(database);

    // create tables missing from the database schema
    let migration = Migration::new(persistence);
    let created = migration.migrate().await?;
    tracing::info!(created, "Schema migrated");

    Ok(())
}
