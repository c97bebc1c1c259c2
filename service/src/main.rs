use vernissage_common::database;

use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::outbox::{LogNotifier, OutboxDispatcher};
use crate::infrastructure::persistence::PostgresRepository;
use crate::infrastructure::settings::Settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::info!("Configuration loaded");

    let database = database::connect(&settings.database).await?;
    tracing::info!("Connected to DB");

    let repository = PostgresRepository::new(database);

    let dispatcher = OutboxDispatcher::new(repository.clone(), LogNotifier, settings.outbox.clone());
    tokio::spawn(dispatcher.run());

    let state = AppStateImpl::new(repository, settings.moderation.clone());

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
