//! Agrolink Server — Application entry point.

use agrolink_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("agrolink=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Agrolink server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(error) => {
            tracing::error!(%error, "failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(error) = agrolink_db::run_migrations(manager.client()).await {
        tracing::error!(%error, "failed to run migrations");
        std::process::exit(1);
    }

    tracing::info!("Agrolink server ready");

    // TODO: expose the profile/search services over an HTTP transport
}
