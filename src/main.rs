//! # Forum Server
//!
//! Application entry point. Initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and schema migrations
//! - HTTP liveness server

use anyhow::Result;
use tracing::info;

use forum_server::config::Settings;
use forum_server::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    forum_server::telemetry::init_tracing();

    info!("Starting Forum Server...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        batch_size = settings.persistence.batch_size,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
