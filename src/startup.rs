//! Application Startup
//!
//! Connects to the database, migrates the schema and wires the creation
//! service. Failures here are fatal to the process.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::CreationServiceImpl;
use crate::config::Settings;
use crate::domain::{EntityKind, Store};
use crate::infrastructure::database::{self, PgStore};
use crate::presentation::http::routes;

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    creation: Arc<CreationServiceImpl<PgStore>>,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let pool = database::create_pool(&settings.database)
            .await
            .context("failed to connect to the database")?;
        tracing::info!("Database connection pool created");

        let store = Arc::new(PgStore::new(pool));
        store
            .migrate(&EntityKind::ALL)
            .await
            .context("failed to migrate the database schema")?;

        let creation = Arc::new(
            CreationServiceImpl::new(Arc::clone(&store))
                .with_batch_size(settings.persistence.batch_size),
        );

        let router = routes::create_router();

        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .context("invalid server address configuration")?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self {
            listener,
            router,
            creation,
        })
    }

    /// The creation service shared with request handlers.
    pub fn creation_service(&self) -> Arc<CreationServiceImpl<PgStore>> {
        Arc::clone(&self.creation)
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
