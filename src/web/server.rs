//! Web server for Memwall.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::storage::ImageStore;
use crate::{Database, Result, WallError};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Database, images: ImageStore) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| WallError::Config(format!("invalid server address: {e}")))?;

        let app_state = Arc::new(AppState::new(db, images, config));

        Ok(Self {
            addr,
            app_state,
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Build the full application router.
    pub fn router(&self) -> axum::Router {
        create_router(self.app_state.clone(), &self.cors_origins)
            .merge(create_health_router())
    }

    /// Run the server until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        info!("Web server listening on {}", self.addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| WallError::Io(e))?;

        Ok(())
    }
}
