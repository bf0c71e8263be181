mod routes;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{apprise::Notifier, config::Config, Result};

/// Per-process state shared by every request handler. Read-only after startup.
pub struct AppState {
    pub notifier: Arc<dyn Notifier>,
    pub tag: String,
}

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_tag(config.tag.clone(), notifier)
    }

    pub fn with_tag(tag: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: Arc::new(AppState {
                notifier,
                tag: tag.into(),
            }),
        }
    }

    /// Any path other than the health and metrics endpoints is treated as an
    /// Alertmanager webhook. Request bodies are read in full whatever their size.
    pub fn build_router(self) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/metrics", get(routes::export_metrics))
            .fallback(routes::relay)
            .layer(DefaultBodyLimit::disable())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }

    /// Bind `addr` (`host:port`, host names are resolved) and serve forever.
    pub async fn start(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, self.build_router()).await?;
        Ok(())
    }
}
