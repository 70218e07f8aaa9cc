// ABOUTME: HTTP server composition binding all route families behind shared tower layers
// ABOUTME: Owns the listener lifecycle and graceful shutdown on ctrl-c
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # HTTP Server
//!
//! Composes the route families into one `Router`, wraps them in the shared
//! tower layers (request tracing, CORS, body-size limit, request timeout),
//! and serves until ctrl-c. The request timeout bounds the whole
//! model-call-plus-render path, so it sits well above typical API latency.

use crate::constants::limits;
use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes::{
    ComparisonRoutes, DownloadRoutes, HealthRoutes, RecommendationRoutes, UiRoutes,
};
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Nutriplan HTTP server
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the full application router
    ///
    /// Also used directly by integration tests, which drive it through
    /// `tower::ServiceExt::oneshot` without binding a port.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .merge(UiRoutes::routes())
            .merge(HealthRoutes::routes())
            .merge(RecommendationRoutes::routes(self.resources.clone()))
            .merge(ComparisonRoutes::routes(self.resources.clone()))
            .merge(DownloadRoutes::routes(self.resources.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(setup_cors(&self.resources.config))
            .layer(RequestBodyLimitLayer::new(limits::MAX_REQUEST_BODY_BYTES))
            .layer(TimeoutLayer::new(Duration::from_secs(
                limits::REQUEST_TIMEOUT_SECS,
            )))
    }

    /// Bind the listener and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails.
    pub async fn run(self, port: u16) -> Result<()> {
        let app = self.router();
        let addr = format!("0.0.0.0:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        info!("HTTP server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves when the process receives ctrl-c
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
