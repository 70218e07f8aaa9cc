// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds the application router over a scripted provider and a temp report store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared test utilities for `nutriplan`
//!
//! Provides common setup so route tests build the real application router
//! without touching the network or the process environment.

use anyhow::Result;
use nutriplan::config::environment::{
    GeminiConfig, LogLevel, ReportConfig, SecurityConfig, ServerConfig,
};
use nutriplan::llm::LlmProvider;
use nutriplan::report::ReportStore;
use nutriplan::resources::ServerResources;
use nutriplan::server::HttpServer;
use std::sync::{Arc, Once};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration fixture that never reads the process environment
#[must_use]
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        log_level: LogLevel::Warn,
        gemini: GeminiConfig {
            api_key: Some("test-key".to_owned()),
            model: "gemini-1.5-pro".to_owned(),
            base_url: "http://127.0.0.1:0/v1beta".to_owned(),
        },
        security: SecurityConfig {
            cors_origins: Vec::new(),
        },
        reports: ReportConfig { directory: None },
    }
}

/// Build the full application router over `provider`
///
/// Returns the router, the shared resources, and the report directory guard;
/// dropping the guard removes the directory, so keep it alive for the test.
pub fn build_test_router(
    provider: Arc<dyn LlmProvider>,
) -> Result<(axum::Router, Arc<ServerResources>, TempDir)> {
    init_test_logging();

    let report_dir = TempDir::new()?;
    let store = ReportStore::with_directory(report_dir.path())?;
    let resources = Arc::new(ServerResources::new(provider, store, test_server_config()));
    let router = HttpServer::new(resources.clone()).router();
    Ok((router, resources, report_dir))
}
