// ABOUTME: Server binary wiring configuration, the Gemini provider, and the report store
// ABOUTME: Production entry point for the Nutriplan recommendation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

#![recursion_limit = "256"]

//! # Nutriplan Server Binary
//!
//! Starts the recommendation web service: loads environment configuration,
//! initializes logging and the Gemini provider, and serves the HTTP API
//! until ctrl-c.

use anyhow::Result;
use clap::Parser;
use nutriplan::{
    config::environment::ServerConfig, llm::GeminiProvider, logging, report::ReportStore,
    resources::ServerResources, server::HttpServer,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "nutriplan-server")]
#[command(about = "Nutriplan - Gemini-backed nutrient recommendation web service")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle container environments where clap may not work properly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using default configuration");
            Args { http_port: None }
        }
    };

    // Initialize production logging before the first tracing call
    logging::init_from_env()?;

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Nutriplan recommendation service");

    let provider = GeminiProvider::from_config(&config.gemini)?;
    info!(model = %config.gemini.model, "Gemini provider initialized");

    let store = match config.reports.directory.clone() {
        Some(dir) => ReportStore::with_directory(dir)?,
        None => ReportStore::new()?,
    };
    info!(directory = %store.directory().display(), "Report store ready");

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(Arc::new(provider), store, config));
    let server = HttpServer::new(resources);

    display_available_endpoints(port);

    if let Err(e) = server.run(port).await {
        error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints with their port
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());

    info!("=== Available API Endpoints ===");
    info!("Web UI:");
    info!("  GET  http://{host}:{port}/ - Profile and comparison forms");
    info!("Recommendation API:");
    info!("  POST http://{host}:{port}/get_nutrient_recommendations - Generate a report");
    info!("  POST http://{host}:{port}/compare_foods - Compare two foods");
    info!("  GET  http://{host}:{port}/download/:token - Download a report PDF");
    info!("Monitoring:");
    info!("  GET  http://{host}:{port}/health - Liveness check");
    info!("  GET  http://{host}:{port}/ready - Readiness check");
    info!("=== End of Endpoint List ===");
}
