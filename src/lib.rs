// ABOUTME: Main library entry point for the Nutriplan recommendation service
// ABOUTME: Provides the HTTP API, Gemini client, and report rendering pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

// Crate-level attributes:
// - recursion_limit: Increased from default 128 to 256 for complex derive macros
//   (serde, thiserror) on nested request/response types
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Nutriplan
//!
//! A web service that collects a biometric and dietary profile, asks a hosted
//! Gemini model for personalized nutrient recommendations, and renders the
//! model's free-text reply as structured HTML cards plus downloadable DOCX and
//! PDF reports. A second endpoint compares the nutritional profiles of two
//! foods as an HTML table.
//!
//! ## Features
//!
//! - **Profile intake**: JSON endpoint accepting age, gender, height, weight,
//!   activity level, and dietary constraints
//! - **Gemini streaming**: reply fragments are concatenated in arrival order
//! - **Card rendering**: a tagged-line grammar turns the model's text into
//!   collapsible HTML cards
//! - **Document downloads**: DOCX and PDF reports regenerated on demand from
//!   the stored report text
//!
//! ## Architecture
//!
//! The service follows a modular architecture:
//! - **Llm**: Gemini provider behind the [`llm::LlmProvider`] trait
//! - **Render**: line classifier, HTML card renderer, and table extractor
//! - **Document**: paragraph model, word-wrap layout, DOCX and PDF writers
//! - **Report**: temp-directory report store keyed by download tokens
//! - **Routes**: Axum handlers for intake, comparison, download, and UI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nutriplan::config::environment::ServerConfig;
//! use nutriplan::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("Nutriplan configured with port: HTTP={}", config.http_port);
//!
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the server binary (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access them.

/// Configuration management from environment variables
pub mod config;

/// Application constants: page geometry, fonts, defaults
pub mod constants;

/// Paragraph model, wrap/pagination layout, DOCX and PDF writers
pub mod document;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// LLM provider abstraction and the Gemini implementation
pub mod llm;

/// Structured logging configuration with tracing
pub mod logging;

/// HTTP middleware (CORS)
pub mod middleware;

/// Report text rendering: line classifier, HTML cards, table extraction
pub mod render;

/// Temp-directory report store keyed by download tokens
pub mod report;

/// Shared server resources container for dependency injection
pub mod resources;

/// HTTP route handlers for the REST API and static UI
pub mod routes;

/// HTTP server assembly and serve loop
pub mod server;
