// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment-driven config for the HTTP server, Gemini, and reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! Configuration module for the Nutriplan server
//!
//! Centralized configuration management for all components:
//!
//! - **Environment**: Server configuration from environment variables
//!   (HTTP port, Gemini credentials and model, CORS origins, report storage)

/// Environment and server configuration
pub mod environment;

// Re-export main configuration types from environment
pub use environment::ServerConfig;
