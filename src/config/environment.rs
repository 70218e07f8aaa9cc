// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! Environment-based configuration management for production deployment

use crate::constants::env_config;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Full tracing output
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info, // Default fallback
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Gemini model configuration
    pub gemini: GeminiConfig,
    /// Security settings
    pub security: SecurityConfig,
    /// Report storage settings
    pub reports: ReportConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (`GEMINI_API_KEY`); the provider refuses to start without one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier, e.g. `gemini-1.5-pro`
    pub model: String,
    /// API base URL (override for testing against a stub server)
    pub base_url: String,
}

/// Security settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// CORS allowed origins; empty means permissive
    pub cors_origins: Vec<String>,
}

/// Report storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory override for stored report text; `None` selects a
    /// process-scoped temp directory removed on shutdown
    pub directory: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment value fails to parse
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_config::http_port(),
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),

            gemini: GeminiConfig {
                api_key: env_config::gemini_api_key(),
                model: env_config::gemini_model(),
                base_url: env_config::gemini_base_url(),
            },

            security: SecurityConfig {
                cors_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|s| s.trim().to_owned())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },

            reports: ReportConfig {
                directory: env_config::report_dir().map(PathBuf::from),
            },
        };

        config.log_summary();
        Ok(config)
    }

    /// Log a configuration summary at startup
    fn log_summary(&self) {
        info!(
            http_port = self.http_port,
            log_level = %self.log_level,
            gemini_model = %self.gemini.model,
            gemini_key_present = self.gemini.api_key.is_some(),
            cors_origins = self.security.cors_origins.len(),
            report_dir = ?self.reports.directory,
            "Configuration summary"
        );
    }
}
