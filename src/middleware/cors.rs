// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Provides Cross-Origin Resource Sharing setup for web client access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS settings for the recommendation API
///
/// Configures cross-origin requests based on the `CORS_ALLOWED_ORIGINS`
/// environment variable (parsed into `config.security.cors_origins`).
/// Supports both wildcard ("*") for development and specific origin lists
/// for production.
///
/// # Examples
///
/// ```bash
/// # Allow all origins (development)
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Allow specific origins (production)
/// export CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
/// ```
#[must_use]
pub fn setup_cors(config: &crate::config::environment::ServerConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        // Development mode: allow any origin
        AllowOrigin::any()
    } else {
        // Production mode: use the configured origin list
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        if parsed.is_empty() {
            // Fallback to any if parsing failed
            AllowOrigin::any()
        } else {
            AllowOrigin::list(parsed)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("access-control-request-method"),
            HeaderName::from_static("access-control-request-headers"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::{
        GeminiConfig, LogLevel, ReportConfig, SecurityConfig, ServerConfig,
    };

    fn config_with_origins(origins: Vec<String>) -> ServerConfig {
        ServerConfig {
            http_port: 8080,
            log_level: LogLevel::Info,
            gemini: GeminiConfig {
                api_key: None,
                model: "gemini-1.5-pro".into(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            },
            security: SecurityConfig {
                cors_origins: origins,
            },
            reports: ReportConfig { directory: None },
        }
    }

    #[test]
    fn empty_origin_list_builds_permissive_layer() {
        let config = config_with_origins(vec![]);
        // Layer construction must not panic on the permissive path
        let _layer = setup_cors(&config);
    }

    #[test]
    fn explicit_origins_build_list_layer() {
        let config = config_with_origins(vec![
            "https://app.example.com".into(),
            "https://admin.example.com".into(),
        ]);
        let _layer = setup_cors(&config);
    }

    #[test]
    fn unparseable_origins_fall_back_to_any() {
        let config = config_with_origins(vec!["\u{7f}bad\nvalue".into()]);
        let _layer = setup_cors(&config);
    }
}
