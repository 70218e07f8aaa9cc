// ABOUTME: Application constants organized by domain
// ABOUTME: Page geometry, report defaults, limits, and environment lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! Constants module
//!
//! Application constants grouped into logical domains. Layout code derives
//! every length from the `page` and `layout` domains so unit conversions
//! happen exactly once.

use std::env;

/// Unit conversion factors
pub mod units {
    /// Millimeters per inch
    pub const MM_PER_INCH: f64 = 25.4;

    /// PostScript points per inch
    pub const PT_PER_INCH: f64 = 72.0;

    /// Millimeters per PostScript point
    pub const MM_PER_PT: f64 = MM_PER_INCH / PT_PER_INCH;

    /// PostScript points per millimeter
    pub const PT_PER_MM: f64 = PT_PER_INCH / MM_PER_INCH;

    /// Twentieths of a point (DOCX length unit) per inch
    pub const TWIPS_PER_INCH: f64 = 1440.0;

    /// Twips per millimeter
    pub const TWIPS_PER_MM: f64 = TWIPS_PER_INCH / MM_PER_INCH;
}

/// Report page geometry
///
/// All page arithmetic in the layout engine is done in millimeters; values
/// in other units (points for PDF, twips for DOCX) are derived from these
/// constants at the output boundary.
pub mod page {
    use super::units;

    /// Page width in millimeters (A4 landscape)
    pub const WIDTH_MM: f64 = 297.0;

    /// Page height in millimeters (A4 landscape)
    pub const HEIGHT_MM: f64 = 210.0;

    /// Uniform page margin in millimeters (0.55 inch on every side)
    pub const MARGIN_MM: f64 = 0.55 * units::MM_PER_INCH;

    /// Horizontal span available to text at zero indent
    pub const TEXT_WIDTH_MM: f64 = WIDTH_MM - 2.0 * MARGIN_MM;

    /// Vertical span available to text
    pub const TEXT_HEIGHT_MM: f64 = HEIGHT_MM - 2.0 * MARGIN_MM;
}

/// Text layout parameters for the report body
pub mod layout {
    use super::units;

    /// Report body font size in points
    pub const FONT_SIZE_PT: f64 = 11.0;

    /// Line advance as a multiple of the font size
    pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

    /// Line advance in millimeters
    pub const LINE_HEIGHT_MM: f64 = FONT_SIZE_PT * LINE_HEIGHT_FACTOR * units::MM_PER_PT;

    /// Left indent contributed by one leading space in the report text
    pub const INDENT_MM_PER_SPACE: f64 = 2.0;
}

/// Report store settings
pub mod report {
    /// Token prefix for stored reports
    pub const TOKEN_PREFIX: &str = "report";

    /// chrono format string for the timestamp portion of a token
    pub const TOKEN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Extension of the stored report text files
    pub const TEXT_EXTENSION: &str = "txt";
}

/// Profile field fallbacks applied to omitted intake fields
pub mod profile {
    /// Placeholder for omitted biometric fields (age, gender, height, ...)
    pub const FIELD_NOT_AVAILABLE: &str = "N/A";

    /// Placeholder for omitted constraint fields (conditions, preferences)
    pub const FIELD_NONE: &str = "None";
}

/// Request handling limits
pub mod limits {
    /// Maximum accepted request body size in bytes
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

    /// Whole-request timeout in seconds (the model call dominates)
    pub const REQUEST_TIMEOUT_SECS: u64 = 180;

    /// Number of foods a comparison request must carry
    pub const COMPARISON_FOOD_COUNT: usize = 2;
}

/// Network port defaults
pub mod ports {
    /// Default HTTP server port
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
}

/// Service identifiers used in logs
pub mod service_names {
    /// The HTTP server binary
    pub const NUTRIPLAN_SERVER: &str = "nutriplan-server";
}

/// Environment-based configuration
pub mod env_config {
    use super::{env, ports};

    /// Get HTTP server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(ports::DEFAULT_HTTP_PORT)
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into())
    }

    /// Get the Gemini `API` key from environment
    #[must_use]
    pub fn gemini_api_key() -> Option<String> {
        env::var("GEMINI_API_KEY").ok()
    }

    /// Get the Gemini model name from environment or default
    #[must_use]
    pub fn gemini_model() -> String {
        env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-pro".into())
    }

    /// Get the Gemini `API` base `URL` from environment or default
    #[must_use]
    pub fn gemini_base_url() -> String {
        env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into())
    }

    /// Get the report directory override from environment
    ///
    /// When unset, reports live in a process-scoped temp directory that is
    /// removed on shutdown.
    #[must_use]
    pub fn report_dir() -> Option<String> {
        env::var("REPORT_DIR").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_margin_matches_half_inch_and_a_bit() {
        // 0.55 in = 13.97 mm
        assert!((page::MARGIN_MM - 13.97).abs() < 1e-9);
    }

    #[test]
    fn text_width_spans_most_of_the_landscape_page() {
        assert!((page::TEXT_WIDTH_MM - 269.06).abs() < 1e-9);
        assert!(page::TEXT_WIDTH_MM < page::WIDTH_MM);
    }

    #[test]
    fn line_height_is_a_fraction_of_the_page() {
        // 11 pt * 1.2 = 13.2 pt = 4.6567 mm
        assert!((layout::LINE_HEIGHT_MM - 13.2 * units::MM_PER_PT).abs() < 1e-12);
        assert!(layout::LINE_HEIGHT_MM < 5.0);
    }

    #[test]
    fn http_port_default_applies_without_env() {
        // HTTP_PORT is unset in the test environment
        if env::var("HTTP_PORT").is_err() {
            assert_eq!(env_config::http_port(), ports::DEFAULT_HTTP_PORT);
        }
    }
}
