// ABOUTME: Embedded single-page UI route serving the profile and comparison forms
// ABOUTME: Serves a compile-time embedded HTML asset at the root path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! UI routes
//!
//! `GET /` serves the single-page UI embedded at compile time. There is no
//! template engine; the page is static and every dynamic fragment arrives
//! through the JSON endpoints.

use axum::{response::Html, routing::get, Router};

/// Single-page UI embedded at compile time
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// UI routes implementation
pub struct UiRoutes;

impl UiRoutes {
    /// Create the UI routes
    pub fn routes() -> Router {
        async fn index_handler() -> Html<&'static str> {
            Html(INDEX_HTML)
        }

        Router::new().route("/", get(index_handler))
    }
}
