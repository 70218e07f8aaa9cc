// ABOUTME: Route module organization for the Nutriplan HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain with clean separation of concerns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! Route module for the Nutriplan server
//!
//! This module organizes all HTTP routes by domain. Each domain module
//! contains only route definitions and thin handler functions that delegate
//! to the LLM provider, the render pipeline, and the report store.

/// Two-food nutritional comparison routes
pub mod comparison;
/// Report download routes (DOCX/PDF regeneration and streaming)
pub mod download;
/// Health check and system status routes
pub mod health;
/// Nutrient recommendation routes
pub mod recommendations;
/// Embedded single-page UI routes
pub mod ui;

// Re-export the route structs so the server composes one flat namespace

/// Comparison request payload
pub use comparison::CompareFoodsRequest;
/// Comparison response with table markup
pub use comparison::CompareFoodsResponse;
/// Comparison route handlers
pub use comparison::ComparisonRoutes;
/// Download route handlers
pub use download::DownloadRoutes;
/// Health route handlers
pub use health::HealthRoutes;
/// Profile intake payload
pub use recommendations::ProfileRequest;
/// Recommendation response with rendered cards and download token
pub use recommendations::RecommendationResponse;
/// Recommendation route handlers
pub use recommendations::RecommendationRoutes;
/// UI route handlers
pub use ui::UiRoutes;
