// ABOUTME: Two-food comparison route handler asking the model for a direct HTML table
// ABOUTME: Validates the food pair, extracts the table span verbatim, and returns it as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! Food comparison routes
//!
//! `POST /compare_foods` takes exactly two food names, prompts the model for
//! a single HTML comparison table, and returns the first `<table>` span of
//! the reply verbatim. A reply without a table span degrades to a static
//! fallback fragment with HTTP 200 rather than an error.

use crate::constants::limits;
use crate::errors::AppError;
use crate::llm::prompts::comparison_prompt;
use crate::llm::{collect_text, ChatMessage, ChatRequest};
use crate::render::extract_table;
use crate::resources::ServerResources;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request naming the two foods to compare
#[derive(Debug, Clone, Deserialize)]
pub struct CompareFoodsRequest {
    /// Food names; exactly two entries required
    pub foods: Vec<String>,
}

/// Response carrying the comparison table markup
#[derive(Debug, Serialize, Deserialize)]
pub struct CompareFoodsResponse {
    /// HTML `<table>` fragment, or the fallback fragment when the model
    /// reply held no table
    pub comparison: String,
}

// ============================================================================
// Routes
// ============================================================================

/// Comparison routes implementation
pub struct ComparisonRoutes;

impl ComparisonRoutes {
    /// Create the comparison routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/compare_foods", post(Self::compare_foods))
            .with_state(resources)
    }

    /// Compare the nutritional profiles of two foods
    async fn compare_foods(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CompareFoodsRequest>,
    ) -> Result<Json<CompareFoodsResponse>, AppError> {
        let request_id = Uuid::new_v4();

        let (food_a, food_b) = Self::validate_foods(&request.foods)?;
        info!(
            request_id = %request_id,
            food_a = %food_a,
            food_b = %food_b,
            "Comparing foods"
        );

        let chat_request = ChatRequest::new(vec![ChatMessage::user(comparison_prompt(
            food_a, food_b,
        ))]);
        let reply = collect_text(resources.provider.as_ref(), chat_request)
            .await
            .map_err(|err| err.with_request_id(request_id.to_string()))?;

        let comparison = extract_table(&reply);

        Ok(Json(CompareFoodsResponse { comparison }))
    }

    /// Require exactly two non-blank food names
    fn validate_foods(foods: &[String]) -> Result<(&str, &str), AppError> {
        if foods.len() != limits::COMPARISON_FOOD_COUNT {
            return Err(AppError::invalid_input(format!(
                "Expected exactly two foods to compare, got {}",
                foods.len()
            )));
        }

        let food_a = foods[0].trim();
        let food_b = foods[1].trim();
        if food_a.is_empty() || food_b.is_empty() {
            return Err(AppError::invalid_input("Food names must not be blank"));
        }

        Ok((food_a, food_b))
    }
}
