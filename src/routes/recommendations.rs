// ABOUTME: Nutrient recommendation route handlers for profile intake and report generation
// ABOUTME: Streams the Gemini reply, renders it as HTML cards, and hands back a download token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! Nutrient recommendation routes
//!
//! `POST /get_nutrient_recommendations` accepts a biometric and dietary
//! profile, makes a single best-effort call to the model (streaming when the
//! provider supports it, fragments concatenated in arrival order), persists
//! the raw reply under a download token, and returns the reply rendered as
//! collapsible HTML cards.

use crate::constants::profile;
use crate::errors::AppError;
use crate::llm::prompts::nutritionist_system_prompt;
use crate::llm::{collect_text, ChatMessage, ChatRequest};
use crate::render::render_report;
use crate::resources::ServerResources;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Biometric and dietary profile submitted by the UI
///
/// Every field is optional. Absent biometric fields fall back to `"N/A"`,
/// absent condition fields to `"None"`, matching the placeholders the prompt
/// template tells the model to expect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    /// Age in years
    #[serde(default)]
    pub age: Option<String>,
    /// Gender
    #[serde(default)]
    pub gender: Option<String>,
    /// Height in centimeters
    #[serde(default)]
    pub height: Option<String>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<String>,
    /// Activity level (sedentary, moderate, active, ...)
    #[serde(default)]
    pub activity_level: Option<String>,
    /// Pregnancy or lactation status
    #[serde(default)]
    pub pregnancy_or_lactation: Option<String>,
    /// Known health conditions
    #[serde(default)]
    pub health_condition: Option<String>,
    /// Dietary preferences (vegetarian, vegan, halal, ...)
    #[serde(default)]
    pub dietary_preferences: Option<String>,
}

impl ProfileRequest {
    /// Render the profile as the prompt block appended to the system prompt
    #[must_use]
    pub fn prompt_block(&self) -> String {
        let na = |field| Self::field_or(field, profile::FIELD_NOT_AVAILABLE);
        let none = |field| Self::field_or(field, profile::FIELD_NONE);

        format!(
            "Age: {}\n\
             Gender: {}\n\
             Height: {} cm\n\
             Weight: {} kg\n\
             Activity level: {}\n\
             Pregnancy or Lactation: {}\n\
             Health Condition: {}\n\
             Dietary Preferences: {}",
            na(&self.age),
            na(&self.gender),
            na(&self.height),
            na(&self.weight),
            na(&self.activity_level),
            none(&self.pregnancy_or_lactation),
            none(&self.health_condition),
            none(&self.dietary_preferences),
        )
    }

    /// Trimmed field value, or the placeholder when absent or blank
    fn field_or<'a>(field: &'a Option<String>, placeholder: &'a str) -> &'a str {
        match field.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => placeholder,
        }
    }
}

/// Response carrying the rendered cards and the report download token
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    /// Model reply rendered as collapsible HTML cards
    pub recommendations: String,
    /// Token accepted by `GET /download/:token`
    pub download_token: String,
}

// ============================================================================
// Routes
// ============================================================================

/// Recommendation routes implementation
pub struct RecommendationRoutes;

impl RecommendationRoutes {
    /// Create the recommendation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/get_nutrient_recommendations",
                post(Self::get_nutrient_recommendations),
            )
            .with_state(resources)
    }

    /// Generate and render nutrient recommendations for one profile
    async fn get_nutrient_recommendations(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ProfileRequest>,
    ) -> Result<Json<RecommendationResponse>, AppError> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        info!(request_id = %request_id, "Generating nutrient recommendations");

        let chat_request = ChatRequest::new(vec![
            ChatMessage::system(nutritionist_system_prompt()),
            ChatMessage::user(request.prompt_block()),
        ]);
        let report = collect_text(resources.provider.as_ref(), chat_request)
            .await
            .map_err(|err| err.with_request_id(request_id.to_string()))?;

        if report.trim().is_empty() {
            return Err(AppError::internal("Model returned an empty reply")
                .with_request_id(request_id.to_string()));
        }

        let download_token = resources.store.save(&report).await?;
        let recommendations = render_report(&report);

        info!(
            request_id = %request_id,
            download_token = %download_token,
            report_chars = report.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Recommendations generated"
        );

        Ok(Json(RecommendationResponse {
            recommendations,
            download_token,
        }))
    }
}
