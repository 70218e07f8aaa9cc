// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the nutritionist and food-comparison prompts sent to Gemini
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # System Prompts
//!
//! This module provides system prompts for LLM interactions.
//! Prompts are loaded at compile time from markdown files for easy maintenance.

/// Nutritionist system prompt for daily-recommendation reports
///
/// Instructs the model to act as an expert dietitian and to answer in the
/// line-oriented format the HTML renderer and document pipeline understand:
/// bold top-level section headers, numbered macronutrient subheaders,
/// dash bullets, and `value | Sources: ...` pairs.
pub const NUTRITIONIST_SYSTEM_PROMPT: &str = include_str!("nutritionist.md");

/// Template for the two-food comparison prompt
///
/// Contains `{food_a}` and `{food_b}` placeholders; use [`comparison_prompt`]
/// to substitute them.
pub const COMPARISON_PROMPT_TEMPLATE: &str = include_str!("comparison.md");

/// Get the nutritionist system prompt
///
/// This is the system instruction attached to every recommendation request.
#[must_use]
pub const fn nutritionist_system_prompt() -> &'static str {
    NUTRITIONIST_SYSTEM_PROMPT
}

/// Build a comparison prompt for two foods
///
/// The model is asked to reply with a single HTML table; the table extractor
/// downstream tolerates fences and commentary around it.
#[must_use]
pub fn comparison_prompt(food_a: &str, food_b: &str) -> String {
    COMPARISON_PROMPT_TEMPLATE
        .replace("{food_a}", food_a)
        .replace("{food_b}", food_b)
}
