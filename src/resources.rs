// ABOUTME: Centralized resource container for dependency injection into route handlers
// ABOUTME: Holds the shared LLM provider, report store, and server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # Server Resources Module
//!
//! Centralized resource container for dependency injection. Handlers receive
//! an `Arc<ServerResources>` as axum state instead of re-creating the Gemini
//! client or re-resolving the report directory on every request.
//!
//! The provider is held as a trait object so tests can substitute a scripted
//! implementation without touching the network.

use crate::config::environment::ServerConfig;
use crate::llm::LlmProvider;
use crate::report::ReportStore;
use std::sync::Arc;

/// Centralized resource container for dependency injection
pub struct ServerResources {
    /// Chat completion provider backing both recommendation and comparison flows
    pub provider: Arc<dyn LlmProvider>,
    /// Token-keyed storage for generated report text
    pub store: ReportStore,
    /// Environment-derived configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, store: ReportStore, config: ServerConfig) -> Self {
        Self {
            provider,
            store,
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for ServerResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerResources")
            .field("provider", &self.provider.name())
            .field("report_dir", &self.store.directory())
            .finish_non_exhaustive()
    }
}
