// ABOUTME: Scripted LLM provider returning canned replies for route testing without network access
// ABOUTME: Records incoming chat requests so tests can assert on prompt construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use nutriplan::errors::AppError;
use nutriplan::llm::{
    ChatRequest, ChatResponse, ChatStream, LlmCapabilities, LlmProvider, StreamChunk,
};
use std::sync::{Arc, Mutex};

/// Scripted provider replaying a canned reply instead of calling Gemini
///
/// When streaming is enabled the reply is split into word-sized chunks so
/// arrival-order concatenation is actually exercised; otherwise the whole
/// reply comes back from one blocking completion. Every incoming request is
/// recorded for later inspection.
pub struct ScriptedProvider {
    reply: String,
    streaming: bool,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedProvider {
    /// Create a streaming provider that replays `reply`
    #[must_use]
    pub fn streaming(reply: &str) -> Self {
        Self {
            reply: reply.to_owned(),
            streaming: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a provider without streaming support
    #[must_use]
    pub fn blocking(reply: &str) -> Self {
        Self {
            reply: reply.to_owned(),
            streaming: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the recorded requests, cloneable before the provider
    /// moves into `ServerResources`
    #[must_use]
    pub fn request_log(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
        self.requests.clone()
    }

    fn record(&self, request: &ChatRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        if self.streaming {
            LlmCapabilities::text_only()
        } else {
            LlmCapabilities::SYSTEM_MESSAGES
        }
    }

    fn default_model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.record(request);
        Ok(ChatResponse {
            content: self.reply.clone(),
            model: "scripted-1".to_owned(),
            usage: None,
            finish_reason: Some("STOP".to_owned()),
        })
    }

    async fn complete_stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        self.record(request);

        // Split after every space so multi-chunk assembly is exercised
        let mut chunks: Vec<Result<StreamChunk, AppError>> = self
            .reply
            .split_inclusive(' ')
            .map(|piece| {
                Ok(StreamChunk {
                    delta: piece.to_owned(),
                    is_final: false,
                    finish_reason: None,
                })
            })
            .collect();
        if let Some(Ok(last)) = chunks.last_mut() {
            last.is_final = true;
            last.finish_reason = Some("STOP".to_owned());
        }

        Ok(Box::pin(tokio_stream::iter(chunks)))
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}
