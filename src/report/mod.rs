// ABOUTME: Token-keyed plain-text report storage backing the download flow
// ABOUTME: Writes one .txt per generated report into a process-temporary directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # Report Store
//!
//! Each generated recommendation report is persisted once as plain text,
//! keyed by a timestamp-derived token (`report_YYYYMMDD_HHMMSS`). Downloads
//! re-read that text and re-derive the DOCX and PDF on demand; nothing but
//! the text survives between requests.
//!
//! Tokens have second granularity. Two generations inside the same second
//! share a token and the later write wins; tokens are close enough to unique
//! that this is tolerated rather than locked against. Reads only happen after
//! the originating write completed, so concurrent downloads of one token are
//! safe.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::constants::{env_config, report};
use crate::errors::{AppError, AppResult};

/// Filesystem store for generated report text
#[derive(Debug)]
pub struct ReportStore {
    dir: PathBuf,
    // Keeps the temp directory alive for the process lifetime; dropped on
    // shutdown, taking the report files with it.
    _temp: Option<TempDir>,
}

impl ReportStore {
    /// Create a store in a fresh process-temporary directory, or in
    /// `REPORT_DIR` when that override is set
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> AppResult<Self> {
        match env_config::report_dir() {
            Some(dir) => Self::with_directory(dir),
            None => {
                let temp = TempDir::new().map_err(|e| {
                    AppError::storage(format!("failed to create report directory: {e}"))
                })?;
                let dir = temp.path().to_path_buf();
                info!(directory = %dir.display(), "report store using temporary directory");
                Ok(Self {
                    dir,
                    _temp: Some(temp),
                })
            }
        }
    }

    /// Create a store rooted at a fixed directory
    ///
    /// The directory is created if missing and is not cleaned up on shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_directory(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AppError::storage(format!(
                "failed to create report directory {}: {e}",
                dir.display()
            ))
        })?;
        info!(directory = %dir.display(), "report store using fixed directory");
        Ok(Self { dir, _temp: None })
    }

    /// Directory holding the report files
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Persist report text under a fresh timestamp token
    ///
    /// Returns the token the caller hands out for later download.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, text: &str) -> AppResult<String> {
        let token = Self::generate_token();
        let path = self.path_for(&token);

        tokio::fs::write(&path, text).await.map_err(|e| {
            AppError::storage(format!("failed to write report {}: {e}", path.display()))
                .with_resource_id(token.clone())
        })?;

        debug!(token = %token, bytes = text.len(), "stored report text");
        Ok(token)
    }

    /// Load the report text stored under `token`
    ///
    /// # Errors
    ///
    /// Returns a not-found error for tokens that fail sanitization or have no
    /// stored file, and a storage error for other I/O failures.
    pub async fn load(&self, token: &str) -> AppResult<String> {
        Self::sanitize_token(token)?;
        let path = self.path_for(token);

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found("Report").with_resource_id(token.to_owned()))
            }
            Err(e) => Err(
                AppError::storage(format!("failed to read report {}: {e}", path.display()))
                    .with_resource_id(token.to_owned()),
            ),
        }
    }

    /// Persist a derived artifact (e.g. the regenerated DOCX) next to the text
    ///
    /// # Errors
    ///
    /// Returns a not-found error for tokens that fail sanitization and a
    /// storage error if the write fails.
    pub async fn save_artifact(
        &self,
        token: &str,
        extension: &str,
        bytes: &[u8],
    ) -> AppResult<PathBuf> {
        Self::sanitize_token(token)?;
        let path = self.dir.join(format!("{token}.{extension}"));

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            AppError::storage(format!("failed to write artifact {}: {e}", path.display()))
                .with_resource_id(token.to_owned())
        })?;

        debug!(token = %token, extension = %extension, bytes = bytes.len(), "stored report artifact");
        Ok(path)
    }

    /// New timestamp token, e.g. `report_20250825_101530`
    #[must_use]
    pub fn generate_token() -> String {
        format!(
            "{}_{}",
            report::TOKEN_PREFIX,
            Utc::now().format(report::TOKEN_TIMESTAMP_FORMAT)
        )
    }

    /// Reject tokens that could escape the report directory
    ///
    /// Valid tokens are non-empty and drawn from `[A-Za-z0-9_-]`. Anything
    /// else reads as "no such report" rather than echoing back what was
    /// wrong with it.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for tokens outside the valid alphabet.
    pub fn sanitize_token(token: &str) -> AppResult<()> {
        let valid = !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(AppError::not_found("Report").with_resource_id(token.to_owned()))
        }
    }

    fn path_for(&self, token: &str) -> PathBuf {
        self.dir
            .join(format!("{token}.{}", report::TEXT_EXTENSION))
    }
}
