// ABOUTME: Report download route regenerating DOCX and PDF from stored report text
// ABOUTME: Sanitizes the token, rebuilds both documents, and streams the PDF as an attachment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! Report download routes
//!
//! `GET /download/:token` re-reads the report text stored under the token,
//! regenerates the DOCX (persisted next to the text) and the PDF, and
//! streams the PDF as an attachment named `<token>.pdf`. Tokens outside the
//! `[A-Za-z0-9_-]` alphabet and tokens with no stored report both produce
//! 404; conversion failures produce a generic 500 with detail kept in the
//! logs.

use crate::document::{report_to_docx, report_to_pdf};
use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::info;

/// Download routes implementation
pub struct DownloadRoutes;

impl DownloadRoutes {
    /// Create the download routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/download/:token", get(Self::download_report))
            .with_state(resources)
    }

    /// Regenerate the documents for a stored report and stream the PDF
    async fn download_report(
        State(resources): State<Arc<ServerResources>>,
        Path(token): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        let report = resources.store.load(&token).await?;

        let docx = report_to_docx(&report)?;
        resources.store.save_artifact(&token, "docx", &docx).await?;
        let pdf = report_to_pdf(&report)?;

        info!(
            token = %token,
            docx_bytes = docx.len(),
            pdf_bytes = pdf.len(),
            "Report documents regenerated"
        );

        let headers = [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{token}.pdf\""),
            ),
        ];
        Ok((headers, pdf))
    }
}
