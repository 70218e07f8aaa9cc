// ABOUTME: Integration tests for the report download route
// ABOUTME: Tests token sanitization, 404 handling, and DOCX/PDF regeneration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::build_test_router;
use helpers::axum_test::AxumTestRequest;
use helpers::scripted_llm::ScriptedProvider;

use axum::http::StatusCode;
use std::sync::Arc;

const REPORT: &str = "**BMI:** 22.5\n**Calories:** 2100 kcal\n**Tips:**\n- Stay hydrated\n";

// ============================================================================
// Unknown and Hostile Tokens
// ============================================================================

#[tokio::test]
async fn unknown_token_is_404_and_leaves_no_artifacts() {
    let provider = Arc::new(ScriptedProvider::streaming("unused"));
    let (router, resources, _guard) = build_test_router(provider).unwrap();

    let response = AxumTestRequest::get("/download/report_19700101_000000")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Report not found"));

    // No partial DOCX/PDF may be left behind for a token that never existed
    let entries = std::fs::read_dir(resources.store.directory()).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn traversal_token_is_404() {
    let provider = Arc::new(ScriptedProvider::streaming("unused"));
    let (router, _resources, _guard) = build_test_router(provider).unwrap();

    // %2F decodes to '/' inside the captured segment
    let response = AxumTestRequest::get("/download/..%2F..%2Fetc%2Fpasswd")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dotted_token_is_404() {
    let provider = Arc::new(ScriptedProvider::streaming("unused"));
    let (router, _resources, _guard) = build_test_router(provider).unwrap();

    let response = AxumTestRequest::get("/download/report.20250101.000000")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Document Regeneration
// ============================================================================

#[tokio::test]
async fn download_streams_the_pdf_and_persists_the_docx() {
    let provider = Arc::new(ScriptedProvider::streaming("unused"));
    let (router, resources, _guard) = build_test_router(provider).unwrap();

    let token = resources.store.save(REPORT).await.unwrap();

    let response = AxumTestRequest::get(&format!("/download/{token}"))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("application/pdf"));

    let disposition = response.header("content-disposition").unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains(&format!("{token}.pdf")));

    assert!(response.bytes().starts_with(b"%PDF-"));

    // The regenerated DOCX lands next to the stored text
    let docx_path = resources.store.directory().join(format!("{token}.docx"));
    assert!(docx_path.exists());
    let docx = std::fs::read(&docx_path).unwrap();
    // ZIP container magic
    assert!(docx.starts_with(b"PK"));
}

#[tokio::test]
async fn repeated_downloads_regenerate_identical_documents() {
    let provider = Arc::new(ScriptedProvider::streaming("unused"));
    let (router, resources, _guard) = build_test_router(provider).unwrap();

    let token = resources.store.save(REPORT).await.unwrap();
    let uri = format!("/download/{token}");

    let first = AxumTestRequest::get(&uri).send(router.clone()).await;
    let second = AxumTestRequest::get(&uri).send(router).await;

    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(first.bytes(), second.bytes());
}
