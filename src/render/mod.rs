// ABOUTME: Rendering pipeline that turns raw model text into display HTML
// ABOUTME: Line classification, card-based report rendering, and comparison table extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # Report Rendering
//!
//! The model replies with line-oriented, markdown-ish text. This module turns
//! that text into HTML in two stages:
//!
//! 1. [`classifier`] assigns every line a structural role (card header,
//!    subheader, bullet, key/value-with-source, plain text, blank). The
//!    classification is total: any line gets exactly one role.
//! 2. [`html`] folds the classified lines into nested HTML cards, tracking the
//!    single open card across lines.
//!
//! [`table`] covers the comparison flow, where the model is asked for raw
//! HTML instead: it pulls the first `<table>` span out of the reply, or
//! substitutes a fixed fallback fragment when the model ignored the contract.

pub mod classifier;
pub mod html;
pub mod table;

pub use classifier::{classify, ClassifiedLine, LineRole};
pub use html::render_report;
pub use table::extract_table;
