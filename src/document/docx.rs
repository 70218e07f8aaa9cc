// ABOUTME: DOCX writer for stored report text
// ABOUTME: One zero-spacing paragraph per line on an A4 landscape section
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # DOCX Output
//!
//! The word processor does its own line breaking, so this writer stays
//! simple: one paragraph per report line, leading indentation carried as a
//! paragraph left-indent, paragraph spacing zeroed so the document mirrors
//! the plain-text layout. Word's native units are twips (1/20 pt); the page
//! geometry constants are converted once up front.

use std::io::Cursor;

use docx_rs::{Docx, LineSpacing, PageMargin, Paragraph as DocxParagraph, Run};
use tracing::error;

use crate::constants::{layout, page, units};
use crate::document::{paragraphs_from_report, Paragraph};
use crate::errors::{AppError, AppResult};

/// Run size in half-points (Word's unit for font size)
const FONT_SIZE_HALF_POINTS: usize = (layout::FONT_SIZE_PT * 2.0) as usize;

fn mm_to_twips(mm: f64) -> i32 {
    (mm * units::TWIPS_PER_MM).round() as i32
}

/// Render stored report text to DOCX bytes
///
/// # Errors
///
/// Returns a document error if the archive cannot be assembled.
pub fn report_to_docx(text: &str) -> AppResult<Vec<u8>> {
    let paragraphs = paragraphs_from_report(text);
    docx_from_paragraphs(&paragraphs)
}

fn docx_from_paragraphs(paragraphs: &[Paragraph]) -> AppResult<Vec<u8>> {
    let page_width = mm_to_twips(page::WIDTH_MM) as u32;
    let page_height = mm_to_twips(page::HEIGHT_MM) as u32;
    let margin = mm_to_twips(page::MARGIN_MM);

    let mut docx = Docx::new().page_size(page_width, page_height).page_margin(
        PageMargin::new()
            .top(margin)
            .bottom(margin)
            .left(margin)
            .right(margin),
    );

    for paragraph in paragraphs {
        let indent = mm_to_twips(paragraph.indent_mm);
        docx = docx.add_paragraph(
            DocxParagraph::new()
                .add_run(Run::new().add_text(&paragraph.text).size(FONT_SIZE_HALF_POINTS))
                .indent(Some(indent), None, None, None)
                .line_spacing(LineSpacing::new().before(0).after(0)),
        );
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).map_err(|e| {
        error!("DOCX assembly failed: {e}");
        AppError::document("Failed to generate the report document")
    })?;
    Ok(buffer.into_inner())
}
