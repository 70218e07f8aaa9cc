// ABOUTME: Document pipeline turning stored report text into DOCX and PDF bytes
// ABOUTME: Splits text into indented paragraphs, then wraps, paginates, and writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # Document Generation
//!
//! Downloads re-derive both documents from the stored plain text on every
//! request. The text is first cut into [`Paragraph`]s: one per source line,
//! with the leading spaces converted into a left-indent length and dropped
//! from the text.
//!
//! From there the two output formats diverge:
//!
//! - [`docx`] hands each paragraph to the word processor as-is; Word does its
//!   own line breaking.
//! - [`pdf`] places glyphs itself, so [`layout`] wraps each paragraph against
//!   the page's usable width (greedy word-wrap with syllable-level
//!   hyphenation for overlong words) and assigns every line a position on an
//!   A4 landscape page.
//!
//! All layout arithmetic is in millimeters; page size and margins are
//! converted from the canonical constants exactly once.

pub mod docx;
pub mod layout;
pub mod pdf;

pub use docx::report_to_docx;
pub use pdf::report_to_pdf;

use crate::constants::layout::INDENT_MM_PER_SPACE;

/// One report line with its indentation expressed as a length
///
/// Produced once from the stored text, consumed once by a document writer;
/// never mutated in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Line text with leading indentation removed
    pub text: String,
    /// Left indent derived from the leading space count
    pub indent_mm: f64,
}

impl Paragraph {
    /// Whether this paragraph is a blank spacer line
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split report text into paragraphs, one per line
///
/// Leading spaces become the indent length; the text itself is carried
/// verbatim otherwise, bold markers included, so the downloaded document
/// matches what the model wrote.
#[must_use]
pub fn paragraphs_from_report(text: &str) -> Vec<Paragraph> {
    text.lines()
        .map(|line| {
            let leading_spaces = line.chars().take_while(|c| *c == ' ').count();
            #[allow(clippy::cast_precision_loss)]
            let indent_mm = leading_spaces as f64 * INDENT_MM_PER_SPACE;
            Paragraph {
                text: line.trim().to_owned(),
                indent_mm,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_spaces_become_indent_length() {
        let paragraphs = paragraphs_from_report("**BMI:** 22.5\n    Calcium: 1,000 mg\n");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "**BMI:** 22.5");
        assert!((paragraphs[0].indent_mm - 0.0).abs() < f64::EPSILON);
        assert_eq!(paragraphs[1].text, "Calcium: 1,000 mg");
        assert!((paragraphs[1].indent_mm - 4.0 * INDENT_MM_PER_SPACE).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_lines_survive_as_blank_paragraphs() {
        let paragraphs = paragraphs_from_report("a\n\nb");
        assert_eq!(paragraphs.len(), 3);
        assert!(paragraphs[1].is_blank());
    }
}
