// ABOUTME: PDF writer that places paginated report lines onto A4 landscape pages
// ABOUTME: Uses the base-14 Helvetica with WinAnsi encoding, no font embedding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # PDF Output
//!
//! Takes the pages produced by [`layout::paginate`] and writes them out. One
//! text object per placed line keeps the content streams trivial to reason
//! about; the cost is a few extra bytes per line, which is irrelevant at
//! report sizes.
//!
//! The document uses the viewer-provided Helvetica, so text must be encoded
//! as WinAnsi (cp1252) single bytes. Characters outside that set degrade to
//! `?`; the report text is overwhelmingly ASCII.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::constants::{layout, page, units};
use crate::document::layout::{paginate, Page};
use crate::document::paragraphs_from_report;
use crate::errors::AppResult;

/// Render stored report text to PDF bytes
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature aligned with the
/// DOCX writer at the route boundary.
pub fn report_to_pdf(text: &str) -> AppResult<Vec<u8>> {
    let paragraphs = paragraphs_from_report(text);
    let pages = paginate(&paragraphs);
    Ok(pdf_from_pages(&pages))
}

fn pdf_from_pages(pages: &[Page]) -> Vec<u8> {
    let width_pt = (page::WIDTH_MM * units::PT_PER_MM) as f32;
    let height_pt = (page::HEIGHT_MM * units::PT_PER_MM) as f32;

    let mut pdf = Pdf::new();

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_id = Ref::new(3);

    let mut next_id = 4;
    let page_ids: Vec<(Ref, Ref)> = pages
        .iter()
        .map(|_| {
            let page_id = Ref::new(next_id);
            let content_id = Ref::new(next_id + 1);
            next_id += 2;
            (page_id, content_id)
        })
        .collect();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(pages.len() as i32);
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for ((page_id, content_id), page_out) in page_ids.iter().zip(pages) {
        {
            let mut page_obj = pdf.page(*page_id);
            page_obj
                .media_box(Rect::new(0.0, 0.0, width_pt, height_pt))
                .parent(page_tree_id)
                .contents(*content_id);
            page_obj.resources().fonts().pair(Name(b"F1"), font_id);
        }

        let mut content = Content::new();
        for line in &page_out.lines {
            let x_pt = (line.x_mm * units::PT_PER_MM) as f32;
            // Layout measures baselines from the top edge; PDF's origin is
            // bottom-left.
            let y_pt = ((page::HEIGHT_MM - line.y_mm) * units::PT_PER_MM) as f32;

            content.begin_text();
            content.set_font(Name(b"F1"), layout::FONT_SIZE_PT as f32);
            content.next_line(x_pt, y_pt);
            content.show(Str(&to_winansi(&line.text)));
            content.end_text();
        }
        pdf.stream(*content_id, &content.finish());
    }

    pdf.finish()
}

/// Encode text as WinAnsi (cp1252) bytes
fn to_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

/// Map one character to its WinAnsi byte, `?` when unmappable
///
/// The 0xA0..=0xFF block matches Latin-1; the 0x80..=0x9F block holds the
/// typographic punctuation Windows squeezed in.
fn winansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
        '\u{20ac}' => 0x80, // euro sign
        '\u{201a}' => 0x82, // single low quote
        '\u{0192}' => 0x83, // f with hook
        '\u{201e}' => 0x84, // double low quote
        '\u{2026}' => 0x85, // ellipsis
        '\u{2020}' => 0x86, // dagger
        '\u{2021}' => 0x87, // double dagger
        '\u{02c6}' => 0x88, // circumflex accent
        '\u{2030}' => 0x89, // per mille
        '\u{0160}' => 0x8a, // S caron
        '\u{2039}' => 0x8b, // single left angle quote
        '\u{0152}' => 0x8c, // OE ligature
        '\u{017d}' => 0x8e, // Z caron
        '\u{2018}' => 0x91, // left single quote
        '\u{2019}' => 0x92, // right single quote
        '\u{201c}' => 0x93, // left double quote
        '\u{201d}' => 0x94, // right double quote
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en dash
        '\u{2014}' => 0x97, // em dash
        '\u{02dc}' => 0x98, // small tilde
        '\u{2122}' => 0x99, // trademark
        '\u{0161}' => 0x9a, // s caron
        '\u{203a}' => 0x9b, // single right angle quote
        '\u{0153}' => 0x9c, // oe ligature
        '\u{017e}' => 0x9e, // z caron
        '\u{0178}' => 0x9f, // Y diaeresis
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_bytes_carry_header_and_trailer() {
        let bytes = report_to_pdf("**BMI:** 22.5\n    Calcium: 1,000 mg").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(32)..]).into_owned();
        assert!(tail.contains("%%EOF"));
    }

    #[test]
    fn helvetica_is_referenced_without_embedding() {
        let bytes = report_to_pdf("hello").unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        assert!(text.contains("Helvetica"));
        assert!(text.contains("WinAnsiEncoding"));
        assert!(!text.contains("FontFile"));
    }

    #[test]
    fn long_report_spans_multiple_pages() {
        let long_text: String = (0..200)
            .map(|i| format!("recommendation line number {i}\n"))
            .collect();
        let single = report_to_pdf("one line").unwrap();
        let multi = report_to_pdf(&long_text).unwrap();
        assert!(multi.len() > single.len());
        let text = String::from_utf8_lossy(&multi).into_owned();
        // "/Page" occurs once in the catalog, once for the page tree, and
        // once per page object: at least four for a two-page document.
        assert!(text.matches("/Page").count() >= 4);
    }

    #[test]
    fn winansi_maps_latin_and_punctuation() {
        assert_eq!(winansi_byte('A'), b'A');
        assert_eq!(winansi_byte('\u{e9}'), 0xe9); // e acute
        assert_eq!(winansi_byte('\u{2013}'), 0x96);
        assert_eq!(winansi_byte('\u{1f525}'), b'?'); // emoji degrades
    }

    #[test]
    fn empty_report_produces_a_single_blank_page() {
        let bytes = report_to_pdf("").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
