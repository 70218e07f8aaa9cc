// ABOUTME: Page layout engine: font metrics, greedy word-wrap, hyphenation, pagination
// ABOUTME: Produces positioned lines on fixed-size A4 landscape pages for the PDF writer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # Text Layout
//!
//! The PDF writer places every glyph itself, so line breaking happens here.
//! Widths come from the standard Helvetica metrics (the PDF uses the base-14
//! Helvetica, so no font file is embedded and the advance widths are fixed by
//! the AFM tables). All arithmetic is in millimeters.
//!
//! Wrapping is greedy: words accumulate into the current line while they fit.
//! A word that is wider than the whole usable width is broken at syllable
//! boundaries (English patterns) and the fragments flow on with trailing
//! hyphens; a fragment that still does not fit on a line of its own is
//! emitted as-is, best effort.
//!
//! Pagination tracks a vertical cursor down the page. Blank paragraphs
//! advance the cursor without emitting text; a line that would land below the
//! bottom margin starts a new page instead.

use std::sync::LazyLock;

use hyphenation::{Hyphenator, Language, Load, Standard};

use crate::constants::{layout, page, units};
use crate::document::Paragraph;

/// English-US syllable patterns, embedded at compile time
///
/// Loading can only fail if the embedded data is corrupt; layout degrades to
/// emitting overlong words unbroken in that case.
static HYPHENATOR: LazyLock<Option<Standard>> =
    LazyLock::new(|| Standard::from_embedded(Language::EnglishUS).ok());

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em
///
/// Values from the Adobe base-14 AFM metrics.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, // space ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0 1 2 3 4 5 6 7
    556, 556, 278, 278, 584, 584, 584, 556, // 8 9 : ; < = > ?
    1015, 667, 667, 722, 722, 667, 611, 778, // @ A B C D E F G
    722, 278, 500, 667, 556, 833, 722, 778, // H I J K L M N O
    667, 778, 722, 667, 611, 722, 667, 944, // P Q R S T U V W
    667, 667, 611, 278, 278, 278, 469, 556, // X Y Z [ \ ] ^ _
    333, 556, 556, 500, 556, 556, 278, 556, // ` a b c d e f g
    556, 222, 222, 500, 222, 833, 556, 556, // h i j k l m n o
    556, 556, 333, 500, 278, 556, 500, 722, // p q r s t u v w
    500, 500, 500, 334, 260, 334, 584, // x y z { | } ~
];

/// Advance width for characters outside the ASCII table, in 1/1000 em
///
/// Accented Latin letters mostly share the width of their base letter; a flat
/// average keeps the estimate close enough for wrapping.
const FALLBACK_WIDTH: u16 = 556;

/// One wrapped line positioned on a page
///
/// `y_mm` is the text baseline measured from the top edge of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Line text, guaranteed to fit the usable width apart from single
    /// unbreakable fragments
    pub text: String,
    /// Horizontal offset from the left page edge
    pub x_mm: f64,
    /// Baseline offset from the top page edge
    pub y_mm: f64,
}

/// One fixed-size output page
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Lines in top-to-bottom order
    pub lines: Vec<PlacedLine>,
}

/// Measure a string at the report font size, in millimeters
#[must_use]
pub fn text_width_mm(text: &str) -> f64 {
    let units_sum: u64 = text.chars().map(|c| u64::from(char_width(c))).sum();
    #[allow(clippy::cast_precision_loss)]
    let em_fraction = units_sum as f64 / 1000.0;
    em_fraction * layout::FONT_SIZE_PT * units::MM_PER_PT
}

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        HELVETICA_WIDTHS[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Greedily wrap one paragraph's text to the given usable width
///
/// Words separated by whitespace accumulate into lines; an overlong word is
/// hyphenated and its fragments flow on from the current line content.
/// Returns no lines for blank text.
#[must_use]
pub fn wrap_paragraph(text: &str, usable_width_mm: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = join_with_space(&current, word);
        if text_width_mm(&candidate) <= usable_width_mm {
            current = candidate;
            continue;
        }

        if text_width_mm(word) <= usable_width_mm {
            // Plain overflow: finish the line, start the next with this word.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        } else {
            wrap_overlong_word(word, usable_width_mm, &mut current, &mut lines);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Flow the syllable fragments of an overlong word onto the line stream
///
/// Non-final fragments are measured with their trailing hyphen so a kept
/// fragment never pushes the eventual hyphen past the usable width. A break
/// between fragment `i-1` and `i` splits the word, so the emitted line gets a
/// hyphen; a break before fragment 0 falls between words and does not.
fn wrap_overlong_word(
    word: &str,
    usable_width_mm: f64,
    current: &mut String,
    lines: &mut Vec<String>,
) {
    let fragments = break_word(word);
    let last_index = fragments.len() - 1;

    for (i, fragment) in fragments.into_iter().enumerate() {
        let joined = if current.is_empty() {
            fragment.clone()
        } else if i == 0 {
            format!("{current} {fragment}")
        } else {
            format!("{current}{fragment}")
        };

        let measured = if i == last_index {
            joined.clone()
        } else {
            format!("{joined}-")
        };

        if text_width_mm(&measured) <= usable_width_mm {
            *current = joined;
        } else if current.is_empty() {
            // Unbreakable fragment wider than the line: emit as-is.
            lines.push(fragment);
        } else {
            if i == 0 {
                lines.push(std::mem::take(current));
            } else {
                lines.push(format!("{current}-"));
                current.clear();
            }
            if text_width_mm(&fragment) <= usable_width_mm {
                *current = fragment;
            } else {
                lines.push(fragment);
            }
        }
    }
}

fn join_with_space(current: &str, word: &str) -> String {
    if current.is_empty() {
        word.to_owned()
    } else {
        format!("{current} {word}")
    }
}

/// Break one word at its syllable boundaries
///
/// Returns the whole word as a single fragment when no break points exist or
/// the pattern dictionary failed to load.
fn break_word(word: &str) -> Vec<String> {
    let Some(hyphenator) = HYPHENATOR.as_ref() else {
        return vec![word.to_owned()];
    };

    let breaks = hyphenator.hyphenate(word).breaks;
    if breaks.is_empty() {
        return vec![word.to_owned()];
    }

    let mut fragments = Vec::with_capacity(breaks.len() + 1);
    let mut start = 0;
    for index in breaks {
        fragments.push(word[start..index].to_owned());
        start = index;
    }
    fragments.push(word[start..].to_owned());
    fragments
}

/// Lay paragraphs out onto A4 landscape pages
///
/// Each paragraph wraps against the width remaining right of its indent; the
/// vertical cursor advances one line height per emitted line, and one per
/// blank paragraph. A line that would land below the bottom margin opens a
/// new page. Always returns at least one (possibly empty) page.
#[must_use]
pub fn paginate(paragraphs: &[Paragraph]) -> Vec<Page> {
    let bottom_limit_mm = page::HEIGHT_MM - page::MARGIN_MM;

    let mut pages = vec![Page::default()];
    let mut cursor_mm = page::MARGIN_MM;

    for paragraph in paragraphs {
        if paragraph.is_blank() {
            // Paragraph-spacing placeholder: advance, emit nothing.
            cursor_mm += layout::LINE_HEIGHT_MM;
            continue;
        }

        let x_mm = page::MARGIN_MM + paragraph.indent_mm;
        let usable_width_mm = page::WIDTH_MM - page::MARGIN_MM - x_mm;

        for text in wrap_paragraph(&paragraph.text, usable_width_mm) {
            if cursor_mm + layout::LINE_HEIGHT_MM > bottom_limit_mm {
                pages.push(Page::default());
                cursor_mm = page::MARGIN_MM;
            }
            cursor_mm += layout::LINE_HEIGHT_MM;
            // pages is never empty; the first page is pushed above.
            if let Some(current_page) = pages.last_mut() {
                current_page.lines.push(PlacedLine {
                    text,
                    x_mm,
                    y_mm: cursor_mm,
                });
            }
        }
    }

    pages
}
