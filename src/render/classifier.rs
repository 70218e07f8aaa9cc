// ABOUTME: Tagged-line grammar for the model's report text
// ABOUTME: Assigns every source line an indentation depth and exactly one structural role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # Line Classifier
//!
//! The model's report format is a convention-based micro-language: `**bold**`
//! markers for headers, a colon for key/value, a pipe for name/source pairs, a
//! leading dash for bullets, and leading-space count for nesting depth. The
//! grammar is defined here once as an ordered rule set instead of ad hoc
//! string matching inside the renderer.
//!
//! Classification is total. Rule order matters and is part of the grammar:
//! the numbered-subheader pattern is checked before the generic bold
//! subheader, so `**1. Carbohydrates:**` keeps its ordinal treatment. Any
//! line no rule claims falls through to [`LineRole::PlainText`].

use std::sync::LazyLock;

use regex::Regex;

/// Ordinal pattern for macronutrient-style subheaders: `**<digits>.` directly
/// after the bold marker.
static NUMBERED_SUBHEADER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\*\*\d+\.").ok());

/// Structural role of one report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRole {
    /// Top-level section header at indentation zero, e.g. `**BMI:** 22.5`
    CardHeader {
        /// Section title with markers stripped
        title: String,
        /// Value following the colon on the same line, if any
        same_line_value: Option<String>,
    },
    /// Nested section header, numbered (`**1. Carbohydrates:**`) or plain bold
    SubHeader {
        /// Header text through the colon, markers stripped
        header_text: String,
        /// Value following the colon, if any
        value_text: Option<String>,
    },
    /// Dash-prefixed item, e.g. `- Sources: lean meats, fish`
    BulletItem {
        /// Item text with the dash and markers stripped
        item_text: String,
    },
    /// Pipe-separated nutrient line, e.g. `Calcium: 1,000 mg | Sources: dairy`
    KeyValueWithSource {
        /// Left of the first pipe
        name: String,
        /// Right of the first pipe, `Sources:` / `Tip:` labels stripped
        source: String,
    },
    /// Anything no other rule claims
    PlainText {
        /// Line text with markers stripped
        text: String,
    },
    /// Empty after trimming
    Blank,
}

/// One classified report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// Count of leading space characters on the source line
    pub indent_depth: usize,
    /// Structural role assigned by the grammar
    pub role: LineRole,
}

/// Classify one source line
///
/// Total function: every input maps to exactly one role and no input panics.
#[must_use]
pub fn classify(line: &str) -> ClassifiedLine {
    let indent_depth = line.chars().take_while(|c| *c == ' ').count();
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return ClassifiedLine {
            indent_depth,
            role: LineRole::Blank,
        };
    }

    if is_card_header(trimmed, indent_depth) {
        let (title, same_line_value) = split_header(trimmed);
        return ClassifiedLine {
            indent_depth,
            role: LineRole::CardHeader {
                title: title.trim_end_matches(':').trim().to_owned(),
                same_line_value,
            },
        };
    }

    if is_numbered_subheader(trimmed) || is_generic_subheader(trimmed) {
        let (header_text, value_text) = split_header(trimmed);
        return ClassifiedLine {
            indent_depth,
            role: LineRole::SubHeader {
                header_text,
                value_text,
            },
        };
    }

    if let Some(rest) = trimmed.strip_prefix('-') {
        return ClassifiedLine {
            indent_depth,
            role: LineRole::BulletItem {
                item_text: strip_markers(rest),
            },
        };
    }

    if let Some((name, source)) = trimmed.split_once('|') {
        return ClassifiedLine {
            indent_depth,
            role: LineRole::KeyValueWithSource {
                name: strip_markers(name),
                source: strip_source_label(source),
            },
        };
    }

    ClassifiedLine {
        indent_depth,
        role: LineRole::PlainText {
            text: strip_markers(trimmed),
        },
    }
}

/// Top-level header: opens and closes a bold span, carries a colon, column zero
fn is_card_header(trimmed: &str, indent_depth: usize) -> bool {
    indent_depth == 0
        && trimmed.starts_with("**")
        && trimmed[2..].contains("**")
        && trimmed.contains(':')
}

/// Numbered subheader: `**<digits>.` immediately after the marker, plus a colon
fn is_numbered_subheader(trimmed: &str) -> bool {
    trimmed.contains(':')
        && NUMBERED_SUBHEADER
            .as_ref()
            .is_some_and(|re| re.is_match(trimmed))
}

/// Generic bold subheader: bold span around the whole line, with a colon
///
/// Indentation-zero lines of this shape were already claimed by the card
/// header rule, so anything reaching here is nested.
fn is_generic_subheader(trimmed: &str) -> bool {
    trimmed.starts_with("**") && trimmed.ends_with("**") && trimmed.contains(':')
}

/// Split a header line at its first colon
///
/// Returns the header text through the colon (markers stripped, colon
/// re-attached) and the optional remainder.
fn split_header(trimmed: &str) -> (String, Option<String>) {
    match trimmed.split_once(':') {
        Some((head, tail)) => {
            let value = strip_markers(tail);
            let value = if value.is_empty() { None } else { Some(value) };
            (format!("{}:", strip_markers(head)), value)
        }
        None => (strip_markers(trimmed), None),
    }
}

/// Remove bold markers and surrounding whitespace
fn strip_markers(text: &str) -> String {
    text.replace("**", "").trim().to_owned()
}

/// Strip the literal `Sources:` / `Tip:` labels from a source fragment
fn strip_source_label(source: &str) -> String {
    let trimmed = source.trim();
    let stripped = trimmed
        .strip_prefix("Sources:")
        .or_else(|| trimmed.strip_prefix("Tip:"))
        .unwrap_or(trimmed);
    strip_markers(stripped)
}
