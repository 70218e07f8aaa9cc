// ABOUTME: Extracts the comparison HTML table from a raw model reply
// ABOUTME: Tolerates code fences and commentary; falls back to a fixed error fragment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # Table Extractor
//!
//! The comparison prompt asks the model for exactly one HTML table and
//! nothing else. Models being models, the table sometimes arrives wrapped in
//! markdown code fences or surrounded by commentary. This extractor strips a
//! leading/trailing fence, then returns the first `<table ...>...</table>`
//! span verbatim. No table at all is a presentation problem, not an error:
//! the caller gets a fixed fallback fragment instead.

use std::sync::LazyLock;

use regex::Regex;

/// First `<table ...>...</table>` span, case-insensitive, across newlines
static TABLE_SPAN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<table[^>]*>.*?</table>").ok());

/// Fragment returned when no table can be found in the reply
const FALLBACK_FRAGMENT: &str = "<div class=\"comparison-error\">\
    <span class=\"comparison-error-icon\">\u{26a0}\u{fe0f}</span>\
    <h3>Comparison unavailable</h3>\
    <p>The nutrition comparison arrived in an unexpected format. Please try again.</p>\
    </div>";

/// Extract the comparison table from a raw model reply
///
/// Returns the table markup byte-for-byte as the model produced it; callers
/// must trust the model's HTML structure. When the reply carries no table,
/// returns the fixed fallback fragment.
#[must_use]
pub fn extract_table(raw: &str) -> String {
    let body = strip_code_fences(raw);

    TABLE_SPAN
        .as_ref()
        .and_then(|re| re.find(body))
        .map_or_else(|| FALLBACK_FRAGMENT.to_owned(), |m| m.as_str().to_owned())
}

/// Drop a leading and/or trailing fenced-code marker line
///
/// Only the outermost fence pair is removed; the language tag after the
/// opening fence (e.g. ```` ```html ````) goes with it.
fn strip_code_fences(raw: &str) -> &str {
    let mut body = raw.trim();

    if body.starts_with("```") {
        body = body
            .split_once('\n')
            .map_or("", |(_, rest)| rest)
            .trim_start();
    }

    if let Some(stripped) = body.strip_suffix("```") {
        body = stripped.trim_end();
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "<table><thead><tr><th>Metric</th><th>Oats</th><th>Quinoa</th></tr></thead><tbody><tr><td>Calories</td><td>389 kcal</td><td>368 kcal</td></tr></tbody></table>";

    #[test]
    fn bare_table_passes_through_unchanged() {
        assert_eq!(extract_table(TABLE), TABLE);
    }

    #[test]
    fn extraction_is_idempotent() {
        let once = extract_table(TABLE);
        assert_eq!(extract_table(&once), once);
    }

    #[test]
    fn fenced_table_loses_its_fences() {
        let fenced = format!("```html\n{TABLE}\n```");
        assert_eq!(extract_table(&fenced), TABLE);
    }

    #[test]
    fn commentary_around_the_table_is_discarded() {
        let chatty = format!("Here is the comparison you asked for:\n\n{TABLE}\n\nEnjoy!");
        assert_eq!(extract_table(&chatty), TABLE);
    }

    #[test]
    fn uppercase_tags_and_attributes_match() {
        let shouty = "<TABLE class=\"cmp\"><TR><TD>Calories</TD></TR></TABLE>";
        assert_eq!(extract_table(shouty), shouty);
    }

    #[test]
    fn table_spanning_newlines_is_captured_whole() {
        let multiline = "<table>\n  <tr>\n    <td>Protein</td>\n  </tr>\n</table>";
        assert_eq!(extract_table(multiline), multiline);
    }

    #[test]
    fn first_of_two_tables_wins() {
        let doubled = format!("{TABLE}<table><tr><td>second</td></tr></table>");
        assert_eq!(extract_table(&doubled), TABLE);
    }

    #[test]
    fn missing_table_yields_fallback_fragment() {
        let fragment = extract_table("Sorry, I cannot compare those.");
        assert!(fragment.contains("unexpected format"));
        assert!(fragment.contains("comparison-error"));
    }

    #[test]
    fn empty_input_yields_fallback_fragment() {
        assert!(extract_table("").contains("unexpected format"));
    }
}
