// ABOUTME: Card-based HTML renderer for classified report lines
// ABOUTME: Folds the line stream into nested cards with one open card at a time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutriplan

//! # HTML Renderer
//!
//! Consumes classified lines in order and emits one concatenated HTML string
//! of collapsible "cards", one per top-level report section. Rendering is a
//! fold with a single piece of carried state: whether a card is currently
//! open. A new [`LineRole::CardHeader`] closes the open card before opening
//! the next one; end of input closes the last card.
//!
//! Lines arriving before the first card header have no card to land in and
//! are dropped. Model text that never opens a card renders to the empty
//! string.

use html_escape::encode_text;

use super::classifier::{classify, ClassifiedLine, LineRole};

/// Pixels of left margin per leading space of indentation
const PX_PER_INDENT_SPACE: usize = 6;

/// Display icons by lowercased card title
///
/// Small fixed mapping; anything unlisted gets [`DEFAULT_ICON`].
const CARD_ICONS: &[(&str, &str)] = &[
    ("bmi", "\u{2696}\u{fe0f}"),                // ⚖️
    ("calories", "\u{1f525}"),                  // 🔥
    ("nutrients", "\u{1f957}"),                 // 🥗
    ("other related info.", "\u{1f4a7}"),       // 💧
    ("tips", "\u{1f4a1}"),                      // 💡
];

/// Icon for card titles outside the fixed table
const DEFAULT_ICON: &str = "\u{1f4cc}"; // 📌

/// Render a full model reply into card-structured HTML
///
/// Never fails: malformed text degrades to plain paragraphs or, with no card
/// header at all, to an empty string.
#[must_use]
pub fn render_report(text: &str) -> String {
    text.lines()
        .map(classify)
        .fold(CardAccumulator::default(), CardAccumulator::push)
        .finish()
}

/// Fold accumulator: the output buffer plus the open-card flag
#[derive(Debug, Default)]
struct CardAccumulator {
    html: String,
    card_open: bool,
}

impl CardAccumulator {
    /// Feed one classified line into the accumulator
    fn push(mut self, line: ClassifiedLine) -> Self {
        match line.role {
            LineRole::CardHeader {
                title,
                same_line_value,
            } => self.open_card(&title, same_line_value.as_deref()),
            LineRole::Blank => {}
            // Everything below needs an open card to land in.
            _ if !self.card_open => {}
            LineRole::SubHeader {
                header_text,
                value_text,
            } => self.push_subheader(line.indent_depth, &header_text, value_text.as_deref()),
            LineRole::BulletItem { item_text } => self.push_bullet(line.indent_depth, &item_text),
            LineRole::KeyValueWithSource { name, source } => {
                self.push_key_value(line.indent_depth, &name, &source);
            }
            LineRole::PlainText { text } => self.push_plain(line.indent_depth, &text),
        }
        self
    }

    /// Close the open card, if any, and emit the trailing markup
    fn finish(mut self) -> String {
        self.close_card();
        self.html
    }

    fn open_card(&mut self, title: &str, same_line_value: Option<&str>) {
        self.close_card();

        let id = card_id(title);
        let icon = card_icon(title);
        let title = encode_text(title);

        self.html.push_str(&format!(
            "<div class=\"card\" id=\"{id}\">\
             <div class=\"card-header\" onclick=\"toggleCard('{id}')\">\
             <span class=\"card-icon\">{icon}</span>\
             <h2 class=\"card-title\">{title}</h2>\
             <span class=\"card-toggle\">&#9660;</span>\
             </div>\
             <div class=\"card-body\">"
        ));
        self.card_open = true;

        if let Some(value) = same_line_value {
            let value = encode_text(value);
            self.html
                .push_str(&format!("<p class=\"card-value\">{value}</p>"));
        }
    }

    fn close_card(&mut self) {
        if self.card_open {
            self.html.push_str("</div></div>");
            self.card_open = false;
        }
    }

    fn push_subheader(&mut self, indent: usize, header_text: &str, value_text: Option<&str>) {
        let margin = indent_margin(indent);
        let header = encode_text(header_text);
        self.html.push_str(&format!(
            "<h4 class=\"subheader\" style=\"margin-left:{margin}px\">{header}</h4>"
        ));

        // A value on the header line may itself carry a name | source pair.
        if let Some(value) = value_text {
            match value.split_once('|') {
                Some((name, source)) => {
                    self.push_key_value(indent, name.trim(), strip_label(source));
                }
                None => self.push_plain(indent, value),
            }
        }
    }

    fn push_bullet(&mut self, indent: usize, item_text: &str) {
        // Bullets occasionally smuggle a name | source pair too.
        if let Some((name, source)) = item_text.split_once('|') {
            self.push_key_value(indent, name.trim(), strip_label(source));
            return;
        }
        let margin = indent_margin(indent);
        let item = encode_text(item_text);
        self.html.push_str(&format!(
            "<p class=\"bullet\" style=\"margin-left:{margin}px\">\u{2022} {item}</p>"
        ));
    }

    fn push_key_value(&mut self, indent: usize, name: &str, source: &str) {
        let margin = indent_margin(indent);
        let name = encode_text(name);
        let source = encode_text(source);
        self.html.push_str(&format!(
            "<p class=\"kv\" style=\"margin-left:{margin}px\">\
             <span class=\"kv-name\">{name}</span>\
             <span class=\"kv-source\">{source}</span>\
             </p>"
        ));
    }

    fn push_plain(&mut self, indent: usize, text: &str) {
        let margin = indent_margin(indent);
        let text = encode_text(text);
        self.html
            .push_str(&format!("<p style=\"margin-left:{margin}px\">{text}</p>"));
    }
}

/// Stable element id for a card title: lowercased, spaces to underscores,
/// ampersands spelled out
fn card_id(title: &str) -> String {
    title.to_lowercase().replace(' ', "_").replace('&', "and")
}

/// Icon for a card title, default when the title is not in the table
fn card_icon(title: &str) -> &'static str {
    let key = title.to_lowercase();
    CARD_ICONS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(DEFAULT_ICON, |(_, icon)| icon)
}

/// Left margin in pixels for a given indentation depth
const fn indent_margin(indent: usize) -> usize {
    indent * PX_PER_INDENT_SPACE
}

/// Strip a `Sources:` / `Tip:` label from the source side of an inline pair
fn strip_label(source: &str) -> &str {
    let trimmed = source.trim();
    trimmed
        .strip_prefix("Sources:")
        .or_else(|| trimmed.strip_prefix("Tip:"))
        .unwrap_or(trimmed)
        .trim()
}
