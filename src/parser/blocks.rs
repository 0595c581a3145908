//! Labeled content blocks
//!
//! Page-builder widgets mark headings and paragraphs only through inline
//! font sizes. A title-sized block opens a section; a body-sized block is
//! classified from its text and the section it sits in.

use crate::config::{PhraseRule, StructuredConfig};
use crate::parser::text::joined_text;
use crate::record::{NormalizedRow, RecordKind};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static STYLED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[style]").expect("Failed to parse style selector"));

/// Longest title derived from a generic block's first line, in characters
pub const GENERIC_TITLE_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Title,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    About,
}

/// Emits one row per non-empty body block, in document order
pub fn labeled_block_rows(
    document: &Html,
    settings: &StructuredConfig,
    source_url: &str,
) -> Vec<NormalizedRow> {
    let title_size = squash(&settings.title_font_size);
    let body_size = squash(&settings.body_font_size);
    let marker_of = |element: ElementRef<'_>| -> Option<Marker> {
        let size = font_size(element.value().attr("style")?)?;
        if size == title_size {
            Some(Marker::Title)
        } else if size == body_size {
            Some(Marker::Body)
        } else {
            None
        }
    };

    let mut section = None;
    let mut rows = Vec::new();

    for element in document.select(&STYLED) {
        let Some(marker) = marker_of(element) else {
            continue;
        };
        // Nested markers belong to the outermost block
        let nested = element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| marker_of(ancestor).is_some());
        if nested {
            continue;
        }

        let text = joined_text(element);
        if text.is_empty() {
            continue;
        }

        match marker {
            Marker::Title => {
                let lower = text.to_lowercase();
                section = settings
                    .about_headings
                    .iter()
                    .any(|heading| lower.contains(heading.as_str()))
                    .then_some(Section::About);
            }
            Marker::Body => rows.push(classify(&text, section, settings, source_url)),
        }
    }

    rows
}

fn classify(
    text: &str,
    section: Option<Section>,
    settings: &StructuredConfig,
    source_url: &str,
) -> NormalizedRow {
    let lower = text.to_lowercase();
    let rules = &settings.rules;
    let content = text.to_string();

    let (kind, label, title) = if any_rule(&rules.membership, &lower) {
        (RecordKind::JoinInfo { content }, "Join", Some("Membership"))
    } else if any_rule(&rules.pricing, &lower) {
        (
            RecordKind::PricingSummary { content },
            "Pricing",
            Some("Pricing Summary"),
        )
    } else if section == Some(Section::About) && any_rule(&rules.about, &lower) {
        (RecordKind::About { content }, "About", Some("About Us"))
    } else if any_rule(&rules.testimonial, &lower) {
        (
            RecordKind::Testimonial { content },
            "Testimonials",
            Some("Reviews"),
        )
    } else {
        let title = generic_title(text);
        return NormalizedRow::new(
            source_url,
            RecordKind::Generic {
                content: Some(content),
            },
        )
        .with_label("Text")
        .with_title(title);
    };

    NormalizedRow::new(source_url, kind)
        .with_label(label)
        .with_title(title.map(str::to_string))
}

fn any_rule(rules: &[PhraseRule], lower: &str) -> bool {
    rules.iter().any(|rule| rule.matches(lower))
}

fn generic_title(text: &str) -> Option<String> {
    text.lines()
        .next()
        .map(|line| line.chars().take(GENERIC_TITLE_CHARS).collect())
}

/// The `font-size` declaration of an inline style, whitespace removed
fn font_size(style: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        property
            .trim()
            .eq_ignore_ascii_case("font-size")
            .then(|| squash(value))
    })
}

fn squash(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}
