//! Hyperlink rows
//!
//! Every `<a href>` on the page becomes a link row, first occurrence wins.

use crate::record::{non_empty, NormalizedRow, RecordKind};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Failed to parse anchor selector"));

/// Link rows in document order
pub fn link_rows(document: &Html, source_url: &str) -> Vec<NormalizedRow> {
    let base = Url::parse(source_url).ok();
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for element in document.select(&ANCHORS) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(target) = resolve_link(href, base.as_ref()) else {
            continue;
        };
        if !seen.insert(target.clone()) {
            continue;
        }

        let text = non_empty(element.text().collect::<String>().trim());
        rows.push(
            NormalizedRow::new(
                source_url,
                RecordKind::Link {
                    text: text.clone(),
                    url: target,
                },
            )
            .with_label("Link")
            .with_title(text),
        );
    }

    rows
}

/// Resolves an href against the page URL
///
/// Same-page anchors and script pseudo-links are dropped. `mailto:` and
/// `tel:` targets are kept since they carry contact details. An href that
/// cannot be resolved is kept verbatim.
fn resolve_link(href: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("data:") {
        return None;
    }

    match base.map(|b| b.join(href)) {
        Some(Ok(absolute)) => Some(absolute.to_string()),
        _ => Some(href.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://example.com/scottsdale";

    fn links(body: &str) -> Vec<(Option<String>, String)> {
        let html = Html::parse_document(&format!("<html><body>{body}</body></html>"));
        link_rows(&html, SOURCE)
            .into_iter()
            .map(|row| match row.kind {
                RecordKind::Link { text, url } => (text, url),
                other => panic!("unexpected kind {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_relative_links_resolved() {
        assert_eq!(
            links(r#"<a href="/book">Book now</a>"#),
            vec![(
                Some("Book now".to_string()),
                "https://example.com/book".to_string()
            )]
        );
    }

    #[test]
    fn test_skips_anchors_and_scripts() {
        let found = links(
            r##"<a href="#top">Top</a><a href="javascript:void(0)">x</a><a href="">empty</a>"##,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_dedupes_by_target() {
        let found = links(
            r#"<a href="/book">Book</a><a href="https://example.com/book">Again</a><a href="/faq">FAQ</a>"#,
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0.as_deref(), Some("Book"));
    }

    #[test]
    fn test_contact_links_and_empty_text() {
        let found = links(r#"<a href="tel:+14805550100"><img src="x.png"></a>"#);
        assert_eq!(found, vec![(None, "tel:+14805550100".to_string())]);
    }

    #[test]
    fn test_rows_carry_label_and_title() {
        let html = Html::parse_document(r#"<a href="/faq">FAQ</a>"#);
        let rows = link_rows(&html, SOURCE);
        assert_eq!(rows[0].section_label.as_deref(), Some("Link"));
        assert_eq!(rows[0].title.as_deref(), Some("FAQ"));
        assert_eq!(rows[0].source_url, SOURCE);
    }
}
