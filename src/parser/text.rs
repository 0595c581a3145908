//! Visible text flattening
//!
//! Produces the page's text stream as stripped, non-empty lines, one per text
//! node, in document order. Script-like containers are not visible text.

use scraper::ElementRef;

const HIDDEN_CONTAINERS: &[&str] = &["script", "style", "noscript", "template"];

/// Text lines under `root`, in document order
pub fn text_lines(root: ElementRef<'_>) -> Vec<String> {
    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |el| HIDDEN_CONTAINERS.contains(&el.name()))
            });
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

/// Text under `root` joined with newlines
pub fn joined_text(root: ElementRef<'_>) -> String {
    text_lines(root).join("\n")
}
