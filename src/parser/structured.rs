//! Structured-text parse strategy
//!
//! Works on the flattened visible text instead of class names, which change
//! whenever the site's page builder is updated. Services, contact details,
//! address and hours come from text patterns; labeled blocks and links are
//! appended after the service rows.

use crate::config::StructuredConfig;
use crate::parser::blocks::labeled_block_rows;
use crate::parser::links::link_rows;
use crate::parser::text::text_lines;
use crate::record::{non_empty, ContactDetails, NormalizedRow, RecordKind};
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

static UNIT_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*Units?\s*\$([0-9]+(?:\.[0-9]{2})?)")
        .expect("Failed to compile unit price regex")
});
static MONTHLY_FEE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$([0-9]+(?:\.[0-9]{2})?)\s*/\s*month")
        .expect("Failed to compile monthly fee regex")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\d{3}\)\s*\d{3}-\d{4}").expect("Failed to compile phone regex")
});
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("Failed to compile email regex")
});
static STREET_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3,}").expect("Failed to compile street number regex"));
static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Mon|Tue|Wed|Thu|Fri|Sat|Sun)").expect("Failed to compile weekday regex")
});
static MERIDIEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(AM|PM|am|pm)").expect("Failed to compile am/pm regex"));

/// A unit bundle and its price as found in the text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPrice {
    pub units: u32,
    pub price: f64,
}

/// Parser for pages whose content is laid out by a visual page builder
#[derive(Debug, Clone)]
pub struct StructuredParser {
    settings: StructuredConfig,
}

impl StructuredParser {
    pub fn new(settings: StructuredConfig) -> Self {
        Self { settings }
    }

    pub fn parse(&self, document: &Html, source_url: &str) -> Vec<NormalizedRow> {
        let lines = text_lines(document.root_element());
        let full_text = lines.join("\n");

        let mut rows = self.service_rows(&full_text, &lines, source_url);
        rows.extend(labeled_block_rows(document, &self.settings, source_url));
        rows.extend(link_rows(document, source_url));
        rows
    }

    fn service_rows(&self, full_text: &str, lines: &[String], source_url: &str) -> Vec<NormalizedRow> {
        let member_fee = monthly_fee(full_text);
        let contact = ContactDetails {
            phone: first_match(&PHONE_RE, full_text),
            email: first_match(&EMAIL_RE, full_text),
            address: self.address(lines),
            hours: business_hours(lines),
        };

        unit_prices(full_text)
            .into_iter()
            .map(|UnitPrice { units, price }| {
                NormalizedRow::new(
                    source_url,
                    RecordKind::Service {
                        units,
                        price,
                        member_fee_month: member_fee,
                        content: self.settings.service_tagline.clone().and_then(non_empty),
                        contact: contact.clone(),
                    },
                )
                .with_label(self.settings.service_label.clone())
                .with_title(self.settings.service_title.clone())
            })
            .collect()
    }

    /// Picks the address line for the configured locality
    ///
    /// Candidates mention the locality and a region token. The first
    /// candidate with a street-number-like digit run wins; otherwise the last
    /// candidate seen.
    pub fn address(&self, lines: &[String]) -> Option<String> {
        let locality = self.settings.locality.as_deref()?;
        let candidates: Vec<&str> = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| {
                line.contains(locality)
                    && self
                        .settings
                        .region_tokens
                        .iter()
                        .any(|region| line.contains(region.as_str()))
            })
            .collect();

        candidates
            .iter()
            .find(|line| STREET_NUMBER_RE.is_match(line))
            .or_else(|| candidates.last())
            .map(|line| line.to_string())
    }
}

/// Every `<n> Units $<price>` pair, in text order
pub fn unit_prices(text: &str) -> Vec<UnitPrice> {
    UNIT_PRICE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let units = caps.get(1)?.as_str().parse().ok()?;
            let price = caps.get(2)?.as_str().parse().ok()?;
            Some(UnitPrice { units, price })
        })
        .collect()
}

/// The first `$<fee>/month` value
pub fn monthly_fee(text: &str) -> Option<f64> {
    MONTHLY_FEE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First line naming a weekday and an am/pm time
pub fn business_hours(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty() && WEEKDAY_RE.is_match(line) && MERIDIEM_RE.is_match(line))
        .map(str::to_string)
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}
