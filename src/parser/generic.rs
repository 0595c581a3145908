//! Selector-pair parse strategy

use crate::config::SelectorConfig;
use crate::parser::text::joined_text;
use crate::record::{non_empty, NormalizedRow, RecordKind};
use crate::{ConfigError, ConfigResult};
use scraper::{Html, Selector};

/// Pairs the i-th title match with the i-th price match
#[derive(Debug, Clone)]
pub struct GenericParser {
    title: Selector,
    price: Selector,
}

impl GenericParser {
    pub fn new(selectors: &SelectorConfig) -> ConfigResult<Self> {
        Ok(Self {
            title: compile(&selectors.title)?,
            price: compile(&selectors.price)?,
        })
    }

    /// Extra matches on either side are dropped; no matches is zero rows
    pub fn parse(&self, document: &Html, source_url: &str) -> Vec<NormalizedRow> {
        let titles = document.select(&self.title).map(joined_text);
        let prices = document.select(&self.price).map(joined_text);

        titles
            .zip(prices)
            .map(|(title, price)| {
                NormalizedRow::new(
                    source_url,
                    RecordKind::Generic {
                        content: non_empty(price),
                    },
                )
                .with_label("Listing")
                .with_title(non_empty(title))
            })
            .collect()
    }
}

fn compile(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}
