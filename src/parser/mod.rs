//! Page parsing
//!
//! Turns raw markup into an ordered sequence of normalized rows. Parsing is
//! pure: the same markup and source URL always give the same rows.
//!
//! Two strategies exist:
//! - Generic: caller-declared title/price selector pairs
//! - Structured: visible-text patterns, labeled blocks and links

mod blocks;
mod generic;
mod links;
mod structured;
mod text;

pub use blocks::{labeled_block_rows, GENERIC_TITLE_CHARS};
pub use generic::GenericParser;
pub use links::link_rows;
pub use structured::{business_hours, monthly_fee, unit_prices, StructuredParser, UnitPrice};
pub use text::{joined_text, text_lines};

use crate::config::{ParseMode, SiteConfig};
use crate::record::NormalizedRow;
use crate::{ConfigError, Result, ScrapeError};
use scraper::Html;

/// Parse strategy chosen from a site configuration
#[derive(Debug, Clone)]
pub enum PageParser {
    Generic(GenericParser),
    Structured(StructuredParser),
}

impl PageParser {
    pub fn from_config(config: &SiteConfig) -> std::result::Result<Self, ConfigError> {
        match config.parse_mode {
            ParseMode::Generic => {
                let selectors = config.selectors.as_ref().ok_or_else(|| {
                    ConfigError::Validation(
                        "generic parse mode requires [selectors]".to_string(),
                    )
                })?;
                Ok(Self::Generic(GenericParser::new(selectors)?))
            }
            ParseMode::Structured => Ok(Self::Structured(StructuredParser::new(
                config.structured.clone(),
            ))),
        }
    }

    /// Parses `markup` fetched from `source_url`
    ///
    /// Missing data yields fewer rows, never an error. Only markup with no
    /// content at all is rejected.
    pub fn parse(&self, markup: &str, source_url: &str) -> Result<Vec<NormalizedRow>> {
        if markup.trim().is_empty() {
            return Err(ScrapeError::Parse {
                url: source_url.to_string(),
                message: "empty document".to_string(),
            });
        }

        let document = Html::parse_document(markup);
        let rows = match self {
            Self::Generic(parser) => parser.parse(&document, source_url),
            Self::Structured(parser) => parser.parse(&document, source_url),
        };
        Ok(rows)
    }
}
