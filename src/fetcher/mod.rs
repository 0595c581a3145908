//! Page fetching
//!
//! Two interchangeable strategies return raw page markup:
//! - [`StaticFetcher`]: one HTTP GET followed by a politeness delay
//! - [`RenderedFetcher`]: a browser session per attempt, bounded retries
//!
//! Both consult the [`ConsentGate`](crate::robots::ConsentGate) before any
//! network access to the page itself.

mod http;
mod rendered;
mod session;

pub use http::{build_http_client, StaticFetcher};
pub use rendered::{RenderPlan, RenderedFetcher};
pub use session::{BrowserSession, SessionFactory, WebDriverSessionFactory};

use crate::config::{FetchMode, SiteConfig};
use crate::events::EventSink;
use crate::robots::ConsentGate;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// A way of turning a URL into markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the markup at `url`, which the caller has already normalized
    async fn fetch(&self, url: &Url) -> Result<String>;

    /// Short strategy name for logs
    fn name(&self) -> &'static str;
}

/// Builds the fetcher for the configured mode
pub fn build_fetcher(
    config: &SiteConfig,
    client: Client,
    gate: Arc<ConsentGate>,
    sink: Arc<dyn EventSink>,
) -> Result<Box<dyn PageFetcher>> {
    let fetcher: Box<dyn PageFetcher> = match config.mode {
        FetchMode::Static => Box::new(StaticFetcher::new(config, client, gate, sink)),
        FetchMode::Dynamic => Box::new(RenderedFetcher::from_config(config, gate, sink)?),
    };
    Ok(fetcher)
}
