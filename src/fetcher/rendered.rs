//! Rendered-browser fetch with bounded retries
//!
//! Every attempt gets its own browser session, which is closed before the
//! next attempt starts. Sessions are never reused across attempts.

use crate::config::{FetchConfig, SiteConfig};
use crate::events::{emit, EventSink, ScrapeEvent};
use crate::fetcher::session::{BrowserSession, SessionFactory, WebDriverSessionFactory};
use crate::fetcher::PageFetcher;
use crate::robots::ConsentGate;
use crate::{ConfigError, Result, ScrapeError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// What one attempt does once the page is open
#[derive(Debug, Clone)]
pub struct RenderPlan {
    /// Landmark whose presence means the page has rendered
    pub ready_selector: String,
    pub ready_timeout: Duration,
    /// Scroll-to-bottom passes that trigger lazy-loaded blocks
    pub scroll_passes: u32,
    pub scroll_delay: Duration,
}

impl From<&FetchConfig> for RenderPlan {
    fn from(fetch: &FetchConfig) -> Self {
        Self {
            ready_selector: fetch.ready_selector.clone(),
            ready_timeout: Duration::from_secs(fetch.ready_timeout_secs),
            scroll_passes: fetch.scroll_passes,
            scroll_delay: Duration::from_millis(fetch.scroll_delay_ms),
        }
    }
}

pub struct RenderedFetcher {
    factory: Arc<dyn SessionFactory>,
    gate: Arc<ConsentGate>,
    identity: String,
    max_attempts: u32,
    retry_delay: Duration,
    plan: RenderPlan,
    sink: Arc<dyn EventSink>,
}

impl RenderedFetcher {
    /// Builds a fetcher backed by WebDriver
    ///
    /// Only Chrome is supported.
    pub fn from_config(
        config: &SiteConfig,
        gate: Arc<ConsentGate>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let browser = config.browser.trim().to_lowercase();
        if browser != "chrome" {
            return Err(ScrapeError::UnsupportedBrowser(config.browser.clone()));
        }

        let factory = Arc::new(WebDriverSessionFactory::new(&config.fetch));
        Self::with_factory(config, factory, gate, sink)
    }

    /// Builds a fetcher over any session factory
    ///
    /// Fails when `config.delay` is not a usable number of seconds.
    pub fn with_factory(
        config: &SiteConfig,
        factory: Arc<dyn SessionFactory>,
        gate: Arc<ConsentGate>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let retry_delay = Duration::try_from_secs_f64(config.delay).map_err(|e| {
            ConfigError::Validation(format!("invalid retry delay {}: {}", config.delay, e))
        })?;

        Ok(Self {
            factory,
            gate,
            identity: config.crawler_identity.clone(),
            max_attempts: config.retry.max(1),
            retry_delay,
            plan: RenderPlan::from(&config.fetch),
            sink,
        })
    }

    async fn attempt(&self, attempt: u32, url: &Url) -> Result<String> {
        let mut session = self.factory.create().await?;
        emit(self.sink.as_ref(), ScrapeEvent::SessionOpened { attempt });
        let result = self.render(session.as_mut(), url).await;

        // A failed close never masks the attempt's own outcome
        if let Err(e) = session.close().await {
            emit(
                self.sink.as_ref(),
                ScrapeEvent::SessionCloseFailed {
                    attempt,
                    error: e.to_string(),
                },
            );
        }
        result
    }

    async fn render(&self, session: &mut dyn BrowserSession, url: &Url) -> Result<String> {
        session.open(url.as_str()).await?;
        session
            .wait_for(&self.plan.ready_selector, self.plan.ready_timeout)
            .await?;

        for _ in 0..self.plan.scroll_passes {
            session.scroll_to_bottom().await?;
            tokio::time::sleep(self.plan.scroll_delay).await;
        }

        session.page_source().await
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.gate.require(url, &self.identity).await?;

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.retry_delay).await;
            }

            emit(
                self.sink.as_ref(),
                ScrapeEvent::FetchAttempt {
                    attempt,
                    max_attempts: self.max_attempts,
                    url: url.to_string(),
                },
            );

            match self.attempt(attempt, url).await {
                Ok(markup) => {
                    emit(
                        self.sink.as_ref(),
                        ScrapeEvent::Fetched {
                            url: url.to_string(),
                            bytes: markup.len(),
                        },
                    );
                    return Ok(markup);
                }
                Err(e) => {
                    emit(
                        self.sink.as_ref(),
                        ScrapeEvent::FetchAttemptFailed {
                            attempt,
                            error: e.to_string(),
                        },
                    );
                    last_error = Some(e);
                }
            }
        }

        let source = last_error.unwrap_or_else(|| ScrapeError::Fetch {
            url: url.to_string(),
            message: "no attempt was made".to_string(),
        });
        Err(ScrapeError::FetchExhausted {
            attempts: self.max_attempts,
            source: Box::new(source),
        })
    }

    fn name(&self) -> &'static str {
        "rendered"
    }
}
