//! Direct HTTP fetch

use crate::config::SiteConfig;
use crate::events::{emit, EventSink, ScrapeEvent};
use crate::fetcher::PageFetcher;
use crate::robots::ConsentGate;
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by the consent gate and the static fetcher
///
/// The user agent is the crawler identity plus the crate version, so robots
/// rules and server logs see the same name.
pub fn build_http_client(config: &SiteConfig) -> std::result::Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_identity,
        env!("CARGO_PKG_VERSION"),
        config.site_name
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.fetch.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Single GET per run, no retry
pub struct StaticFetcher {
    client: Client,
    gate: Arc<ConsentGate>,
    identity: String,
    timeout: Duration,
    politeness_delay: Duration,
    sink: Arc<dyn EventSink>,
}

impl StaticFetcher {
    pub fn new(
        config: &SiteConfig,
        client: Client,
        gate: Arc<ConsentGate>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            client,
            gate,
            identity: config.crawler_identity.clone(),
            timeout: Duration::from_secs(config.fetch.timeout_secs),
            politeness_delay: Duration::from_millis(config.fetch.politeness_delay_ms),
            sink,
        }
    }
}

impl StaticFetcher {
    async fn request(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ScrapeError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| ScrapeError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.gate.require(url, &self.identity).await?;

        emit(
            self.sink.as_ref(),
            ScrapeEvent::FetchAttempt {
                attempt: 1,
                max_attempts: 1,
                url: url.to_string(),
            },
        );

        let outcome = self.request(url).await;

        // Fixed pause after every request, whatever it returned
        tokio::time::sleep(self.politeness_delay).await;
        let body = outcome?;

        emit(
            self.sink.as_ref(),
            ScrapeEvent::Fetched {
                url: url.to_string(),
                bytes: body.len(),
            },
        );
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
