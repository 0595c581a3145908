//! Browser session abstraction
//!
//! The rendered fetcher drives a browser through [`BrowserSession`]; a
//! [`SessionFactory`] hands out a fresh session for every attempt. The real
//! implementation talks WebDriver through `fantoccini`.

use crate::config::FetchConfig;
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;

const SCROLL_SCRIPT: &str = "window.scrollBy(0, document.body.scrollHeight);";

/// One live browser session
#[async_trait]
pub trait BrowserSession: Send {
    async fn open(&mut self, url: &str) -> Result<()>;

    /// Waits until an element matching `selector` is present
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    async fn scroll_to_bottom(&mut self) -> Result<()>;

    /// The current rendered markup
    async fn page_source(&mut self) -> Result<String>;

    /// Ends the session; the session is unusable afterwards
    async fn close(&mut self) -> Result<()>;
}

/// Creates browser sessions
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self) -> Result<Box<dyn BrowserSession>>;
}

/// Chrome over a running WebDriver endpoint (chromedriver)
#[derive(Debug, Clone)]
pub struct WebDriverSessionFactory {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverSessionFactory {
    pub fn new(fetch: &FetchConfig) -> Self {
        Self {
            webdriver_url: fetch.webdriver_url.clone(),
            headless: fetch.headless,
        }
    }

    fn capabilities(&self) -> Capabilities {
        let mut args = vec![
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--window-size=1920,1080",
        ];
        if self.headless {
            args.push("--headless=new");
        }

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

#[async_trait]
impl SessionFactory for WebDriverSessionFactory {
    async fn create(&self) -> Result<Box<dyn BrowserSession>> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| {
                ScrapeError::Browser(format!(
                    "Failed to start session at {}: {}",
                    self.webdriver_url, e
                ))
            })?;

        Ok(Box::new(WebDriverSession {
            client: Some(client),
        }))
    }
}

struct WebDriverSession {
    client: Option<Client>,
}

impl WebDriverSession {
    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ScrapeError::Browser("session already closed".to_string()))
    }
}

fn browser_error(action: &str, e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Browser(format!("{} failed: {}", action, e))
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn open(&mut self, url: &str) -> Result<()> {
        self.client()?
            .goto(url)
            .await
            .map_err(|e| browser_error("navigation", e))
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.client()?
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
            .map(|_| ())
            .map_err(|e| browser_error(&format!("waiting for '{}'", selector), e))
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.client()?
            .execute(SCROLL_SCRIPT, vec![])
            .await
            .map(|_| ())
            .map_err(|e| browser_error("scroll", e))
    }

    async fn page_source(&mut self) -> Result<String> {
        self.client()?
            .source()
            .await
            .map_err(|e| browser_error("reading page source", e))
    }

    async fn close(&mut self) -> Result<()> {
        match self.client.take() {
            Some(client) => client.close().await.map_err(|e| browser_error("close", e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_flag_in_capabilities() {
        let mut fetch = FetchConfig::default();
        fetch.headless = true;
        let caps = WebDriverSessionFactory::new(&fetch).capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--no-sandbox")));

        fetch.headless = false;
        let caps = WebDriverSessionFactory::new(&fetch).capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.contains(&json!("--headless=new")));
    }
}
