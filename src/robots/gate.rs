//! Consent gate
//!
//! Resolves a host's robots.txt once and answers allow/deny for target URLs.
//! Anything short of an affirmative reading denies.

use crate::events::{emit, EventSink, ScrapeEvent};
use crate::robots::RobotsPolicy;
use crate::url::{host_key, robots_url};
use crate::ScrapeError;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

/// Fetches and caches crawl policies, one per host
pub struct ConsentGate {
    client: Client,
    policies: Mutex<HashMap<String, RobotsPolicy>>,
    sink: Arc<dyn EventSink>,
}

impl ConsentGate {
    /// Creates a gate reporting each policy read to `sink`
    pub fn new(client: Client, sink: Arc<dyn EventSink>) -> Self {
        Self {
            client,
            policies: Mutex::new(HashMap::new()),
            sink,
        }
    }

    /// Answers whether `crawler_identity` may fetch `url`
    ///
    /// The policy file is fetched at most once per host for the lifetime of
    /// the gate.
    pub async fn is_allowed(&self, url: &Url, crawler_identity: &str) -> bool {
        let policy = self.policy_for(url).await;
        policy.is_allowed(url.as_str(), crawler_identity)
    }

    /// Like [`is_allowed`](Self::is_allowed), but denial is an error
    pub async fn require(&self, url: &Url, crawler_identity: &str) -> Result<(), ScrapeError> {
        if self.is_allowed(url, crawler_identity).await {
            Ok(())
        } else {
            Err(ScrapeError::ConsentDenied {
                url: url.to_string(),
            })
        }
    }

    /// Returns the cached policy for the URL's host, fetching it on first use
    pub async fn policy_for(&self, url: &Url) -> RobotsPolicy {
        let Some(key) = host_key(url) else {
            return RobotsPolicy::DenyAll;
        };

        // Held across the fetch so concurrent callers share one request.
        let mut policies = self.policies.lock().await;
        if let Some(policy) = policies.get(&key) {
            return policy.clone();
        }

        let policy = self.fetch_policy(url).await;
        policies.insert(key, policy.clone());
        policy
    }

    async fn fetch_policy(&self, url: &Url) -> RobotsPolicy {
        let Some(robots) = robots_url(url) else {
            return RobotsPolicy::DenyAll;
        };

        let (status, policy, error) = match self.client.get(robots.clone()).send().await {
            Err(e) => (None, RobotsPolicy::DenyAll, Some(e.to_string())),
            Ok(response) => {
                let status = response.status();
                let (policy, error) = match status {
                    s if s.is_success() => match response.bytes().await {
                        Ok(body) => match RobotsPolicy::from_bytes(&body) {
                            RobotsPolicy::DenyAll => (
                                RobotsPolicy::DenyAll,
                                Some("body is not valid UTF-8".to_string()),
                            ),
                            policy => (policy, None),
                        },
                        Err(e) => (RobotsPolicy::DenyAll, Some(e.to_string())),
                    },
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        (RobotsPolicy::DenyAll, None)
                    }
                    s if s.is_client_error() => (RobotsPolicy::AllowAll, None),
                    _ => (RobotsPolicy::DenyAll, None),
                };
                (Some(status.as_u16()), policy, error)
            }
        };

        emit(
            self.sink.as_ref(),
            ScrapeEvent::PolicyResolved {
                robots_url: robots.to_string(),
                status,
                policy: policy_kind(&policy),
                error,
            },
        );
        policy
    }
}

fn policy_kind(policy: &RobotsPolicy) -> &'static str {
    match policy {
        RobotsPolicy::Rules(_) => "rules",
        RobotsPolicy::AllowAll => "allow-all",
        RobotsPolicy::DenyAll => "deny-all",
    }
}
