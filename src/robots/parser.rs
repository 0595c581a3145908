//! Robots.txt policy evaluation
//!
//! This module wraps the robotstxt crate's matcher behind a policy value that
//! also covers the blanket allow/deny outcomes of fetching the file.

use robotstxt::DefaultMatcher;

/// Crawl policy for one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    /// Raw robots.txt rules, evaluated per request
    Rules(String),

    /// No policy published (missing robots.txt)
    AllowAll,

    /// Access refused outright, or the policy could not be read
    DenyAll,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self::Rules(content.to_string())
    }

    /// Creates a policy from a fetched body
    ///
    /// Bodies that are not valid UTF-8 cannot be interpreted and deny
    /// everything.
    pub fn from_bytes(body: &[u8]) -> Self {
        match std::str::from_utf8(body) {
            Ok(text) => Self::from_content(text.trim_start_matches('\u{feff}')),
            Err(_) => Self::DenyAll,
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL to check
    /// * `user_agent` - The crawler identity matched against `User-agent` groups
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::DenyAll => false,
            Self::Rules(content) if content.trim().is_empty() => true,
            Self::Rules(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }
}
