//! Structured run events
//!
//! The consent gate, the fetchers and the orchestrator never log through a
//! process-wide logger of their own; they report to an [`EventSink`] handed
//! in by the caller. [`TracingSink`] forwards to `tracing`, [`RecordingSink`]
//! keeps events in memory.

use crate::pipeline::RunState;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// A single observable step of an extraction run
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeEvent {
    ConfigLoaded {
        name: String,
        site: String,
    },
    RunStarted {
        site: String,
        url: String,
        mode: &'static str,
        config_hash: Option<String>,
    },
    StateChanged {
        from: RunState,
        to: RunState,
    },
    TransitionRejected {
        from: RunState,
        to: RunState,
    },
    /// A robots.txt read, with the status it answered (None when no
    /// response arrived) and the policy it resolved to
    PolicyResolved {
        robots_url: String,
        status: Option<u16>,
        policy: &'static str,
        error: Option<String>,
    },
    ConsentChecked {
        url: String,
        allowed: bool,
    },
    FetchAttempt {
        attempt: u32,
        max_attempts: u32,
        url: String,
    },
    FetchAttemptFailed {
        attempt: u32,
        error: String,
    },
    SessionOpened {
        attempt: u32,
    },
    SessionCloseFailed {
        attempt: u32,
        error: String,
    },
    Fetched {
        url: String,
        bytes: usize,
    },
    Parsed {
        rows: usize,
    },
    Stored {
        rows: usize,
        path: String,
    },
    RunFailed {
        error: String,
    },
    RunCompleted {
        site: String,
        rows: usize,
    },
}

/// A timestamped event as delivered to sinks
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub at: DateTime<Utc>,
    pub event: ScrapeEvent,
}

/// Receiver for run events
pub trait EventSink: Send + Sync {
    fn record(&self, record: &EventRecord);
}

/// Stamps an event and hands it to the sink
pub fn emit(sink: &dyn EventSink, event: ScrapeEvent) {
    sink.record(&EventRecord {
        at: Utc::now(),
        event,
    });
}

/// Forwards events to `tracing`, tagged with the site they belong to
#[derive(Debug, Clone)]
pub struct TracingSink {
    site: String,
}

impl TracingSink {
    pub fn new(site: impl Into<String>) -> Self {
        Self { site: site.into() }
    }

    pub fn shared(site: impl Into<String>) -> Arc<dyn EventSink> {
        Arc::new(Self::new(site))
    }
}

impl EventSink for TracingSink {
    fn record(&self, record: &EventRecord) {
        let site = self.site.as_str();
        match &record.event {
            ScrapeEvent::ConfigLoaded { name, .. } => {
                tracing::info!(site, config = %name, "Loaded configuration")
            }
            ScrapeEvent::RunStarted {
                url,
                mode,
                config_hash,
                ..
            } => {
                tracing::info!(site, %url, mode, "Starting extraction run");
                if let Some(hash) = config_hash {
                    tracing::debug!(site, %hash, "Config hash");
                }
            }
            ScrapeEvent::StateChanged { from, to } => {
                tracing::debug!(site, from = ?from, to = ?to, "Run state changed")
            }
            ScrapeEvent::TransitionRejected { from, to } => {
                tracing::warn!(site, from = ?from, to = ?to, "Ignoring illegal run transition")
            }
            ScrapeEvent::PolicyResolved {
                robots_url,
                status,
                policy,
                error: Some(error),
            } => tracing::warn!(
                site,
                %robots_url,
                status = ?status,
                policy,
                %error,
                "Failed to read robots.txt"
            ),
            ScrapeEvent::PolicyResolved {
                robots_url,
                status,
                policy,
                error: None,
            } => tracing::debug!(
                site,
                %robots_url,
                status = ?status,
                policy,
                "Resolved robots.txt"
            ),
            ScrapeEvent::ConsentChecked { url, allowed } => {
                tracing::info!(site, %url, allowed, "robots.txt check")
            }
            ScrapeEvent::FetchAttempt {
                attempt,
                max_attempts,
                url,
            } => tracing::info!(site, attempt, max_attempts, %url, "Loading page"),
            ScrapeEvent::FetchAttemptFailed { attempt, error } => {
                tracing::warn!(site, attempt, %error, "Page load attempt failed")
            }
            ScrapeEvent::SessionOpened { attempt } => {
                tracing::debug!(site, attempt, "Opened browser session")
            }
            ScrapeEvent::SessionCloseFailed { attempt, error } => {
                tracing::warn!(site, attempt, %error, "Failed to close browser session")
            }
            ScrapeEvent::Fetched { url, bytes } => {
                tracing::info!(site, %url, bytes, "Page loaded")
            }
            ScrapeEvent::Parsed { rows } => tracing::info!(site, rows, "Page parsed"),
            ScrapeEvent::Stored { rows, path } => {
                tracing::info!(site, rows, %path, "Rows saved")
            }
            ScrapeEvent::RunFailed { error } => tracing::error!(site, %error, "Run failed"),
            ScrapeEvent::RunCompleted { rows, .. } => {
                tracing::info!(site, rows, "Extraction completed")
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<EventRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first
    pub fn events(&self) -> Vec<ScrapeEvent> {
        match self.records.lock() {
            Ok(records) => records.iter().map(|r| r.event.clone()).collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .map(|r| r.event.clone())
                .collect(),
        }
    }
}

impl EventSink for RecordingSink {
    fn record(&self, record: &EventRecord) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push(record.clone());
    }
}
