//! Extraction orchestrator
//!
//! Wires the consent gate, the fetcher, the parser and the record store into
//! one strictly sequential run:
//! - Normalize the target URL
//! - Check robots.txt consent
//! - Fetch the markup with the configured strategy
//! - Parse it into rows
//! - Replace the stored rows

use crate::config::{validate_config, SiteConfig};
use crate::events::{emit, EventSink, ScrapeEvent};
use crate::fetcher::{build_fetcher, build_http_client, PageFetcher};
use crate::parser::PageParser;
use crate::pipeline::RunState;
use crate::record::NormalizedRow;
use crate::robots::ConsentGate;
use crate::storage::{CsvStore, RecordStore};
use crate::url::normalize_url;
use crate::{Result, ScrapeError};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use url::Url;

/// Rows echoed back to the caller after a run
pub const SAMPLE_ROWS: usize = 3;

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub site_name: String,
    /// Normalized URL the rows were derived from
    pub source_url: String,
    pub rows: usize,
    pub path: PathBuf,
    /// The first [`SAMPLE_ROWS`] rows, in storage order
    pub sample: Vec<NormalizedRow>,
    pub config_hash: Option<String>,
    pub finished_at: DateTime<Utc>,
}

/// Main extraction coordinator
pub struct Orchestrator {
    config: SiteConfig,
    gate: Arc<ConsentGate>,
    fetcher: Box<dyn PageFetcher>,
    parser: PageParser,
    store: CsvStore,
    sink: Arc<dyn EventSink>,
    config_hash: Option<String>,
    state: Mutex<RunState>,
}

impl Orchestrator {
    /// Creates an orchestrator for `config`
    ///
    /// The fetch strategy is chosen here, once, from `config.mode`.
    pub fn new(config: SiteConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        validate_config(&config)?;
        let client = build_http_client(&config)?;
        let gate = Arc::new(ConsentGate::new(client.clone(), sink.clone()));
        let fetcher = build_fetcher(&config, client, gate.clone(), sink.clone())?;
        Self::with_fetcher(config, fetcher, gate, sink)
    }

    /// Creates an orchestrator around an already-built fetcher
    ///
    /// `gate` should be the same gate the fetcher consults, so the policy
    /// file is read once per host.
    pub fn with_fetcher(
        config: SiteConfig,
        fetcher: Box<dyn PageFetcher>,
        gate: Arc<ConsentGate>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let parser = PageParser::from_config(&config)?;
        let store = CsvStore::new(&config.storage.path);

        Ok(Self {
            config,
            gate,
            fetcher,
            parser,
            store,
            sink,
            config_hash: None,
            state: Mutex::new(RunState::Idle),
        })
    }

    /// Attaches the hash of the configuration file this run came from
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// State reached by the most recent run
    pub fn state(&self) -> RunState {
        *lock(&self.state)
    }

    /// Executes one full run
    ///
    /// On failure the first error is returned unchanged and stored rows
    /// are left untouched.
    pub async fn run(&self) -> Result<RunResult> {
        *lock(&self.state) = RunState::Idle;
        emit(
            self.sink.as_ref(),
            ScrapeEvent::RunStarted {
                site: self.config.site_name.clone(),
                url: self.config.target_url.clone(),
                mode: self.fetcher.name(),
                config_hash: self.config_hash.clone(),
            },
        );

        match self.execute().await {
            Ok(result) => {
                self.advance(RunState::Done);
                emit(
                    self.sink.as_ref(),
                    ScrapeEvent::RunCompleted {
                        site: self.config.site_name.clone(),
                        rows: result.rows,
                    },
                );
                Ok(result)
            }
            Err(e) => {
                self.advance(RunState::Failed);
                emit(
                    self.sink.as_ref(),
                    ScrapeEvent::RunFailed {
                        error: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    async fn execute(&self) -> Result<RunResult> {
        let url = normalize_url(&self.config.target_url, self.config.strip_query_params)?;

        self.check_consent(&url).await?;
        self.advance(RunState::ConsentChecked);

        let markup = self.fetcher.fetch(&url).await?;
        self.advance(RunState::Fetched);

        let rows = self.parser.parse(&markup, url.as_str())?;
        emit(self.sink.as_ref(), ScrapeEvent::Parsed { rows: rows.len() });
        self.advance(RunState::Parsed);

        let stored = self.store.save(&rows)?;
        emit(
            self.sink.as_ref(),
            ScrapeEvent::Stored {
                rows: stored,
                path: self.store.path().display().to_string(),
            },
        );
        self.advance(RunState::Stored);

        Ok(RunResult {
            site_name: self.config.site_name.clone(),
            source_url: url.to_string(),
            rows: stored,
            path: self.store.path().to_path_buf(),
            sample: rows.into_iter().take(SAMPLE_ROWS).collect(),
            config_hash: self.config_hash.clone(),
            finished_at: Utc::now(),
        })
    }

    async fn check_consent(&self, url: &Url) -> Result<()> {
        let allowed = self
            .gate
            .is_allowed(url, &self.config.crawler_identity)
            .await;
        emit(
            self.sink.as_ref(),
            ScrapeEvent::ConsentChecked {
                url: url.to_string(),
                allowed,
            },
        );

        if allowed {
            Ok(())
        } else {
            Err(ScrapeError::ConsentDenied {
                url: url.to_string(),
            })
        }
    }

    fn advance(&self, to: RunState) {
        let mut state = lock(&self.state);
        let from = *state;
        let legal = from.can_transition_to(to);
        if legal {
            *state = to;
        }
        drop(state);

        let event = if legal {
            ScrapeEvent::StateChanged { from, to }
        } else {
            ScrapeEvent::TransitionRejected { from, to }
        };
        emit(self.sink.as_ref(), event);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
