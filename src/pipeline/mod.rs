//! Extraction pipeline
//!
//! One run takes a named configuration through consent, fetch, parse and
//! store. Runs are sequential inside; callers that trigger runs concurrently
//! against the same storage path must serialize them themselves.

mod orchestrator;
mod state;

pub use orchestrator::{Orchestrator, RunResult, SAMPLE_ROWS};
pub use state::RunState;

use crate::config::{load_named_config_with_hash, SiteConfig};
use crate::events::{emit, EventSink, ScrapeEvent, TracingSink};
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Loads `<config_dir>/<name>.toml` and runs it once, logging through `tracing`
pub async fn run_with_config(config_dir: &Path, name: &str) -> Result<RunResult> {
    let (config, hash) = load_named_config_with_hash(config_dir, name)?;
    let sink = TracingSink::shared(config.site_name.clone());
    run_loaded(name, config, hash, sink).await
}

/// Same as [`run_with_config`] with a caller-supplied event sink
pub async fn run_with_sink(
    config_dir: &Path,
    name: &str,
    sink: Arc<dyn EventSink>,
) -> Result<RunResult> {
    let (config, hash) = load_named_config_with_hash(config_dir, name)?;
    run_loaded(name, config, hash, sink).await
}

async fn run_loaded(
    name: &str,
    config: SiteConfig,
    hash: String,
    sink: Arc<dyn EventSink>,
) -> Result<RunResult> {
    emit(
        sink.as_ref(),
        ScrapeEvent::ConfigLoaded {
            name: name.to_string(),
            site: config.site_name.clone(),
        },
    );

    let orchestrator = Orchestrator::new(config, sink)?.with_config_hash(hash);
    orchestrator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use crate::ScrapeError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unknown_config_name() {
        let dir = TempDir::new().unwrap();
        let err = run_with_config(dir.path(), "missing").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Config(ConfigError::NotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_path_like_name_rejected() {
        let dir = TempDir::new().unwrap();
        let err = run_with_config(dir.path(), "../etc/passwd").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Config(ConfigError::Validation(_))));
    }
}
