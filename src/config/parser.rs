use crate::config::types::SiteConfig;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Directory searched for named configurations
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Configuration used when a caller does not name one
pub const DEFAULT_CONFIG_NAME: &str = "clubinject_scottsdale";

/// Loads and validates a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use monagent::config::load_config;
///
/// let config = load_config(Path::new("config/clubinject_scottsdale.toml")).unwrap();
/// println!("Target: {}", config.target_url);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<SiteConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Resolves `<dir>/<name>.toml`
///
/// Names are plain identifiers; anything that could escape `dir` is rejected.
pub fn config_path(dir: &Path, name: &str) -> ConfigResult<PathBuf> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "Invalid configuration name '{}'",
            name
        )));
    }
    Ok(dir.join(format!("{}.toml", name)))
}

/// Loads the configuration registered under `name` in `dir`
pub fn load_named_config(dir: &Path, name: &str) -> ConfigResult<SiteConfig> {
    let path = config_path(dir, name)?;
    if !path.exists() {
        return Err(ConfigError::NotFound(name.to_string()));
    }
    load_config(&path)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged with every run so a stored CSV can be traced back to the exact
/// configuration that produced it.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a named configuration and returns both the config and its hash
pub fn load_named_config_with_hash(
    dir: &Path,
    name: &str,
) -> ConfigResult<(SiteConfig, String)> {
    let config = load_named_config(dir, name)?;
    let hash = compute_config_hash(&config_path(dir, name)?)?;
    Ok((config, hash))
}
