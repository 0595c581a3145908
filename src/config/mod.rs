//! Configuration module
//!
//! This module handles loading, parsing, and validating per-site TOML
//! configuration files. Each file under the configuration directory is one
//! named configuration.
//!
//! # Example
//!
//! ```no_run
//! use monagent::config::load_named_config;
//! use std::path::Path;
//!
//! let config = load_named_config(Path::new("config"), "clubinject_scottsdale").unwrap();
//! println!("Will extract {}", config.target_url);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    BlockRules, FetchConfig, FetchMode, ParseMode, PhraseRule, SelectorConfig, SiteConfig,
    StorageConfig, StructuredConfig,
};

pub use parser::{
    compute_config_hash, config_path, load_config, load_named_config, load_named_config_with_hash,
    DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_NAME,
};

pub use validation::validate as validate_config;
