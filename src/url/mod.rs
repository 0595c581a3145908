//! URL handling module
//!
//! This module canonicalizes target URLs before they are fetched or recorded
//! as provenance, and derives the per-host addresses the consent gate needs.

mod domain;
mod normalize;

pub use domain::{host_key, robots_url};
pub use normalize::normalize_url;
