//! Robots.txt handling module
//!
//! This module provides the consent gate that every fetch strategy consults
//! before touching the network, and the policy type it caches per host.

mod gate;
mod parser;

pub use gate::ConsentGate;
pub use parser::RobotsPolicy;
