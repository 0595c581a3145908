//! Integration tests
//!
//! These tests use wiremock to serve robots.txt and business pages and drive
//! full runs, the CSV round trip and the HTTP API end-to-end.

mod common;
mod pipeline_tests;
mod server_tests;
