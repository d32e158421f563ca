//! Integration test suite for shieldcache
//!
//! End-to-end tests for the badge resolution pipeline and the CLI. Every
//! test runs against a temp-dir site; endpoints are either local stub
//! servers or deliberately unreachable addresses, so the suite never
//! touches the real network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolver_flow**: cache hit/miss behavior, persistence, registration
//! - **render_flow**: directive-to-markup rendering and degraded fallback
//! - **cli_commands**: the `render`, `prefetch`, and `cache` subcommands

#[path = "../common/mod.rs"]
mod common;

mod cli_commands;
mod render_flow;
mod resolver_flow;
