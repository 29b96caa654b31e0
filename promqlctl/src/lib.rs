//! promql CLI Library
//!
//! This library provides the functionality behind the `promql` command-line
//! tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::PromClient`] which wraps the
//! Prometheus HTTP API. Configuration types are available via
//! [`config::CliConfig`] and [`config::ConfigBuilder`], and the time and
//! duration parsers used for range queries via [`timerange`].
//!
//! ```no_run
//! use promqlctl::client::PromClient;
//! use promql_core::{write_instant, InstantResult, RenderOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PromClient::with_timeout("http://localhost:9090", 10)?;
//!
//! let samples = client.instant_query("up", None).await?;
//! write_instant(
//!     &mut std::io::stdout(),
//!     &InstantResult::new(samples),
//!     &RenderOptions::default(),
//! )?;
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the Prometheus query API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Duration and timestamp parsing for query ranges.
pub mod timerange;

#[cfg(test)]
pub mod test_utils;
