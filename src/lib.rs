//! # tunebundle
//!
//! Backend for a small web front-end that turns a pasted music-catalog link
//! into downloadable audio: metadata is resolved through the catalog API
//! with per-request credentials, matching audio is fetched from a video
//! platform by an external extraction tool, and multi-item sessions are
//! packaged into a zip archive.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI; embedders call [`api::start_api_server`]
//! - **Session-scoped** - Each request owns a uniquely-named working
//!   directory that is released on every exit path
//! - **Silent partial failure** - Individual fetch failures are recorded
//!   and swallowed; only a session that produces nothing fails
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tunebundle::{Config, api};
//! use tunebundle::fetch::YtDlpFetcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let fetcher = Arc::new(YtDlpFetcher::discover()?);
//!
//!     api::start_api_server(config, fetcher).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Web API module
pub mod api;
/// Catalog metadata resolution
pub mod catalog;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Audio fetch engine and coordination
pub mod fetch;
/// Session packaging
pub mod package;
/// Session working directories
pub mod session;

// Re-export commonly used types
pub use config::{Config, DEFAULT_WORKER_COUNT};
pub use error::{Error, ErrorBody, PackagingError, Result, ToHttpStatus};
pub use session::SessionDir;
