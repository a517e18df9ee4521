//! Application state for the API server

use crate::Config;
use crate::fetch::AudioFetcher;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request (cheap Arc clones). Holds the configuration built once
/// at startup and the fetch engine; catalog clients are created per request
/// from the credentials each request carries.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (base storage path, worker pool size, endpoints)
    pub config: Arc<Config>,

    /// The acquisition engine used for fetch tasks
    pub fetcher: Arc<dyn AudioFetcher>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn AudioFetcher>) -> Self {
        Self { config, fetcher }
    }
}
