//! Configuration types for tunebundle

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf};
use utoipa::ToSchema;

/// Default number of concurrent fetch workers per session
pub const DEFAULT_WORKER_COUNT: usize = 8;

/// Storage and fetch concurrency configuration
///
/// Groups the base path for session working directories and the size of the
/// per-session fetch worker pool. Used as a nested sub-config within
/// [`Config`]. This replaces the module-level download directory of earlier
/// designs: the whole struct is built once at startup and passed to handlers.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageConfig {
    /// Base directory under which per-session working directories are created
    /// (default: "./downloads")
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Number of concurrent fetch workers per download session (default: 8)
    ///
    /// Not exposed through the HTTP surface; requests cannot change it.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            worker_count: default_worker_count(),
        }
    }
}

/// Catalog API endpoints
///
/// Both URLs default to the public catalog service; tests point them at a
/// mock server. Credentials are never stored here — they arrive with each
/// request.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogConfig {
    /// OAuth client-credentials token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Base URL for catalog lookups (tracks, playlists)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
        }
    }
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerConfig {
    /// Address the API server binds to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Whether to add CORS headers to responses (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins ("*" for any; default: any)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Serve the interactive Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            swagger_ui: false,
        }
    }
}

/// Main configuration for the tunebundle service
///
/// Fields are organized into logical sub-configs:
/// - [`storage`](StorageConfig) — session base directory, worker pool size
/// - [`catalog`](CatalogConfig) — catalog endpoint URLs
/// - [`server`](ServerConfig) — bind address, CORS, Swagger UI
///
/// There is no configuration file and no environment lookup; embedders build
/// this struct directly and the defaults work out of the box.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Session storage and fetch concurrency
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog API endpoints
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

#[allow(clippy::expect_used)]
fn default_bind_address() -> SocketAddr {
    "127.0.0.1:5000"
        .parse()
        .expect("default bind address is valid")
}

fn default_true() -> bool {
    true
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_work_out_of_the_box() {
        let config = Config::default();
        assert_eq!(config.storage.base_dir, PathBuf::from("./downloads"));
        assert_eq!(config.storage.worker_count, DEFAULT_WORKER_COUNT);
        assert!(config.catalog.token_url.starts_with("https://"));
        assert!(config.server.cors_enabled);
        assert!(!config.server.swagger_ui);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.storage.worker_count, DEFAULT_WORKER_COUNT);
        assert_eq!(config.server.bind_address.port(), 5000);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"storage": {"base_dir": "/var/sessions", "worker_count": 2}}"#,
        )
        .unwrap();
        assert_eq!(config.storage.base_dir, PathBuf::from("/var/sessions"));
        assert_eq!(config.storage.worker_count, 2);
        assert!(config.catalog.api_base_url.contains("api.spotify.com"));
    }
}
