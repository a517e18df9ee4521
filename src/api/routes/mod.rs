//! Route handlers for the web API
//!
//! Handlers are organized by domain:
//! - [`info`] — catalog metadata lookup
//! - [`download`] — the fetch-and-package download flow
//! - [`system`] — front-end page, health, OpenAPI

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod download;
mod info;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use download::*;
pub use info::*;
pub use system::*;

// ============================================================================
// Request/Response Types
// ============================================================================

/// JSON body for POST /get_info
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct InfoRequest {
    /// The pasted catalog link
    pub link: String,
    /// Catalog client id
    pub cid: Option<String>,
    /// Catalog client secret
    pub cs: Option<String>,
}

/// Response body for POST /get_info
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InfoResponse {
    /// Single-item link
    Track {
        /// Track title
        name: String,
        /// First listed artist
        artist: String,
        /// Artwork URL
        image: Option<String>,
    },
    /// Collection link
    Playlist {
        /// Playlist display name
        name: String,
        /// Total item count reported by the catalog
        count: u64,
        /// Artwork URL
        image: Option<String>,
    },
}

/// Form fields for POST /download
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DownloadForm {
    /// The pasted catalog link
    pub link: String,
    /// Target bitrate (default: "192")
    #[serde(default = "default_quality")]
    pub quality: String,
    /// Catalog client id
    pub cid: Option<String>,
    /// Catalog client secret
    pub cs: Option<String>,
    /// Optional display-name override for the served file
    pub custom_name: Option<String>,
    /// Always package the result as a zip archive
    #[serde(default)]
    pub force_zip: bool,
}

fn default_quality() -> String {
    "192".to_string()
}
