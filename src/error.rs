//! Error types for tunebundle
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error variants (credentials, resolution, packaging)
//! - HTTP status code mapping for API integration
//! - The flat `{"error": "..."}` JSON body used by the metadata endpoint

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for tunebundle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tunebundle
///
/// Credential and resolution errors surface immediately as structured
/// responses; per-item fetch failures never appear here directly — they are
/// recovered locally and only aggregate into [`Error::NoItemsAcquired`]
/// when a session produces nothing.
#[derive(Debug, Error)]
pub enum Error {
    /// No catalog credentials were supplied with the request
    #[error("missing catalog API credentials")]
    MissingCredentials,

    /// The catalog rejected the supplied credentials
    #[error("invalid catalog API credentials")]
    InvalidCredentials,

    /// Link could not be resolved (malformed link, unknown item, rate limit)
    #[error("resolution error: {0}")]
    Resolution(String),

    /// Every fetch in the session failed; there is nothing to package
    #[error("no items acquired: every fetch in this session failed")]
    NoItemsAcquired,

    /// Archive build or file move failed
    #[error("packaging error: {0}")]
    Packaging(#[from] PackagingError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Packaging errors (archive build, single-file rename)
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Building the session archive failed
    #[error("failed to build archive {archive}: {reason}")]
    Archive {
        /// Path of the archive that could not be built
        archive: PathBuf,
        /// The reason the build failed
        reason: String,
    },

    /// Renaming the single produced file failed
    #[error("failed to move {source_path} to {dest_path}: {reason}")]
    MoveFailed {
        /// The source path of the file being moved
        source_path: PathBuf,
        /// The destination path where the file should land
        dest_path: PathBuf,
        /// The reason the move failed
        reason: String,
    },
}

/// JSON error body returned by the metadata endpoint
///
/// The download endpoint deliberately returns plain text instead; only
/// `/get_info` uses this structured shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

impl ErrorBody {
    /// Create an error body from any displayable error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 401 Unauthorized - both missing and rejected credentials
            Error::MissingCredentials => 401,
            Error::InvalidCredentials => 401,

            // 400 Bad Request - unusable link or catalog lookup failure
            Error::Resolution(_) => 400,

            // 422 Unprocessable Entity - the session produced nothing usable
            Error::NoItemsAcquired => 422,
            Error::Packaging(_) => 422,

            // 502 Bad Gateway - catalog transport errors
            Error::Network(_) => 502,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::MissingCredentials => "missing_credentials",
            Error::InvalidCredentials => "invalid_credentials",
            Error::Resolution(_) => "resolution_error",
            Error::NoItemsAcquired => "no_items_acquired",
            Error::Packaging(_) => "packaging_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}
