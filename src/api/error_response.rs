//! HTTP error response handling for the API
//!
//! Converts domain errors to HTTP responses: an appropriate status code and
//! the flat `{"error": "..."}` JSON body the metadata endpoint promises.
//! The download endpoint builds plain-text bodies itself and does not go
//! through this conversion.

use crate::error::{Error, ErrorBody, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status_code, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
