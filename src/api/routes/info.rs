//! Catalog metadata lookup handler.

use super::{InfoRequest, InfoResponse};
use crate::api::AppState;
use crate::catalog::{CatalogClient, Credentials, ResolvedMetadata};
use crate::error::Result;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

/// POST /get_info - Resolve a link into display metadata
///
/// Checks credentials before touching the catalog; a missing or rejected
/// key pair yields `401 {"error": ...}` regardless of the link content, and
/// resolution failures yield `400 {"error": ...}`.
#[utoipa::path(
    post,
    path = "/get_info",
    tag = "catalog",
    request_body = InfoRequest,
    responses(
        (status = 200, description = "Resolved track or playlist metadata", body = InfoResponse),
        (status = 400, description = "Unresolvable link", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = crate::error::ErrorBody)
    )
)]
pub async fn get_info(State(state): State<AppState>, Json(request): Json<InfoRequest>) -> Response {
    match resolve_info(&state, request).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn resolve_info(state: &AppState, request: InfoRequest) -> Result<InfoResponse> {
    let credentials = Credentials::from_parts(request.cid, request.cs)?;
    let client = CatalogClient::authenticate(&state.config.catalog, &credentials).await?;

    let body = match client.resolve(&request.link).await? {
        ResolvedMetadata::Track(track) => InfoResponse::Track {
            name: track.name,
            artist: track.artist,
            image: track.image,
        },
        ResolvedMetadata::Playlist(playlist) => InfoResponse::Playlist {
            name: playlist.name,
            count: playlist.count,
            image: playlist.image,
        },
    };

    Ok(body)
}
