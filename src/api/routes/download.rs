//! The fetch-and-package download flow.
//!
//! One request walks the whole pipeline: credentials, resolution, task
//! building, the bounded concurrent fetch, packaging, and cleanup. The
//! session directory guard releases on every exit path, so the working
//! directory and any derived archive are gone by the time the response
//! leaves the handler — success and failure alike.

use super::DownloadForm;
use crate::api::AppState;
use crate::catalog::{CatalogClient, Credentials, LinkKind, classify_link};
use crate::error::Result;
use crate::error::ToHttpStatus;
use crate::fetch::{coordinator, playlist_tasks, track_task};
use crate::package::package_session;
use crate::session::SessionDir;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Fully materialized download response, read before cleanup runs
struct DownloadPayload {
    bytes: Vec<u8>,
    filename: String,
    content_type: &'static str,
}

/// POST /download - Fetch the link's audio and serve it as an attachment
///
/// Success is a binary body with a `Content-Disposition` attachment header.
/// Failures return a plain-text body (no structured error JSON on this
/// endpoint) with the status code from the error mapping.
#[utoipa::path(
    post,
    path = "/download",
    tag = "download",
    request_body(content = DownloadForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Audio file or zip archive attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Unresolvable link (plain text)"),
        (status = 401, description = "Missing or invalid credentials (plain text)"),
        (status = 422, description = "No items acquired or packaging failed (plain text)")
    )
)]
pub async fn download(State(state): State<AppState>, Form(form): Form<DownloadForm>) -> Response {
    match run_download(&state, form).await {
        Ok(payload) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                sanitize_filename::sanitize(&payload.filename)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, payload.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                payload.bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "download request failed");
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, format!("Download Error: {e}")).into_response()
        }
    }
}

async fn run_download(state: &AppState, form: DownloadForm) -> Result<DownloadPayload> {
    let credentials = Credentials::from_parts(form.cid.clone(), form.cs.clone())?;
    let kind = classify_link(&form.link)?;
    let client = CatalogClient::authenticate(&state.config.catalog, &credentials).await?;

    // From here on the guard owns the working directory; every early return
    // below drops it and removes the directory plus any derived archive.
    let mut session = SessionDir::create(&state.config.storage.base_dir)?;
    tracing::info!(session = %session.id(), link = %form.link, "download session started");

    let (tasks, derived_name, collection) = match kind {
        LinkKind::Track => {
            let track = client.track(&form.link).await?;
            let derived = format!("{} - {}", track.artist, track.name);
            let task = track_task(&track, session.path(), &form.quality);
            (vec![task], derived, false)
        }
        LinkKind::Playlist => {
            let playlist = client.playlist(&form.link).await?;
            let items = client.playlist_items(&form.link).await?;
            let tasks = playlist_tasks(&items, session.path(), &form.quality);
            (tasks, playlist.name, true)
        }
    };

    let report = coordinator::run_tasks(
        state.fetcher.clone(),
        tasks,
        state.config.storage.worker_count,
    )
    .await;
    if report.all_failed() {
        return Err(crate::error::Error::NoItemsAcquired);
    }

    let packaged = package_session(
        &mut session,
        collection,
        form.force_zip,
        form.custom_name.as_deref(),
        &derived_name,
    )?;

    // Read the file into memory before the guard drops; cleanup must never
    // race the response body.
    let bytes = tokio::fs::read(&packaged.path).await?;

    tracing::info!(
        session = %session.id(),
        file = %packaged.filename,
        size = bytes.len(),
        "download session packaged"
    );

    Ok(DownloadPayload {
        bytes,
        content_type: packaged.content_type(),
        filename: packaged.filename,
    })
}
