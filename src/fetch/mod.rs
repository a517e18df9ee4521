//! Audio fetch engine
//!
//! Converts resolved catalog items into fetch tasks and materializes each
//! task as one audio file via an external `yt-dlp` subprocess. Matching is
//! textual search on the video platform, not an exact-ID lookup.
//!
//! Every failure mode is captured as a [`FetchFailure`] value; a failed task
//! simply produces no file and never aborts its siblings. The aggregate
//! "zero successes" condition is raised by the [`coordinator`], not here.

use crate::catalog::{PlaylistItem, TrackInfo};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

pub mod coordinator;

/// Name of the external acquisition binary
const YTDLP_BINARY: &str = "yt-dlp";

/// One unit of acquisition work
///
/// Created one per resolved catalog item, immutable, consumed exactly once
/// by the fetch engine. Never persisted.
#[derive(Debug, Clone)]
pub struct FetchTask {
    /// Textual search query handed to the acquisition tool
    pub query: String,
    /// Session working directory the file is written into
    pub dest_dir: PathBuf,
    /// Target bitrate, e.g. "192"
    pub quality: String,
}

/// Build the search query for one artist/title pair
///
/// The trailing "audio" nudges textual search away from music videos.
fn search_query(artist: &str, title: &str) -> String {
    format!("{artist} - {title} audio")
}

/// Build the single task for a resolved track
pub fn track_task(track: &TrackInfo, dest_dir: &Path, quality: &str) -> FetchTask {
    FetchTask {
        query: search_query(&track.artist, &track.name),
        dest_dir: dest_dir.to_path_buf(),
        quality: quality.to_string(),
    }
}

/// Build one task per playable playlist item
///
/// Items without a playable track were already skipped during resolution,
/// so this maps one-to-one.
pub fn playlist_tasks(items: &[PlaylistItem], dest_dir: &Path, quality: &str) -> Vec<FetchTask> {
    items
        .iter()
        .map(|item| FetchTask {
            query: search_query(&item.artist, &item.title),
            dest_dir: dest_dir.to_path_buf(),
            quality: quality.to_string(),
        })
        .collect()
}

/// Why a single fetch task produced no file
///
/// These are values, not propagated errors: the coordinator logs them and
/// carries on. Only the aggregate zero-success condition becomes user-visible.
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// The acquisition binary is not installed or not on PATH
    #[error("{YTDLP_BINARY} binary not found on PATH")]
    ToolMissing,

    /// Spawning the subprocess failed
    #[error("failed to spawn {YTDLP_BINARY}: {0}")]
    Spawn(String),

    /// The subprocess ran but exited non-zero (no match, network error,
    /// transcode error, upstream block)
    #[error("{YTDLP_BINARY} exited with {status}: {stderr}")]
    Failed {
        /// Exit status description
        status: String,
        /// Trailing stderr output from the tool
        stderr: String,
    },
}

/// Acquisition seam for one fetch task
///
/// The production implementation shells out to `yt-dlp`; tests substitute a
/// stub that writes files directly.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Attempt to materialize one audio file for the task
    ///
    /// Side effect on success: zero or one file written into the task's
    /// destination directory, named after the located item's own title.
    async fn fetch(&self, task: &FetchTask) -> std::result::Result<(), FetchFailure>;
}

/// Fetch engine backed by the `yt-dlp` subprocess
pub struct YtDlpFetcher {
    binary: PathBuf,
}

impl YtDlpFetcher {
    /// Locate the acquisition binary on PATH
    pub fn discover() -> std::result::Result<Self, FetchFailure> {
        let binary = which::which(YTDLP_BINARY).map_err(|_| FetchFailure::ToolMissing)?;
        Ok(Self { binary })
    }

    /// Use an explicit binary path (no PATH search)
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Argument vector for one task
    ///
    /// Mirrors the original engine's parameter set: best-audio selection,
    /// mp3 extraction at the requested bitrate, title-derived output name,
    /// textual search, single result, quiet output. The user-agent and
    /// extractor arguments disguise the client to reduce upstream blocking.
    fn build_args(task: &FetchTask) -> Vec<String> {
        let output_template = task.dest_dir.join("%(title)s.%(ext)s");
        vec![
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            task.quality.clone(),
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--output".to_string(),
            output_template.to_string_lossy().into_owned(),
            "--default-search".to_string(),
            "ytsearch".to_string(),
            "--no-playlist".to_string(),
            "--concurrent-fragments".to_string(),
            "4".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--user-agent".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            "--extractor-args".to_string(),
            "youtube:player_client=android".to_string(),
            task.query.clone(),
        ]
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    async fn fetch(&self, task: &FetchTask) -> std::result::Result<(), FetchFailure> {
        tracing::debug!(query = %task.query, quality = %task.quality, "spawning fetch");

        let output = Command::new(&self.binary)
            .args(Self::build_args(task))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| FetchFailure::Spawn(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Keep only the tail; yt-dlp stderr can be long
            let tail: String = stderr
                .lines()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join(" | ");
            return Err(FetchFailure::Failed {
                status: output.status.to_string(),
                stderr: tail,
            });
        }

        Ok(())
    }
}
