//! Session working directories
//!
//! Each download request owns one uniquely-named directory under the
//! configured base path. The directory (and any archive later derived from
//! it) is removed exactly once, on every exit path, by the guard's release.
//! Cleanup is best-effort: a failed removal is logged and never blocks the
//! response.

use crate::error::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Scoped working directory for one download session
///
/// Dropping the guard releases the directory and any registered archive.
/// Release is idempotent; calling it twice is harmless.
#[derive(Debug)]
pub struct SessionDir {
    id: Uuid,
    path: PathBuf,
    archive: Option<PathBuf>,
    released: bool,
}

impl SessionDir {
    /// Allocate a fresh, uniquely-named session directory under `base_dir`
    ///
    /// Creates `base_dir` itself if it does not exist yet. The uuid name
    /// guarantees the directory is not shared across concurrent requests.
    pub fn create(base_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(base_dir)?;

        let id = Uuid::new_v4();
        let path = base_dir.join(id.to_string());
        std::fs::create_dir(&path)?;

        tracing::debug!(session = %id, path = %path.display(), "session directory created");

        Ok(Self {
            id,
            path,
            archive: None,
            released: false,
        })
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The session's working directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path for this session's archive (`<base>/<id>.zip`)
    pub fn archive_path(&self) -> PathBuf {
        self.path.with_extension("zip")
    }

    /// Record an archive so release removes it along with the directory
    pub fn register_archive(&mut self, archive: PathBuf) {
        self.archive = Some(archive);
    }

    /// Remove the working directory and any registered archive
    ///
    /// Best-effort and idempotent: failures are logged at `warn` and
    /// swallowed so an already-prepared response is never blocked.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if self.path.exists()
            && let Err(e) = std::fs::remove_dir_all(&self.path)
        {
            tracing::warn!(session = %self.id, error = %e, "failed to remove session directory");
        }

        if let Some(archive) = &self.archive
            && archive.exists()
            && let Err(e) = std::fs::remove_file(archive)
        {
            tracing::warn!(session = %self.id, error = %e, "failed to remove session archive");
        }

        tracing::debug!(session = %self.id, "session released");
    }
}

impl Drop for SessionDir {
    fn drop(&mut self) {
        self.release();
    }
}
