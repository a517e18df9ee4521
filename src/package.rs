//! Session packaging
//!
//! Decides the response shape for a populated session directory: a single
//! audio file served directly, or a zip archive of everything the session
//! produced. Archives are built as siblings of the session directory and
//! registered on the guard so cleanup removes them too.

use crate::error::{Error, PackagingError, Result};
use crate::session::SessionDir;
use std::io::Write;
use std::path::PathBuf;
use zip::write::FileOptions;

/// The file chosen to be served, with its outgoing name
#[derive(Debug)]
pub struct Packaged {
    /// On-disk path of the file to serve
    pub path: PathBuf,
    /// Filename for the Content-Disposition header
    pub filename: String,
    /// True when the file is a zip archive rather than a single audio file
    pub archived: bool,
}

impl Packaged {
    /// MIME type matching the packaged shape
    pub fn content_type(&self) -> &'static str {
        if self.archived {
            "application/zip"
        } else {
            "audio/mpeg"
        }
    }
}

/// Package a completed session for download
///
/// A collection, a forced archive, or more than one produced file yields a
/// zip named `<override-or-derived>.zip`. Otherwise the single file is
/// served directly, renamed to `<override>.mp3` when an override was
/// supplied and left as produced when not. An empty directory means every
/// fetch silently failed and surfaces as [`Error::NoItemsAcquired`].
pub fn package_session(
    session: &mut SessionDir,
    collection: bool,
    force_zip: bool,
    override_name: Option<&str>,
    derived_name: &str,
) -> Result<Packaged> {
    let mut files = list_files(session)?;
    if files.is_empty() {
        return Err(Error::NoItemsAcquired);
    }
    // Deterministic ordering for archives and for the single-file pick
    files.sort();

    let display_name = override_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(derived_name);
    let safe_name = sanitize_filename::sanitize(display_name);

    if collection || force_zip || files.len() > 1 {
        let archive = session.archive_path();
        build_archive(&archive, &files)?;
        session.register_archive(archive.clone());

        tracing::info!(
            session = %session.id(),
            entries = files.len(),
            "session packaged as archive"
        );

        return Ok(Packaged {
            path: archive,
            filename: format!("{safe_name}.zip"),
            archived: true,
        });
    }

    // Single file: rename only when the user supplied an override
    let produced = files.remove(0);
    let (path, filename) = match override_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(_) => {
            let renamed = produced.with_file_name(format!("{safe_name}.mp3"));
            std::fs::rename(&produced, &renamed).map_err(|e| PackagingError::MoveFailed {
                source_path: produced.clone(),
                dest_path: renamed.clone(),
                reason: e.to_string(),
            })?;
            (renamed.clone(), format!("{safe_name}.mp3"))
        }
        None => {
            let filename = produced
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("{safe_name}.mp3"));
            (produced, filename)
        }
    };

    tracing::info!(session = %session.id(), file = %filename, "session packaged as single file");

    Ok(Packaged {
        path,
        filename,
        archived: false,
    })
}

fn list_files(session: &SessionDir) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(session.path())? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn build_archive(archive_path: &PathBuf, files: &[PathBuf]) -> Result<()> {
    let out = std::fs::File::create(archive_path).map_err(|e| PackagingError::Archive {
        archive: archive_path.clone(),
        reason: format!("failed to create archive file: {e}"),
    })?;
    let mut writer = zip::ZipWriter::new(out);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for file in files {
        let entry_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PackagingError::Archive {
                archive: archive_path.clone(),
                reason: format!("file has no name: {}", file.display()),
            })?;

        writer
            .start_file(entry_name, options)
            .map_err(|e| PackagingError::Archive {
                archive: archive_path.clone(),
                reason: format!("failed to start entry: {e}"),
            })?;

        let bytes = std::fs::read(file).map_err(|e| PackagingError::Archive {
            archive: archive_path.clone(),
            reason: format!("failed to read {}: {e}", file.display()),
        })?;
        writer.write_all(&bytes).map_err(|e| PackagingError::Archive {
            archive: archive_path.clone(),
            reason: format!("failed to write entry: {e}"),
        })?;
    }

    writer.finish().map_err(|e| PackagingError::Archive {
        archive: archive_path.clone(),
        reason: format!("failed to finish archive: {e}"),
    })?;

    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn session_with_files(base: &std::path::Path, names: &[&str]) -> SessionDir {
        let session = SessionDir::create(base).unwrap();
        for name in names {
            std::fs::write(session.path().join(name), format!("payload {name}")).unwrap();
        }
        session
    }

    fn archive_entry_names(path: &std::path::Path) -> Vec<String> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn empty_session_is_no_items_acquired() {
        let base = tempfile::tempdir().unwrap();
        let mut session = SessionDir::create(base.path()).unwrap();

        let err = package_session(&mut session, false, false, None, "name").unwrap_err();
        assert!(matches!(err, Error::NoItemsAcquired));
    }

    #[test]
    fn single_file_without_override_keeps_produced_name() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["Artist - Song.mp3"]);

        let packaged =
            package_session(&mut session, false, false, None, "Artist - Song").unwrap();

        assert!(!packaged.archived);
        assert_eq!(packaged.filename, "Artist - Song.mp3");
        assert_eq!(packaged.content_type(), "audio/mpeg");
        assert!(packaged.path.is_file());
    }

    #[test]
    fn single_file_with_override_is_renamed() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["whatever the tool named it.mp3"]);

        let packaged =
            package_session(&mut session, false, false, Some("My Mix"), "derived").unwrap();

        assert_eq!(packaged.filename, "My Mix.mp3");
        assert!(packaged.path.ends_with("My Mix.mp3"));
        assert!(packaged.path.is_file());
    }

    #[test]
    fn blank_override_falls_back_to_derived_name() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["a.mp3", "b.mp3"]);

        let packaged =
            package_session(&mut session, true, false, Some("   "), "Road Trip").unwrap();

        assert_eq!(packaged.filename, "Road Trip.zip");
    }

    #[test]
    fn collection_yields_archive_with_all_entries() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["one.mp3", "two.mp3"]);

        let packaged =
            package_session(&mut session, true, false, None, "Favorites").unwrap();

        assert!(packaged.archived);
        assert_eq!(packaged.filename, "Favorites.zip");
        assert_eq!(packaged.content_type(), "application/zip");

        let mut names = archive_entry_names(&packaged.path);
        names.sort();
        assert_eq!(names, vec!["one.mp3", "two.mp3"]);
    }

    #[test]
    fn force_zip_on_single_file_yields_single_entry_archive() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["only.mp3"]);

        let packaged =
            package_session(&mut session, false, true, Some("Solo"), "derived").unwrap();

        assert!(packaged.archived);
        assert_eq!(packaged.filename, "Solo.zip");
        assert_eq!(archive_entry_names(&packaged.path), vec!["only.mp3"]);
    }

    #[test]
    fn multiple_files_force_an_archive_even_for_single_item_links() {
        // Title collisions or stray extra output: more than one file means zip.
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["a.mp3", "b.mp3"]);

        let packaged =
            package_session(&mut session, false, false, None, "Derived").unwrap();
        assert!(packaged.archived);
    }

    #[test]
    fn archive_names_are_sanitized() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["x.mp3", "y.mp3"]);

        let packaged =
            package_session(&mut session, true, false, Some("My/Mix: Vol.1"), "d").unwrap();

        assert!(!packaged.filename.contains('/'));
        assert!(packaged.filename.ends_with(".zip"));
    }

    #[test]
    fn archive_is_registered_for_cleanup() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["one.mp3", "two.mp3"]);

        let packaged = package_session(&mut session, true, false, None, "Mix").unwrap();
        let archive = packaged.path.clone();
        assert!(archive.exists());

        session.release();
        assert!(!archive.exists());
    }

    #[test]
    fn archive_entries_round_trip_content() {
        let base = tempfile::tempdir().unwrap();
        let mut session = session_with_files(base.path(), &["one.mp3"]);

        let packaged = package_session(&mut session, true, false, None, "Mix").unwrap();

        let file = std::fs::File::open(&packaged.path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut entry = archive.by_index(0).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "payload one.mp3");
    }
}
