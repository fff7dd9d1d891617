//! Filesystem scanning.
//!
//! Lists the pictures directory and turns every accepted entry into a
//! [`Picture`]. The directory is flat: subdirectories (including the
//! thumbnail directory when it lives inside the pictures directory) are
//! skipped, and only names passing [`is_valid_filename`] are kept.
//!
//! ## Failure policy
//!
//! Scanning never fails outward. A missing or unreadable directory is the
//! legitimate "no pictures yet" state and yields an empty list. A file whose
//! metadata cannot be read is still returned, just without `metadata`.
//!
//! ## Ordering
//!
//! Entries are sorted by filename before positions are assigned, so the
//! provisional `order` (0, 1, 2, …) is stable across runs and platforms. The
//! provisional order is only a placeholder: [`crate::merge::merge`] replaces
//! it with the persisted one.

use crate::config::UrlConfig;
use crate::naming::{is_valid_filename, join_url, mime_type, thumbnail_filename};
use crate::types::{Picture, PictureMetadata};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Files above this size still load, but are worth a warning.
pub const RECOMMENDED_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Scan `pictures_dir` and return every accepted picture in listing order.
pub fn scan(pictures_dir: &Path, urls: &UrlConfig) -> Vec<Picture> {
    list_picture_files(pictures_dir)
        .into_iter()
        .enumerate()
        .map(|(index, filename)| {
            let metadata = read_metadata(&pictures_dir.join(&filename), &filename);
            Picture {
                path: join_url(&urls.pictures, &filename),
                thumbnail_path: join_url(&urls.thumbnails, &thumbnail_filename(&filename)),
                order: index as u32,
                metadata,
                filename,
            }
        })
        .collect()
}

/// Names of the accepted picture files directly inside `dir`, sorted.
///
/// Shared with the thumbnail pipeline so both sides agree on the file set.
pub fn list_picture_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(dir = %dir.display(), "pictures directory does not exist yet");
            return Vec::new();
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "failed to read pictures directory");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            let valid = is_valid_filename(name);
            if !valid {
                debug!(file = %name, "ignoring non-picture entry");
            }
            valid
        })
        .collect();

    names.sort();
    names
}

/// Live metadata for one file, or `None` if it cannot be read.
fn read_metadata(path: &Path, filename: &str) -> Option<PictureMetadata> {
    let stat = match fs::metadata(path) {
        Ok(stat) => stat,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "failed to read picture metadata");
            return None;
        }
    };
    let modified = match stat.modified() {
        Ok(modified) => modified,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "modification time unavailable");
            return None;
        }
    };

    if stat.len() > RECOMMENDED_MAX_FILE_SIZE {
        warn!(
            file = %path.display(),
            size = stat.len(),
            "picture exceeds recommended size"
        );
    }

    Some(PictureMetadata {
        size: stat.len(),
        mime_type: mime_type(filename).to_string(),
        last_modified: DateTime::<Utc>::from(modified),
    })
}
