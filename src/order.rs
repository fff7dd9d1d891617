//! Persisted display order.
//!
//! The order record lives in a single JSON file. [`OrderStore`] is the only
//! writer of that file, and it follows a single-writer contract: concurrent
//! saves from separate processes are not coordinated and the last rename wins.
//!
//! # Reading
//!
//! [`OrderStore::load`] never fails. A missing file is the first-run state; an
//! unparseable file is treated as corruption and replaced in memory by an
//! empty record. Neither case touches the disk. A record without a version
//! is given the current one in memory only.
//!
//! # Writing
//!
//! [`OrderStore::save`] stamps the record with the current format version and
//! time, whatever the caller put there, then writes it to a temporary file in
//! the same directory and renames it over the target. A reader sees either
//! the old file or the new one, never a partial write. Failures are returned
//! to the caller and never retried.
//!
//! # Reordering
//!
//! [`build_order`] turns a caller's requested sequence of filenames into a
//! record with dense positions `0..N`. It is the only place positions are
//! renumbered; the merger keeps whatever positions it is given.

use crate::types::{CURRENT_FORMAT_VERSION, OrderEntry, OrderRecord, Picture};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Order file has no parent directory: {0}")]
    InvalidPath(PathBuf),
    #[error("One or more filenames do not exist: {}", .0.join(", "))]
    UnknownFilenames(Vec<String>),
    #[error("Filename listed more than once: {0}")]
    DuplicateFilename(String),
}

/// On-disk shape with every field optional, so a missing version or
/// timestamp can be backfilled instead of failing the parse.
///
/// The timestamp is kept raw: a malformed value must not cost the entries.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default, alias = "version")]
    format_version: Option<String>,
    #[serde(default)]
    last_updated: Option<serde_json::Value>,
    #[serde(default, alias = "pictures")]
    entries: Vec<OrderEntry>,
}

/// Handle on the order file.
#[derive(Debug, Clone)]
pub struct OrderStore {
    path: PathBuf,
}

impl OrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record, self-healing on absence or corruption.
    pub fn load(&self) -> OrderRecord {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(file = %self.path.display(), "no order file yet, starting empty");
                return OrderRecord::empty();
            }
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "order file unreadable, starting empty");
                return OrderRecord::empty();
            }
        };

        let stored: StoredRecord = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "order file is corrupt, starting empty");
                return OrderRecord::empty();
            }
        };

        let format_version = match stored.format_version {
            Some(version) if !version.is_empty() => version,
            _ => {
                warn!(file = %self.path.display(), "order file has no version, assuming current");
                CURRENT_FORMAT_VERSION.to_string()
            }
        };

        OrderRecord {
            format_version,
            last_updated: self.resolve_timestamp(stored.last_updated),
            entries: stored.entries,
        }
    }

    fn resolve_timestamp(&self, raw: Option<serde_json::Value>) -> DateTime<Utc> {
        match raw {
            None | Some(serde_json::Value::Null) => Utc::now(),
            Some(value) => parse_timestamp(&value).unwrap_or_else(|| {
                warn!(
                    file = %self.path.display(),
                    value = %value,
                    "order file has an unreadable lastUpdated, using now"
                );
                Utc::now()
            }),
        }
    }

    /// Persist `record` atomically and return what was written.
    ///
    /// `format_version` and `last_updated` are always overwritten.
    pub fn save(&self, record: &OrderRecord) -> Result<OrderRecord, OrderError> {
        let parent = match self.path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => return Err(OrderError::InvalidPath(self.path.clone())),
        };
        std::fs::create_dir_all(parent)?;

        let stamped = OrderRecord {
            format_version: CURRENT_FORMAT_VERSION.to_string(),
            last_updated: Utc::now(),
            entries: record.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&stamped)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        debug!(
            file = %self.path.display(),
            entries = stamped.entries.len(),
            "saved order file"
        );
        Ok(stamped)
    }
}

/// Accepts RFC 3339, a bare `YYYY-MM-DD` date, or epoch milliseconds.
fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            }),
        serde_json::Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Build a record placing `filenames` at positions `0..N` in the given order.
///
/// Every filename must belong to `current` and appear once; otherwise the
/// request is rejected as a whole. Current pictures the request leaves out
/// are not recorded, so the next merge appends them as new.
pub fn build_order(current: &[Picture], filenames: &[String]) -> Result<OrderRecord, OrderError> {
    let known: HashSet<&str> = current.iter().map(|p| p.filename.as_str()).collect();

    let unknown: Vec<String> = filenames
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(OrderError::UnknownFilenames(unknown));
    }

    let mut seen = HashSet::new();
    for name in filenames {
        if !seen.insert(name.as_str()) {
            return Err(OrderError::DuplicateFilename(name.clone()));
        }
    }

    Ok(OrderRecord::with_entries(
        filenames
            .iter()
            .enumerate()
            .map(|(index, name)| OrderEntry::new(name.clone(), index as u32))
            .collect(),
    ))
}
