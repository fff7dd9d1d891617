//! Shared types passed between the scanner, the order store, and the merger.
//!
//! `Picture` values are ephemeral: they are rebuilt from the filesystem on
//! every scan and never persisted as-is. `OrderRecord` is the only thing that
//! lives on disk, and it carries positions only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current on-disk format version of the order record.
pub const CURRENT_FORMAT_VERSION: &str = "1.0.0";

/// One managed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    /// Unique identifier; always passes [`crate::naming::is_valid_filename`].
    pub filename: String,
    /// URL of the source image, derived from `filename`.
    pub path: String,
    /// URL of the thumbnail, derived from `filename` (`.gif` → `.png`).
    pub thumbnail_path: String,
    /// Position in the display sequence.
    pub order: u32,
    /// Live filesystem metadata. Absent when the stat call failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PictureMetadata>,
}

/// Metadata read from the live filesystem at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureMetadata {
    pub size: u64,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
}

/// A single persisted position.
///
/// Older files stored complete `Picture` snapshots per entry; the extra
/// fields are ignored on read and never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub filename: String,
    pub order: u32,
}

impl OrderEntry {
    pub fn new(filename: impl Into<String>, order: u32) -> Self {
        Self {
            filename: filename.into(),
            order,
        }
    }
}

/// Persisted snapshot of the user-curated order.
///
/// Serialized as:
///
/// ```json
/// { "formatVersion": "1.0.0", "lastUpdated": "2026-01-01T00:00:00Z",
///   "entries": [{ "filename": "a.jpg", "order": 0 }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(alias = "version")]
    pub format_version: String,
    pub last_updated: DateTime<Utc>,
    #[serde(alias = "pictures")]
    pub entries: Vec<OrderEntry>,
}

impl OrderRecord {
    /// Fresh record with no entries, stamped with the current version and time.
    pub fn empty() -> Self {
        Self::with_entries(Vec::new())
    }

    pub fn with_entries(entries: Vec<OrderEntry>) -> Self {
        Self {
            format_version: CURRENT_FORMAT_VERSION.to_string(),
            last_updated: Utc::now(),
            entries,
        }
    }
}
