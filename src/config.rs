//! Gallery configuration module.
//!
//! Handles loading, merging, and validating `picture-order.toml`. The file is
//! optional: stock defaults describe the conventional layout, and a user file
//! only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! pictures_dir = "public/pictures"               # Source images (flat, no nesting)
//! thumbnails_dir = "public/pictures/thumbnails"  # Thumbnail pipeline output
//! order_file = "data/order.json"                 # Persisted display order
//!
//! [urls]
//! pictures = "/pictures"                 # Prefix for Picture.path
//! thumbnails = "/pictures/thumbnails"    # Prefix for Picture.thumbnailPath
//!
//! [thumbnails]
//! size = 800         # Square target box edge in pixels
//! batch_size = 4     # Images decoded concurrently per batch
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "picture-order.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `picture-order.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Directory holding the source pictures.
    pub pictures_dir: PathBuf,
    /// Directory the thumbnail pipeline writes into.
    pub thumbnails_dir: PathBuf,
    /// JSON file holding the persisted order record.
    pub order_file: PathBuf,
    /// URL prefixes used to derive picture paths.
    pub urls: UrlConfig,
    /// Thumbnail pipeline settings.
    pub thumbnails: ThumbnailsConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            pictures_dir: PathBuf::from("public/pictures"),
            thumbnails_dir: PathBuf::from("public/pictures/thumbnails"),
            order_file: PathBuf::from("data/order.json"),
            urls: UrlConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be non-zero".into(),
            ));
        }
        if self.thumbnails.batch_size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.batch_size must be non-zero".into(),
            ));
        }
        for (key, dir) in [
            ("pictures_dir", &self.pictures_dir),
            ("thumbnails_dir", &self.thumbnails_dir),
            ("order_file", &self.order_file),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.urls.pictures.is_empty() || self.urls.thumbnails.is_empty() {
            return Err(ConfigError::Validation(
                "urls.pictures and urls.thumbnails must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// URL prefixes from which `Picture.path` and `Picture.thumbnail_path` derive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlConfig {
    pub pictures: String,
    pub thumbnails: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            pictures: "/pictures".to_string(),
            thumbnails: "/pictures/thumbnails".to_string(),
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Edge of the square target box; images are cover-cropped to `size × size`.
    pub size: u32,
    /// Images per batch. Batches run one after another; images within a batch
    /// run concurrently, so this bounds how many decode buffers are live.
    pub batch_size: usize,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            size: 800,
            batch_size: 4,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `picture-order.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# picture-order configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory holding the source pictures. Only files directly inside it are
# considered; subdirectories are ignored.
pictures_dir = "public/pictures"

# Directory the `thumbnails` command writes into. It is created on demand.
thumbnails_dir = "public/pictures/thumbnails"

# JSON file holding the curated display order.
order_file = "data/order.json"

# ---------------------------------------------------------------------------
# URL prefixes
# ---------------------------------------------------------------------------
[urls]
# Prefix for each picture's `path`.
pictures = "/pictures"

# Prefix for each picture's `thumbnailPath`.
thumbnails = "/pictures/thumbnails"

# ---------------------------------------------------------------------------
# Thumbnail generation
# ---------------------------------------------------------------------------
[thumbnails]
# Thumbnails are center-cropped to fill a size x size box.
size = 800

# Number of images decoded at once. Batches run sequentially.
batch_size = 4
"##
}
