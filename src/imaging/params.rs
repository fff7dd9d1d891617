//! Parameter types for thumbnail operations.
//!
//! These structs describe *what* to produce, not *how*. The pipeline builds
//! them from filenames and configuration; the [`backend`](super::backend)
//! does the pixel work. Keeping them plain data lets tests swap in a mock
//! backend without touching pipeline logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`OutputFormat`]: Encoder chosen from the source extension.
//! - [`ThumbnailParams`]: Source, output, target box, format, quality.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Thumbnail encoding, decided by the source extension.
///
/// | Source | Output |
/// |---|---|
/// | `.jpg`, `.jpeg` | JPEG, full-resolution chroma |
/// | `.png` | PNG, best compression, no palette reduction |
/// | `.webp` | WebP, lossy |
/// | `.gif` | PNG of the first frame |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Output format for a source filename, or `None` for unsupported names.
    pub fn for_source(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" | "gif" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

/// Parameters for a thumbnail operation (cover resize + center crop + encode).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final box dimensions.
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: Quality,
}
