//! Shared test utilities for the picture-order test suite.
//!
//! Provides fixture writers (synthetic images, placeholder files) and a
//! `Picture` builder, so module tests can focus on behavior instead of setup.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_test_image(&tmp.path().join("dawn.jpg"), 64, 48, ImageFormat::Jpeg);
//! touch(tmp.path(), "placeholder.png");
//!
//! let pic = picture("dawn.jpg", 0);
//! ```

use crate::config::UrlConfig;
use crate::naming::{join_url, thumbnail_filename};
use crate::types::Picture;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Fixture files
// =========================================================================

/// Write a gradient image of the given size in `format`.
pub fn write_test_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(path, format)
        .unwrap();
}

/// Create an empty file named `name` in `dir`. Enough for anything that
/// only lists or stats files.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"").unwrap();
    path
}

// =========================================================================
// Builders
// =========================================================================

/// A picture with default URL prefixes and no metadata.
pub fn picture(filename: &str, order: u32) -> Picture {
    let urls = UrlConfig::default();
    Picture {
        filename: filename.to_string(),
        path: join_url(&urls.pictures, filename),
        thumbnail_path: join_url(&urls.thumbnails, &thumbnail_filename(filename)),
        order,
        metadata: None,
    }
}
