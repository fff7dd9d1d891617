//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF first frame, WebP) | `image::ImageReader` |
//! | Cover fit + center crop | `image::DynamicImage::resize_to_fill` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (no chroma subsampling) |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, `CompressionType::Best` |
//! | Encode → WebP (lossy) | `webp::Encoder` (libwebp) |

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, ThumbnailParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file contents first so a mislabelled file
/// still decodes. Animated GIFs decode to their first frame.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode and save `img` in the requested format.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    quality: u32,
) -> Result<(), BackendError> {
    match format {
        OutputFormat::Jpeg => save_jpeg(img, path, quality),
        OutputFormat::Png => save_png(img, path),
        OutputFormat::WebP => save_webp(img, path, quality),
    }
}

/// JPEG has no alpha channel, so everything is flattened to RGB8 first.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let writer = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

/// PNG is lossless; the encoder keeps the decoded color type as-is.
fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let writer = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

/// Lossy WebP via libwebp; only 8-bit RGB/RGBA input is accepted there.
fn save_webp(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let input = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&input)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {}", e)))?;
    let encoded = encoder
        .encode_simple(false, quality as f32)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {:?}", e)))?;
    std::fs::write(path, &*encoded)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;

        // Fill-resize then center-crop to exact dimensions
        let filled = img.resize_to_fill(params.width, params.height, FilterType::Lanczos3);

        save_image(
            &filled,
            &params.output,
            params.format,
            params.quality.value(),
        )
    }
}
