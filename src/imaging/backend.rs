//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the thumbnail pipeline and
//! the pixel work. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use a recording
//! mock so batching and failure handling can be checked without encoding.

use super::params::ThumbnailParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// `Sync` because the pipeline calls it from several rayon workers at once.
pub trait ImageBackend: Sync {
    /// Decode `params.source`, cover-fit it into the target box, and encode
    /// it to `params.output` in `params.format`. Overwrites existing output.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
