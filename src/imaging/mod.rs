//! Image processing: decode, cover-fit, re-encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (GIF → first frame) |
//! | **Thumbnail** | `resize_to_fill` with Lanczos3, center anchored |
//! | **Encode** | per-format encoders, see [`rust_backend`] |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing a thumbnail operation
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{OutputFormat, Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
