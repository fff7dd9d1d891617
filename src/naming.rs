//! Centralized filename rules for managed pictures.
//!
//! Every component that turns a directory entry into something addressable
//! goes through this module: the scanner uses it to decide which entries are
//! pictures and what their thumbnails are called, and the thumbnail pipeline
//! uses the very same functions to decide what to decode and where to write.
//! Keeping both sides on one function is what guarantees that the path the
//! scanner reports is the path the pipeline produces.
//!
//! ## Accepted names
//!
//! A name is accepted when it:
//! - contains no `..` segment and no `/` or `\` separator, and
//! - ends in one of [`ALLOWED_EXTENSIONS`] (case-insensitive).
//!
//! ## Thumbnail names
//!
//! GIF sources are flattened to their first frame and written as PNG, so
//! `loop.gif` → `loop.png`. Every other extension is kept as-is:
//! `dawn.JPG` → `dawn.JPG`.

/// Supported picture extensions, lowercase, including the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Lowercased extension of `name` including the leading dot, or `None` if
/// the name has no dot at all.
fn lowercase_extension(name: &str) -> Option<String> {
    name.rfind('.').map(|pos| name[pos..].to_ascii_lowercase())
}

/// Is `name` a safe, supported picture reference?
///
/// Pure and total: never touches the filesystem.
///
/// - `"sunset.jpg"` → true
/// - `"Sunset.WEBP"` → true
/// - `"../sunset.jpg"` → false (traversal)
/// - `"nested/sunset.jpg"` → false (separator)
/// - `"notes.txt"` → false (extension)
pub fn is_valid_filename(name: &str) -> bool {
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return false;
    }
    lowercase_extension(name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Filename of the thumbnail derived from a source filename.
///
/// Only the trailing `.gif` (any case) is rewritten; the stem is untouched.
pub fn thumbnail_filename(filename: &str) -> String {
    match lowercase_extension(filename) {
        Some(ext) if ext == ".gif" => {
            let stem = &filename[..filename.len() - ext.len()];
            format!("{stem}.png")
        }
        _ => filename.to_string(),
    }
}

/// MIME type inferred from the extension alone.
///
/// Unknown extensions fall back to `image/jpeg`; in practice only validated
/// names reach this function.
pub fn mime_type(filename: &str) -> &'static str {
    match lowercase_extension(filename).as_deref() {
        Some(".png") => "image/png",
        Some(".gif") => "image/gif",
        Some(".webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Join a URL prefix and a filename with exactly one `/` between them.
pub fn join_url(prefix: &str, filename: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // is_valid_filename
    // =========================================================================

    #[test]
    fn accepts_every_whitelisted_extension() {
        for name in ["a.jpg", "a.jpeg", "a.png", "a.gif", "a.webp"] {
            assert!(is_valid_filename(name), "{name} should be accepted");
        }
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_valid_filename("DSC_0001.JPG"));
        assert!(is_valid_filename("Loop.Gif"));
        assert!(is_valid_filename("shot.WebP"));
    }

    #[test]
    fn rejects_parent_directory_segments() {
        assert!(!is_valid_filename("../secret.jpg"));
        assert!(!is_valid_filename("..jpg"));
        assert!(!is_valid_filename("a..b.png"));
    }

    #[test]
    fn rejects_path_separators() {
        assert!(!is_valid_filename("nested/photo.jpg"));
        assert!(!is_valid_filename("/etc/photo.png"));
        assert!(!is_valid_filename("windows\\photo.gif"));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_valid_filename("notes.txt"));
        assert!(!is_valid_filename("raw.tiff"));
        assert!(!is_valid_filename("photo.jpg.bak"));
        assert!(!is_valid_filename("photo.avif"));
    }

    #[test]
    fn rejects_names_without_extension() {
        assert!(!is_valid_filename("README"));
        assert!(!is_valid_filename(""));
    }

    #[test]
    fn bare_extension_is_accepted() {
        // Hidden-file style names still carry a whitelisted extension
        assert!(is_valid_filename(".png"));
    }

    // =========================================================================
    // thumbnail_filename
    // =========================================================================

    #[test]
    fn gif_thumbnail_becomes_png() {
        assert_eq!(thumbnail_filename("foo.gif"), "foo.png");
        assert_eq!(thumbnail_filename("Foo.GIF"), "Foo.png");
    }

    #[test]
    fn gif_only_rewritten_at_the_end() {
        assert_eq!(thumbnail_filename("a.gif.jpg"), "a.gif.jpg");
    }

    #[test]
    fn other_thumbnails_keep_their_name() {
        assert_eq!(thumbnail_filename("dawn.jpg"), "dawn.jpg");
        assert_eq!(thumbnail_filename("dawn.JPEG"), "dawn.JPEG");
        assert_eq!(thumbnail_filename("dawn.png"), "dawn.png");
        assert_eq!(thumbnail_filename("dawn.webp"), "dawn.webp");
    }

    // =========================================================================
    // mime_type / join_url
    // =========================================================================

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(mime_type("a.jpg"), "image/jpeg");
        assert_eq!(mime_type("a.JPEG"), "image/jpeg");
        assert_eq!(mime_type("a.png"), "image/png");
        assert_eq!(mime_type("a.gif"), "image/gif");
        assert_eq!(mime_type("a.webp"), "image/webp");
    }

    #[test]
    fn mime_type_unknown_falls_back_to_jpeg() {
        assert_eq!(mime_type("a.bmp"), "image/jpeg");
    }

    #[test]
    fn join_url_normalizes_trailing_slash() {
        assert_eq!(join_url("/pictures", "a.jpg"), "/pictures/a.jpg");
        assert_eq!(join_url("/pictures/", "a.jpg"), "/pictures/a.jpg");
    }
}
