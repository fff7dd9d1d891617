//! # Picture Order
//!
//! Keeps a user-curated display order for a directory of pictures and
//! generates square thumbnails for them. The pictures directory is the source
//! of truth for *which* pictures exist; a small JSON order file is the source
//! of truth for *where* each one goes.
//!
//! # Architecture: Scan, Load, Merge
//!
//! Every read of the gallery rebuilds the sequence from scratch:
//!
//! ```text
//! 1. Scan    pictures/        →  Vec<Picture>   (live filesystem, sorted by name)
//! 2. Load    data/order.json  →  OrderRecord    (positions only, self-healing)
//! 3. Merge   both             →  Vec<Picture>   (saved order first, new files appended)
//! ```
//!
//! Reordering goes the other way: a requested filename sequence is checked
//! against the current scan, renumbered densely, and saved atomically.
//! Thumbnail generation runs separately over the same file listing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename acceptance rules, thumbnail naming, MIME types, URL joins |
//! | [`types`] | `Picture`, `OrderEntry`, `OrderRecord` |
//! | [`scan`] | Lists accepted files and builds `Picture` values with live metadata |
//! | [`order`] | `OrderStore` load/save and `build_order` for reorder requests |
//! | [`merge`] | Reconciles a scan with a saved order record |
//! | [`imaging`] | `ImageBackend` trait and the `image`-crate backend |
//! | [`thumbnails`] | Batched, bounded-concurrency thumbnail pipeline |
//! | [`config`] | `picture-order.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Positions Only On Disk
//!
//! The order file stores `{filename, order}` pairs and nothing else. URLs,
//! sizes and timestamps are derived from the filesystem on every scan, so a
//! replaced or renamed file can never show stale data from the order file.
//! Older files that stored whole picture snapshots still load; the extra
//! fields are dropped on the next save.
//!
//! ## Missing And Corrupt Files Are Not Errors
//!
//! A missing order file is the first-run state. An unparseable one is logged
//! and treated as empty. The gallery stays usable and the next save repairs
//! the file. Only writes report errors.
//!
//! ## Single Writer
//!
//! Saves go through a temp file and rename in the same directory, so readers
//! never see a partial file. Concurrent writers from separate processes are
//! not coordinated: the last rename wins.
//!
//! ## Bounded Thumbnail Memory
//!
//! Decoding full-size pictures is the memory peak. The pipeline runs at most
//! `batch_size` decodes at a time and finishes each batch before starting
//! the next.

pub mod config;
pub mod imaging;
pub mod merge;
pub mod naming;
pub mod order;
pub mod output;
pub mod scan;
pub mod thumbnails;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
