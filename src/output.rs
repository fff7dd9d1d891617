//! CLI output formatting for every subcommand.
//!
//! # Information-First Display
//!
//! Output leads with what the user ordered: the position and the filename.
//! URLs, sizes and timestamps follow as indented context lines, so the
//! listing reads as the gallery sequence while still tracing back to files.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Pictures (2)
//! 001 dawn.jpg
//!     Thumbnail: /pictures/thumbnails/dawn.jpg
//!     1.4 MB image/jpeg, modified 2026-03-01 09:12:44 UTC
//! 002 loop.gif
//!     Thumbnail: /pictures/thumbnails/loop.png
//! ```
//!
//! ## Order
//!
//! ```text
//! Saved order (format 1.0.0, updated 2026-03-01 09:12:44 UTC)
//! 001 dawn.jpg
//! 002 loop.gif
//! ```
//!
//! ## Thumbnails
//!
//! ```text
//! Generating 10 thumbnails in 3 batches
//! Batch 1/3 (4 files)
//!     dawn.jpg → pictures/thumbnails/dawn.jpg
//!     broken.jpg: failed (Processing failed: ...)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::thumbnails::PipelineEvent;
use crate::types::{OrderRecord, Picture};
use chrono::{DateTime, Utc};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Human-readable byte count, one decimal above 1 KB.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

// ============================================================================
// List
// ============================================================================

/// Format the reconciled picture sequence.
pub fn format_picture_list(pictures: &[Picture]) -> Vec<String> {
    let mut lines = vec![format!("Pictures ({})", pictures.len())];
    for (pos, picture) in pictures.iter().enumerate() {
        lines.push(format!("{} {}", format_index(pos + 1), picture.filename));
        lines.push(format!("{}Thumbnail: {}", indent(1), picture.thumbnail_path));
        if let Some(meta) = &picture.metadata {
            lines.push(format!(
                "{}{} {}, modified {}",
                indent(1),
                format_size(meta.size),
                meta.mime_type,
                format_timestamp(&meta.last_modified)
            ));
        }
    }
    lines
}

/// Print the picture list to stdout.
pub fn print_picture_list(pictures: &[Picture]) {
    for line in format_picture_list(pictures) {
        println!("{}", line);
    }
}

// ============================================================================
// Order
// ============================================================================

/// Format a stored order record, entries in stored sequence.
pub fn format_order_record(record: &OrderRecord) -> Vec<String> {
    let mut lines = vec![format!(
        "Saved order (format {}, updated {})",
        record.format_version,
        format_timestamp(&record.last_updated)
    )];
    if record.entries.is_empty() {
        lines.push(format!("{}(no entries)", indent(1)));
    }
    for entry in &record.entries {
        lines.push(format!(
            "{} {}",
            format_index(entry.order as usize + 1),
            entry.filename
        ));
    }
    lines
}

/// Print a stored order record to stdout.
pub fn print_order_record(record: &OrderRecord) {
    for line in format_order_record(record) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumbnails
// ============================================================================

/// Format a single pipeline progress event as display lines.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::Started { total, batches } => vec![format!(
            "Generating {} thumbnail{} in {} batch{}",
            total,
            if *total == 1 { "" } else { "s" },
            batches,
            if *batches == 1 { "" } else { "es" }
        )],
        PipelineEvent::BatchStarted {
            index,
            total,
            count,
        } => vec![format!("Batch {}/{} ({} files)", index, total, count)],
        PipelineEvent::Generated { filename, output } => {
            vec![format!("{}{} → {}", indent(1), filename, output.display())]
        }
        PipelineEvent::Failed { filename, error } => {
            vec![format!("{}{}: failed ({})", indent(1), filename, error)]
        }
    }
}
