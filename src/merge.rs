//! Reconciliation of filesystem truth with stored intent.
//!
//! [`merge`] combines the pictures the scanner found with the persisted
//! [`OrderRecord`]. It is pure: no I/O, and the same inputs always produce
//! the same output.
//!
//! ```text
//! current  = [a, b, c]            (scan order)
//! saved    = [(c, 0), (a, 1), (x, 2)]
//! result   = [c(0), a(1), b(2)]   x was deleted, b is new
//! ```
//!
//! Rules:
//! - Saved entries are consumed in stored order. Each one that still exists
//!   keeps its saved position but takes every other attribute from the scan.
//! - Saved entries with no matching file are dropped, never resurrected.
//! - Pictures absent from the record are numbered from `max(saved) + 1`
//!   upward, in scan order.
//! - The result is sorted by position (stable, so equal positions from a
//!   damaged record keep their stored sequence).
//!
//! Gaps in the saved positions are kept as-is; only an explicit reorder
//! ([`crate::order::build_order`]) renumbers densely. The one exception is a
//! record whose positions run so close to `u32::MAX` that new pictures would
//! not fit above them: the saved positions are then compacted to `0..N`.

use crate::types::{OrderRecord, Picture};
use std::collections::HashMap;
use tracing::warn;

/// Merge scanned pictures with the saved order into one sorted list.
pub fn merge(current: Vec<Picture>, saved: &OrderRecord) -> Vec<Picture> {
    // Slots keep scan order for the pictures left over after consuming saved entries
    let mut index: HashMap<String, usize> = HashMap::with_capacity(current.len());
    let mut slots: Vec<Option<Picture>> = Vec::with_capacity(current.len());
    for picture in current {
        if index.contains_key(&picture.filename) {
            continue;
        }
        index.insert(picture.filename.clone(), slots.len());
        slots.push(Some(picture));
    }

    let mut merged: Vec<Picture> = Vec::with_capacity(slots.len());
    for entry in &saved.entries {
        let Some(slot) = index.remove(&entry.filename) else {
            continue;
        };
        if let Some(mut picture) = slots[slot].take() {
            picture.order = entry.order;
            merged.push(picture);
        }
    }

    let leftovers: Vec<Picture> = slots.into_iter().flatten().collect();
    let mut next_order = merged
        .iter()
        .map(|p| u64::from(p.order) + 1)
        .max()
        .unwrap_or(0);

    // New positions must stay within u32; a record that ends too close to
    // the top is compacted first, keeping its relative sequence
    if next_order + leftovers.len() as u64 > u64::from(u32::MAX) + 1 {
        warn!(
            highest = next_order - 1,
            new = leftovers.len(),
            "saved positions leave no room for new pictures, compacting"
        );
        merged.sort_by_key(|p| p.order);
        for (position, picture) in merged.iter_mut().enumerate() {
            picture.order = position as u32;
        }
        next_order = merged.len() as u64;
    }

    for mut picture in leftovers {
        picture.order = u32::try_from(next_order).unwrap_or(u32::MAX);
        next_order += 1;
        merged.push(picture);
    }

    merged.sort_by_key(|p| p.order);
    merged
}
