//! Sorted point storage.
//!
//! The data layer is optimized for the access pattern of plottables: frequent
//! appends and prepends at the ends, occasional bulk merges and range
//! deletions, and frequent bounded range lookups for the visible viewport.

mod container;
mod range;
mod squeeze;

pub use container::{EditGuard, SortedPointStore};
pub use range::DataRange;
pub use squeeze::{AllocationStats, SqueezePolicy, SqueezeRequest};

use std::cmp::Ordering;

use crate::record::DataRecord;

/// Total order on sort keys.
///
/// Keys that compare equal (including `-0.0` and `0.0`) are equal; NaN keys
/// sort to the ends instead of breaking the sort.
pub(crate) fn compare_keys(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

pub(crate) fn key_less(a: f64, b: f64) -> bool {
    compare_keys(a, b) == Ordering::Less
}

/// Index of the first record whose sort key is not less than `target`.
pub(crate) fn lower_bound<R: DataRecord>(records: &[R], target: f64) -> usize {
    let mut left = 0;
    let mut right = records.len();
    while left < right {
        let mid = (left + right) / 2;
        if key_less(records[mid].sort_key(), target) {
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    left
}

/// Index of the first record whose sort key is greater than `target`.
pub(crate) fn upper_bound<R: DataRecord>(records: &[R], target: f64) -> usize {
    let mut left = 0;
    let mut right = records.len();
    while left < right {
        let mid = (left + right) / 2;
        if key_less(target, records[mid].sort_key()) {
            right = mid;
        } else {
            left = mid + 1;
        }
    }
    left
}

/// Stable sort by sort key.
pub(crate) fn sort_records<R: DataRecord>(records: &mut [R]) {
    records.sort_by(|a, b| compare_keys(a.sort_key(), b.sort_key()));
}

/// Merge the two sorted runs `records[..mid]` and `records[mid..]` in place.
///
/// Records of the first run win ties. Only the overlapping window of the two
/// runs is touched.
pub(crate) fn merge_sorted_runs<R: DataRecord>(records: &mut [R], mid: usize) {
    if mid == 0 || mid >= records.len() {
        return;
    }
    let start = upper_bound(&records[..mid], records[mid].sort_key());
    let end = mid + lower_bound(&records[mid..], records[mid - 1].sort_key());
    if start == mid || end == mid {
        return;
    }

    let left: Vec<R> = records[start..mid].to_vec();
    let mut i = 0;
    let mut j = mid;
    let mut out = start;
    while i < left.len() && j < end {
        if key_less(records[j].sort_key(), left[i].sort_key()) {
            records[out] = records[j];
            j += 1;
        } else {
            records[out] = left[i];
            i += 1;
        }
        out += 1;
    }
    while i < left.len() {
        records[out] = left[i];
        i += 1;
        out += 1;
    }
}
