//! Sorted point container with front and back pre-allocation.

use std::cmp::Ordering;
use std::ops::{Deref, DerefMut, Index};

use crate::datasource::squeeze::{AllocationStats, SqueezePolicy};
use crate::datasource::{
    DataRange, key_less, lower_bound, merge_sorted_runs, sort_records, upper_bound,
};
use crate::record::DataRecord;
use crate::view::{Range, SignDomain};

/// Largest exponent of the pre-allocation slack term.
const MAX_PREALLOC_EXPONENT: u32 = 15;
/// Smallest exponent of the pre-allocation slack term.
const MIN_PREALLOC_EXPONENT: u32 = 4;

/// Records kept in ascending sort-key order.
///
/// Storage is a single vector split into an unused front pool, the live
/// records, and the vector's own spare capacity at the back. Prepending
/// consumes front slots and appending consumes back slots, so both ends grow
/// in amortized constant time. Removing from the front only moves the start
/// of the live zone; the freed slots join the front pool until the
/// [`SqueezePolicy`] decides to release them.
///
/// Every mutating method leaves the records sorted, with equal keys kept in
/// insertion order. The exceptions are [`live_mut`](Self::live_mut) and
/// [`EditGuard`], which hand out mutable access to the records.
#[derive(Debug, Clone)]
pub struct SortedPointStore<R: DataRecord> {
    data: Vec<R>,
    prealloc_size: usize,
    prealloc_iteration: u32,
    policy: SqueezePolicy,
}

impl<R: DataRecord> Default for SortedPointStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: DataRecord> SortedPointStore<R> {
    /// Create an empty store with the default squeeze policy.
    pub fn new() -> Self {
        Self::with_policy(SqueezePolicy::default())
    }

    /// Create an empty store with a custom squeeze policy.
    pub fn with_policy(policy: SqueezePolicy) -> Self {
        Self {
            data: Vec::new(),
            prealloc_size: 0,
            prealloc_iteration: 0,
            policy,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.data.len() - self.prealloc_size
    }

    /// Check if there are no live records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access the live records as a slice.
    pub fn as_slice(&self) -> &[R] {
        &self.data[self.prealloc_size..]
    }

    /// Iterate over the live records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.as_slice().iter()
    }

    /// Access a single record by index.
    pub fn get(&self, index: usize) -> Option<&R> {
        self.as_slice().get(index)
    }

    /// Record with the smallest sort key.
    pub fn first(&self) -> Option<&R> {
        self.as_slice().first()
    }

    /// Record with the largest sort key.
    pub fn last(&self) -> Option<&R> {
        self.as_slice().last()
    }

    /// Index range covering all live records.
    pub fn data_range(&self) -> DataRange {
        DataRange::new(0, self.len())
    }

    /// Mutable access to the live records.
    ///
    /// The store does not notice changed sort keys. Call [`sort`](Self::sort)
    /// afterwards if any key was modified, otherwise searches and insertions
    /// return unspecified results.
    pub fn live_mut(&mut self) -> &mut [R] {
        &mut self.data[self.prealloc_size..]
    }

    /// Scoped mutable access that restores the order when dropped.
    pub fn edit(&mut self) -> EditGuard<'_, R> {
        EditGuard { store: self }
    }

    /// Access the squeeze policy.
    pub fn policy(&self) -> &SqueezePolicy {
        &self.policy
    }

    /// Replace the squeeze policy.
    pub fn set_policy(&mut self, policy: SqueezePolicy) {
        self.policy = policy;
    }

    /// Check whether removals trigger automatic squeezing.
    pub fn auto_squeeze(&self) -> bool {
        self.policy.enabled
    }

    /// Enable or disable automatic squeezing after removals.
    ///
    /// Enabling runs the policy once right away.
    pub fn set_auto_squeeze(&mut self, enabled: bool) {
        if self.policy.enabled != enabled {
            self.policy.enabled = enabled;
            if enabled {
                self.perform_auto_squeeze();
            }
        }
    }

    /// Unused slots in front of the live records.
    pub fn preallocated(&self) -> usize {
        self.prealloc_size
    }

    /// Total allocated slots, including both pools.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Snapshot of the allocation layout.
    pub fn allocation_stats(&self) -> AllocationStats {
        AllocationStats {
            total: self.data.capacity(),
            live: self.len(),
            pre_allocation: self.prealloc_size,
        }
    }

    /// Replace all records.
    pub fn set(&mut self, records: Vec<R>, already_sorted: bool) {
        self.data = records;
        self.prealloc_size = 0;
        self.prealloc_iteration = 0;
        if !already_sorted {
            sort_records(&mut self.data);
        }
    }

    /// Replace all records with a copy of `records`.
    pub fn set_from_slice(&mut self, records: &[R], already_sorted: bool) {
        self.clear();
        self.add_batch(records, already_sorted);
    }

    /// Insert a batch of records.
    ///
    /// On an empty store this is [`set`](Self::set). A sorted batch lying
    /// entirely below the current records is written into the front pool.
    /// Anything else is appended, sorted if needed, and merged with the
    /// existing records when the two overlap.
    pub fn add_batch(&mut self, records: &[R], already_sorted: bool) {
        let Some(batch_last) = records.last() else {
            return;
        };
        if self.is_empty() {
            self.set(records.to_vec(), already_sorted);
            return;
        }
        let count = records.len();
        let old_len = self.len();

        if already_sorted
            && let Some(first) = self.first()
            && key_less(batch_last.sort_key(), first.sort_key())
        {
            if self.prealloc_size < count {
                self.preallocate_grow(count);
            }
            self.prealloc_size -= count;
            let start = self.prealloc_size;
            self.data[start..start + count].copy_from_slice(records);
            return;
        }

        self.data.extend_from_slice(records);
        let live = &mut self.data[self.prealloc_size..];
        if !already_sorted {
            sort_records(&mut live[old_len..]);
        }
        if old_len > 0 && key_less(live[old_len].sort_key(), live[old_len - 1].sort_key()) {
            merge_sorted_runs(live, old_len);
        }
    }

    /// Insert a single record at its sorted position.
    pub fn add(&mut self, record: R) {
        let key = record.sort_key();
        let (below_last, below_first) = match (self.first(), self.last()) {
            (Some(first), Some(last)) => (
                key_less(key, last.sort_key()),
                key_less(key, first.sort_key()),
            ),
            _ => (false, false),
        };
        if !below_last {
            self.data.push(record);
        } else if below_first {
            if self.prealloc_size == 0 {
                self.preallocate_grow(1);
            }
            self.prealloc_size -= 1;
            self.data[self.prealloc_size] = record;
        } else {
            let index = self.prealloc_size + upper_bound(self.as_slice(), key);
            self.data.insert(index, record);
        }
    }

    /// Drop all records with a sort key less than or equal to `key`.
    ///
    /// The dropped slots join the front pool.
    pub fn remove_before(&mut self, key: f64) {
        let count = upper_bound(self.as_slice(), key);
        self.prealloc_size += count;
        self.perform_auto_squeeze();
    }

    /// Drop all records with a sort key greater than or equal to `key`.
    pub fn remove_after(&mut self, key: f64) {
        let index = self.prealloc_size + lower_bound(self.as_slice(), key);
        self.data.truncate(index);
        self.perform_auto_squeeze();
    }

    /// Drop all records with a sort key in `[from, to]`.
    ///
    /// Does nothing unless `from < to`.
    pub fn remove_range(&mut self, from: f64, to: f64) {
        if self.is_empty() || from.partial_cmp(&to) != Some(Ordering::Less) {
            return;
        }
        let live = self.as_slice();
        let begin = self.prealloc_size + lower_bound(live, from);
        let end = self.prealloc_size + upper_bound(live, to);
        self.data.drain(begin..end);
        self.perform_auto_squeeze();
    }

    /// Drop one record whose sort key equals `key` exactly.
    pub fn remove(&mut self, key: f64) {
        let live = self.as_slice();
        let index = lower_bound(live, key);
        if live.get(index).is_some_and(|record| record.sort_key() == key) {
            if index == 0 {
                self.prealloc_size += 1;
            } else {
                self.data.remove(self.prealloc_size + index);
            }
        }
        self.perform_auto_squeeze();
    }

    /// Drop all records and forget the pre-allocation history.
    pub fn clear(&mut self) {
        self.data.clear();
        self.prealloc_size = 0;
        self.prealloc_iteration = 0;
    }

    /// Restore ascending order after keys were changed through
    /// [`live_mut`](Self::live_mut).
    pub fn sort(&mut self) {
        sort_records(self.live_mut());
    }

    /// Release unused capacity.
    ///
    /// `pre_allocation` moves the live records to the start of the buffer and
    /// drops the front pool; `post_allocation` shrinks the buffer to fit.
    pub fn squeeze(&mut self, pre_allocation: bool, post_allocation: bool) {
        if pre_allocation {
            if self.prealloc_size > 0 {
                self.data.drain(..self.prealloc_size);
                self.prealloc_size = 0;
            }
            self.prealloc_iteration = 0;
        }
        if post_allocation {
            self.data.shrink_to_fit();
        }
        log::trace!(
            "squeezed store: pre={pre_allocation} post={post_allocation} capacity={}",
            self.data.capacity()
        );
    }

    /// Index of the first record with a sort key of at least `key`.
    ///
    /// With `expanded_range`, the record just below `key` is included as well.
    /// Returns `len()` for an empty store.
    pub fn find_begin(&self, key: f64, expanded_range: bool) -> usize {
        if self.is_empty() {
            return self.len();
        }
        let index = lower_bound(self.as_slice(), key);
        if expanded_range && index > 0 {
            index - 1
        } else {
            index
        }
    }

    /// Index one past the last record with a sort key of at most `key`.
    ///
    /// With `expanded_range`, the record just above `key` is included as well.
    /// Returns `len()` for an empty store.
    pub fn find_end(&self, key: f64, expanded_range: bool) -> usize {
        let len = self.len();
        if len == 0 {
            return len;
        }
        let index = upper_bound(self.as_slice(), key);
        if expanded_range && index < len {
            index + 1
        } else {
            index
        }
    }

    /// Clamp an index span to the stored records and to `data_range`.
    pub fn limit_to_data_range(
        &self,
        span: std::ops::Range<usize>,
        data_range: DataRange,
    ) -> std::ops::Range<usize> {
        let bounds = data_range.bounded(self.data_range());
        DataRange::from(span).bounded(bounds).as_range()
    }

    /// Extent of the main keys of all records with a non-NaN main value.
    ///
    /// Returns `None` if no record qualifies.
    pub fn key_range(&self, sign_domain: SignDomain) -> Option<Range> {
        let live = self.as_slice();
        if live.is_empty() {
            return None;
        }
        if R::SORT_KEY_IS_MAIN_KEY {
            // keys are ordered: only scan inwards from the bounds of the domain
            let (lower_side, upper_side) = match sign_domain {
                SignDomain::Both => (live, live),
                SignDomain::Negative => {
                    let split = lower_bound(live, 0.0);
                    (&live[..split], &live[..split])
                }
                SignDomain::Positive => {
                    let split = upper_bound(live, 0.0);
                    (&live[split..], &live[split..])
                }
            };
            let qualifies = |record: &&R| {
                !record.main_value().is_nan() && sign_domain.accepts(record.main_key())
            };
            let min = lower_side.iter().find(qualifies)?.main_key();
            let max = upper_side.iter().rev().find(qualifies)?.main_key();
            return Some(Range { min, max });
        }

        let mut range: Option<Range> = None;
        for record in live {
            let key = record.main_key();
            if record.main_value().is_nan() || !sign_domain.accepts(key) {
                continue;
            }
            range = Some(match range {
                None => Range { min: key, max: key },
                Some(current) => Range {
                    min: current.min.min(key),
                    max: current.max.max(key),
                },
            });
        }
        range
    }

    /// Extent of the value ranges of all records.
    ///
    /// With `in_key_range`, only records whose main key lies inside it are
    /// considered. Returns `None` if no bound was found.
    pub fn value_range(&self, sign_domain: SignDomain, in_key_range: Option<Range>) -> Option<Range> {
        let live = self.as_slice();
        if live.is_empty() {
            return None;
        }
        let window = match in_key_range {
            Some(keys) if R::SORT_KEY_IS_MAIN_KEY => {
                let begin = self.find_begin(keys.min, false);
                begin..self.find_end(keys.max, false).max(begin)
            }
            _ => 0..live.len(),
        };

        let mut lower: Option<f64> = None;
        let mut upper: Option<f64> = None;
        for record in &live[window] {
            if in_key_range.is_some_and(|keys| !keys.contains(record.main_key())) {
                continue;
            }
            let current = record.value_range();
            if sign_domain.accepts(current.min) && lower.is_none_or(|min| current.min < min) {
                lower = Some(current.min);
            }
            if sign_domain.accepts(current.max) && upper.is_none_or(|max| current.max > max) {
                upper = Some(current.max);
            }
        }
        Some(Range {
            min: lower?,
            max: upper?,
        })
    }

    fn preallocate_grow(&mut self, minimum: usize) {
        if minimum <= self.prealloc_size {
            return;
        }
        let exponent = self
            .prealloc_iteration
            .saturating_add(MIN_PREALLOC_EXPONENT)
            .clamp(MIN_PREALLOC_EXPONENT, MAX_PREALLOC_EXPONENT);
        let new_size = minimum + (1usize << exponent) - 12;
        self.prealloc_iteration = self.prealloc_iteration.saturating_add(1);

        // shift live records and tail back to open the new front slots
        let difference = new_size - self.prealloc_size;
        let old_len = self.data.len();
        self.data.resize(old_len + difference, R::from_sort_key(0.0));
        self.data
            .copy_within(self.prealloc_size..old_len, self.prealloc_size + difference);
        self.prealloc_size = new_size;
        log::trace!(
            "grew pre-allocation to {new_size} (iteration {})",
            self.prealloc_iteration
        );
    }

    fn perform_auto_squeeze(&mut self) {
        if !self.policy.enabled {
            return;
        }
        let stats = self.allocation_stats();
        let request = self.policy.evaluate(stats);
        if request.any() {
            log::debug!(
                "auto-squeeze: total={} live={} pre={} post={} -> {request:?}",
                stats.total,
                stats.live,
                stats.pre_allocation,
                stats.post_allocation()
            );
            self.squeeze(request.pre_allocation, request.post_allocation);
        }
    }
}

impl<R: DataRecord> Index<usize> for SortedPointStore<R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.as_slice()[index]
    }
}

impl<'a, R: DataRecord> IntoIterator for &'a SortedPointStore<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<R: DataRecord> FromIterator<R> for SortedPointStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut store = Self::new();
        store.set(iter.into_iter().collect(), false);
        store
    }
}

/// Mutable view of a store's records that re-sorts them when dropped.
///
/// Obtained from [`SortedPointStore::edit`].
#[derive(Debug)]
pub struct EditGuard<'a, R: DataRecord> {
    store: &'a mut SortedPointStore<R>,
}

impl<R: DataRecord> Deref for EditGuard<'_, R> {
    type Target = [R];

    fn deref(&self) -> &[R] {
        self.store.as_slice()
    }
}

impl<R: DataRecord> DerefMut for EditGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut [R] {
        self.store.live_mut()
    }
}

impl<R: DataRecord> Drop for EditGuard<'_, R> {
    fn drop(&mut self) {
        self.store.sort();
    }
}
