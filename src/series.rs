//! Named data series backed by a shareable sorted store.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::datasource::{DataRange, SortedPointStore};
use crate::record::{DataRecord, KeyValueRecord};
use crate::view::{Range, SignDomain};

static SERIES_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Store handle shared between several series on one thread.
pub type SharedStore<R> = Rc<RefCell<SortedPointStore<R>>>;

/// Wrap a store into a shareable handle.
pub fn shared_store<R: DataRecord>(store: SortedPointStore<R>) -> SharedStore<R> {
    Rc::new(RefCell::new(store))
}

/// Unique identifier for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId(u64);

impl SeriesId {
    fn next() -> Self {
        Self(SERIES_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Plot series with named, sorted data storage.
///
/// Several series may point at the same [`SharedStore`]; edits through one
/// are visible through all of them.
#[derive(Debug, Clone)]
pub struct Series<R: DataRecord> {
    id: SeriesId,
    name: String,
    data: SharedStore<R>,
    visible: bool,
    generation: u64,
}

impl<R: DataRecord> Series<R> {
    /// Create a series with an empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_shared_data(name, shared_store(SortedPointStore::new()))
    }

    /// Create a series on top of an existing shared store.
    pub fn with_shared_data(name: impl Into<String>, data: SharedStore<R>) -> Self {
        Self {
            id: SeriesId::next(),
            name: name.into(),
            data,
            visible: true,
            generation: 0,
        }
    }

    /// Build a series from an iterator of records in any order.
    pub fn from_iter_records<I>(name: impl Into<String>, iter: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        Self::with_shared_data(name, shared_store(iter.into_iter().collect()))
    }

    /// Access the series identifier.
    pub fn id(&self) -> SeriesId {
        self.id
    }

    /// Access the series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the series is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggle series visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Access the series generation (increments on every edit made through
    /// this series).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clone the shared store handle.
    pub fn shared_data(&self) -> SharedStore<R> {
        Rc::clone(&self.data)
    }

    /// Borrow the store for reading.
    pub fn data(&self) -> Ref<'_, SortedPointStore<R>> {
        self.data.borrow()
    }

    /// Replace the series data.
    pub fn set_data(&mut self, records: Vec<R>, already_sorted: bool) {
        self.edit(|store| store.set(records, already_sorted));
    }

    /// Merge a batch of records into the series.
    pub fn add_data(&mut self, records: &[R], already_sorted: bool) {
        self.edit(|store| store.add_batch(records, already_sorted));
    }

    /// Insert a single record.
    pub fn add_point(&mut self, record: R) {
        self.edit(|store| store.add(record));
    }

    /// Drop records with a sort key at or below `key`.
    pub fn remove_before(&mut self, key: f64) {
        self.edit(|store| store.remove_before(key));
    }

    /// Drop records with a sort key at or above `key`.
    pub fn remove_after(&mut self, key: f64) {
        self.edit(|store| store.remove_after(key));
    }

    /// Drop records with a sort key in `[from, to]`.
    pub fn remove_range(&mut self, from: f64, to: f64) {
        self.edit(|store| store.remove_range(from, to));
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.edit(|store| store.clear());
    }

    /// Index span of the records needed to draw the key range `keys`.
    ///
    /// Includes one record beyond each end so connecting lines reach the
    /// viewport edge. Series whose sort key is not the drawn key return all
    /// records.
    pub fn visible_span(&self, keys: Range) -> std::ops::Range<usize> {
        self.visible_span_within(keys, DataRange::new(0, usize::MAX))
    }

    /// Like [`visible_span`](Self::visible_span), restricted to `selection`.
    pub fn visible_span_within(&self, keys: Range, selection: DataRange) -> std::ops::Range<usize> {
        let store = self.data.borrow();
        let span = if R::SORT_KEY_IS_MAIN_KEY {
            let begin = store.find_begin(keys.min, true);
            begin..store.find_end(keys.max, true).max(begin)
        } else {
            0..store.len()
        };
        store.limit_to_data_range(span, selection)
    }

    /// Key extent for auto-scaling.
    pub fn key_range(&self, sign_domain: SignDomain) -> Option<Range> {
        self.data.borrow().key_range(sign_domain)
    }

    /// Value extent for auto-scaling, optionally within a key range.
    pub fn value_range(&self, sign_domain: SignDomain, in_key_range: Option<Range>) -> Option<Range> {
        self.data.borrow().value_range(sign_domain, in_key_range)
    }

    fn edit(&mut self, apply: impl FnOnce(&mut SortedPointStore<R>)) {
        apply(&mut self.data.borrow_mut());
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<R: KeyValueRecord> Series<R> {
    /// Replace the series data with records built from parallel arrays.
    ///
    /// Extra entries of the longer array are ignored.
    pub fn set_keys_values(&mut self, keys: &[f64], values: &[f64], already_sorted: bool) {
        let records = zip_key_values(keys, values);
        self.set_data(records, already_sorted);
    }

    /// Merge records built from parallel arrays into the series.
    pub fn add_keys_values(&mut self, keys: &[f64], values: &[f64], already_sorted: bool) {
        let records = zip_key_values::<R>(keys, values);
        self.add_data(&records, already_sorted);
    }
}

fn zip_key_values<R: KeyValueRecord>(keys: &[f64], values: &[f64]) -> Vec<R> {
    if keys.len() != values.len() {
        log::warn!(
            "keys and values differ in length ({} vs {}), truncating",
            keys.len(),
            values.len()
        );
    }
    keys.iter()
        .zip(values)
        .map(|(key, value)| R::from_key_value(*key, *value))
        .collect()
}
