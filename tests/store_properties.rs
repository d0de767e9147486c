use liveplot_data::{GraphData, SignDomain, SortedPointStore, SqueezePolicy};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(f64),
    AddBatch(Vec<f64>, bool),
    Set(Vec<f64>),
    RemoveBefore(f64),
    RemoveAfter(f64),
    RemoveRange(f64, f64),
    Remove(f64),
    Squeeze(bool, bool),
    Clear,
}

fn key() -> impl Strategy<Value = f64> {
    // small integer grid so equal keys and exact removals actually occur;
    // -0.0 must behave exactly like 0.0
    prop_oneof![
        9 => (-50i32..50).prop_map(f64::from),
        1 => Just(-0.0),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => key().prop_map(Op::Add),
        2 => (prop::collection::vec(key(), 0..20), any::<bool>()).prop_map(|(mut keys, sorted)| {
            if sorted {
                keys.sort_by(f64::total_cmp);
            }
            Op::AddBatch(keys, sorted)
        }),
        1 => prop::collection::vec(key(), 0..30).prop_map(Op::Set),
        1 => key().prop_map(Op::RemoveBefore),
        1 => key().prop_map(Op::RemoveAfter),
        1 => (key(), key()).prop_map(|(from, to)| Op::RemoveRange(from, to)),
        1 => key().prop_map(Op::Remove),
        1 => (any::<bool>(), any::<bool>()).prop_map(|(pre, post)| Op::Squeeze(pre, post)),
        1 => Just(Op::Clear),
    ]
}

fn records(keys: &[f64], tag: &mut f64) -> Vec<GraphData> {
    keys.iter()
        .map(|key| {
            *tag += 1.0;
            GraphData::new(*key, *tag)
        })
        .collect()
}

/// Straightforward model: a vector kept sorted with a stable sort.
fn apply_model(model: &mut Vec<GraphData>, op: &Op, tag: &mut f64) {
    match op {
        Op::Add(key) => {
            *tag += 1.0;
            model.push(GraphData::new(*key, *tag));
        }
        Op::AddBatch(keys, _) => model.extend(records(keys, tag)),
        Op::Set(keys) => *model = records(keys, tag),
        Op::RemoveBefore(key) => model.retain(|record| record.key > *key),
        Op::RemoveAfter(key) => model.retain(|record| record.key < *key),
        Op::RemoveRange(from, to) => {
            if from < to {
                model.retain(|record| record.key < *from || record.key > *to);
            }
        }
        Op::Remove(key) => {
            if let Some(index) = model.iter().position(|record| record.key == *key) {
                model.remove(index);
            }
        }
        Op::Squeeze(..) => {}
        Op::Clear => model.clear(),
    }
    // keys are never NaN here, and -0.0 must tie with 0.0
    model.sort_by(|a, b| a.key.partial_cmp(&b.key).unwrap_or(std::cmp::Ordering::Equal));
}

fn apply_store(store: &mut SortedPointStore<GraphData>, op: &Op, tag: &mut f64) {
    match op {
        Op::Add(key) => {
            *tag += 1.0;
            store.add(GraphData::new(*key, *tag));
        }
        Op::AddBatch(keys, sorted) => store.add_batch(&records(keys, tag), *sorted),
        Op::Set(keys) => store.set(records(keys, tag), false),
        Op::RemoveBefore(key) => store.remove_before(*key),
        Op::RemoveAfter(key) => store.remove_after(*key),
        Op::RemoveRange(from, to) => store.remove_range(*from, *to),
        Op::Remove(key) => store.remove(*key),
        Op::Squeeze(pre, post) => store.squeeze(*pre, *post),
        Op::Clear => store.clear(),
    }
}

proptest! {
    #[test]
    fn store_stays_sorted_and_matches_model(ops in prop::collection::vec(op(), 1..60)) {
        let mut store = SortedPointStore::new();
        let mut model = Vec::new();
        let mut store_tag = 0.0;
        let mut model_tag = 0.0;
        for op in &ops {
            apply_store(&mut store, op, &mut store_tag);
            apply_model(&mut model, op, &mut model_tag);
            let live = store.as_slice();
            prop_assert!(live.windows(2).all(|pair| pair[0].key <= pair[1].key));
            prop_assert_eq!(live, model.as_slice());
        }
    }

    #[test]
    fn prepend_and_append_concatenate(appended in 1usize..200, prepended in 1usize..200) {
        let mut store = SortedPointStore::new();
        for index in 0..appended {
            store.add(GraphData::new(index as f64, 0.0));
        }
        for index in 1..=prepended {
            store.add(GraphData::new(-(index as f64), 0.0));
        }
        let keys: Vec<f64> = store.iter().map(|record| record.key).collect();
        let expected: Vec<f64> = (-(prepended as i64)..appended as i64).map(|key| key as f64).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn squeeze_twice_equals_once(keys in prop::collection::vec(key(), 0..100), cut in key()) {
        let mut store = SortedPointStore::with_policy(SqueezePolicy::disabled());
        for key in &keys {
            store.add(GraphData::new(*key, 0.0));
        }
        store.remove_before(cut);
        store.squeeze(true, true);
        let once: Vec<GraphData> = store.as_slice().to_vec();
        store.squeeze(true, true);
        prop_assert_eq!(store.len(), once.len());
        prop_assert_eq!(store.as_slice(), once.as_slice());
        prop_assert_eq!(store.preallocated(), 0);
    }

    #[test]
    fn find_bounds_bracket_key_window(keys in prop::collection::vec(key(), 1..100), lower in key(), span in 0i32..20) {
        let store: SortedPointStore<GraphData> =
            keys.iter().map(|key| GraphData::new(*key, 0.0)).collect();
        let upper = lower + f64::from(span);
        let begin = store.find_begin(lower, false);
        let end = store.find_end(upper, false).max(begin);
        for (index, record) in store.iter().enumerate() {
            let inside = record.key >= lower && record.key <= upper;
            prop_assert_eq!(inside, (begin..end).contains(&index));
        }
        let expanded_begin = store.find_begin(lower, true);
        let expanded_end = store.find_end(upper, true);
        prop_assert!(expanded_begin <= begin && begin - expanded_begin <= 1);
        prop_assert!(expanded_end >= store.find_end(upper, false));
        prop_assert!(expanded_end <= store.len());
    }
}

#[test]
fn sign_domain_key_ranges() {
    let store: SortedPointStore<GraphData> = [-3.0, -1.0, 2.0, 4.0]
        .into_iter()
        .map(|key| GraphData::new(key, 1.0))
        .collect();
    let positive = store.key_range(SignDomain::Positive).map(|range| (range.min, range.max));
    let negative = store.key_range(SignDomain::Negative).map(|range| (range.min, range.max));
    assert_eq!(positive, Some((2.0, 4.0)));
    assert_eq!(negative, Some((-3.0, -1.0)));
}

#[test]
fn removal_boundaries() {
    let build = || -> SortedPointStore<GraphData> {
        (1..=5).map(|key| GraphData::new(f64::from(key), 0.0)).collect()
    };
    let keys = |store: &SortedPointStore<GraphData>| -> Vec<f64> {
        store.iter().map(|record| record.key).collect()
    };

    let mut store = build();
    store.remove_range(2.0, 4.0);
    assert_eq!(keys(&store), vec![1.0, 5.0]);

    let mut store = build();
    store.remove_before(2.0);
    assert_eq!(keys(&store), vec![3.0, 4.0, 5.0]);

    let mut store = build();
    store.remove_after(4.0);
    assert_eq!(keys(&store), vec![1.0, 2.0, 3.0]);
}
