//! Deterministic top-K selection over keyed aggregates.

/// Return the `k` largest entries by value, descending, breaking value ties
/// by key ascending so identical input always yields identical output.
pub fn top_k<K: Ord>(totals: impl IntoIterator<Item = (K, u64)>, k: usize) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = totals.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);
    entries
}
