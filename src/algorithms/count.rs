use rustc_hash::FxHashMap;

/// Counts the distinct values in a labelling.
///
/// Works on a private copy; the caller's labels are left untouched.
pub fn count_components(labels: &[u32]) -> usize {
    let mut sorted = labels.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

/// Number of vertices carrying each label.
pub fn component_sizes(labels: &[u32]) -> FxHashMap<u32, usize> {
    let mut sizes = FxHashMap::default();
    for &label in labels {
        *sizes.entry(label).or_insert(0) += 1;
    }
    sizes
}

/// The label with the most vertices and its size.
///
/// Ties go to the smaller label. `None` for an empty labelling.
pub fn largest_component(labels: &[u32]) -> Option<(u32, usize)> {
    component_sizes(labels)
        .into_iter()
        .max_by(|(label_a, size_a), (label_b, size_b)| {
            size_a.cmp(size_b).then(label_b.cmp(label_a))
        })
}

/// Whether two labellings induce the same partition of the vertices, whatever
/// the actual label values.
pub fn same_partition(left: &[u32], right: &[u32]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut forward: FxHashMap<u32, u32> = FxHashMap::default();
    let mut backward: FxHashMap<u32, u32> = FxHashMap::default();
    left.iter().zip(right).all(|(&a, &b)| {
        *forward.entry(a).or_insert(b) == b && *backward.entry(b).or_insert(a) == a
    })
}
