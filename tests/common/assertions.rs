use std::collections::HashSet;

use nanoivf::index::Cluster;

/// Fraction of `expected` ids present in `actual`.
pub fn recall(actual: &[usize], expected: &[usize]) -> f64 {
    if expected.is_empty() {
        return 1.0;
    }
    let truth: HashSet<&usize> = expected.iter().collect();
    let hits = actual.iter().filter(|id| truth.contains(id)).count();
    hits as f64 / expected.len() as f64
}

/// Every cluster is non-empty and the member sets partition `0..n`.
pub fn assert_partition(clusters: &[Cluster], n: usize) {
    let mut seen = vec![false; n];
    for (c, cluster) in clusters.iter().enumerate() {
        assert!(!cluster.is_empty(), "cluster {c} is empty");
        for &id in cluster.members() {
            assert!(id < n, "cluster {c} holds out-of-range id {id}");
            assert!(!seen[id], "vector {id} is in more than one cluster");
            seen[id] = true;
        }
    }
    let missing: Vec<usize> = (0..n).filter(|&i| !seen[i]).collect();
    assert!(missing.is_empty(), "unassigned vectors: {missing:?}");
}

/// Ids are strictly ascending.
pub fn assert_strictly_ascending(ids: &[usize]) {
    assert!(
        ids.windows(2).all(|w| w[0] < w[1]),
        "ids not strictly ascending: {ids:?}"
    );
}
