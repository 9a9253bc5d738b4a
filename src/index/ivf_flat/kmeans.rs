//! Lloyd's iteration for IVF cluster training, L2 only.
//!
//! Each pass assigns vectors to their nearest centroid, repairs empty
//! clusters by borrowing a member from a larger one, and then moves every
//! centroid to the mean of its members. Membership lives in per-cluster
//! ordered id sets over the caller's vector arena, so a reassignment is two
//! set operations and no vector data is copied.
//!
//! The random source is injected: seed it for reproducible training.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NanoIvfError, Result};
use crate::index::distance::l2_distance;
use crate::types::VectorId;

/// Hyper-parameters for a k-means run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KMeansParams {
    /// Number of clusters to produce.
    pub nlist: usize,
    /// Upper bound on assignment passes.
    pub max_iterations: usize,
    /// Early-exit threshold on the running reassignment rate of a pass.
    /// A negative value disables the early exit.
    pub delta_threshold: f64,
}

impl KMeansParams {
    pub fn new(nlist: usize, max_iterations: usize, delta_threshold: f64) -> Self {
        Self {
            nlist,
            max_iterations,
            delta_threshold,
        }
    }

    fn validate(&self, num_vectors: usize) -> Result<()> {
        if self.nlist == 0 {
            return Err(NanoIvfError::InvalidArgument("nlist must be > 0".into()));
        }
        if self.nlist > num_vectors {
            return Err(NanoIvfError::InvalidArgument(format!(
                "nlist ({}) exceeds vector count ({num_vectors})",
                self.nlist
            )));
        }
        if self.max_iterations == 0 {
            return Err(NanoIvfError::InvalidArgument(
                "max_iterations must be > 0".into(),
            ));
        }
        if !self.delta_threshold.is_finite() {
            return Err(NanoIvfError::InvalidArgument(format!(
                "delta_threshold must be finite, got {}",
                self.delta_threshold
            )));
        }
        Ok(())
    }
}

/// A trained partition: centroid plus the ids of its member vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    centroid: Vec<f32>,
    members: BTreeSet<VectorId>,
}

impl Cluster {
    fn seeded(centroid: Vec<f32>) -> Self {
        Self {
            centroid,
            members: BTreeSet::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        centroid: Vec<f32>,
        members: impl IntoIterator<Item = VectorId>,
    ) -> Self {
        Self {
            centroid,
            members: members.into_iter().collect(),
        }
    }

    pub fn centroid(&self) -> &[f32] {
        &self.centroid
    }

    /// Member ids in ascending order.
    pub fn members(&self) -> &BTreeSet<VectorId> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Outcome of one assignment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PassStats {
    visited: usize,
    moved: usize,
}

/// Mutable training state: clusters plus the reverse vector -> cluster map.
struct Training<'a> {
    vectors: &'a [&'a [f32]],
    clusters: Vec<Cluster>,
    assignment: Vec<Option<usize>>,
}

impl<'a> Training<'a> {
    fn new(vectors: &'a [&'a [f32]], seeds: &[VectorId]) -> Self {
        Self {
            vectors,
            clusters: seeds
                .iter()
                .map(|&s| Cluster::seeded(vectors[s].to_vec()))
                .collect(),
            assignment: vec![None; vectors.len()],
        }
    }

    /// Assign vectors in id order to their nearest centroid.
    ///
    /// With `early_exit`, the running rate `moved / total` is checked after
    /// every vector and the pass stops as soon as it is at or below the
    /// threshold. Unvisited vectors keep their previous cluster.
    fn assign(&mut self, early_exit: Option<f64>) -> PassStats {
        let vectors = self.vectors;
        let total = vectors.len() as f64;
        let mut stats = PassStats {
            visited: 0,
            moved: 0,
        };

        for (i, v) in vectors.iter().enumerate() {
            let nearest = self.nearest(v);
            let prev = self.assignment[i];
            if prev != Some(nearest) {
                if let Some(p) = prev {
                    self.clusters[p].members.remove(&i);
                }
                self.clusters[nearest].members.insert(i);
                self.assignment[i] = Some(nearest);
                stats.moved += 1;
            }
            stats.visited = i + 1;

            if let Some(delta) = early_exit {
                if stats.moved as f64 / total <= delta {
                    break;
                }
            }
        }
        stats
    }

    fn nearest(&self, v: &[f32]) -> usize {
        let mut best_dist = f32::INFINITY;
        let mut best_idx = 0usize;
        for (c, cluster) in self.clusters.iter().enumerate() {
            let d = l2_distance(v, &cluster.centroid);
            if d < best_dist {
                best_dist = d;
                best_idx = c;
            }
        }
        best_idx
    }

    /// Give every empty cluster one member taken from the first cluster (in
    /// index order) that has more than one. Returns the number of moves.
    fn repair_empty(&mut self) -> usize {
        let mut repaired = 0;
        for l in 0..self.clusters.len() {
            if !self.clusters[l].is_empty() {
                continue;
            }
            let donor = (0..self.clusters.len()).find(|&m| m != l && self.clusters[m].len() > 1);
            let Some(m) = donor else {
                warn!(cluster = l, "no donor cluster available, leaving cluster empty");
                continue;
            };
            if let Some(v) = self.clusters[m].members.pop_first() {
                self.clusters[l].members.insert(v);
                self.assignment[v] = Some(l);
                repaired += 1;
                warn!(cluster = l, donor = m, vector = v, "repaired empty cluster");
            }
        }
        repaired
    }

    /// Move each centroid to the coordinate-wise mean of its members.
    fn update_centroids(&mut self, dim: usize) {
        let mut sum = vec![0.0f32; dim];
        for cluster in &mut self.clusters {
            if cluster.members.is_empty() {
                continue;
            }
            sum.iter_mut().for_each(|x| *x = 0.0);
            for &id in &cluster.members {
                for (acc, &x) in sum.iter_mut().zip(self.vectors[id]) {
                    *acc += x;
                }
            }
            let inv = 1.0 / cluster.members.len() as f32;
            for (c, &s) in cluster.centroid.iter_mut().zip(&sum) {
                *c = s * inv;
            }
        }
    }
}

/// k-means trainer with fixed hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    params: KMeansParams,
}

impl KMeans {
    pub fn new(params: KMeansParams) -> Self {
        Self { params }
    }

    /// Partition `vectors` into `nlist` clusters.
    ///
    /// Seeds are `nlist` distinct vectors drawn uniformly from `rng`. The
    /// first pass assigns every vector; later passes may stop early per
    /// `delta_threshold`. After each pass empty clusters are repaired and
    /// centroids recomputed. On return every cluster is non-empty and the
    /// member sets partition `0..vectors.len()`.
    ///
    /// # Errors
    /// `InvalidArgument` for `nlist == 0`, `nlist > vectors.len()`,
    /// `max_iterations == 0` or a non-finite threshold;
    /// `DimensionMismatch` if any vector's length differs from `dim`.
    pub fn train<R: Rng + ?Sized>(
        &self,
        vectors: &[&[f32]],
        dim: usize,
        rng: &mut R,
    ) -> Result<Vec<Cluster>> {
        let n = vectors.len();
        self.params.validate(n)?;
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(NanoIvfError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }

        let KMeansParams {
            nlist,
            max_iterations,
            delta_threshold,
        } = self.params;

        info!(n = n, nlist = nlist, dim = dim, "starting k-means training");

        let seeds = sample_distinct(n, nlist, rng);
        debug!(seeds = ?seeds, "selected initial centroids");

        let mut state = Training::new(vectors, &seeds);

        for iter in 0..max_iterations {
            let early_exit = (iter > 0).then_some(delta_threshold);
            let stats = state.assign(early_exit);
            let repaired = state.repair_empty();
            state.update_centroids(dim);

            debug!(
                iter = iter + 1,
                visited = stats.visited,
                moved = stats.moved,
                repaired = repaired,
                "k-means pass complete"
            );
        }

        info!(
            iterations = max_iterations,
            nlist = nlist,
            "k-means training complete"
        );
        Ok(state.clusters)
    }
}

/// Draw `count` distinct indices from `0..upper` by rejection sampling.
///
/// Caller guarantees `count <= upper`.
fn sample_distinct<R: Rng + ?Sized>(upper: usize, count: usize, rng: &mut R) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(count);
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let candidate = rng.gen_range(0..upper);
        if seen.insert(candidate) {
            picked.push(candidate);
        }
    }
    picked
}
