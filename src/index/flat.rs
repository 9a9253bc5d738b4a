//! Exhaustive (brute-force) index.
//!
//! Vectors live in one contiguous arena (`dim` floats per vector) and are
//! identified by their insertion position. Search scores every stored
//! vector against the query and keeps the best `k` in a [`TopK`] selector
//! whose direction matches the metric.

use tracing::debug;

use crate::error::{NanoIvfError, Result};
use crate::index::distance;
use crate::index::topk::{KeepLargest, KeepOrder, KeepSmallest, TopK};
use crate::index::traits::VectorIndex;
use crate::types::{MetricType, Neighbors, SearchParams, SearchResult, VectorId};

/// Capacity-bounded, append-only collection of fixed-dimension vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatIndex {
    capacity: usize,
    dim: usize,
    /// Number of stored vectors, `size <= capacity`.
    size: usize,
    /// Row-major arena; `data.len() == size * dim`.
    data: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty index holding up to `capacity` vectors of length `dim`.
    pub fn new(capacity: usize, dim: usize) -> Self {
        let mut index = Self::default();
        index.init(capacity, dim);
        index
    }

    /// Reset to an empty index with the given capacity and dimension.
    pub fn init(&mut self, capacity: usize, dim: usize) {
        self.capacity = capacity;
        self.dim = dim;
        self.size = 0;
        self.data = Vec::with_capacity(capacity.saturating_mul(dim));
    }

    /// Append one vector. Its id is the current `len()`.
    pub fn add(&mut self, vector: &[f32]) -> Result<VectorId> {
        self.check_dim(vector.len())?;
        let id = self.size;
        if id >= self.capacity {
            return Err(NanoIvfError::CapacityExceeded {
                capacity: self.capacity,
                requested: id + 1,
            });
        }
        self.data.extend_from_slice(vector);
        self.size += 1;
        Ok(id)
    }

    /// Append a batch of vectors, all or nothing.
    ///
    /// Capacity and every vector's dimension are checked before anything is
    /// written, so a failed batch leaves the index untouched.
    pub fn batch_add<V: AsRef<[f32]>>(&mut self, vectors: &[V]) -> Result<()> {
        let requested = self.size + vectors.len();
        if requested > self.capacity {
            return Err(NanoIvfError::CapacityExceeded {
                capacity: self.capacity,
                requested,
            });
        }
        for v in vectors {
            self.check_dim(v.as_ref().len())?;
        }
        for v in vectors {
            self.add(v.as_ref())?;
        }
        Ok(())
    }

    /// k-NN search, returning hits ordered by ascending id.
    ///
    /// At most `min(k, len())` results are returned.
    pub fn search(&self, query: &[f32], k: usize, metric: MetricType) -> Result<Neighbors> {
        let mut ids: Vec<VectorId> = self
            .select(query, k, metric)?
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();

        let vectors = ids.iter().map(|&id| self.row(id).to_vec()).collect();
        Ok(Neighbors { ids, vectors })
    }

    /// k-NN search, returning hits best-first together with their raw scores.
    pub fn search_ranked(
        &self,
        query: &[f32],
        k: usize,
        metric: MetricType,
    ) -> Result<Vec<SearchResult>> {
        Ok(self
            .select(query, k, metric)?
            .into_iter()
            .map(|(id, score)| SearchResult { id, score })
            .collect())
    }

    /// Drop every stored vector. The capacity is forgotten as well; call
    /// [`init`](Self::init) before adding again.
    pub fn remove(&mut self) {
        self.data = Vec::new();
        self.size = 0;
        self.capacity = 0;
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// The stored vector with the given id, if any.
    pub fn vector(&self, id: VectorId) -> Option<&[f32]> {
        (id < self.size).then(|| self.row(id))
    }

    /// Iterate stored vectors in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        (0..self.size).map(move |id| self.row(id))
    }

    pub(crate) fn row(&self, id: VectorId) -> &[f32] {
        let start = id * self.dim;
        &self.data[start..start + self.dim]
    }

    fn check_dim(&self, actual: usize) -> Result<()> {
        if actual != self.dim {
            return Err(NanoIvfError::DimensionMismatch {
                expected: self.dim,
                actual,
            });
        }
        Ok(())
    }

    /// Score every vector and return the survivors best-first.
    fn select(&self, query: &[f32], k: usize, metric: MetricType) -> Result<Vec<(VectorId, f32)>> {
        self.check_dim(query.len())?;
        let ranked = if metric.higher_is_better() {
            self.scan::<KeepLargest>(query, k, metric)?
        } else {
            self.scan::<KeepSmallest>(query, k, metric)?
        };
        debug!(
            metric = %metric,
            k = k,
            scanned = self.size,
            returned = ranked.len(),
            "flat search complete"
        );
        Ok(ranked)
    }

    fn scan<O: KeepOrder>(
        &self,
        query: &[f32],
        k: usize,
        metric: MetricType,
    ) -> Result<Vec<(VectorId, f32)>> {
        let mut heap = TopK::<O>::new(k)?;
        for (id, v) in self.iter().enumerate() {
            heap.push(distance::score(v, query, metric), id);
        }
        Ok(heap.into_ranked())
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], top_k: usize, params: &SearchParams) -> Result<Neighbors> {
        FlatIndex::search(self, query, top_k, params.metric)
    }

    fn vector_count(&self) -> usize {
        self.size
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
