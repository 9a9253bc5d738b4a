//! IVF-Flat index implementation.
//!
//! An Inverted File index with flat (uncompressed) vector storage.
//! Vectors are partitioned into clusters via k-means, and at search time
//! only the `nprobe` closest clusters are scanned.

pub mod build;
pub mod kmeans;
pub mod search;

use rand::Rng;

use crate::config::IndexingConfig;
use crate::error::{NanoIvfError, Result};
use crate::index::flat::FlatIndex;
use crate::index::traits::VectorIndex;
use crate::types::{MetricType, Neighbors, SearchParams, SearchResult};

use kmeans::{Cluster, KMeansParams};

pub use build::TrainError;

/// A trained IVF-Flat index.
///
/// Owns the source vectors (moved in from a [`FlatIndex`]) and the cluster
/// partition produced by training. Clusters are immutable after training.
#[derive(Debug, Clone)]
pub struct IvfFlatIndex {
    /// Raw vectors; cluster members index into this arena.
    pub(crate) flat: FlatIndex,
    /// `clusters.len() == nlist`; member sets partition `0..flat.len()`.
    pub(crate) clusters: Vec<Cluster>,
}

impl IvfFlatIndex {
    /// Train an index over the vectors of `flat`.
    ///
    /// # Errors
    /// Whatever k-means rejects: `InvalidArgument` for a zero or oversized
    /// `nlist` or zero `max_iterations`. The [`TrainError`] hands `flat`
    /// back unchanged.
    pub fn train<R: Rng + ?Sized>(
        flat: FlatIndex,
        params: KMeansParams,
        rng: &mut R,
    ) -> std::result::Result<Self, TrainError> {
        build::train_ivf_flat(flat, params, rng)
    }

    /// Train with hyper-parameters and seed taken from `config`.
    ///
    /// `default_nlist` is reduced to the vector count when the index holds
    /// fewer vectors than that.
    pub fn train_with_config(
        flat: FlatIndex,
        config: &IndexingConfig,
    ) -> std::result::Result<Self, TrainError> {
        build::train_ivf_flat_with_config(flat, config)
    }

    /// k-NN search over the `nprobe` clusters nearest to `query` (L2).
    ///
    /// Results are ordered by ascending global vector id.
    pub fn search(&self, query: &[f32], top_k: usize, nprobe: usize) -> Result<Neighbors> {
        search::search_ivf_flat(self, query, top_k, nprobe)
    }

    /// Like [`search`](Self::search) but best-first with L2 distances.
    pub fn search_ranked(
        &self,
        query: &[f32],
        top_k: usize,
        nprobe: usize,
    ) -> Result<Vec<SearchResult>> {
        search::search_ivf_flat_ranked(self, query, top_k, nprobe)
    }

    /// Number of clusters.
    pub fn nlist(&self) -> usize {
        self.clusters.len()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// The underlying vector store.
    pub fn flat(&self) -> &FlatIndex {
        &self.flat
    }

    /// Give back the vector store, dropping the clusters.
    pub fn into_flat(self) -> FlatIndex {
        self.flat
    }
}

impl VectorIndex for IvfFlatIndex {
    fn search(&self, query: &[f32], top_k: usize, params: &SearchParams) -> Result<Neighbors> {
        if params.metric != MetricType::L2 {
            return Err(NanoIvfError::InvalidMetric(format!(
                "IVF-Flat ranks by l2 only, got {}",
                params.metric
            )));
        }
        IvfFlatIndex::search(self, query, top_k, params.nprobe)
    }

    fn vector_count(&self) -> usize {
        self.flat.len()
    }

    fn dimension(&self) -> usize {
        self.flat.dimension()
    }
}
