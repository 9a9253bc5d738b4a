//! Core trait shared by the index implementations.
//!
//! Both the exhaustive [`FlatIndex`](crate::index::FlatIndex) and the
//! clustered [`IvfFlatIndex`](crate::index::IvfFlatIndex) implement
//! `VectorIndex`, so recall comparisons and callers that pick an index type
//! at runtime can hold a `&dyn VectorIndex`.

use crate::error::Result;
use crate::types::{Neighbors, SearchParams};

pub trait VectorIndex {
    /// Search for the `top_k` nearest neighbors of `query`.
    ///
    /// Results are ordered by ascending vector id.
    ///
    /// # Errors
    /// `DimensionMismatch` if the query length differs from the index
    /// dimension, `InvalidArgument` for a zero `top_k` (or a zero `nprobe` on
    /// clustered indexes), `InvalidMetric` if the index cannot rank by
    /// `params.metric`.
    fn search(&self, query: &[f32], top_k: usize, params: &SearchParams) -> Result<Neighbors>;

    /// Total number of vectors in this index.
    fn vector_count(&self) -> usize;

    /// Dimensionality of vectors in this index.
    fn dimension(&self) -> usize;
}
