//! Index module for nanoivf.
//!
//! Provides the `VectorIndex` trait, distance functions, the bounded top-k
//! selector, and the flat and IVF-Flat index implementations.

pub mod distance;
pub mod flat;
pub mod ivf_flat;
pub mod topk;
pub mod traits;

// Re-export the core trait and the index types at the module level
// so callers can write `use crate::index::{VectorIndex, FlatIndex}`.
pub use flat::FlatIndex;
pub use ivf_flat::kmeans::{Cluster, KMeans, KMeansParams};
pub use ivf_flat::{IvfFlatIndex, TrainError};
pub use topk::{KeepLargest, KeepSmallest, LargestK, SmallestK, TopK};
pub use traits::VectorIndex;
