use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::NanoIvfError;

/// Position of a vector in the index, assigned densely in insertion order.
pub type VectorId = usize;

/// Similarity metric for vector comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Euclidean distance. Smaller is more similar.
    #[default]
    #[serde(alias = "euclidean")]
    L2,
    /// Inner product. Larger is more similar.
    #[serde(alias = "ip", alias = "dot_product")]
    InnerProduct,
    /// Cosine similarity. Larger is more similar.
    Cosine,
}

impl MetricType {
    /// Whether a larger raw score means a closer match under this metric.
    pub fn higher_is_better(self) -> bool {
        match self {
            MetricType::L2 => false,
            MetricType::InnerProduct | MetricType::Cosine => true,
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricType::L2 => write!(f, "l2"),
            MetricType::InnerProduct => write!(f, "inner_product"),
            MetricType::Cosine => write!(f, "cosine"),
        }
    }
}

impl FromStr for MetricType {
    type Err = NanoIvfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l2" | "euclidean" => Ok(MetricType::L2),
            "ip" | "inner_product" | "dot_product" => Ok(MetricType::InnerProduct),
            "cosine" => Ok(MetricType::Cosine),
            other => Err(NanoIvfError::InvalidMetric(other.to_string())),
        }
    }
}

/// Numeric metric codes: 0 = L2, 1 = inner product, 2 = cosine.
impl TryFrom<i32> for MetricType {
    type Error = NanoIvfError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MetricType::L2),
            1 => Ok(MetricType::InnerProduct),
            2 => Ok(MetricType::Cosine),
            other => Err(NanoIvfError::InvalidMetric(format!("metric code {other}"))),
        }
    }
}

/// Result of a k-NN search, ordered by ascending vector id.
///
/// Rank order is not preserved; use `search_ranked` when it matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Neighbors {
    /// Ids of the selected vectors, strictly ascending.
    pub ids: Vec<VectorId>,
    /// Copies of the selected vectors, parallel to `ids`.
    pub vectors: Vec<Vec<f32>>,
}

impl Neighbors {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A ranked search hit carrying the raw metric score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the matched vector.
    pub id: VectorId,
    /// Raw metric value: a distance for L2, a similarity otherwise.
    pub score: f32,
}

/// Per-query knobs shared by every index through `VectorIndex::search`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub metric: MetricType,
    /// Clusters to probe; ignored by exhaustive indexes.
    pub nprobe: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            metric: MetricType::L2,
            nprobe: 1,
        }
    }
}
