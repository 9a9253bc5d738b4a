//! Vector math used by every index: L2 distance, inner product and cosine
//! similarity over equal-length `f32` slices.
//!
//! Unlike a pure "lower is closer" convention, each function returns the raw
//! metric value. Callers pick the selection direction from
//! [`MetricType::higher_is_better`].

use crate::types::MetricType;

/// Dispatch to the raw score for `metric`.
#[inline]
pub fn score(a: &[f32], b: &[f32], metric: MetricType) -> f32 {
    match metric {
        MetricType::L2 => l2_distance(a, b),
        MetricType::InnerProduct => inner_product(a, b),
        MetricType::Cosine => cosine_similarity(a, b),
    }
}

/// Euclidean distance `sqrt(sum((a_i - b_i)^2))`.
#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_l2(a, b).sqrt()
}

/// Squared Euclidean distance. Same ordering as [`l2_distance`] without the sqrt.
#[inline]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions must match");

    let mut sum: f32 = 0.0;
    let chunks = a.len() / 8;
    let remainder = a.len() % 8;

    for i in 0..chunks {
        let base = i * 8;
        let mut lanes = [0.0f32; 8];
        for (j, lane) in lanes.iter_mut().enumerate() {
            let d = a[base + j] - b[base + j];
            *lane = d * d;
        }
        sum += lanes.iter().sum::<f32>();
    }

    let base = chunks * 8;
    for i in 0..remainder {
        let d = a[base + i] - b[base + i];
        sum += d * d;
    }

    sum
}

/// Inner product `sum(a_i * b_i)`.
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions must match");

    let mut sum: f32 = 0.0;
    let chunks = a.len() / 8;
    let remainder = a.len() % 8;

    for i in 0..chunks {
        let base = i * 8;
        let mut lanes = [0.0f32; 8];
        for (j, lane) in lanes.iter_mut().enumerate() {
            *lane = a[base + j] * b[base + j];
        }
        sum += lanes.iter().sum::<f32>();
    }

    let base = chunks * 8;
    for i in 0..remainder {
        sum += a[base + i] * b[base + i];
    }

    sum
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`, in `[-1, 1]`.
///
/// A zero-magnitude operand has no direction; the similarity is 0.0.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions must match");

    let mut dot: f32 = 0.0;
    let mut norm_a: f32 = 0.0;
    let mut norm_b: f32 = 0.0;
    for (&ai, &bi) in a.iter().zip(b) {
        dot += ai * bi;
        norm_a += ai * ai;
        norm_b += bi * bi;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }
    // Clamp to absorb floating-point drift.
    (dot / denom).clamp(-1.0, 1.0)
}

/// L2 norm of a vector.
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    inner_product(v, v).sqrt()
}
