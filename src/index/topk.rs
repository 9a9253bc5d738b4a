//! Bounded top-k selection over a stream of `(score, id)` pairs.
//!
//! A [`TopK`] keeps the `k` best entries seen so far in a binary heap whose
//! root is the *worst* retained entry, so deciding whether a new candidate
//! gets in is a single comparison against the root. The ordering is a type
//! parameter:
//!
//! - [`KeepSmallest`]: a max-heap on score, for distances (L2).
//! - [`KeepLargest`]: a min-heap on score, for similarities (IP, cosine).
//!
//! Entries are exposed in heap order. Use [`TopK::into_ranked`] for
//! best-first output.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::error::{NanoIvfError, Result};
use crate::types::VectorId;

/// Decides which of two scores ranks lower under a selection direction.
pub trait KeepOrder {
    /// True when `a` is strictly worse than `b`.
    fn worse(a: f32, b: f32) -> bool;

    /// Total best-first order over scores, `Less` when `a` ranks ahead.
    /// NaN sorts after every number.
    fn rank(a: f32, b: f32) -> Ordering;
}

/// Retain the smallest scores (max-heap on score).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepSmallest;

impl KeepOrder for KeepSmallest {
    #[inline]
    fn worse(a: f32, b: f32) -> bool {
        a > b
    }

    #[inline]
    fn rank(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (false, false) => a.total_cmp(&b),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        }
    }
}

/// Retain the largest scores (min-heap on score).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepLargest;

impl KeepOrder for KeepLargest {
    #[inline]
    fn worse(a: f32, b: f32) -> bool {
        a < b
    }

    #[inline]
    fn rank(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (false, false) => b.total_cmp(&a),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        }
    }
}

/// Selector keeping the `k` smallest scores.
pub type SmallestK = TopK<KeepSmallest>;
/// Selector keeping the `k` largest scores.
pub type LargestK = TopK<KeepLargest>;

/// Fixed-capacity heap of `(score, id)` pairs.
///
/// Invariant: `scores` and `ids` are parallel, hold at most `capacity`
/// entries, and satisfy the heap property for `O` (no child is worse than
/// its parent).
#[derive(Debug, Clone)]
pub struct TopK<O> {
    scores: Vec<f32>,
    ids: Vec<VectorId>,
    capacity: usize,
    _order: PhantomData<O>,
}

impl<O: KeepOrder> TopK<O> {
    /// Create an empty selector holding at most `k` entries.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(NanoIvfError::InvalidArgument("k must be > 0".into()));
        }
        Ok(Self {
            scores: Vec::with_capacity(k),
            ids: Vec::with_capacity(k),
            capacity: k,
            _order: PhantomData,
        })
    }

    /// Offer a candidate.
    ///
    /// Once full, the candidate replaces the root only if it is strictly
    /// better. A tie with the current worst entry keeps the earlier arrival.
    pub fn push(&mut self, score: f32, id: VectorId) {
        if self.scores.len() < self.capacity {
            self.insert(score, id);
        } else if O::worse(self.scores[0], score) {
            self.evict_root();
            self.insert(score, id);
        }
    }

    /// Remove the root (the worst retained entry) and return its score.
    pub fn pop(&mut self) -> Result<f32> {
        if self.scores.is_empty() {
            return Err(NanoIvfError::EmptyContainer);
        }
        Ok(self.evict_root())
    }

    /// Score of the root without removing it.
    pub fn peek(&self) -> Result<f32> {
        self.scores
            .first()
            .copied()
            .ok_or(NanoIvfError::EmptyContainer)
    }

    /// Retained ids, in heap order.
    pub fn ids(&self) -> &[VectorId] {
        &self.ids
    }

    /// Retained scores, in heap order, parallel to [`ids`](Self::ids).
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Consume the selector into `(id, score)` pairs, best first.
    ///
    /// Equal scores are ordered by ascending id. NaN scores come last.
    pub fn into_ranked(self) -> Vec<(VectorId, f32)> {
        let mut ranked: Vec<(VectorId, f32)> = self.ids.into_iter().zip(self.scores).collect();
        ranked.sort_by(|a, b| O::rank(a.1, b.1).then(a.0.cmp(&b.0)));
        ranked
    }

    fn insert(&mut self, score: f32, id: VectorId) {
        self.scores.push(score);
        self.ids.push(id);
        self.sift_up(self.scores.len() - 1);
    }

    /// Move the last entry into the root slot and restore the heap.
    /// Caller guarantees the heap is non-empty.
    fn evict_root(&mut self) -> f32 {
        let top = self.scores.swap_remove(0);
        self.ids.swap_remove(0);
        if !self.scores.is_empty() {
            self.sift_down(0);
        }
        top
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !O::worse(self.scores[i], self.scores[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.scores.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut worst = i;

            if left < len && O::worse(self.scores[left], self.scores[worst]) {
                worst = left;
            }
            if right < len && O::worse(self.scores[right], self.scores[worst]) {
                worst = right;
            }
            if worst == i {
                break;
            }
            self.swap(i, worst);
            i = worst;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.scores.swap(a, b);
        self.ids.swap(a, b);
    }
}
