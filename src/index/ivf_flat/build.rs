//! Training phase for IVF-Flat index.
//!
//! Pipeline: take ownership of a populated [`FlatIndex`], run k-means over
//! its vectors, and keep the resulting cluster partition alongside them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::IndexingConfig;
use crate::error::NanoIvfError;
use crate::index::flat::FlatIndex;

use super::kmeans::{KMeans, KMeansParams};
use super::IvfFlatIndex;

/// A failed training run. Carries the vector store back to the caller so
/// training can be retried with different parameters.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct TrainError {
    error: NanoIvfError,
    flat: FlatIndex,
}

impl TrainError {
    /// The underlying failure.
    pub fn error(&self) -> &NanoIvfError {
        &self.error
    }

    /// Recover the vectors that were handed to training.
    pub fn into_flat(self) -> FlatIndex {
        self.flat
    }

    pub fn into_parts(self) -> (NanoIvfError, FlatIndex) {
        (self.error, self.flat)
    }
}

impl From<TrainError> for NanoIvfError {
    fn from(err: TrainError) -> Self {
        err.error
    }
}

/// Train an IVF-Flat index over every vector in `flat`.
///
/// On failure `flat` is returned untouched inside the [`TrainError`].
pub fn train_ivf_flat<R: Rng + ?Sized>(
    flat: FlatIndex,
    params: KMeansParams,
    rng: &mut R,
) -> Result<IvfFlatIndex, TrainError> {
    let dim = flat.dimension();
    info!(
        n = flat.len(),
        dim = dim,
        nlist = params.nlist,
        max_iterations = params.max_iterations,
        delta_threshold = params.delta_threshold,
        "building IVF-Flat index"
    );

    let trained = {
        let vec_refs: Vec<&[f32]> = flat.iter().collect();
        KMeans::new(params).train(&vec_refs, dim, rng)
    };
    let clusters = match trained {
        Ok(clusters) => clusters,
        Err(error) => {
            warn!(error = %error, "IVF-Flat training failed");
            return Err(TrainError { error, flat });
        }
    };

    for (i, c) in clusters.iter().enumerate() {
        debug!(cluster = i, count = c.len(), "cluster assignment");
    }

    Ok(IvfFlatIndex { flat, clusters })
}

/// Train using `config` for `nlist`, iterations, threshold and seed.
pub fn train_ivf_flat_with_config(
    flat: FlatIndex,
    config: &IndexingConfig,
) -> Result<IvfFlatIndex, TrainError> {
    let nlist = config.default_nlist.min(flat.len());
    if nlist < config.default_nlist {
        warn!(
            requested_nlist = config.default_nlist,
            actual_nlist = nlist,
            n = flat.len(),
            "fewer vectors than clusters, reducing nlist"
        );
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    train_ivf_flat(flat, config.kmeans_params(nlist), &mut rng)
}
