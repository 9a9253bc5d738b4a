use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nanoivf::index::FlatIndex;

/// `n` uniform random vectors in `[-1, 1)^dim`, reproducible from `seed`.
pub fn random_vectors(n: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

/// `num_clusters * per_cluster` vectors scattered around well-separated
/// centers. Returns the vectors and the centers.
pub fn clustered_vectors(
    num_clusters: usize,
    per_cluster: usize,
    dim: usize,
    spread: f32,
    seed: u64,
) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let centers: Vec<Vec<f32>> = (0..num_clusters)
        .map(|c| {
            (0..dim)
                .map(|d| if d == c % dim { 10.0 * (c + 1) as f32 } else { 0.0 })
                .collect()
        })
        .collect();

    let mut vectors = Vec::with_capacity(num_clusters * per_cluster);
    for center in &centers {
        for _ in 0..per_cluster {
            vectors.push(
                center
                    .iter()
                    .map(|&x| x + rng.gen_range(-spread..spread))
                    .collect(),
            );
        }
    }
    (vectors, centers)
}

/// A flat index sized exactly to hold `vectors`.
pub fn flat_from(vectors: &[Vec<f32>], dim: usize) -> FlatIndex {
    let mut flat = FlatIndex::new(vectors.len(), dim);
    flat.batch_add(vectors).expect("vectors fit the index");
    flat
}
