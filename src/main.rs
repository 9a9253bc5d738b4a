use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nanoivf::index::{FlatIndex, IvfFlatIndex};
use nanoivf::startup::bootstrap;
use nanoivf::types::MetricType;

const NUM_VECTORS: usize = 2_000;
const DIM: usize = 32;
const NUM_QUERIES: usize = 20;
const TOP_K: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config priority: NANOIVF_CONFIG env var > ./nanoivf.toml > defaults
    let config = bootstrap()?;

    let mut rng = StdRng::seed_from_u64(config.indexing.seed.unwrap_or(0));
    let mut flat = FlatIndex::new(NUM_VECTORS, DIM);
    for _ in 0..NUM_VECTORS {
        let v: Vec<f32> = (0..DIM).map(|_| rng.gen_range(-1.0..1.0)).collect();
        flat.add(&v)?;
    }
    tracing::info!(n = NUM_VECTORS, dim = DIM, "generated dataset");

    let exact = flat.clone();
    let ivf = IvfFlatIndex::train_with_config(flat, &config.indexing)?;
    let nprobe = config.indexing.default_nprobe;

    let mut hits = 0usize;
    for _ in 0..NUM_QUERIES {
        let query: Vec<f32> = (0..DIM).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let truth: HashSet<usize> = exact
            .search(&query, TOP_K, MetricType::L2)?
            .ids
            .into_iter()
            .collect();
        let approx = ivf.search(&query, TOP_K, nprobe)?;
        hits += approx.ids.iter().filter(|id| truth.contains(id)).count();
    }

    let recall = hits as f64 / (NUM_QUERIES * TOP_K) as f64;
    tracing::info!(
        nlist = ivf.nlist(),
        nprobe = nprobe,
        top_k = TOP_K,
        recall = recall,
        "ivf recall against exact search"
    );

    Ok(())
}
