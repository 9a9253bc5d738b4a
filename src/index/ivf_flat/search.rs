//! Search phase for IVF-Flat index.
//!
//! 1. Build a transient flat index over the centroids and take the
//!    `nprobe` nearest by L2.
//! 2. Copy every member of those clusters into a second transient flat
//!    index, remembering each candidate's global id.
//! 3. Run the k-NN search on the candidates and translate the local ids
//!    back to global ids.

use tracing::debug;

use crate::error::{NanoIvfError, Result};
use crate::index::flat::FlatIndex;
use crate::types::{MetricType, Neighbors, SearchResult, VectorId};

use super::IvfFlatIndex;

/// Candidate vectors gathered from the probed clusters.
struct Candidates {
    index: FlatIndex,
    /// `global_ids[local] == global`, strictly ascending.
    global_ids: Vec<VectorId>,
}

/// Execute an IVF-Flat search, returning hits by ascending global id.
pub fn search_ivf_flat(
    index: &IvfFlatIndex,
    query: &[f32],
    top_k: usize,
    nprobe: usize,
) -> Result<Neighbors> {
    let candidates = gather_candidates(index, query, top_k, nprobe)?;
    let local = candidates.index.search(query, top_k, MetricType::L2)?;

    // Local ids ascend and `global_ids` is monotonic, so the translated ids
    // still ascend.
    let ids = local
        .ids
        .iter()
        .map(|&l| candidates.global_ids[l])
        .collect();

    debug!(returned = local.ids.len(), top_k = top_k, "search complete");
    Ok(Neighbors {
        ids,
        vectors: local.vectors,
    })
}

/// Execute an IVF-Flat search, returning hits best-first with L2 distances.
pub fn search_ivf_flat_ranked(
    index: &IvfFlatIndex,
    query: &[f32],
    top_k: usize,
    nprobe: usize,
) -> Result<Vec<SearchResult>> {
    let candidates = gather_candidates(index, query, top_k, nprobe)?;
    let ranked = candidates
        .index
        .search_ranked(query, top_k, MetricType::L2)?
        .into_iter()
        .map(|hit| SearchResult {
            id: candidates.global_ids[hit.id],
            score: hit.score,
        })
        .collect();
    Ok(ranked)
}

fn gather_candidates(
    index: &IvfFlatIndex,
    query: &[f32],
    top_k: usize,
    nprobe: usize,
) -> Result<Candidates> {
    if top_k == 0 {
        return Err(NanoIvfError::InvalidArgument("top_k must be > 0".into()));
    }
    if nprobe == 0 {
        return Err(NanoIvfError::InvalidArgument("nprobe must be > 0".into()));
    }

    let dim = index.flat.dimension();
    let nlist = index.clusters.len();
    let effective_nprobe = nprobe.min(nlist);

    // --- Step 1: Pick the nearest centroids ---
    let mut centroid_index = FlatIndex::new(nlist, dim);
    for cluster in &index.clusters {
        centroid_index.add(cluster.centroid())?;
    }
    let probe_clusters = centroid_index.search(query, effective_nprobe, MetricType::L2)?.ids;

    debug!(
        nprobe = effective_nprobe,
        clusters = ?probe_clusters,
        "probing clusters"
    );

    // --- Step 2: Collect their members ---
    // Inserting in global id order keeps tie-breaking identical to an
    // exhaustive search over the same vectors.
    let mut global_ids: Vec<VectorId> = probe_clusters
        .iter()
        .flat_map(|&c| index.clusters[c].members().iter().copied())
        .collect();
    global_ids.sort_unstable();

    let mut candidate_index = FlatIndex::new(global_ids.len(), dim);
    for &id in &global_ids {
        candidate_index.add(index.flat.row(id))?;
    }

    debug!(total_candidates = global_ids.len(), "gathered candidates");

    Ok(Candidates {
        index: candidate_index,
        global_ids,
    })
}
