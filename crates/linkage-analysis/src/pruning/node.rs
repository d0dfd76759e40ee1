//! Node-centric pruning: every entity votes on its own neighborhood.
//!
//! Votes are computed in parallel, one entity per task, reading only that
//! entity's adjacency list. Edge decisions then combine the two endpoint
//! votes according to the reciprocity of the policy.

use std::cmp::Ordering;

use rayon::prelude::*;

use linkage_core::constants::WEIGHT_TOLERANCE;
use linkage_core::types::Comparison;

use super::types::Reciprocity;
use crate::weighting::{mean_plus_k_stddev, CandidateGraph, WeightedNeighbor};

/// Neighbors an entity votes to keep, ascending by id, with edge weights.
pub(crate) type Votes = Vec<Vec<(usize, f64)>>;

/// Each entity keeps neighbors weighing at least its local
/// `mean + filter_ratio · stdev`.
pub(crate) fn threshold_votes(graph: &CandidateGraph, filter_ratio: f64) -> Votes {
    (0..graph.len())
        .into_par_iter()
        .map(|entity| {
            let neighbors = graph.neighbors(entity);
            let weights: Vec<f64> = neighbors.iter().map(|n| n.weight).collect();
            let Some(threshold) = mean_plus_k_stddev(&weights, filter_ratio) else {
                return Vec::new();
            };
            neighbors
                .iter()
                .filter(|n| n.weight + WEIGHT_TOLERANCE >= threshold)
                .map(|n| (n.neighbor, n.weight))
                .collect()
        })
        .collect()
}

/// Each entity keeps its `k` best neighbors, ranked by weight descending
/// then id ascending.
pub(crate) fn cardinality_votes(graph: &CandidateGraph, k: usize) -> Votes {
    (0..graph.len())
        .into_par_iter()
        .map(|entity| {
            let mut ranked: Vec<WeightedNeighbor> = graph.neighbors(entity).to_vec();
            if k == 0 {
                return Vec::new();
            }
            if ranked.len() > k {
                ranked.select_nth_unstable_by(k - 1, rank_neighbors);
                ranked.truncate(k);
            }
            let mut kept: Vec<(usize, f64)> =
                ranked.into_iter().map(|n| (n.neighbor, n.weight)).collect();
            kept.sort_unstable_by_key(|&(id, _)| id);
            kept
        })
        .collect()
}

fn rank_neighbors(a: &WeightedNeighbor, b: &WeightedNeighbor) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.neighbor.cmp(&b.neighbor))
}

/// Turn per-entity votes into retained comparisons, each edge once.
pub(crate) fn combine_votes(
    graph: &CandidateGraph,
    votes: &Votes,
    reciprocity: Reciprocity,
) -> Vec<Comparison> {
    let voted = |entity: usize, other: usize| {
        votes
            .get(entity)
            .is_some_and(|v| v.binary_search_by_key(&other, |&(id, _)| id).is_ok())
    };

    let mut kept: Vec<(usize, usize, f64)> = votes
        .par_iter()
        .enumerate()
        .flat_map_iter(|(a, list)| {
            list.iter().filter_map(move |&(b, w)| {
                let other_vote = voted(b, a);
                match reciprocity {
                    Reciprocity::Reciprocal => (a < b && other_vote).then_some((a, b, w)),
                    // Emit from the lower endpoint, or from the higher one
                    // when only it voted.
                    Reciprocity::None if a < b => Some((a, b, w)),
                    Reciprocity::None => (!other_vote).then_some((b, a, w)),
                }
            })
        })
        .collect();
    kept.par_sort_unstable_by_key(|&(a, b, _)| (a, b));
    kept.into_iter()
        .map(|(a, b, w)| graph.comparison(a, b, w))
        .collect()
}
