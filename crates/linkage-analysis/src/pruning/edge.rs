//! Edge-centric pruning over the global weight distribution.

use rayon::prelude::*;

use linkage_core::constants::WEIGHT_TOLERANCE;
use linkage_core::types::Comparison;

use crate::weighting::{mean_plus_k_stddev, CandidateGraph};

/// Weighted Edge Pruning: keep every edge whose weight reaches
/// `mean + filter_ratio · stdev` of all edge weights.
///
/// Returns the retained comparisons and the threshold applied.
pub(crate) fn weighted_edges(
    graph: &CandidateGraph,
    filter_ratio: f64,
) -> (Vec<Comparison>, Option<f64>) {
    let weights: Vec<f64> = graph.edges().map(|(_, _, w)| w).collect();
    let Some(threshold) = mean_plus_k_stddev(&weights, filter_ratio) else {
        return (Vec::new(), None);
    };
    let kept = graph
        .edges()
        .filter(|&(_, _, w)| w + WEIGHT_TOLERANCE >= threshold)
        .map(|(a, b, w)| graph.comparison(a, b, w))
        .collect();
    (kept, Some(threshold))
}

/// Cardinality Edge Pruning: keep the `k` best edges overall, ranked by
/// weight descending then ids ascending.
pub(crate) fn top_k_edges(graph: &CandidateGraph, k: usize) -> Vec<Comparison> {
    let mut ranked: Vec<Comparison> = graph
        .edges()
        .map(|(a, b, w)| graph.comparison(a, b, w))
        .collect();
    if k == 0 {
        return Vec::new();
    }
    if ranked.len() > k {
        ranked.select_nth_unstable_by(k - 1, Comparison::rank_cmp);
        ranked.truncate(k);
    }
    ranked.par_sort_unstable_by(Comparison::rank_cmp);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::EntityIndex;
    use linkage_core::types::{Block, EntityId, WeightingScheme};

    fn graph() -> CandidateGraph {
        let blocks = vec![Block::unilateral([0, 1, 2]), Block::unilateral([1, 2, 3])];
        let index = EntityIndex::build(&blocks, false).unwrap();
        CandidateGraph::build(&index, &blocks, WeightingScheme::Cbs)
    }

    #[test]
    fn test_weighted_edges_keep_above_mean() {
        // weights 1,1,2,1,1 -> mean 1.2
        let (kept, threshold) = weighted_edges(&graph(), 0.0);
        assert!((threshold.unwrap() - 1.2).abs() < 1e-12);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].key(), (EntityId(1), EntityId(2)));
    }

    #[test]
    fn test_top_k_breaks_ties_by_id() {
        let kept = top_k_edges(&graph(), 3);
        let keys: Vec<_> = kept.iter().map(|c| (c.id1.0, c.id2.0)).collect();
        assert_eq!(keys, vec![(1, 2), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_top_k_larger_than_graph_keeps_everything() {
        assert_eq!(top_k_edges(&graph(), 100).len(), 5);
        assert!(top_k_edges(&graph(), 0).is_empty());
    }
}
