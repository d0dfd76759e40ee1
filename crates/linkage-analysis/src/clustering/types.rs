//! Shared clustering input, output handling and the `Cluster` capability.

use std::time::Instant;

use rayon::prelude::*;

use linkage_core::config::SimilarityThreshold;
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{
    ClusteringMethod, Dataset, EquivalenceCluster, FxHashMap, IdSpace, SimilarityPairs,
    VertexWeight,
};

use crate::graph::{ConnectedComponents, UndirectedGraph};
use crate::weighting::mean_plus_k_stddev;

/// A surviving similarity edge over flat ids, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityEdge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// The thresholded similarity graph every algorithm works on.
///
/// Clean-clean pairs are mapped into one flat id space (D2 ids shifted by
/// the D1 id count). Dirty self pairs are dropped, repeated pairs keep
/// their largest weight, and only weights strictly above the threshold
/// survive. Surviving negative weights are clamped to 0 so flow and
/// Markov arithmetic only ever see non-negative capacities.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    id_space: IdSpace,
    threshold: f64,
    edges: Vec<SimilarityEdge>,
}

impl SimilarityGraph {
    pub fn build(
        pairs: &SimilarityPairs,
        clean_clean: bool,
        threshold: SimilarityThreshold,
    ) -> Self {
        let (bound1, bound2) = pairs.id_bounds();
        let id_space = if clean_clean {
            IdSpace::clean_clean(bound1, bound2)
        } else {
            IdSpace::dirty(bound1.max(bound2))
        };
        let cutoff = resolve_threshold(pairs.weights(), threshold);

        let mut best: FxHashMap<(usize, usize), f64> = FxHashMap::default();
        for (id1, id2, weight) in pairs.iter() {
            let key = if clean_clean {
                (id1.index(), id_space.dataset_limit() + id2.index())
            } else if id1 == id2 {
                continue;
            } else {
                (id1.index().min(id2.index()), id1.index().max(id2.index()))
            };
            best.entry(key)
                .and_modify(|w| *w = w.max(weight))
                .or_insert(weight);
        }

        let mut edges: Vec<SimilarityEdge> = best
            .into_iter()
            .filter(|&(_, weight)| weight > cutoff)
            .map(|((a, b), weight)| SimilarityEdge {
                a,
                b,
                weight: weight.max(0.0),
            })
            .collect();
        edges.sort_unstable_by_key(|e| (e.a, e.b));

        tracing::debug!(
            pairs = pairs.len(),
            edges = edges.len(),
            threshold = cutoff,
            "similarity graph built"
        );
        Self {
            id_space,
            threshold: cutoff,
            edges,
        }
    }

    pub fn id_space(&self) -> IdSpace {
        self.id_space
    }

    pub fn is_clean_clean(&self) -> bool {
        self.id_space.is_clean_clean()
    }

    pub fn vertex_count(&self) -> usize {
        self.id_space.len()
    }

    /// The resolved similarity cut-off.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Surviving edges ordered by `(a, b)`.
    pub fn edges(&self) -> &[SimilarityEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Surviving edges by weight descending, then ids ascending.
    pub fn edges_by_weight(&self) -> Vec<SimilarityEdge> {
        let mut edges = self.edges.clone();
        edges.sort_by(|x, y| {
            y.weight
                .total_cmp(&x.weight)
                .then_with(|| (x.a, x.b).cmp(&(y.a, y.b)))
        });
        edges
    }

    /// Weighted neighbor lists, each ascending by neighbor.
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adjacency = vec![Vec::new(); self.vertex_count()];
        for e in &self.edges {
            adjacency[e.a].push((e.b, e.weight));
            adjacency[e.b].push((e.a, e.weight));
        }
        adjacency
    }

    /// Per-vertex incident weight summaries.
    pub fn vertex_weights(&self) -> Vec<VertexWeight> {
        let mut weights: Vec<VertexWeight> =
            (0..self.vertex_count()).map(VertexWeight::new).collect();
        for e in &self.edges {
            weights[e.a].add_neighbor(e.b, e.weight);
            weights[e.b].add_neighbor(e.a, e.weight);
        }
        weights
    }

    /// Unweighted view of the surviving edges.
    pub fn undirected(&self) -> UndirectedGraph {
        let mut graph = UndirectedGraph::new(self.vertex_count());
        for e in &self.edges {
            // Ids are in range and a < b by construction.
            let _ = graph.add_edge(e.a, e.b);
        }
        graph
    }

    /// Connected components with at least one edge, each ascending.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let graph = self.undirected();
        ConnectedComponents::new(&graph)
            .components()
            .into_iter()
            .filter(|c| c.len() > 1)
            .collect()
    }

    /// Turn vertex groups into output clusters.
    ///
    /// Singletons are dropped. A clean-clean group with an empty side is
    /// logged and skipped. Clusters come back ordered by smallest member.
    pub fn finalize(&self, groups: Vec<Vec<usize>>) -> Vec<EquivalenceCluster> {
        let id_space = self.id_space;
        let clean_clean = self.is_clean_clean();
        let mut clusters: Vec<EquivalenceCluster> = groups
            .into_par_iter()
            .filter(|group| group.len() > 1)
            .filter_map(|group| {
                if !clean_clean {
                    let members = group.iter().map(|&v| id_space.local(v).1).collect();
                    return Some(EquivalenceCluster::dirty(members));
                }
                let (mut d1, mut d2) = (Vec::new(), Vec::new());
                for &v in &group {
                    match id_space.local(v) {
                        (Dataset::D1, id) => d1.push(id),
                        (Dataset::D2, id) => d2.push(id),
                    }
                }
                let cluster = EquivalenceCluster::new(d1, d2);
                if cluster.has_empty_side() {
                    tracing::warn!(
                        size = cluster.size(),
                        "skipping clean-clean cluster with an empty side"
                    );
                    return None;
                }
                Some(cluster)
            })
            .collect();
        clusters.sort_by_key(EquivalenceCluster::sort_key);
        clusters
    }
}

/// Resolve a threshold policy against the observed similarities.
pub fn resolve_threshold(weights: &[f64], threshold: SimilarityThreshold) -> f64 {
    match threshold {
        SimilarityThreshold::Fixed { value } => value,
        SimilarityThreshold::MeanStdDev { k } => {
            mean_plus_k_stddev(weights, k).unwrap_or(0.0)
        }
    }
}

/// Parameter metadata for a threshold policy.
pub(crate) fn threshold_parameter(threshold: SimilarityThreshold) -> ParameterSpec {
    match threshold {
        SimilarityThreshold::Fixed { value } => ParameterSpec::float(
            "similarity_threshold",
            "Edges at or below this similarity are ignored",
            value,
            0.0,
            1.0,
            0.05,
        ),
        SimilarityThreshold::MeanStdDev { k } => ParameterSpec::float(
            "threshold_stddev_k",
            "Threshold is the mean similarity plus k standard deviations",
            k,
            -1.0,
            3.0,
            0.25,
        ),
    }
}

/// Entity clustering over weighted similarity pairs.
///
/// Implementors supply the grouping step; the provided `cluster` builds
/// the thresholded graph and turns groups into clusters.
pub trait Cluster: Configurable + Send + Sync {
    fn method(&self) -> ClusteringMethod;

    /// Similarity cut-off policy of this instance.
    fn threshold(&self) -> SimilarityThreshold;

    /// Partition (part of) the graph's vertices into groups.
    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError>;

    fn cluster(
        &self,
        pairs: &SimilarityPairs,
        clean_clean: bool,
    ) -> Result<Vec<EquivalenceCluster>, ClusteringError> {
        let start = Instant::now();
        let graph = SimilarityGraph::build(pairs, clean_clean, self.threshold());
        let groups = self.groups(&graph)?;
        let clusters = graph.finalize(groups);
        tracing::info!(
            method = %self.method(),
            pairs = pairs.len(),
            edges = graph.edge_count(),
            clusters = clusters.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "clustering complete"
        );
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkage_core::types::EntityId;

    #[test]
    fn test_dirty_graph_canonicalizes_and_keeps_max() {
        let pairs =
            SimilarityPairs::from_triples([(2, 1, 0.6), (1, 2, 0.9), (3, 3, 1.0), (0, 1, 0.4)], false)
                .unwrap();
        let graph = SimilarityGraph::build(&pairs, false, SimilarityThreshold::default());
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(
            graph.edges(),
            &[SimilarityEdge { a: 1, b: 2, weight: 0.9 }]
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let pairs = SimilarityPairs::from_triples([(0, 1, 0.5), (1, 2, 0.51)], false).unwrap();
        let graph = SimilarityGraph::build(&pairs, false, SimilarityThreshold::Fixed { value: 0.5 });
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].a, 1);
    }

    #[test]
    fn test_mean_stddev_threshold() {
        let pairs =
            SimilarityPairs::from_triples([(0, 1, 0.2), (1, 2, 0.4), (2, 3, 0.9)], false).unwrap();
        let graph = SimilarityGraph::build(&pairs, false, SimilarityThreshold::MeanStdDev { k: 0.0 });
        assert!((graph.threshold() - 0.5).abs() < 1e-12);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_negative_weights_above_threshold_are_clamped() {
        let pairs =
            SimilarityPairs::from_triples([(0, 1, -0.2), (1, 2, -0.9), (2, 3, 0.4)], false)
                .unwrap();
        let graph = SimilarityGraph::build(&pairs, false, SimilarityThreshold::Fixed { value: -0.5 });
        assert_eq!(
            graph.edges(),
            &[
                SimilarityEdge { a: 0, b: 1, weight: 0.0 },
                SimilarityEdge { a: 2, b: 3, weight: 0.4 },
            ]
        );
    }

    #[test]
    fn test_clean_clean_finalize_splits_sides() {
        let pairs = SimilarityPairs::from_triples([(0, 1, 0.9), (1, 0, 0.8)], true).unwrap();
        let graph = SimilarityGraph::build(&pairs, true, SimilarityThreshold::default());
        // D1 = {0, 1}, D2 flat ids = {2, 3}
        let clusters = graph.finalize(vec![vec![1, 2], vec![0, 3], vec![0, 1], vec![3]]);
        assert_eq!(
            clusters,
            vec![
                EquivalenceCluster::new(vec![EntityId(0)], vec![EntityId(1)]),
                EquivalenceCluster::new(vec![EntityId(1)], vec![EntityId(0)]),
            ]
        );
    }

    #[test]
    fn test_adjacency_is_sorted() {
        let pairs =
            SimilarityPairs::from_triples([(3, 1, 0.9), (1, 0, 0.9), (1, 2, 0.9)], false).unwrap();
        let graph = SimilarityGraph::build(&pairs, false, SimilarityThreshold::default());
        let neighbors: Vec<usize> = graph.adjacency()[1].iter().map(|&(n, _)| n).collect();
        assert_eq!(neighbors, vec![0, 2, 3]);
    }
}
