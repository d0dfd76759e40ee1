//! Ricochet Sequential Rippling clustering.
//!
//! Vertices are visited by rank (mean incident weight, with a tiny degree
//! term so better connected vertices win ties). A visited vertex becomes a
//! center when it can pull at least one neighbor away from that
//! neighbor's current center, i.e. the connecting edge is heavier than
//! the neighbor's similarity to its center. Centers never move. Pending
//! neighbors of a new center are re-ranked without the edge to it.
//! Centers that lose every member afterwards join the cluster of their
//! most similar neighbor. Runs single threaded: every assignment changes
//! the ranks of the vertices around it.

use linkage_core::config::SimilarityThreshold;
use linkage_core::constants::RICOCHET_DEGREE_EPSILON;
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{ClusteringMethod, VertexWeight};

use super::heap::IndexedMaxHeap;
use super::types::{threshold_parameter, Cluster, SimilarityGraph};

#[derive(Debug, Clone, Default)]
pub struct RicochetSrClustering {
    threshold: SimilarityThreshold,
}

impl RicochetSrClustering {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self { threshold }
    }
}

fn rank(weight: &VertexWeight) -> f64 {
    weight.average() + RICOCHET_DEGREE_EPSILON * weight.degree as f64
}

impl Cluster for RicochetSrClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::RicochetSr
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        let n = graph.vertex_count();
        let adjacency = graph.adjacency();
        let mut weights = graph.vertex_weights();

        let mut pending = IndexedMaxHeap::with_capacity(n);
        for (v, weight) in weights.iter().enumerate() {
            if weight.degree > 0 {
                pending.push(v, rank(weight));
            }
        }

        let mut center_of: Vec<Option<usize>> = vec![None; n];
        let mut similarity = vec![f64::NEG_INFINITY; n];
        let mut is_center = vec![false; n];
        // Members per center, the center itself excluded.
        let mut members = vec![0usize; n];
        let mut centers = 0usize;

        while let Some((v, _)) = pending.pop() {
            let pulled: Vec<(usize, f64)> = adjacency[v]
                .iter()
                .copied()
                .filter(|&(u, w)| !is_center[u] && w > similarity[u])
                .collect();
            if pulled.is_empty() {
                continue;
            }

            if let Some(old) = center_of[v] {
                members[old] -= 1;
            }
            is_center[v] = true;
            center_of[v] = Some(v);
            similarity[v] = f64::INFINITY;
            centers += 1;
            for (u, w) in pulled {
                if let Some(old) = center_of[u] {
                    members[old] -= 1;
                }
                center_of[u] = Some(v);
                similarity[u] = w;
                members[v] += 1;
            }

            for &(u, _) in &adjacency[v] {
                if pending.contains(u) {
                    weights[u].remove_neighbor(v);
                    pending.update(u, rank(&weights[u]));
                }
            }
        }

        let lonely: Vec<usize> = (0..n).filter(|&c| is_center[c] && members[c] == 0).collect();
        let mut reattached = 0usize;
        for c in lonely {
            // An earlier lonely center may have joined this one.
            if members[c] > 0 {
                continue;
            }
            let target = adjacency[c]
                .iter()
                .filter_map(|&(u, w)| center_of[u].filter(|&t| t != c).map(|t| (t, w)))
                .max_by(|x, y| x.1.total_cmp(&y.1).then_with(|| y.0.cmp(&x.0)));
            if let Some((t, _)) = target {
                center_of[c] = Some(t);
                members[t] += 1;
                reattached += 1;
            }
        }
        tracing::debug!(centers, reattached, "ricochet assignment done");

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (v, center) in center_of.iter().enumerate() {
            if let Some(c) = center {
                groups[*c].push(v);
            }
        }
        groups.retain(|g| !g.is_empty());
        Ok(groups)
    }
}

impl Configurable for RicochetSrClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![threshold_parameter(self.threshold)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkage_core::types::{EntityId, EquivalenceCluster, SimilarityPairs};

    fn ids(raw: &[u32]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId).collect()
    }

    #[test]
    fn test_two_stars() {
        // 0 and 4 are hubs; 2 sits between them but is closer to 4.
        let pairs = SimilarityPairs::from_triples(
            [
                (0, 1, 0.9),
                (0, 2, 0.6),
                (0, 3, 0.9),
                (4, 2, 0.95),
                (4, 5, 0.9),
            ],
            false,
        )
        .unwrap();
        let clusters = RicochetSrClustering::default()
            .cluster(&pairs, false)
            .unwrap();
        assert_eq!(
            clusters,
            vec![
                EquivalenceCluster::dirty(ids(&[0, 1, 3])),
                EquivalenceCluster::dirty(ids(&[2, 4, 5])),
            ]
        );
    }

    #[test]
    fn test_single_edge_is_one_cluster() {
        let pairs = SimilarityPairs::from_triples([(3, 7, 0.8)], false).unwrap();
        let clusters = RicochetSrClustering::default()
            .cluster(&pairs, false)
            .unwrap();
        assert_eq!(clusters, vec![EquivalenceCluster::dirty(ids(&[3, 7]))]);
    }

    #[test]
    fn test_every_vertex_in_at_most_one_cluster() {
        let pairs = SimilarityPairs::from_triples(
            [
                (0, 1, 0.9),
                (1, 2, 0.9),
                (2, 3, 0.9),
                (3, 0, 0.9),
                (0, 2, 0.7),
            ],
            false,
        )
        .unwrap();
        let clusters = RicochetSrClustering::default()
            .cluster(&pairs, false)
            .unwrap();
        let mut seen: Vec<EntityId> = clusters.iter().flat_map(|c| c.d1().to_vec()).collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
