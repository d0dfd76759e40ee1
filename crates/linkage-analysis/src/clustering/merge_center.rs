//! Merge-Center Clustering: Center Clustering that fuses overlapping stars.

use linkage_core::config::SimilarityThreshold;
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::ClusteringMethod;

use super::center::center_groups;
use super::types::{threshold_parameter, Cluster, SimilarityGraph};

#[derive(Debug, Clone, Default)]
pub struct MergeCenterClustering {
    threshold: SimilarityThreshold,
}

impl MergeCenterClustering {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self { threshold }
    }
}

impl Cluster for MergeCenterClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::MergeCenter
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        Ok(center_groups(graph, true))
    }
}

impl Configurable for MergeCenterClustering {
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
    use crate::clustering::CenterClustering;
    use linkage_core::types::{EntityId, EquivalenceCluster, SimilarityPairs};

    fn ids(raw: &[u32]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId).collect()
    }

    fn pairs() -> SimilarityPairs {
        // Stars around centers 1 and 3, then center 1 touches member 2.
        SimilarityPairs::from_triples(
            [(0, 1, 0.95), (2, 3, 0.9), (1, 2, 0.85), (0, 4, 0.55)],
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_center_keeps_stars_apart() {
        let clusters = CenterClustering::default().cluster(&pairs(), false).unwrap();
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_merge_center_fuses_stars() {
        let clusters = MergeCenterClustering::default()
            .cluster(&pairs(), false)
            .unwrap();
        assert_eq!(clusters, vec![EquivalenceCluster::dirty(ids(&[0, 1, 2, 3]))]);
    }
}
