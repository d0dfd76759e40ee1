//! Unique Mapping Clustering: greedy one-to-one matching for clean-clean ER.

use linkage_core::config::SimilarityThreshold;
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{ClusteringMethod, EquivalenceCluster, SimilarityPairs};

use super::types::{threshold_parameter, Cluster, SimilarityGraph};

/// Accepts edges by weight descending while both endpoints are unmatched.
#[derive(Debug, Clone, Default)]
pub struct UniqueMappingClustering {
    threshold: SimilarityThreshold,
}

impl UniqueMappingClustering {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self { threshold }
    }
}

fn requires_clean_clean() -> ClusteringError {
    ClusteringError::RequiresCleanClean {
        algorithm: ClusteringMethod::UniqueMapping.name(),
    }
}

impl Cluster for UniqueMappingClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::UniqueMapping
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        if !graph.is_clean_clean() && graph.edge_count() > 0 {
            return Err(requires_clean_clean());
        }
        let mut matched = vec![false; graph.vertex_count()];
        let mut groups = Vec::new();
        for edge in graph.edges_by_weight() {
            if matched[edge.a] || matched[edge.b] {
                continue;
            }
            matched[edge.a] = true;
            matched[edge.b] = true;
            groups.push(vec![edge.a, edge.b]);
        }
        Ok(groups)
    }

    fn cluster(
        &self,
        pairs: &SimilarityPairs,
        clean_clean: bool,
    ) -> Result<Vec<EquivalenceCluster>, ClusteringError> {
        if !clean_clean {
            return Err(requires_clean_clean());
        }
        let graph = SimilarityGraph::build(pairs, clean_clean, self.threshold);
        let groups = self.groups(&graph)?;
        let clusters = graph.finalize(groups);
        tracing::info!(
            method = %self.method(),
            pairs = pairs.len(),
            matches = clusters.len(),
            "unique mapping complete"
        );
        Ok(clusters)
    }
}

impl Configurable for UniqueMappingClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![threshold_parameter(self.threshold)]
    }
}
