//! Connected Components Clustering.

use linkage_core::config::SimilarityThreshold;
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::ClusteringMethod;

use super::types::{threshold_parameter, Cluster, SimilarityGraph};

/// Every connected component of the thresholded graph is one cluster.
#[derive(Debug, Clone, Default)]
pub struct ConnectedComponentsClustering {
    threshold: SimilarityThreshold,
}

impl ConnectedComponentsClustering {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self { threshold }
    }
}

impl Cluster for ConnectedComponentsClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::ConnectedComponents
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        Ok(graph.components())
    }
}

impl Configurable for ConnectedComponentsClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![threshold_parameter(self.threshold)]
    }
}
