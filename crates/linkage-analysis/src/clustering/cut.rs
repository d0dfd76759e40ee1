//! Cut Clustering over Gomory-Hu trees.
//!
//! Each connected component gets a virtual sink joined to every vertex by
//! an edge of weight `alpha`. The Gomory-Hu tree of that augmented graph,
//! minus the sink and minus tree edges whose cut value does not exceed
//! `alpha`, falls apart into the clusters. Any two vertices of a cluster
//! are then separated only by cuts heavier than `alpha`.

use petgraph::unionfind::UnionFind;
use rayon::prelude::*;

use linkage_core::config::SimilarityThreshold;
use linkage_core::constants::{DEFAULT_CUT_ALPHA, FLOW_EPSILON};
use linkage_core::errors::{ClusteringError, GraphError};
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{ClusteringMethod, FxHashMap};

use super::types::{threshold_parameter, Cluster, SimilarityGraph};
use crate::graph::{EdmondsKarp, FlowNetwork, GomoryHuTree, MinCutSolver};

#[derive(Debug, Clone)]
pub struct CutClustering {
    threshold: SimilarityThreshold,
    alpha: f64,
}

impl Default for CutClustering {
    fn default() -> Self {
        Self::new(SimilarityThreshold::default(), DEFAULT_CUT_ALPHA)
    }
}

impl CutClustering {
    pub fn new(threshold: SimilarityThreshold, alpha: f64) -> Self {
        Self { threshold, alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn cut_component(
        &self,
        component: &[usize],
        adjacency: &[Vec<(usize, f64)>],
        solver: &dyn MinCutSolver,
    ) -> Result<Vec<Vec<usize>>, GraphError> {
        let m = component.len();
        let sink = m;
        let local: FxHashMap<usize, usize> =
            component.iter().enumerate().map(|(i, &v)| (v, i)).collect();

        let mut network = FlowNetwork::new(m + 1);
        for (i, &v) in component.iter().enumerate() {
            for &(u, w) in &adjacency[v] {
                if u > v {
                    if let Some(&j) = local.get(&u) {
                        network.add_edge(i, j, w)?;
                    }
                }
            }
            network.add_edge(i, sink, self.alpha)?;
        }

        let tree = GomoryHuTree::build(&network, solver)?;
        let mut union = UnionFind::<usize>::new(m);
        for (child, parent, value) in tree.edges() {
            if child != sink && parent != sink && value > self.alpha + FLOW_EPSILON {
                union.union(child, parent);
            }
        }

        let labels = union.into_labeling();
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); m];
        for (i, &v) in component.iter().enumerate() {
            groups[labels[i]].push(v);
        }
        groups.retain(|g| !g.is_empty());
        Ok(groups)
    }
}

impl Cluster for CutClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::Cut
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(ClusteringError::InvalidParameter {
                name: "alpha".into(),
                message: format!("must be a positive number, got {}", self.alpha),
            });
        }
        let adjacency = graph.adjacency();
        let components = graph.components();
        tracing::debug!(components = components.len(), alpha = self.alpha, "cutting components");

        let per_component: Vec<Vec<Vec<usize>>> = components
            .par_iter()
            .map(|component| self.cut_component(component, &adjacency, &EdmondsKarp))
            .collect::<Result<_, _>>()?;
        Ok(per_component.into_iter().flatten().collect())
    }
}

impl Configurable for CutClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            threshold_parameter(self.threshold),
            ParameterSpec::float(
                "alpha",
                "Weight of the edges joining every vertex to the virtual sink",
                self.alpha,
                0.05,
                1.0,
                0.05,
            ),
        ]
    }
}
