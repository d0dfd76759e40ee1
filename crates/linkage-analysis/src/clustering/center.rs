//! Center Clustering.

use petgraph::unionfind::UnionFind;

use linkage_core::config::SimilarityThreshold;
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::ClusteringMethod;

use super::types::{threshold_parameter, Cluster, SimilarityGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Unassigned,
    Center,
    Member(usize),
}

/// Greedy star clustering over edges in weight order.
///
/// An edge between two unassigned vertices makes the one with the higher
/// mean incident weight a center and the other its member; an unassigned
/// vertex next to a center joins it. With `merge`, an edge between a
/// center and a vertex held by another center also fuses their clusters.
pub(crate) fn center_groups(graph: &SimilarityGraph, merge: bool) -> Vec<Vec<usize>> {
    let n = graph.vertex_count();
    let weights = graph.vertex_weights();
    let mut roles = vec![Role::Unassigned; n];
    let mut union = UnionFind::<usize>::new(n);
    let mut merges = 0usize;

    for edge in graph.edges_by_weight() {
        let (a, b) = (edge.a, edge.b);
        match (roles[a], roles[b]) {
            (Role::Unassigned, Role::Unassigned) => {
                // a < b, so ties go to the smaller id.
                let (center, member) = if weights[a].average() >= weights[b].average() {
                    (a, b)
                } else {
                    (b, a)
                };
                roles[center] = Role::Center;
                roles[member] = Role::Member(center);
                union.union(center, member);
            }
            (Role::Center, Role::Unassigned) => {
                roles[b] = Role::Member(a);
                union.union(a, b);
            }
            (Role::Unassigned, Role::Center) => {
                roles[a] = Role::Member(b);
                union.union(a, b);
            }
            (Role::Center, Role::Member(other)) | (Role::Member(other), Role::Center)
                if merge =>
            {
                let center = if roles[a] == Role::Center { a } else { b };
                if other != center && union.union(center, other) {
                    merges += 1;
                }
            }
            _ => {}
        }
    }
    if merge {
        tracing::debug!(merges, "merge-center merges");
    }

    let labels = union.into_labeling();
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (v, role) in roles.iter().enumerate() {
        if *role != Role::Unassigned {
            groups[labels[v]].push(v);
        }
    }
    groups.retain(|g| !g.is_empty());
    groups
}

#[derive(Debug, Clone, Default)]
pub struct CenterClustering {
    threshold: SimilarityThreshold,
}

impl CenterClustering {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self { threshold }
    }
}

impl Cluster for CenterClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::Center
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        Ok(center_groups(graph, false))
    }
}

impl Configurable for CenterClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![threshold_parameter(self.threshold)]
    }
}
