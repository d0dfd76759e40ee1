//! Correlation Clustering.
//!
//! Surviving edges are "agree" links, every other vertex pair "disagree".
//! KwikCluster pivots on unclustered vertices in rank order (mean incident
//! weight descending, id ascending) and gives each pivot its unclustered
//! neighbors. A bounded local search then moves single vertices to the
//! neighboring cluster, or out on their own, whenever that strictly lowers
//! their disagreements: links leaving the cluster plus non-links inside it.

use linkage_core::config::SimilarityThreshold;
use linkage_core::constants::DEFAULT_MAX_ITERATIONS;
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{ClusteringMethod, FxHashMap};

use super::types::{threshold_parameter, Cluster, SimilarityGraph};

const UNCLUSTERED: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct CorrelationClustering {
    threshold: SimilarityThreshold,
    max_iterations: usize,
}

impl Default for CorrelationClustering {
    fn default() -> Self {
        Self::new(SimilarityThreshold::default())
    }
}

impl CorrelationClustering {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self {
            threshold,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Cap on local search sweeps; 0 keeps the KwikCluster result.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Cluster for CorrelationClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::Correlation
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        let n = graph.vertex_count();
        let adjacency = graph.adjacency();
        let weights = graph.vertex_weights();

        let mut order: Vec<usize> = (0..n).filter(|&v| !adjacency[v].is_empty()).collect();
        order.sort_by(|&a, &b| {
            weights[b]
                .average()
                .total_cmp(&weights[a].average())
                .then(a.cmp(&b))
        });

        let mut label = vec![UNCLUSTERED; n];
        let mut sizes: Vec<usize> = Vec::new();
        for &pivot in &order {
            if label[pivot] != UNCLUSTERED {
                continue;
            }
            let id = sizes.len();
            label[pivot] = id;
            let mut size = 1;
            for &(u, _) in &adjacency[pivot] {
                if label[u] == UNCLUSTERED {
                    label[u] = id;
                    size += 1;
                }
            }
            sizes.push(size);
        }
        let pivots = sizes.len();

        let mut active = order;
        active.sort_unstable();
        let mut sweeps = 0;
        let mut moves = 0usize;
        for _ in 0..self.max_iterations {
            sweeps += 1;
            let mut moved = false;
            for &v in &active {
                let current = label[v];
                let degree = adjacency[v].len();

                let mut links: FxHashMap<usize, usize> = FxHashMap::default();
                for &(u, _) in &adjacency[v] {
                    *links.entry(label[u]).or_default() += 1;
                }
                let cost = |cluster: usize, linked: usize| {
                    let others = sizes[cluster] - usize::from(cluster == current);
                    (others - linked) + (degree - linked)
                };

                let mut best = (cost(current, links.get(&current).copied().unwrap_or(0)), current);
                let mut candidates: Vec<(usize, usize)> = links.into_iter().collect();
                candidates.sort_unstable();
                for (cluster, linked) in candidates {
                    if cluster != current {
                        let c = cost(cluster, linked);
                        if c < best.0 {
                            best = (c, cluster);
                        }
                    }
                }
                // Alone, every link is a disagreement.
                let alone = sizes[current] > 1 && degree < best.0;

                let target = if alone {
                    sizes.push(0);
                    sizes.len() - 1
                } else if best.1 != current {
                    best.1
                } else {
                    continue;
                };
                sizes[current] -= 1;
                sizes[target] += 1;
                label[v] = target;
                moved = true;
                moves += 1;
            }
            if !moved {
                break;
            }
        }
        tracing::debug!(pivots, sweeps, moves, "correlation local search done");

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); sizes.len()];
        for &v in &active {
            groups[label[v]].push(v);
        }
        groups.retain(|g| !g.is_empty());
        Ok(groups)
    }
}

impl Configurable for CorrelationClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            threshold_parameter(self.threshold),
            ParameterSpec::integer(
                "max_iterations",
                "Local search sweeps after the pivoting pass",
                self.max_iterations as i64,
                0,
                500,
                10,
            ),
        ]
    }
}
