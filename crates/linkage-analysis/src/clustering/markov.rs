//! Markov Clustering (MCL).
//!
//! Each connected component is turned into a dense column-stochastic
//! matrix with self loops, then expanded (squared) and inflated
//! (elementwise power, renormalized) until the largest entry change drops
//! below `epsilon` or `max_iterations` is reached. Off-diagonal entries
//! above `cluster_threshold` link vertices; the linked groups are the
//! clusters. Runs single threaded. Components above `max_component_size`
//! vertices are rejected instead of allocating their square matrix.

use linkage_core::config::SimilarityThreshold;
use linkage_core::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_MCL_CLUSTER_THRESHOLD, DEFAULT_MCL_EPSILON,
    DEFAULT_MCL_INFLATION, DEFAULT_MCL_MAX_COMPONENT_SIZE,
};
use linkage_core::errors::ClusteringError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{ClusteringMethod, FxHashMap};

use super::types::{threshold_parameter, Cluster, SimilarityGraph};
use crate::graph::{ConnectedComponents, UndirectedGraph};

#[derive(Debug, Clone)]
pub struct MarkovClustering {
    threshold: SimilarityThreshold,
    inflation: f64,
    max_iterations: usize,
    epsilon: f64,
    cluster_threshold: f64,
    max_component_size: usize,
}

impl Default for MarkovClustering {
    fn default() -> Self {
        Self {
            threshold: SimilarityThreshold::default(),
            inflation: DEFAULT_MCL_INFLATION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            epsilon: DEFAULT_MCL_EPSILON,
            cluster_threshold: DEFAULT_MCL_CLUSTER_THRESHOLD,
            max_component_size: DEFAULT_MCL_MAX_COMPONENT_SIZE,
        }
    }
}

impl MarkovClustering {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn with_inflation(mut self, inflation: f64) -> Self {
        self.inflation = inflation;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_cluster_threshold(mut self, cluster_threshold: f64) -> Self {
        self.cluster_threshold = cluster_threshold;
        self
    }

    pub fn with_max_component_size(mut self, max_component_size: usize) -> Self {
        self.max_component_size = max_component_size;
        self
    }

    fn check(&self) -> Result<(), ClusteringError> {
        let invalid = |name: &str, message: String| ClusteringError::InvalidParameter {
            name: name.to_string(),
            message,
        };
        if !(self.inflation.is_finite() && self.inflation > 1.0) {
            return Err(invalid("inflation", format!("must exceed 1, got {}", self.inflation)));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(invalid("epsilon", format!("must be positive, got {}", self.epsilon)));
        }
        if !(0.0..=1.0).contains(&self.cluster_threshold) {
            return Err(invalid(
                "cluster_threshold",
                format!("must lie in [0, 1], got {}", self.cluster_threshold),
            ));
        }
        Ok(())
    }

    /// Run MCL on one component, returning groups of global ids.
    fn cluster_component(
        &self,
        component: &[usize],
        adjacency: &[Vec<(usize, f64)>],
    ) -> Result<Vec<Vec<usize>>, ClusteringError> {
        let m = component.len();
        if m > self.max_component_size {
            return Err(ClusteringError::ComponentTooLarge {
                algorithm: self.method().name(),
                size: m,
                limit: self.max_component_size,
            });
        }
        let local: FxHashMap<usize, usize> =
            component.iter().enumerate().map(|(i, &v)| (v, i)).collect();

        let mut matrix = Matrix::zeros(m);
        for (i, &v) in component.iter().enumerate() {
            let mut strongest = 0.0f64;
            for &(u, w) in &adjacency[v] {
                if let Some(&j) = local.get(&u) {
                    matrix.set(i, j, w);
                    strongest = strongest.max(w);
                }
            }
            // Self loop as heavy as the strongest incident edge.
            matrix.set(i, i, if strongest > 0.0 { strongest } else { 1.0 });
        }
        matrix.normalize_columns();

        let mut iterations = 0;
        for _ in 0..self.max_iterations {
            iterations += 1;
            let mut next = matrix.square();
            next.inflate(self.inflation);
            let change = next.max_difference(&matrix);
            matrix = next;
            if change < self.epsilon {
                break;
            }
        }
        tracing::trace!(size = m, iterations, "markov component converged");

        let mut links = UndirectedGraph::new(m);
        for i in 0..m {
            for j in 0..m {
                if i != j && matrix.get(i, j) > self.cluster_threshold {
                    // In range and not a loop.
                    let _ = links.add_edge(i, j);
                }
            }
        }
        Ok(ConnectedComponents::new(&links)
            .components()
            .into_iter()
            .map(|group| group.into_iter().map(|i| component[i]).collect())
            .collect())
    }
}

/// Dense square matrix, row-major.
#[derive(Debug, Clone)]
struct Matrix {
    n: usize,
    values: Vec<f64>,
}

impl Matrix {
    fn zeros(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.n + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.n + col] = value;
    }

    fn normalize_columns(&mut self) {
        for col in 0..self.n {
            let sum: f64 = (0..self.n).map(|row| self.get(row, col)).sum();
            if sum > 0.0 {
                for row in 0..self.n {
                    self.values[row * self.n + col] /= sum;
                }
            }
        }
    }

    fn square(&self) -> Self {
        let n = self.n;
        let mut out = Self::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                if a == 0.0 {
                    continue;
                }
                for j in 0..n {
                    out.values[i * n + j] += a * self.values[k * n + j];
                }
            }
        }
        out
    }

    fn inflate(&mut self, power: f64) {
        for v in &mut self.values {
            *v = v.powf(power);
        }
        self.normalize_columns();
    }

    fn max_difference(&self, other: &Self) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Cluster for MarkovClustering {
    fn method(&self) -> ClusteringMethod {
        ClusteringMethod::Markov
    }

    fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    fn groups(&self, graph: &SimilarityGraph) -> Result<Vec<Vec<usize>>, ClusteringError> {
        self.check()?;
        let adjacency = graph.adjacency();
        let mut groups = Vec::new();
        for component in graph.components() {
            groups.extend(self.cluster_component(&component, &adjacency)?);
        }
        Ok(groups)
    }
}

impl Configurable for MarkovClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            threshold_parameter(self.threshold),
            ParameterSpec::float(
                "inflation",
                "Elementwise power applied after each expansion",
                self.inflation,
                1.5,
                5.0,
                0.5,
            ),
            ParameterSpec::integer(
                "max_iterations",
                "Expansion/inflation rounds before giving up on convergence",
                self.max_iterations as i64,
                10,
                500,
                10,
            ),
            ParameterSpec::float(
                "cluster_threshold",
                "Minimum converged entry that links two vertices",
                self.cluster_threshold,
                0.0,
                1.0,
                0.05,
            ),
            ParameterSpec::integer(
                "max_component_size",
                "Largest connected component expanded as a dense matrix",
                self.max_component_size as i64,
                256,
                16384,
                256,
            ),
        ]
    }
}
