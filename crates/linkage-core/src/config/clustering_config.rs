//! Entity clustering configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CUT_ALPHA, DEFAULT_MAX_ITERATIONS, DEFAULT_MCL_CLUSTER_THRESHOLD,
    DEFAULT_MCL_EPSILON, DEFAULT_MCL_INFLATION, DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::types::ClusteringMethod;

/// How the similarity cut-off of a clustering run is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimilarityThreshold {
    /// Fixed value.
    Fixed { value: f64 },
    /// `mean + k · stdev` of all input similarities.
    MeanStdDev { k: f64 },
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        Self::Fixed {
            value: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Configuration for the clustering stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Algorithm. Default: connected_components.
    pub method: Option<ClusteringMethod>,
    /// Fixed similarity threshold. Default: 0.5.
    pub similarity_threshold: Option<f64>,
    /// When set, the threshold becomes `mean + k · stdev` and
    /// `similarity_threshold` is ignored.
    pub threshold_stddev_k: Option<f64>,
    /// Sink edge weight of cut clustering. Default: 0.3.
    pub alpha: Option<f64>,
    /// Markov inflation exponent. Default: 2.0.
    pub inflation: Option<f64>,
    /// Iteration cap for Markov and correlation clustering. Default: 100.
    pub max_iterations: Option<usize>,
    /// Markov convergence tolerance. Default: 1e-5.
    pub epsilon: Option<f64>,
    /// Markov attractor threshold. Default: 1e-3.
    pub cluster_threshold: Option<f64>,
}

impl ClusteringConfig {
    pub fn effective_method(&self) -> ClusteringMethod {
        self.method.unwrap_or_default()
    }

    /// The threshold policy in effect.
    pub fn effective_threshold(&self) -> SimilarityThreshold {
        match self.threshold_stddev_k {
            Some(k) => SimilarityThreshold::MeanStdDev { k },
            None => SimilarityThreshold::Fixed {
                value: self
                    .similarity_threshold
                    .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
            },
        }
    }

    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(DEFAULT_CUT_ALPHA)
    }

    pub fn effective_inflation(&self) -> f64 {
        self.inflation.unwrap_or(DEFAULT_MCL_INFLATION)
    }

    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    pub fn effective_epsilon(&self) -> f64 {
        self.epsilon.unwrap_or(DEFAULT_MCL_EPSILON)
    }

    pub fn effective_cluster_threshold(&self) -> f64 {
        self.cluster_threshold
            .unwrap_or(DEFAULT_MCL_CLUSTER_THRESHOLD)
    }
}
