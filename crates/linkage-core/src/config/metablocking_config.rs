//! Meta-blocking configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CANOPY_EXCLUSIVE, DEFAULT_CANOPY_INCLUSIVE, DEFAULT_EXTENDED_CANOPY_EXCLUSIVE,
    DEFAULT_EXTENDED_CANOPY_INCLUSIVE, DEFAULT_FILTER_RATIO, DEFAULT_MAX_COMPARISONS,
    DEFAULT_THREADS,
};
use crate::types::{PruningMethod, WeightingScheme};

/// Configuration for the comparison pruning stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MetablockingConfig {
    /// Pruning strategy. Default: wep.
    pub method: Option<PruningMethod>,
    /// Edge weighting scheme. Default: js.
    pub weighting_scheme: Option<WeightingScheme>,
    /// Standard deviations above the mean a weight must reach. Default: 0.0.
    pub filter_ratio: Option<f64>,
    /// Explicit top-K for cardinality pruning. Default: derived from the blocks.
    pub cardinality: Option<usize>,
    /// Loose canopy radius. Default: 0.5.
    pub inclusive_threshold: Option<f64>,
    /// Tight canopy radius. Default: 0.75.
    pub exclusive_threshold: Option<f64>,
    /// Extended canopy neighbors kept. Default: 10.
    pub inclusive_cardinality: Option<usize>,
    /// Extended canopy neighbors removed from the pool. Default: 1.
    pub exclusive_cardinality: Option<usize>,
    /// Ceiling on total comparisons. Default: 2^31.
    pub max_comparisons: Option<u64>,
    /// Worker threads, 0 = rayon default. Default: 0.
    pub threads: Option<usize>,
}

impl MetablockingConfig {
    pub fn effective_method(&self) -> PruningMethod {
        self.method.unwrap_or_default()
    }

    pub fn effective_weighting_scheme(&self) -> WeightingScheme {
        self.weighting_scheme.unwrap_or_default()
    }

    pub fn effective_filter_ratio(&self) -> f64 {
        self.filter_ratio.unwrap_or(DEFAULT_FILTER_RATIO)
    }

    pub fn effective_inclusive_threshold(&self) -> f64 {
        self.inclusive_threshold.unwrap_or(DEFAULT_CANOPY_INCLUSIVE)
    }

    pub fn effective_exclusive_threshold(&self) -> f64 {
        self.exclusive_threshold.unwrap_or(DEFAULT_CANOPY_EXCLUSIVE)
    }

    pub fn effective_inclusive_cardinality(&self) -> usize {
        self.inclusive_cardinality
            .unwrap_or(DEFAULT_EXTENDED_CANOPY_INCLUSIVE)
    }

    pub fn effective_exclusive_cardinality(&self) -> usize {
        self.exclusive_cardinality
            .unwrap_or(DEFAULT_EXTENDED_CANOPY_EXCLUSIVE)
    }

    pub fn effective_max_comparisons(&self) -> u64 {
        self.max_comparisons.unwrap_or(DEFAULT_MAX_COMPARISONS)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }
}
