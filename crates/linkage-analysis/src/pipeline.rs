//! End-to-end orchestration: pruning → matching → clustering.
//!
//! Matching itself is out of scope for this crate; callers supply a scoring
//! callback that stands in for it. Every stage reports its counters and
//! wall time in [`PipelineOutput`].

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use linkage_core::config::LinkageConfig;
use linkage_core::constants::DEFAULT_MAX_COMPARISONS;
use linkage_core::errors::PipelineError;
use linkage_core::types::{Block, Comparison, EquivalenceCluster};

use crate::clustering::Cluster;
use crate::pruning::{Prune, PruningStats};
use crate::registry::{build_clusterer, build_pruner};
use crate::with_thread_pool;

/// Pruning strategy, clustering algorithm and worker count for one run.
pub struct Pipeline {
    pruner: Box<dyn Prune>,
    clusterer: Box<dyn Cluster>,
    threads: usize,
    max_comparisons: u64,
}

/// Clusters plus per-stage statistics.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub clusters: Vec<EquivalenceCluster>,
    pub pruning: PruningStats,
    /// Comparisons handed to the matcher.
    pub matched_comparisons: usize,
    /// Entities placed in a non-singleton cluster.
    pub clustered_entities: usize,
    pub pruning_ms: u64,
    pub matching_ms: u64,
    pub clustering_ms: u64,
}

impl Pipeline {
    pub fn new(pruner: Box<dyn Prune>, clusterer: Box<dyn Cluster>) -> Self {
        Self {
            pruner,
            clusterer,
            threads: 0,
            max_comparisons: DEFAULT_MAX_COMPARISONS,
        }
    }

    /// Validate `config` and build both strategies from it.
    pub fn from_config(config: &LinkageConfig) -> Result<Self, PipelineError> {
        LinkageConfig::validate(config)?;
        Ok(Self::new(
            build_pruner(&config.metablocking),
            build_clusterer(&config.clustering),
        )
        .with_threads(config.metablocking.effective_threads())
        .with_max_comparisons(config.metablocking.effective_max_comparisons()))
    }

    /// Worker threads for the parallel stages; 0 uses the global rayon pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Ceiling on the similarity pairs handed to clustering.
    pub fn with_max_comparisons(mut self, max_comparisons: u64) -> Self {
        self.max_comparisons = max_comparisons;
        self
    }

    pub fn pruner(&self) -> &dyn Prune {
        self.pruner.as_ref()
    }

    pub fn clusterer(&self) -> &dyn Cluster {
        self.clusterer.as_ref()
    }

    /// Prune `blocks`, score the retained comparisons with `matcher` and
    /// cluster the scored pairs.
    ///
    /// The pairs are pre-sized from the retained block list, so a run whose
    /// pruned comparisons exceed `max_comparisons` fails before matching.
    /// A non-finite score aborts the run with a pairs error.
    pub fn run<F>(
        &self,
        blocks: &[Block],
        clean_clean: bool,
        matcher: F,
    ) -> Result<PipelineOutput, PipelineError>
    where
        F: Fn(&Comparison) -> f64 + Sync,
    {
        with_thread_pool(self.threads, || self.run_stages(blocks, clean_clean, &matcher))
    }

    fn run_stages<F>(
        &self,
        blocks: &[Block],
        clean_clean: bool,
        matcher: &F,
    ) -> Result<PipelineOutput, PipelineError>
    where
        F: Fn(&Comparison) -> f64 + Sync,
    {
        let start = Instant::now();
        let outcome = self.pruner.prune(blocks, clean_clean)?;
        let pruning_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let mut builder = outcome.pairs_builder(self.max_comparisons)?;
        let comparisons = outcome.comparisons();
        let weights: Vec<f64> = comparisons.par_iter().map(matcher).collect();
        for (c, weight) in comparisons.iter().zip(weights) {
            builder.push(c.id1, c.id2, weight)?;
        }
        let pairs = builder.finish();
        let matching_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let clusters = self.clusterer.cluster(&pairs, clean_clean)?;
        let clustering_ms = start.elapsed().as_millis() as u64;

        let clustered_entities = clusters.iter().map(EquivalenceCluster::size).sum();
        tracing::info!(
            pruning = self.pruner.method().name(),
            clustering = self.clusterer.method().name(),
            comparisons = pairs.len(),
            clusters = clusters.len(),
            clustered_entities,
            pruning_ms,
            matching_ms,
            clustering_ms,
            "pipeline complete"
        );

        Ok(PipelineOutput {
            clusters,
            pruning: outcome.stats,
            matched_comparisons: pairs.len(),
            clustered_entities,
            pruning_ms,
            matching_ms,
            clustering_ms,
        })
    }
}
