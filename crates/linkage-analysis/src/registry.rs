//! Registration tables from strategy selectors to implementations.
//!
//! Each selector enum variant maps to one constructor taking the
//! relevant config section. Adding a strategy means adding a variant and
//! a table row.

use linkage_core::config::{ClusteringConfig, MetablockingConfig};
use linkage_core::types::{ClusteringMethod, PruningMethod, WeightingScheme};

use crate::clustering::{
    CenterClustering, Cluster, ConnectedComponentsClustering, CorrelationClustering,
    CutClustering, MarkovClustering, MergeCenterClustering, RicochetSrClustering,
    UniqueMappingClustering,
};
use crate::pruning::{CanopyClustering, ComparisonPropagation, MetaBlocking, Prune};

pub type PrunerFactory = fn(&MetablockingConfig) -> Box<dyn Prune>;
pub type ClustererFactory = fn(&ClusteringConfig) -> Box<dyn Cluster>;

pub static PRUNERS: &[(PruningMethod, PrunerFactory)] = &[
    (PruningMethod::WeightedEdgePruning, wep),
    (PruningMethod::CardinalityEdgePruning, cep),
    (PruningMethod::WeightedNodePruning, wnp),
    (PruningMethod::CardinalityNodePruning, cnp),
    (PruningMethod::ReciprocalWeightedNodePruning, reciprocal_wnp),
    (PruningMethod::ReciprocalCardinalityNodePruning, reciprocal_cnp),
    (PruningMethod::ComparisonPropagation, comparison_propagation),
    (PruningMethod::CanopyClustering, canopy),
    (PruningMethod::ExtendedCanopyClustering, extended_canopy),
];

pub static CLUSTERERS: &[(ClusteringMethod, ClustererFactory)] = &[
    (ClusteringMethod::ConnectedComponents, connected_components),
    (ClusteringMethod::UniqueMapping, unique_mapping),
    (ClusteringMethod::RicochetSr, ricochet_sr),
    (ClusteringMethod::Cut, cut),
    (ClusteringMethod::Markov, markov),
    (ClusteringMethod::Center, center),
    (ClusteringMethod::MergeCenter, merge_center),
    (ClusteringMethod::Correlation, correlation),
];

fn meta_blocking(
    config: &MetablockingConfig,
    make: fn(WeightingScheme) -> MetaBlocking,
) -> Box<dyn Prune> {
    Box::new(
        make(config.effective_weighting_scheme())
            .with_filter_ratio(config.effective_filter_ratio())
            .with_cardinality(config.cardinality.filter(|&k| k > 0))
            .with_max_comparisons(config.effective_max_comparisons()),
    )
}

fn comparison_propagation(config: &MetablockingConfig) -> Box<dyn Prune> {
    Box::new(ComparisonPropagation::new().with_max_comparisons(config.effective_max_comparisons()))
}

fn canopy(config: &MetablockingConfig) -> Box<dyn Prune> {
    Box::new(
        CanopyClustering::new(
            config.effective_inclusive_threshold(),
            config.effective_exclusive_threshold(),
        )
        .with_scheme(config.effective_weighting_scheme())
        .with_max_comparisons(config.effective_max_comparisons()),
    )
}

fn extended_canopy(config: &MetablockingConfig) -> Box<dyn Prune> {
    Box::new(
        CanopyClustering::extended(
            config.effective_inclusive_cardinality(),
            config.effective_exclusive_cardinality(),
        )
        .with_scheme(config.effective_weighting_scheme())
        .with_max_comparisons(config.effective_max_comparisons()),
    )
}

fn wep(config: &MetablockingConfig) -> Box<dyn Prune> {
    meta_blocking(config, MetaBlocking::wep)
}

fn cep(config: &MetablockingConfig) -> Box<dyn Prune> {
    meta_blocking(config, MetaBlocking::cep)
}

fn wnp(config: &MetablockingConfig) -> Box<dyn Prune> {
    meta_blocking(config, MetaBlocking::wnp)
}

fn cnp(config: &MetablockingConfig) -> Box<dyn Prune> {
    meta_blocking(config, MetaBlocking::cnp)
}

fn reciprocal_wnp(config: &MetablockingConfig) -> Box<dyn Prune> {
    meta_blocking(config, MetaBlocking::reciprocal_wnp)
}

fn reciprocal_cnp(config: &MetablockingConfig) -> Box<dyn Prune> {
    meta_blocking(config, MetaBlocking::reciprocal_cnp)
}

fn connected_components(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(ConnectedComponentsClustering::new(config.effective_threshold()))
}

fn unique_mapping(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(UniqueMappingClustering::new(config.effective_threshold()))
}

fn ricochet_sr(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(RicochetSrClustering::new(config.effective_threshold()))
}

fn cut(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(CutClustering::new(
        config.effective_threshold(),
        config.effective_alpha(),
    ))
}

fn markov(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(
        MarkovClustering::new(config.effective_threshold())
            .with_inflation(config.effective_inflation())
            .with_max_iterations(config.effective_max_iterations())
            .with_epsilon(config.effective_epsilon())
            .with_cluster_threshold(config.effective_cluster_threshold()),
    )
}

fn center(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(CenterClustering::new(config.effective_threshold()))
}

fn merge_center(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(MergeCenterClustering::new(config.effective_threshold()))
}

fn correlation(config: &ClusteringConfig) -> Box<dyn Cluster> {
    Box::new(
        CorrelationClustering::new(config.effective_threshold())
            .with_max_iterations(config.effective_max_iterations()),
    )
}

/// Build the pruning strategy a metablocking config selects.
pub fn build_pruner(config: &MetablockingConfig) -> Box<dyn Prune> {
    let method = config.effective_method();
    match PRUNERS.iter().find(|(m, _)| *m == method) {
        Some((_, factory)) => factory(config),
        // Every variant has a row; see `test_every_method_is_registered`.
        None => meta_blocking(config, MetaBlocking::wep),
    }
}

/// Build the clustering algorithm a clustering config selects.
pub fn build_clusterer(config: &ClusteringConfig) -> Box<dyn Cluster> {
    let method = config.effective_method();
    match CLUSTERERS.iter().find(|(m, _)| *m == method) {
        Some((_, factory)) => factory(config),
        None => connected_components(config),
    }
}

/// Every registered strategy with its default parameters, as JSON.
pub fn describe_all() -> serde_json::Value {
    let metablocking = MetablockingConfig::default();
    let clustering = ClusteringConfig::default();
    serde_json::json!({
        "pruning": PRUNERS
            .iter()
            .map(|(_, factory)| factory(&metablocking).describe())
            .collect::<Vec<_>>(),
        "clustering": CLUSTERERS
            .iter()
            .map(|(_, factory)| factory(&clustering).describe())
            .collect::<Vec<_>>(),
    })
}
