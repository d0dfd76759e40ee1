//! End-to-end runs: configuration → pruning → matching → clustering →
//! evaluation against ground truth.

use linkage_analysis::evaluation::{BlockingQuality, ClusterQuality, GroundTruth};
use linkage_analysis::pruning::{MetaBlocking, Prune};
use linkage_analysis::Pipeline;
use linkage_core::config::{ClusteringConfig, LinkageConfig, MetablockingConfig};
use linkage_core::errors::{BlockError, PipelineError};
use linkage_core::types::{
    Block, ClusteringMethod, EntityId, EquivalenceCluster, IdSpace, PruningMethod,
    WeightingScheme,
};

const ENTITIES: u32 = 20;

/// Every record has a private block with its counterpart and shares a
/// noisy block with four other records of each side.
fn clean_clean_blocks() -> Vec<Block> {
    let mut blocks: Vec<Block> = (0..ENTITIES).map(|i| Block::bilateral([i], [i])).collect();
    for group in 0..ENTITIES / 5 {
        let members: Vec<u32> = (group * 5..group * 5 + 5).collect();
        blocks.push(Block::bilateral(members.clone(), members));
    }
    blocks
}

fn clean_clean_truth() -> GroundTruth {
    GroundTruth::from_pairs(
        IdSpace::clean_clean(ENTITIES as usize, ENTITIES as usize),
        (0..ENTITIES).map(|i| (EntityId(i), EntityId(i))),
    )
}

/// Four groups of three duplicates, plus blocks mixing the groups.
fn dirty_blocks() -> Vec<Block> {
    vec![
        Block::unilateral([0, 1, 2]),
        Block::unilateral([3, 4, 5]),
        Block::unilateral([6, 7, 8]),
        Block::unilateral([9, 10, 11]),
        Block::unilateral([0, 3, 6, 9]),
        Block::unilateral([1, 4, 7, 10]),
        Block::unilateral([2, 5, 8, 11]),
    ]
}

fn dirty_truth() -> GroundTruth {
    let mut truth = GroundTruth::new(IdSpace::dirty(12));
    for group in 0..4u32 {
        let base = group * 3;
        truth.insert(EntityId(base), EntityId(base + 1));
        truth.insert(EntityId(base), EntityId(base + 2));
        truth.insert(EntityId(base + 1), EntityId(base + 2));
    }
    truth
}

#[test]
fn wep_keeps_exactly_the_true_matches() {
    let blocks = clean_clean_blocks();
    let outcome = MetaBlocking::wep(WeightingScheme::Js)
        .prune(&blocks, true)
        .unwrap();
    let quality = BlockingQuality::of_comparisons(&outcome.comparisons(), &clean_clean_truth());
    assert_eq!(quality.detected_duplicates, 20);
    assert_eq!(quality.comparisons, 20);
    assert_eq!(quality.brute_force_comparisons, 400);
    assert!((quality.pair_completeness - 1.0).abs() < 1e-12);
    assert!((quality.pair_quality - 1.0).abs() < 1e-12);
    assert!((quality.reduction_ratio - 0.95).abs() < 1e-12);

    let raw = BlockingQuality::of_blocks(&blocks, &clean_clean_truth());
    assert_eq!(raw.comparisons, 120);
    assert!((raw.pair_completeness - 1.0).abs() < 1e-12);
}

#[test]
fn pipeline_from_config_file() {
    linkage_core::tracing::init_tracing();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("linkage.toml"),
        r#"
[metablocking]
method = "wep"
weighting_scheme = "js"
threads = 2

[clustering]
method = "unique_mapping"
similarity_threshold = 0.5
"#,
    )
    .unwrap();
    let config = LinkageConfig::load(dir.path(), None).unwrap();
    let pipeline = Pipeline::from_config(&config).unwrap();
    assert_eq!(pipeline.pruner().method(), PruningMethod::WeightedEdgePruning);
    assert_eq!(pipeline.clusterer().method(), ClusteringMethod::UniqueMapping);

    let output = pipeline
        .run(&clean_clean_blocks(), true, |c| {
            if c.id1 == c.id2 {
                0.95
            } else {
                0.2
            }
        })
        .unwrap();
    assert_eq!(output.matched_comparisons, 20);
    assert_eq!(output.clusters.len(), 20);
    assert_eq!(
        output.clusters[7],
        EquivalenceCluster::new(vec![EntityId(7)], vec![EntityId(7)])
    );

    let quality = ClusterQuality::evaluate(&output.clusters, &clean_clean_truth());
    assert_eq!(quality.true_positives, 20);
    assert!((quality.f1 - 1.0).abs() < 1e-12);

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["pruning"]["method"], "wep");
    assert_eq!(json["pruning"]["scheme"], "js");
    assert_eq!(json["clusters"].as_array().unwrap().len(), 20);
}

#[test]
fn every_clustering_method_recovers_disjoint_groups() {
    let truth = dirty_truth();
    for &method in ClusteringMethod::ALL {
        if method == ClusteringMethod::UniqueMapping {
            continue;
        }
        let config = LinkageConfig {
            metablocking: MetablockingConfig {
                method: Some(PruningMethod::ComparisonPropagation),
                ..Default::default()
            },
            clustering: ClusteringConfig {
                method: Some(method),
                ..Default::default()
            },
        };
        let output = Pipeline::from_config(&config)
            .unwrap()
            .run(&dirty_blocks(), false, |c| {
                if c.id1.0 / 3 == c.id2.0 / 3 {
                    0.9
                } else {
                    0.1
                }
            })
            .unwrap();
        assert_eq!(output.matched_comparisons, 30, "{method}");
        assert_eq!(output.clusters.len(), 4, "{method}");
        assert_eq!(output.clustered_entities, 12, "{method}");
        let quality = ClusterQuality::evaluate(&output.clusters, &truth);
        assert!((quality.f1 - 1.0).abs() < 1e-12, "{method}: {quality:?}");
    }
}

#[test]
fn pruning_errors_surface_through_the_pipeline() {
    let pipeline = Pipeline::from_config(&LinkageConfig::default()).unwrap();
    let err = pipeline.run(&[], false, |_| 1.0).unwrap_err();
    assert!(err.to_string().contains("Block error"), "{err}");

    let mixed = vec![Block::unilateral([0, 1]), Block::bilateral([0], [1])];
    assert!(pipeline.run(&mixed, false, |_| 1.0).is_err());
}

#[test]
fn canopies_larger_than_the_input_hit_the_pair_limit() {
    // Raw blocks induce 2 comparisons; the single canopy {0, 1, 2} induces 3.
    let blocks = vec![Block::unilateral([0, 1]), Block::unilateral([0, 2])];
    let mut config = LinkageConfig {
        metablocking: MetablockingConfig {
            method: Some(PruningMethod::CanopyClustering),
            weighting_scheme: Some(WeightingScheme::Cbs),
            inclusive_threshold: Some(0.5),
            exclusive_threshold: Some(1.0),
            max_comparisons: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = Pipeline::from_config(&config)
        .unwrap()
        .run(&blocks, false, |_| 0.9)
        .unwrap_err();
    assert!(
        matches!(
            err,
            PipelineError::Block(BlockError::TooManyComparisons { count: 3, capacity: 2 })
        ),
        "{err}"
    );

    config.metablocking.max_comparisons = Some(3);
    let output = Pipeline::from_config(&config)
        .unwrap()
        .run(&blocks, false, |_| 0.9)
        .unwrap();
    assert_eq!(output.matched_comparisons, 3);
    assert_eq!(
        output.clusters,
        vec![EquivalenceCluster::dirty(vec![EntityId(0), EntityId(1), EntityId(2)])]
    );
}
