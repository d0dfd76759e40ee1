//! Property tests for the data model.

use proptest::prelude::*;

use linkage_core::errors::{BlockError, ErrorCode, PairsError};
use linkage_core::types::{
    total_comparisons, Block, Comparison, EntityId, EquivalenceCluster, SimilarityPairs,
    SimilarityPairsBuilder,
};

fn dirty_block() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..40, 0..12)
}

proptest! {
    #[test]
    fn unilateral_pairs_are_canonical(ids in dirty_block()) {
        let block = Block::unilateral(ids);
        for (a, b) in block.pairs() {
            prop_assert!(a < b);
        }
    }

    #[test]
    fn pair_count_matches_comparisons_for_distinct_members(
        ids in prop::collection::btree_set(0u32..100, 0..15)
    ) {
        let block = Block::unilateral(ids);
        prop_assert_eq!(block.pairs().count() as u64, block.comparisons());
    }

    #[test]
    fn bilateral_pairs_are_cross_product(
        d1 in prop::collection::vec(0u32..20, 0..6),
        d2 in prop::collection::vec(0u32..20, 0..6),
    ) {
        let block = Block::bilateral(d1.clone(), d2.clone());
        prop_assert_eq!(block.pairs().count(), d1.len() * d2.len());
        prop_assert_eq!(block.comparisons(), (d1.len() * d2.len()) as u64);
    }

    #[test]
    fn cluster_members_are_sorted_and_unique(ids in prop::collection::vec(0u32..30, 0..20)) {
        let cluster = EquivalenceCluster::dirty(ids.into_iter().map(EntityId).collect());
        prop_assert!(cluster.d1().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rank_order_is_total(
        w1 in -5.0f64..5.0, w2 in -5.0f64..5.0, a in 0u32..10, b in 10u32..20
    ) {
        let x = Comparison::new(EntityId(a), EntityId(b), false).unwrap().with_weight(w1);
        let y = Comparison::new(EntityId(b), EntityId(a + 20), false).unwrap().with_weight(w2);
        prop_assert_eq!(x.rank_cmp(&y), y.rank_cmp(&x).reverse());
    }
}

#[test]
fn test_total_comparisons_sums_blocks() {
    let blocks = vec![
        Block::unilateral([0, 1, 2]),
        Block::unilateral([3, 4]),
        Block::unilateral([5]),
    ];
    assert_eq!(total_comparisons(&blocks).unwrap(), 4);
}

#[test]
fn test_builder_rejects_overflowing_block_list() {
    let blocks = vec![Block::unilateral(0..100)];
    let err = SimilarityPairsBuilder::for_blocks(&blocks, false, 10).unwrap_err();
    assert!(matches!(err, BlockError::TooManyComparisons { .. }));
    assert_eq!(err.error_code(), "TOO_MANY_COMPARISONS");
}

#[test]
fn test_builder_enforces_capacity() {
    let mut builder = SimilarityPairsBuilder::with_capacity(1, false);
    builder.push(EntityId(0), EntityId(1), 0.5).unwrap();
    let err = builder.push(EntityId(0), EntityId(2), 0.5).unwrap_err();
    assert!(matches!(err, PairsError::CapacityExceeded { .. }));
    assert_eq!(builder.finish().len(), 1);
}

#[test]
fn test_similarity_pairs_id_bounds() {
    let pairs = SimilarityPairs::from_triples([(0, 4, 0.9), (2, 1, 0.1)], true).unwrap();
    assert_eq!(pairs.id_bounds(), (3, 5));
    assert!(pairs.is_clean_clean());
}

#[test]
fn test_block_json_shape() {
    let block = Block::bilateral([1], [2, 3]);
    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(json["kind"], "bilateral");
    assert_eq!(json["d2"], serde_json::json!([2, 3]));
}
