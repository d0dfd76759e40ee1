//! Clustering integration tests: known graphs and structural
//! properties shared by every algorithm.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use linkage_analysis::clustering::{
    Cluster, ConnectedComponentsClustering, CutClustering, UniqueMappingClustering,
};
use linkage_analysis::registry::build_clusterer;
use linkage_core::config::{ClusteringConfig, SimilarityThreshold};
use linkage_core::constants::FLOW_EPSILON;
use linkage_core::types::{ClusteringMethod, EntityId, EquivalenceCluster, SimilarityPairs};

fn ids(raw: &[u32]) -> Vec<EntityId> {
    raw.iter().copied().map(EntityId).collect()
}

fn fixed(value: f64) -> SimilarityThreshold {
    SimilarityThreshold::Fixed { value }
}

// ---- Connected components ----

#[test]
fn edges_above_threshold_form_components() {
    let pairs =
        SimilarityPairs::from_triples([(0, 1, 0.9), (1, 2, 0.8), (3, 4, 0.95)], false).unwrap();
    let clusters = ConnectedComponentsClustering::new(fixed(0.5))
        .cluster(&pairs, false)
        .unwrap();
    assert_eq!(
        clusters,
        vec![
            EquivalenceCluster::dirty(ids(&[0, 1, 2])),
            EquivalenceCluster::dirty(ids(&[3, 4])),
        ]
    );
}

#[test]
fn derived_threshold_drops_weak_links() {
    // mean 0.6875: the weak 2-3 link falls below it.
    let pairs = SimilarityPairs::from_triples(
        [(0, 1, 0.9), (1, 2, 0.8), (3, 4, 0.95), (2, 3, 0.1)],
        false,
    )
    .unwrap();
    let clusters = ConnectedComponentsClustering::new(SimilarityThreshold::MeanStdDev { k: 0.0 })
        .cluster(&pairs, false)
        .unwrap();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].d1(), ids(&[0, 1, 2]).as_slice());
}

// ---- Unique mapping ----

#[test]
fn unique_mapping_takes_the_best_edge_and_locks_both_ends() {
    let pairs =
        SimilarityPairs::from_triples([(0, 0, 0.9), (0, 1, 0.8), (1, 0, 0.7)], true).unwrap();
    let clusters = UniqueMappingClustering::new(fixed(0.5))
        .cluster(&pairs, true)
        .unwrap();
    assert_eq!(clusters, vec![EquivalenceCluster::new(ids(&[0]), ids(&[0]))]);
}

// ---- Negative similarities ----

#[test]
fn negative_similarities_above_a_negative_threshold_are_treated_as_zero() {
    let pairs = SimilarityPairs::from_triples(
        [(0, 1, 0.9), (1, 2, -0.3), (3, 4, 0.8)],
        false,
    )
    .unwrap();
    let expected = vec![
        EquivalenceCluster::dirty(ids(&[0, 1])),
        EquivalenceCluster::dirty(ids(&[3, 4])),
    ];
    for method in [ClusteringMethod::Cut, ClusteringMethod::Markov] {
        let config = ClusteringConfig {
            method: Some(method),
            similarity_threshold: Some(-1.0),
            ..Default::default()
        };
        let clusters = build_clusterer(&config).cluster(&pairs, false).unwrap();
        assert_eq!(clusters, expected, "{method}");
    }
}

// ---- Cut guarantee on known graphs ----

#[test]
fn cut_clustering_splits_at_the_weak_bridge() {
    // Two 4-cliques joined by one 0.6 edge.
    let mut triples = Vec::new();
    for group in [[0u32, 1, 2, 3], [4, 5, 6, 7]] {
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                triples.push((a, b, 0.9));
            }
        }
    }
    triples.push((3, 4, 0.6));
    let pairs = SimilarityPairs::from_triples(triples, false).unwrap();

    let clusters = CutClustering::new(fixed(0.5), 0.3)
        .cluster(&pairs, false)
        .unwrap();
    assert_eq!(
        clusters,
        vec![
            EquivalenceCluster::dirty(ids(&[0, 1, 2, 3])),
            EquivalenceCluster::dirty(ids(&[4, 5, 6, 7])),
        ]
    );
}

/// Minimum `u`-`v` cut of the graph augmented with a sink joined to every
/// vertex by `alpha`, by enumerating every bipartition.
fn augmented_min_cut(
    vertices: usize,
    edges: &[(usize, usize, f64)],
    alpha: f64,
    u: usize,
    v: usize,
) -> f64 {
    let sink = vertices;
    let mut best = f64::INFINITY;
    for mask in 0u32..(1 << (vertices + 1)) {
        let side = |x: usize| mask & (1 << x) != 0;
        if !side(u) || side(v) {
            continue;
        }
        let mut cut: f64 = edges
            .iter()
            .filter(|&&(a, b, _)| side(a) != side(b))
            .map(|&(_, _, w)| w)
            .sum();
        cut += (0..vertices).filter(|&x| side(x) != side(sink)).count() as f64 * alpha;
        best = best.min(cut);
    }
    best
}

fn small_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (3usize..7).prop_flat_map(|n| {
        let pair = (0..n, 0..n).prop_filter("distinct", |(a, b)| a != b);
        (
            Just(n),
            prop::collection::btree_map(pair, 0.05f64..1.0, 1..12).prop_map(|edges| {
                let mut unique: BTreeMap<(usize, usize), f64> = BTreeMap::new();
                for ((a, b), w) in edges {
                    unique.insert((a.min(b), a.max(b)), w);
                }
                unique.into_iter().map(|((a, b), w)| (a, b, w)).collect()
            }),
        )
    })
}

/// Vertex sets of the connected components of `edges`.
fn components_of(vertices: usize, edges: &[(usize, usize, f64)]) -> Vec<BTreeSet<usize>> {
    let mut label: Vec<usize> = (0..vertices).collect();
    fn root(label: &mut [usize], mut x: usize) -> usize {
        while label[x] != x {
            x = label[x];
        }
        x
    }
    for &(a, b, _) in edges {
        let (ra, rb) = (root(&mut label, a), root(&mut label, b));
        label[ra] = rb;
    }
    let mut groups: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for v in 0..vertices {
        let r = root(&mut label, v);
        groups.entry(r).or_default().insert(v);
    }
    groups.into_values().collect()
}

/// Total weight of the edges leaving `cluster`.
fn boundary_weight(cluster: &BTreeSet<usize>, edges: &[(usize, usize, f64)]) -> f64 {
    edges
        .iter()
        .filter(|&&(a, b, _)| cluster.contains(&a) != cluster.contains(&b))
        .map(|&(_, _, w)| w)
        .sum()
}

#[test]
fn cut_clusters_are_weakly_tied_to_the_rest_of_their_component() {
    // Each clique leaves through the 0.6 bridge only: 0.6 <= 0.3 * 4.
    let mut edges = Vec::new();
    for group in [[0usize, 1, 2, 3], [4, 5, 6, 7]] {
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                edges.push((a, b, 0.9));
            }
        }
    }
    edges.push((3, 4, 0.6));
    let left: BTreeSet<usize> = (0..4).collect();
    let boundary = boundary_weight(&left, &edges);
    assert!((boundary - 0.6).abs() < 1e-12);
    assert!(boundary <= 0.3 * 4.0 + FLOW_EPSILON);
    // A pairwise min cut across the bridge is heavier than alpha, so the
    // bound holds per cluster boundary, not per vertex pair.
    assert!(augmented_min_cut(8, &edges, 0.3, 0, 7) > 0.3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cut_clusters_are_only_separated_by_heavy_cuts(
        (n, edges) in small_graph(),
        alpha in prop::sample::select(vec![0.1, 0.3, 0.6, 1.0]),
    ) {
        let pairs = SimilarityPairs::from_triples(
            edges.iter().map(|&(a, b, w)| (a as u32, b as u32, w)),
            false,
        )
        .unwrap();
        let clusters = CutClustering::new(fixed(0.0), alpha)
            .cluster(&pairs, false)
            .unwrap();
        for cluster in &clusters {
            let members: Vec<usize> = cluster.d1().iter().map(|id| id.index()).collect();
            for (i, &u) in members.iter().enumerate() {
                for &v in &members[i + 1..] {
                    let cut = augmented_min_cut(n, &edges, alpha, u, v);
                    prop_assert!(cut > alpha, "{}-{} cut {} <= {}", u, v, cut, alpha);
                }
            }
        }
    }

    #[test]
    fn cut_cluster_boundaries_stay_within_alpha_per_outside_vertex(
        (n, edges) in small_graph(),
        alpha in prop::sample::select(vec![0.1, 0.3, 0.6, 1.0]),
    ) {
        let pairs = SimilarityPairs::from_triples(
            edges.iter().map(|&(a, b, w)| (a as u32, b as u32, w)),
            false,
        )
        .unwrap();
        let clusters = CutClustering::new(fixed(0.0), alpha)
            .cluster(&pairs, false)
            .unwrap();
        let components = components_of(n, &edges);
        for cluster in &clusters {
            let members: BTreeSet<usize> = cluster.d1().iter().map(|id| id.index()).collect();
            let component = components
                .iter()
                .find(|c| members.is_subset(c))
                .expect("a cluster lies inside one component");
            let outside = component.len() - members.len();
            let boundary = boundary_weight(&members, &edges);
            prop_assert!(
                boundary <= alpha * outside as f64 + FLOW_EPSILON,
                "{:?} boundary {} > {} * {}",
                members,
                boundary,
                alpha,
                outside
            );
        }
    }
}

// ---- Partition and 1-to-1 properties ----

fn triples() -> impl Strategy<Value = Vec<(u32, u32, f64)>> {
    prop::collection::vec((0u32..12, 0u32..12, 0.0f64..1.0), 0..40)
}

fn check_partition(
    method: ClusteringMethod,
    clusters: &[EquivalenceCluster],
    input: &[(u32, u32, f64)],
    clean_clean: bool,
) -> Result<(), TestCaseError> {
    let left: BTreeSet<u32> = input.iter().map(|t| t.0).collect();
    let right: BTreeSet<u32> = input.iter().map(|t| t.1).collect();
    let mut seen1 = BTreeSet::new();
    let mut seen2 = BTreeSet::new();
    for cluster in clusters {
        prop_assert!(cluster.size() >= 2, "{} produced a singleton", method);
        for id in cluster.d1() {
            prop_assert!(seen1.insert(id.0), "{} reused {}", method, id);
            if clean_clean {
                prop_assert!(left.contains(&id.0));
            } else {
                prop_assert!(left.contains(&id.0) || right.contains(&id.0));
            }
        }
        for id in cluster.d2() {
            prop_assert!(clean_clean, "{} filled d2 in dirty mode", method);
            prop_assert!(seen2.insert(id.0), "{} reused {}", method, id);
            prop_assert!(right.contains(&id.0));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_algorithm_returns_disjoint_clusters(
        dirty in triples(),
        clean in triples(),
        threshold in 0.0f64..0.8,
    ) {
        for &method in ClusteringMethod::ALL {
            let config = ClusteringConfig {
                method: Some(method),
                similarity_threshold: Some(threshold),
                ..Default::default()
            };
            let clusterer = build_clusterer(&config);

            let pairs = SimilarityPairs::from_triples(clean.iter().copied(), true).unwrap();
            let clusters = clusterer.cluster(&pairs, true).unwrap();
            check_partition(method, &clusters, &clean, true)?;

            if method == ClusteringMethod::UniqueMapping {
                continue;
            }
            let pairs = SimilarityPairs::from_triples(dirty.iter().copied(), false).unwrap();
            let clusters = clusterer.cluster(&pairs, false).unwrap();
            check_partition(method, &clusters, &dirty, false)?;
        }
    }

    #[test]
    fn unique_mapping_is_one_to_one(
        clean in triples(),
        threshold in 0.0f64..0.8,
    ) {
        let pairs = SimilarityPairs::from_triples(clean.iter().copied(), true).unwrap();
        let clusters = UniqueMappingClustering::new(fixed(threshold))
            .cluster(&pairs, true)
            .unwrap();
        for cluster in &clusters {
            prop_assert_eq!(cluster.d1().len(), 1);
            prop_assert_eq!(cluster.d2().len(), 1);
            let (a, b) = (cluster.d1()[0].0, cluster.d2()[0].0);
            let best = clean
                .iter()
                .filter(|t| t.0 == a && t.1 == b)
                .map(|t| t.2)
                .fold(f64::MIN, f64::max);
            prop_assert!(best > threshold);
        }
    }

    #[test]
    fn clustering_is_deterministic(
        dirty in triples(),
    ) {
        let pairs = SimilarityPairs::from_triples(dirty.iter().copied(), false).unwrap();
        for &method in ClusteringMethod::ALL {
            if method == ClusteringMethod::UniqueMapping {
                continue;
            }
            let config = ClusteringConfig {
                method: Some(method),
                ..Default::default()
            };
            let clusterer = build_clusterer(&config);
            let first = clusterer.cluster(&pairs, false).unwrap();
            let second = clusterer.cluster(&pairs, false).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
