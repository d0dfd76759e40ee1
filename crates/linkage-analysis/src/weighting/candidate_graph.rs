//! Weighted candidate graph over an entity index.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use linkage_core::types::collections::FxHashMap;
use linkage_core::types::{Block, BlockId, Comparison, IdSpace, WeightingScheme};

use super::schemes::{PairEvidence, Weigh};
use crate::index::EntityIndex;

/// One weighted edge as seen from one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedNeighbor {
    /// Flat id of the other endpoint.
    pub neighbor: usize,
    /// Distinct shared blocks.
    pub common_blocks: u32,
    pub weight: f64,
}

/// Per-entity adjacency lists of the blocking graph, each sorted by
/// neighbor id. Every edge appears in the lists of both endpoints.
#[derive(Debug, Clone)]
pub struct CandidateGraph {
    scheme: WeightingScheme,
    clean_clean: bool,
    id_space: IdSpace,
    adjacency: Vec<Vec<WeightedNeighbor>>,
}

impl CandidateGraph {
    /// Weigh every candidate pair induced by `blocks`.
    ///
    /// Entities are processed in parallel; each one only reads its own block
    /// memberships and the shared index.
    pub fn build(index: &EntityIndex, blocks: &[Block], scheme: WeightingScheme) -> Self {
        let start = Instant::now();
        let id_space = index.id_space();
        let adjacency: Vec<Vec<WeightedNeighbor>> = (0..index.len())
            .into_par_iter()
            .map(|entity| weigh_neighbors(index, blocks, scheme, entity))
            .collect();

        let graph = Self {
            scheme,
            clean_clean: index.is_clean_clean(),
            id_space,
            adjacency,
        };
        tracing::debug!(
            scheme = %scheme,
            entities = graph.len(),
            edges = graph.edge_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "candidate graph weighted"
        );
        graph
    }

    pub fn scheme(&self) -> WeightingScheme {
        self.scheme
    }

    pub fn is_clean_clean(&self) -> bool {
        self.clean_clean
    }

    pub fn id_space(&self) -> IdSpace {
        self.id_space
    }

    /// Number of flat entity ids.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbors of an entity, ascending by id.
    pub fn neighbors(&self, entity: usize) -> &[WeightedNeighbor] {
        self.adjacency
            .get(entity)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// Weight of the edge between two entities, if they share a block.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        let list = self.neighbors(a);
        list.binary_search_by_key(&b, |n| n.neighbor)
            .ok()
            .map(|i| list[i].weight)
    }

    /// Every distinct edge once, as `(a, b, weight)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, list)| {
            list.iter()
                .filter(move |n| n.neighbor > a)
                .map(move |n| (a, n.neighbor, n.weight))
        })
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Dataset-local comparison for the flat pair `(a, b)`, `a < b`.
    pub fn comparison(&self, a: usize, b: usize, weight: f64) -> Comparison {
        let (_, id1) = self.id_space.local(a);
        let (_, id2) = self.id_space.local(b);
        Comparison {
            id1,
            id2,
            clean_clean: self.clean_clean,
            weight,
        }
    }
}

/// Aggregate the co-occurrence evidence of one entity with all its
/// neighbors and weigh it.
fn weigh_neighbors(
    index: &EntityIndex,
    blocks: &[Block],
    scheme: WeightingScheme,
    entity: usize,
) -> Vec<WeightedNeighbor> {
    let id_space = index.id_space();
    let limit = id_space.dataset_limit();
    // neighbor -> (cf, arcs, last block counted)
    let mut evidence: FxHashMap<usize, (u32, f64, Option<BlockId>)> = FxHashMap::default();

    for &b in index.entity_blocks(entity) {
        let Some(block) = blocks.get(b.index()) else {
            continue;
        };
        let size = index.block_size(b);
        let credit = if size == 0 { 0.0 } else { 1.0 / size as f64 };
        let mut add = |other: usize| {
            if other == entity {
                return;
            }
            let slot = evidence.entry(other).or_insert((0, 0.0, None));
            if slot.2 != Some(b) {
                slot.0 += 1;
                slot.1 += credit;
                slot.2 = Some(b);
            }
        };
        match block {
            Block::Unilateral { entities } => entities.iter().for_each(|id| add(id.index())),
            Block::Bilateral { d1, d2 } => {
                if entity < limit {
                    d2.iter().for_each(|id| add(limit + id.index()));
                } else {
                    d1.iter().for_each(|id| add(id.index()));
                }
            }
        }
    }

    let stats = index.statistics();
    let mut neighbors: Vec<WeightedNeighbor> = evidence
        .into_iter()
        .map(|(neighbor, (cf, arcs, _))| {
            let pair = PairEvidence {
                common_blocks: cf,
                arcs,
                blocks1: index.block_count_of(entity),
                blocks2: index.block_count_of(neighbor),
                comparisons1: index.comparisons_of(entity),
                comparisons2: index.comparisons_of(neighbor),
            };
            WeightedNeighbor {
                neighbor,
                common_blocks: cf,
                weight: scheme.weigh(&pair, stats),
            }
        })
        .collect();
    neighbors.sort_unstable_by_key(|n| n.neighbor);
    neighbors
}
