//! Clustering output and per-vertex ranking state.

use serde::{Deserialize, Serialize};

use super::collections::FxHashMap;
use super::identifiers::EntityId;

/// A group of entities believed to denote one real-world object.
///
/// Dirty-ER clusters keep every member in `d1`; `d2` stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquivalenceCluster {
    d1: Vec<EntityId>,
    d2: Vec<EntityId>,
}

impl EquivalenceCluster {
    /// Create a cluster; both sides are sorted and deduplicated.
    pub fn new(mut d1: Vec<EntityId>, mut d2: Vec<EntityId>) -> Self {
        d1.sort_unstable();
        d1.dedup();
        d2.sort_unstable();
        d2.dedup();
        Self { d1, d2 }
    }

    /// Dirty-ER cluster over a single id space.
    pub fn dirty(members: Vec<EntityId>) -> Self {
        Self::new(members, Vec::new())
    }

    pub fn d1(&self) -> &[EntityId] {
        &self.d1
    }

    pub fn d2(&self) -> &[EntityId] {
        &self.d2
    }

    /// Total number of members across both sides.
    pub fn size(&self) -> usize {
        self.d1.len() + self.d2.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.size() < 2
    }

    /// A clean-clean cluster with one side empty carries no match.
    pub fn has_empty_side(&self) -> bool {
        self.d1.is_empty() || self.d2.is_empty()
    }

    /// Smallest member, used to order cluster sequences deterministically.
    pub fn sort_key(&self) -> (Option<EntityId>, Option<EntityId>) {
        (self.d1.first().copied(), self.d2.first().copied())
    }

    /// All intra-cluster pairs, as `(d1, d2)` for clean-clean clusters or
    /// `(a, b)` with `a < b` for dirty clusters.
    pub fn pairs(&self) -> Vec<(EntityId, EntityId)> {
        if self.d2.is_empty() {
            let mut out = Vec::new();
            for (i, &a) in self.d1.iter().enumerate() {
                for &b in &self.d1[i + 1..] {
                    out.push((a, b));
                }
            }
            out
        } else {
            self.d1
                .iter()
                .flat_map(|&a| self.d2.iter().map(move |&b| (a, b)))
                .collect()
        }
    }
}

/// Aggregate edge weight around a vertex, re-ranked in place while
/// clusters are built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexWeight {
    pub vertex: usize,
    pub total_weight: f64,
    pub degree: usize,
    pub neighbors: FxHashMap<usize, f64>,
}

impl VertexWeight {
    pub fn new(vertex: usize) -> Self {
        Self {
            vertex,
            ..Default::default()
        }
    }

    /// Record an incident edge. Repeated neighbors keep the larger weight.
    pub fn add_neighbor(&mut self, neighbor: usize, weight: f64) {
        match self.neighbors.get_mut(&neighbor) {
            Some(existing) if *existing >= weight => {}
            Some(existing) => {
                self.total_weight += weight - *existing;
                *existing = weight;
            }
            None => {
                self.neighbors.insert(neighbor, weight);
                self.total_weight += weight;
                self.degree += 1;
            }
        }
    }

    /// Forget an incident edge, returning its weight.
    pub fn remove_neighbor(&mut self, neighbor: usize) -> Option<f64> {
        let weight = self.neighbors.remove(&neighbor)?;
        self.total_weight -= weight;
        self.degree -= 1;
        if self.degree == 0 {
            self.total_weight = 0.0;
        }
        Some(weight)
    }

    /// Mean incident weight; a zero-degree vertex weighs zero.
    pub fn average(&self) -> f64 {
        if self.degree == 0 {
            0.0
        } else {
            self.total_weight / self.degree as f64
        }
    }
}
