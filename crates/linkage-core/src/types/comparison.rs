//! A candidate pair of entities.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::identifiers::EntityId;

/// A candidate comparison between two entities.
///
/// In clean-clean mode `id1` is a D1 id and `id2` a D2 id. In dirty mode
/// both ids share one space and the pair is stored as `id1 < id2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub id1: EntityId,
    pub id2: EntityId,
    pub clean_clean: bool,
    pub weight: f64,
}

impl Comparison {
    /// Create a comparison, canonicalizing dirty-ER pairs.
    ///
    /// Returns `None` for a dirty-ER self pair.
    pub fn new(id1: EntityId, id2: EntityId, clean_clean: bool) -> Option<Self> {
        if clean_clean {
            return Some(Self {
                id1,
                id2,
                clean_clean,
                weight: 0.0,
            });
        }
        match id1.cmp(&id2) {
            Ordering::Equal => None,
            Ordering::Less => Some(Self {
                id1,
                id2,
                clean_clean,
                weight: 0.0,
            }),
            Ordering::Greater => Some(Self {
                id1: id2,
                id2: id1,
                clean_clean,
                weight: 0.0,
            }),
        }
    }

    /// Builder-style weight assignment.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// The `(id1, id2)` key used for sorting and deduplication.
    pub fn key(&self) -> (EntityId, EntityId) {
        (self.id1, self.id2)
    }

    /// Order by weight descending, then by ids ascending.
    ///
    /// This is the single tie-break rule used by every ranked selection.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| self.key().cmp(&other.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_pair_is_canonicalized() {
        let c = Comparison::new(EntityId(7), EntityId(3), false).unwrap();
        assert_eq!(c.key(), (EntityId(3), EntityId(7)));
    }

    #[test]
    fn test_dirty_self_pair_rejected() {
        assert!(Comparison::new(EntityId(3), EntityId(3), false).is_none());
    }

    #[test]
    fn test_clean_clean_keeps_sides() {
        let c = Comparison::new(EntityId(7), EntityId(3), true).unwrap();
        assert_eq!(c.key(), (EntityId(7), EntityId(3)));
        // Same local id on both sides is a legitimate clean-clean pair.
        assert!(Comparison::new(EntityId(3), EntityId(3), true).is_some());
    }

    #[test]
    fn test_rank_cmp_weight_desc_then_id_asc() {
        let a = Comparison::new(EntityId(0), EntityId(2), false).unwrap().with_weight(0.5);
        let b = Comparison::new(EntityId(0), EntityId(1), false).unwrap().with_weight(0.5);
        let c = Comparison::new(EntityId(4), EntityId(5), false).unwrap().with_weight(0.9);
        let mut v = vec![a, b, c];
        v.sort_by(Comparison::rank_cmp);
        assert_eq!(v[0].key(), c.key());
        assert_eq!(v[1].key(), b.key());
        assert_eq!(v[2].key(), a.key());
    }
}
