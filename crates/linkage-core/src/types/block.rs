//! Blocks: groups of entities sharing a blocking key.

use serde::{Deserialize, Serialize};

use super::identifiers::EntityId;

/// A block produced by the external block-building stage.
///
/// Dirty ER uses `Unilateral` blocks (every pair inside is a candidate),
/// clean-clean ER uses `Bilateral` blocks (only cross pairs are candidates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Unilateral { entities: Vec<EntityId> },
    Bilateral { d1: Vec<EntityId>, d2: Vec<EntityId> },
}

impl Block {
    /// Dirty-ER block from raw ids.
    pub fn unilateral(entities: impl IntoIterator<Item = u32>) -> Self {
        Self::Unilateral {
            entities: entities.into_iter().map(EntityId).collect(),
        }
    }

    /// Clean-clean block from raw D1 and D2 ids.
    pub fn bilateral(
        d1: impl IntoIterator<Item = u32>,
        d2: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self::Bilateral {
            d1: d1.into_iter().map(EntityId).collect(),
            d2: d2.into_iter().map(EntityId).collect(),
        }
    }

    pub fn is_bilateral(&self) -> bool {
        matches!(self, Self::Bilateral { .. })
    }

    /// Number of entity memberships in the block.
    pub fn size(&self) -> usize {
        match self {
            Self::Unilateral { entities } => entities.len(),
            Self::Bilateral { d1, d2 } => d1.len() + d2.len(),
        }
    }

    /// Number of comparisons the block induces.
    pub fn comparisons(&self) -> u64 {
        match self {
            Self::Unilateral { entities } => {
                let n = entities.len() as u64;
                n * n.saturating_sub(1) / 2
            }
            Self::Bilateral { d1, d2 } => d1.len() as u64 * d2.len() as u64,
        }
    }

    /// Utility weight: `1 / comparisons`, zero for blocks without comparisons.
    pub fn utility(&self) -> f64 {
        match self.comparisons() {
            0 => 0.0,
            c => 1.0 / c as f64,
        }
    }

    /// Iterate over the raw comparisons of the block.
    ///
    /// Unilateral pairs are canonicalized to `(min, max)`; pairs of equal
    /// ids (duplicated memberships) are skipped.
    pub fn pairs(&self) -> BlockPairs<'_> {
        BlockPairs {
            block: self,
            i: 0,
            j: match self {
                Self::Unilateral { .. } => 1,
                Self::Bilateral { .. } => 0,
            },
        }
    }
}

/// Iterator over the comparisons of a single block.
pub struct BlockPairs<'a> {
    block: &'a Block,
    i: usize,
    j: usize,
}

impl Iterator for BlockPairs<'_> {
    type Item = (EntityId, EntityId);

    fn next(&mut self) -> Option<Self::Item> {
        match self.block {
            Block::Unilateral { entities } => loop {
                if self.i + 1 >= entities.len() {
                    return None;
                }
                if self.j >= entities.len() {
                    self.i += 1;
                    self.j = self.i + 1;
                    continue;
                }
                let (a, b) = (entities[self.i], entities[self.j]);
                self.j += 1;
                if a != b {
                    return Some((a.min(b), a.max(b)));
                }
            },
            Block::Bilateral { d1, d2 } => {
                if d2.is_empty() {
                    return None;
                }
                if self.j >= d2.len() {
                    self.i += 1;
                    self.j = 0;
                }
                let pair = (*d1.get(self.i)?, d2[self.j]);
                self.j += 1;
                Some(pair)
            }
        }
    }
}
