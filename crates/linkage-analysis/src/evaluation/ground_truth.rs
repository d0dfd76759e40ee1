//! Known duplicate pairs.

use linkage_core::types::{Dataset, EntityId, FxHashSet, IdSpace};

/// Set of true matches over an [`IdSpace`].
///
/// Clean-clean pairs are `(d1, d2)`; dirty pairs are unordered. Pairs
/// naming ids outside the space are logged and skipped, as are dirty self
/// pairs.
#[derive(Debug, Clone)]
pub struct GroundTruth {
    id_space: IdSpace,
    duplicates: FxHashSet<(usize, usize)>,
    skipped: usize,
}

impl GroundTruth {
    pub fn new(id_space: IdSpace) -> Self {
        Self {
            id_space,
            duplicates: FxHashSet::default(),
            skipped: 0,
        }
    }

    pub fn from_pairs(
        id_space: IdSpace,
        pairs: impl IntoIterator<Item = (EntityId, EntityId)>,
    ) -> Self {
        let mut truth = Self::new(id_space);
        for (id1, id2) in pairs {
            truth.insert(id1, id2);
        }
        if truth.skipped > 0 {
            tracing::warn!(
                skipped = truth.skipped,
                kept = truth.len(),
                "ground truth pairs outside the id space were skipped"
            );
        }
        truth
    }

    /// Add a duplicate pair. Returns `false` if it was skipped.
    pub fn insert(&mut self, id1: EntityId, id2: EntityId) -> bool {
        match self.key(id1, id2) {
            Some(key) => {
                self.duplicates.insert(key);
                true
            }
            None => {
                tracing::debug!(%id1, %id2, "skipping ground truth pair");
                self.skipped += 1;
                false
            }
        }
    }

    pub fn contains(&self, id1: EntityId, id2: EntityId) -> bool {
        self.key(id1, id2)
            .is_some_and(|key| self.duplicates.contains(&key))
    }

    pub fn id_space(&self) -> IdSpace {
        self.id_space
    }

    /// Number of distinct duplicate pairs.
    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    /// Pairs rejected so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn key(&self, id1: EntityId, id2: EntityId) -> Option<(usize, usize)> {
        if self.id_space.is_clean_clean() {
            let a = self.id_space.global(Dataset::D1, id1)?;
            let b = self.id_space.global(Dataset::D2, id2)?;
            return Some((a, b));
        }
        let a = self.id_space.global(Dataset::D1, id1)?;
        let b = self.id_space.global(Dataset::D1, id2)?;
        (a != b).then(|| (a.min(b), a.max(b)))
    }
}
