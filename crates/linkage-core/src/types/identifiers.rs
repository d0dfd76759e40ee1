//! Dense integer identifiers for entities and blocks.
//!
//! Each ID type wraps a `u32` to prevent cross-type confusion.
//! A `BlockId` cannot be accidentally used where an `EntityId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new ID from its raw value.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw value as a `usize` array index.
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Entity identifier, dense `[0, N)` within its dataset.
    EntityId
);

define_id!(
    /// Position of a block in the input block list.
    BlockId
);

/// Which input collection an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    D1,
    D2,
}

/// Flat id space over both datasets.
///
/// D1 ids occupy `[0, dataset_limit)`, D2 ids are shifted by
/// `dataset_limit`. For dirty ER there is no D2 and `dataset_limit`
/// equals the entity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSpace {
    dataset_limit: usize,
    total: usize,
}

impl IdSpace {
    /// Id space for dirty ER over `entities` ids.
    pub fn dirty(entities: usize) -> Self {
        Self {
            dataset_limit: entities,
            total: entities,
        }
    }

    /// Id space for clean-clean ER.
    pub fn clean_clean(d1_entities: usize, d2_entities: usize) -> Self {
        Self {
            dataset_limit: d1_entities,
            total: d1_entities + d2_entities,
        }
    }

    /// Number of D1 ids, and the offset applied to D2 ids.
    pub fn dataset_limit(&self) -> usize {
        self.dataset_limit
    }

    /// Total number of flat ids.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Whether the space spans two datasets.
    pub fn is_clean_clean(&self) -> bool {
        self.total > self.dataset_limit
    }

    /// Flat index of a dataset-local id, or `None` if out of range.
    pub fn global(&self, dataset: Dataset, id: EntityId) -> Option<usize> {
        let flat = match dataset {
            Dataset::D1 => id.index(),
            Dataset::D2 => self.dataset_limit + id.index(),
        };
        let limit = match dataset {
            Dataset::D1 => self.dataset_limit,
            Dataset::D2 => self.total,
        };
        (flat < limit).then_some(flat)
    }

    /// Dataset and local id of a flat index.
    pub fn local(&self, global: usize) -> (Dataset, EntityId) {
        if global < self.dataset_limit {
            (Dataset::D1, EntityId(global as u32))
        } else {
            (Dataset::D2, EntityId((global - self.dataset_limit) as u32))
        }
    }
}
