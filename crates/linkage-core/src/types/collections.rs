//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec for per-entity block memberships (most entities sit in few blocks).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
