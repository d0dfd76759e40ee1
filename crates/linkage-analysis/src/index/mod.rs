//! Inverted entity → block index and block list statistics.

pub mod entity_index;
pub mod statistics;

pub use entity_index::{raw_comparisons, EntityIndex};
pub use statistics::BlockStatistics;
