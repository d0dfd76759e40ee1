//! # linkage-core
//!
//! Foundation crate for the Linkage entity resolution engine.
//! Defines the data model, errors, config, parameter metadata and constants.
//! The analysis crate depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod params;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::LinkageConfig;
pub use errors::{ErrorCode, PipelineError};
pub use types::{
    Block, Comparison, EntityId, EquivalenceCluster, IdSpace, SimilarityPairs,
};
