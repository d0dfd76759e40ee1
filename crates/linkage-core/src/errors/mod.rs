//! Error handling for Linkage.
//! One error enum per subsystem, `thiserror` only.

pub mod block_error;
pub mod clustering_error;
pub mod config_error;
pub mod error_code;
pub mod graph_error;
pub mod pairs_error;
pub mod pipeline_error;

pub use block_error::BlockError;
pub use clustering_error::ClusteringError;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use graph_error::GraphError;
pub use pairs_error::PairsError;
pub use pipeline_error::PipelineError;
