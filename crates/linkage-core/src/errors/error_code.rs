//! Stable error codes for callers outside the crate.

/// Every error enum implements this to expose a machine-readable code,
/// so a search harness can bucket failed configurations without parsing
/// messages.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "BLOCK_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const BLOCK_ERROR: &str = "BLOCK_ERROR";
pub const TOO_MANY_COMPARISONS: &str = "TOO_MANY_COMPARISONS";
pub const PAIRS_ERROR: &str = "PAIRS_ERROR";
pub const GRAPH_ERROR: &str = "GRAPH_ERROR";
pub const CLUSTERING_ERROR: &str = "CLUSTERING_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
