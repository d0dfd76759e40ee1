//! # linkage-analysis
//!
//! Meta-blocking and entity clustering engine.
//! Entity index → candidate graph weighting → comparison pruning →
//! graph utilities → entity clustering, plus evaluation against ground truth.

pub mod clustering;
pub mod evaluation;
pub mod graph;
pub mod index;
pub mod pipeline;
pub mod pruning;
pub mod registry;
pub mod weighting;

pub use clustering::Cluster;
pub use index::EntityIndex;
pub use pipeline::{Pipeline, PipelineOutput};
pub use pruning::{Prune, PruningOutcome};
pub use weighting::CandidateGraph;

/// Run `f` on a dedicated rayon pool of `threads` workers, or on the
/// global pool when `threads == 0`.
pub(crate) fn with_thread_pool<R, F>(threads: usize, f: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    if threads == 0 {
        return f();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(f),
        Err(e) => {
            tracing::warn!(threads, error = %e, "failed to build thread pool, using the global pool");
            f()
        }
    }
}
