use std::path::PathBuf;

use serde::Serialize;

/// What a successful flush did, grouped by how the engine treated each
/// target, in execution order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FlushReport {
    /// Existing files that received appended bytes.
    pub appended: Vec<PathBuf>,
    /// Existing files whose content was replaced.
    pub written: Vec<PathBuf>,
    /// Files that did not exist before the batch.
    pub created: Vec<PathBuf>,
    pub duration_ms: u64,
}
