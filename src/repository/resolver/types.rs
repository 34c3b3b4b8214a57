//! Domain types for last-commit resolution
//!
//! These types form the data contract between the resolver layers.

use std::time::Duration;

use thiserror::Error;

use crate::model::{LastCommit, TreeEntry};

/// Tuning knobs for a resolution run.
///
/// The heuristic thresholds are empirically tuned values, not invariants;
/// override them when a repository's history shape warrants it.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Commit headers scanned without a new attribution before the broad
    /// scan counts as cold.
    pub cold_streak_threshold: u32,
    /// Largest unresolved residue worth handing off to point queries.
    pub remaining_threshold: usize,
    /// Overall deadline on the history-scan subprocess.
    pub deadline: Duration,
    /// Number of targeted workers. `None` means available hardware
    /// parallelism.
    pub parallelism: Option<usize>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            cold_streak_threshold: 5,
            remaining_threshold: 12,
            deadline: Duration::from_secs(60),
            parallelism: None,
        }
    }
}

impl ResolveConfig {
    pub(crate) fn effective_parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Errors that abort a resolution. There is no partial-result return;
/// the caller gets either a complete listing or exactly one of these.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed history line: {0:?}")]
    MalformedLine(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("git command failed: {0}")]
    CommandFailed(String),

    #[error("history scan exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("resolution left {missing} of {total} entries unresolved")]
    IncompleteResolution { missing: usize, total: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

/// One row of the resolved listing, in the caller's entry order.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    pub entry: TreeEntry,
    pub commit: LastCommit,
}
