//! Last-commit resolution engine
//!
//! Resolves, for every entry of a directory snapshot, the most recent
//! commit that touched it.
//!
//! # Architecture
//!
//! Two strategies run concurrently against one shared state:
//!
//! - **scan**: one sequential consumer of a broad history stream,
//!   attributing changed paths as it encounters them, with a cost-based
//!   early stop once the scan goes cold and little remains unresolved.
//! - **targeted**: a pool of workers, each claiming one unresolved entry
//!   and resolving it with a direct point query, short-circuited by the
//!   optional cache.
//!
//! The engine is organized into layers:
//!
//! - **types**: config, errors, listing rows
//! - **parse**: single-line history parsing
//! - **state**: the mutex-guarded shared structure
//! - **scan**: the untargeted scanner
//! - **targeted**: the worker loop

mod parse;
mod scan;
mod state;
mod targeted;
mod types;

pub use types::{ResolveConfig, ResolveError, ResolvedEntry};

use std::path::Path;
use std::sync::Arc;

use gix_hash::ObjectId;
use tokio::task::JoinSet;

use crate::model::TreeEntry;
use crate::repository::cache::LastCommitCache;
use crate::repository::commits::CommitStore;
use crate::repository::gitcmd::CommandRunner;

use state::ResolveState;

/// Orchestrates one resolution: shared state, the scanner, and the
/// targeted worker pool. One instance can serve many calls.
pub struct LastCommitResolver {
    runner: Arc<dyn CommandRunner>,
    commits: Arc<dyn CommitStore>,
    cache: Option<Arc<dyn LastCommitCache>>,
    config: ResolveConfig,
    verbose: bool,
}

impl LastCommitResolver {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        commits: Arc<dyn CommitStore>,
        cache: Option<Arc<dyn LastCommitCache>>,
    ) -> Self {
        Self {
            runner,
            commits,
            cache,
            config: ResolveConfig::default(),
            verbose: true,
        }
    }

    /// Create a quiet resolver (no logging output, used by tests and benchmarks)
    pub fn quiet(
        runner: Arc<dyn CommandRunner>,
        commits: Arc<dyn CommitStore>,
        cache: Option<Arc<dyn LastCommitCache>>,
    ) -> Self {
        Self {
            verbose: false,
            ..Self::new(runner, commits, cache)
        }
    }

    pub fn with_config(mut self, config: ResolveConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve the last commit for every entry of the tree at `tree_path`,
    /// starting history traversal at `head`. Returns rows in the caller's
    /// entry order, or the first error any strategy hit.
    pub async fn resolve(
        &self,
        repo: &Path,
        head: ObjectId,
        tree_path: &str,
        entries: Vec<TreeEntry>,
    ) -> Result<Vec<ResolvedEntry>, ResolveError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let state = Arc::new(ResolveState::new(repo, head, tree_path, entries));
        self.log(&format!(
            "Resolving last commits for {} entries under '{}'",
            state.total(),
            state.tree_path()
        ));

        let mut tasks: JoinSet<Result<(), ResolveError>> = JoinSet::new();

        let history = self
            .runner
            .run_history_scan(repo, &head, state.tree_path())
            .await?;
        let deadline = self.config.deadline;
        let cold_streak_threshold = self.config.cold_streak_threshold;
        let remaining_threshold = self.config.remaining_threshold;
        {
            let state = Arc::clone(&state);
            tasks.spawn(async move {
                let scan = scan::run_untargeted_scan(
                    state,
                    history,
                    cold_streak_threshold,
                    remaining_threshold,
                );
                match tokio::time::timeout(deadline, scan).await {
                    Ok(result) => result,
                    Err(_) => Err(ResolveError::DeadlineExceeded(deadline)),
                }
            });
        }

        let workers = self.config.effective_parallelism();
        for _ in 0..workers {
            tasks.spawn(targeted::run_targeted_resolver(
                Arc::clone(&state),
                Arc::clone(&self.runner),
                Arc::clone(&self.commits),
                self.cache.clone(),
            ));
        }

        // One completion signal per task; the first error wins and cancels
        // the rest, later errors are discarded.
        let mut first_err: Option<ResolveError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    if first_err.is_none() {
                        first_err = Some(err);
                        tasks.abort_all();
                    }
                }
                Err(join_err) if join_err.is_cancelled() => {}
                Err(join_err) => {
                    if first_err.is_none() {
                        first_err =
                            Some(anyhow::anyhow!("resolver task failed: {}", join_err).into());
                    }
                }
            }
        }
        if let Some(err) = first_err {
            return Err(err);
        }

        let listing = state.listing()?;
        self.log(&format!("Resolved {} entries", listing.len()));
        Ok(listing)
    }

    fn log(&self, msg: &str) {
        if self.verbose {
            eprintln!("{}", msg);
        }
    }
}
