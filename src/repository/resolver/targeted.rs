//! Targeted per-path resolvers
//!
//! Each worker repeatedly claims one still-unresolved entry path and
//! resolves it with a direct point query, independent of the broad scan.

use std::sync::Arc;

use crate::repository::cache::LastCommitCache;
use crate::repository::commits::CommitStore;
use crate::repository::gitcmd::CommandRunner;

use super::state::ResolveState;
use super::types::ResolveError;

pub(crate) async fn run_targeted_resolver(
    state: Arc<ResolveState>,
    runner: Arc<dyn CommandRunner>,
    commits: Arc<dyn CommitStore>,
    cache: Option<Arc<dyn LastCommitCache>>,
) -> Result<(), ResolveError> {
    while let Some(path) = state.claim_next_unresolved() {
        if let Some(cache) = cache.as_ref() {
            if let Some(commit) = cache.get(state.repo_key(), state.head(), &path).await? {
                state.try_record(&path, commit);
                continue;
            }
        }

        let id = runner
            .run_point_query(state.repo(), state.head(), &path)
            .await?;
        let commit = commits.resolve(state.repo(), &id).await?;
        // The scanner may have resolved this path meanwhile; the stale
        // point-query result is simply discarded.
        state.try_record(&path, commit.clone());
        if let Some(cache) = cache.as_ref() {
            cache
                .put(state.repo_key(), state.head(), &path, &commit)
                .await?;
        }
    }
    Ok(())
}
