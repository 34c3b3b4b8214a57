//! Untargeted history scanner
//!
//! One sequential consumer of the broad history stream, newest commit
//! first. Each changed path not seen before is attributed to the current
//! (first-encountered, hence most recent) commit. A deep change also
//! attributes to the listed subdirectory it falls under.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::model::LastCommit;
use crate::repository::gitcmd::HistoryScan;
use crate::util::direct_child_path;

use super::parse;
use super::state::ResolveState;
use super::types::ResolveError;

pub(crate) async fn run_untargeted_scan(
    state: Arc<ResolveState>,
    mut scan: HistoryScan,
    cold_streak_threshold: u32,
    remaining_threshold: usize,
) -> Result<(), ResolveError> {
    // Paths this scanner already attributed. Purely local: avoids
    // re-locking the shared state for paths that show up again deeper in
    // history; correctness rests on try_record alone.
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut current: Option<LastCommit> = None;
    let mut cold_streak: u32 = 0;

    while let Some(line) = scan.next_line().await? {
        if line.is_empty() {
            // Block separator: the only place the scan re-evaluates itself
            let remaining = state.remaining();
            if remaining == 0 {
                return scan.abort().await;
            }
            if cold_streak >= cold_streak_threshold && remaining <= remaining_threshold {
                // The scan has gone cold and only a small residue is left;
                // a handful of point queries beats scanning the remaining
                // tail of history.
                return scan.abort().await;
            }
            continue;
        }

        if parse::is_changed_path_line(&line) {
            let path = parse::parse_changed_path(&line)?;
            if let Some(commit) = current.as_ref() {
                if attribute(&state, &mut seen, &path, commit) {
                    cold_streak = 0;
                }
            }
            continue;
        }

        let partial = parse::parse_commit_line(&line)?;
        current = Some(partial.into());
        cold_streak += 1;
    }

    scan.finish().await
}

/// Records the changed path, and the listed subdirectory containing it,
/// against the current commit. Returns true when anything new landed.
fn attribute(
    state: &ResolveState,
    seen: &mut FxHashSet<String>,
    path: &str,
    commit: &LastCommit,
) -> bool {
    let mut recorded = false;
    if !seen.contains(path) {
        seen.insert(path.to_string());
        recorded |= state.try_record(path, commit.clone());
    }
    if let Some(child) = direct_child_path(state.tree_path(), path) {
        if child != path && !seen.contains(child) {
            seen.insert(child.to_string());
            recorded |= state.try_record(child, commit.clone());
        }
    }
    recorded
}
