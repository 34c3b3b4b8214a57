//! Shared resolution state
//!
//! The one mutex-protected structure both strategies write into. Mutation
//! goes through intention-revealing operations only; the lock is held for
//! map and set work, never across I/O.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gix_hash::ObjectId;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::{LastCommit, TreeEntry};
use crate::util::join_tree_path;

use super::types::{ResolveError, ResolvedEntry};

pub(crate) struct ResolveState {
    entries: Vec<TreeEntry>,
    /// Full repo-relative paths, parallel to `entries`
    entry_paths: Vec<String>,
    path_index: FxHashSet<String>,
    repo: PathBuf,
    repo_key: String,
    head: ObjectId,
    tree_path: String,
    inner: Mutex<StateInner>,
}

#[derive(Default)]
struct StateInner {
    commits: FxHashMap<String, LastCommit>,
    /// Paths handed out to targeted workers. Gates workers only; the
    /// scanner may still resolve a claimed path first.
    claimed: FxHashSet<String>,
}

impl ResolveState {
    pub(crate) fn new(
        repo: &Path,
        head: ObjectId,
        tree_path: &str,
        entries: Vec<TreeEntry>,
    ) -> Self {
        let tree_path = tree_path.trim_matches('/').to_string();
        let entry_paths: Vec<String> = entries
            .iter()
            .map(|e| join_tree_path(&tree_path, &e.name))
            .collect();
        let path_index = entry_paths.iter().cloned().collect();
        Self {
            entries,
            entry_paths,
            path_index,
            repo: repo.to_path_buf(),
            repo_key: repo.display().to_string(),
            head,
            tree_path,
            inner: Mutex::default(),
        }
    }

    pub(crate) fn repo(&self) -> &Path {
        &self.repo
    }

    /// Repository identity used as the cache key
    pub(crate) fn repo_key(&self) -> &str {
        &self.repo_key
    }

    pub(crate) fn head(&self) -> &ObjectId {
        &self.head
    }

    pub(crate) fn tree_path(&self) -> &str {
        &self.tree_path
    }

    pub(crate) fn total(&self) -> usize {
        self.entry_paths.len()
    }

    /// Entries still lacking a resolved commit
    pub(crate) fn remaining(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        self.entry_paths.len() - inner.commits.len()
    }

    /// Returns and marks claimed the first entry path (in the caller's
    /// listing order) that is neither resolved nor already claimed.
    /// Two concurrent callers never receive the same path.
    pub(crate) fn claim_next_unresolved(&self) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        for path in &self.entry_paths {
            if inner.commits.contains_key(path) || inner.claimed.contains(path) {
                continue;
            }
            inner.claimed.insert(path.clone());
            return Some(path.clone());
        }
        None
    }

    /// The single write gate for resolved commits. Returns false for paths
    /// outside this resolution and for already-resolved paths; the first
    /// writer wins and the entry is never overwritten.
    pub(crate) fn try_record(&self, path: &str, commit: LastCommit) -> bool {
        if !self.path_index.contains(path) {
            return false;
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.commits.contains_key(path) {
            return false;
        }
        inner.commits.insert(path.to_string(), commit);
        true
    }

    /// Pairs entries with resolved commits in the caller's original order.
    /// Fails when any entry is still unresolved.
    pub(crate) fn listing(&self) -> Result<Vec<ResolvedEntry>, ResolveError> {
        let inner = self.inner.lock().unwrap();
        let total = self.entry_paths.len();
        let missing = total - inner.commits.len();
        if missing > 0 {
            return Err(ResolveError::IncompleteResolution { missing, total });
        }
        let mut listing = Vec::with_capacity(total);
        for (entry, path) in self.entries.iter().zip(&self.entry_paths) {
            let commit = inner
                .commits
                .get(path)
                .cloned()
                .ok_or(ResolveError::IncompleteResolution { missing: 1, total })?;
            listing.push(ResolvedEntry {
                entry: entry.clone(),
                commit,
            });
        }
        Ok(listing)
    }
}
