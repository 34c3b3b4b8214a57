// Shared fixtures for resolver benchmarks
// Synthetic histories and replayed collaborators, no git involved
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use gix_hash::ObjectId;

use lastrev::model::{EntryKind, LastCommit, TreeEntry};
use lastrev::repository::{CommandRunner, CommitStore, HistoryScan, ResolveError};

pub fn oid(n: u32) -> ObjectId {
    let mut bytes = [0u8; 20];
    bytes[..4].copy_from_slice(&n.to_be_bytes());
    ObjectId::try_from(&bytes[..]).unwrap()
}

pub fn commit(n: u32, ts: i64) -> LastCommit {
    LastCommit {
        id: oid(n),
        timestamp: ts,
        message: format!("commit {}", n),
    }
}

pub fn entry_name(i: usize) -> String {
    format!("file_{}.txt", i)
}

pub fn file_entries(count: usize) -> Vec<TreeEntry> {
    (0..count)
        .map(|i| TreeEntry::new(entry_name(i), EntryKind::File))
        .collect()
}

/// Synthetic newest-first history. Commit `i` (of `commits`) touches
/// `touches` entries round-robin out of `entries`, plus one noise path.
pub fn synthetic_history(commits: u32, entries: usize, touches: usize) -> String {
    let mut history = String::new();
    for i in 0..commits {
        let c = commit(i + 1, 5_000_000 - i64::from(i));
        history.push_str(&format!(
            "{} {} {}\n\n",
            c.id.to_hex(),
            c.timestamp,
            c.message
        ));
        for t in 0..touches {
            let idx = (i as usize * touches + t) % entries;
            history.push_str(&format!("M\t{}\n", entry_name(idx)));
        }
        history.push_str(&format!("M\tnoise/path_{}.txt\n\n", i));
    }
    history
}

/// All commits of a synthetic history, for the bench commit store
pub fn synthetic_commits(commits: u32) -> Vec<LastCommit> {
    (0..commits)
        .map(|i| commit(i + 1, 5_000_000 - i64::from(i)))
        .collect()
}

/// Point answers attributing every entry to a fixed commit
pub fn point_answers(entries: usize, to: ObjectId) -> HashMap<String, ObjectId> {
    (0..entries).map(|i| (entry_name(i), to)).collect()
}

/// Command runner replaying a fixed history and point-answer table
pub struct BenchRunner {
    pub history: String,
    pub point: HashMap<String, ObjectId>,
}

#[async_trait]
impl CommandRunner for BenchRunner {
    async fn run_history_scan(
        &self,
        _repo: &Path,
        _head: &ObjectId,
        _tree_path: &str,
    ) -> Result<HistoryScan, ResolveError> {
        Ok(HistoryScan::from_reader(std::io::Cursor::new(
            self.history.clone().into_bytes(),
        )))
    }

    async fn run_point_query(
        &self,
        _repo: &Path,
        _head: &ObjectId,
        path: &str,
    ) -> Result<ObjectId, ResolveError> {
        self.point
            .get(path)
            .copied()
            .ok_or_else(|| ResolveError::InvalidObjectId(path.to_string()))
    }
}

/// Commit store backed by a fixed map
pub struct BenchStore {
    pub commits: HashMap<ObjectId, LastCommit>,
}

impl BenchStore {
    pub fn new(commits: &[LastCommit]) -> Self {
        Self {
            commits: commits.iter().map(|c| (c.id, c.clone())).collect(),
        }
    }
}

#[async_trait]
impl CommitStore for BenchStore {
    async fn resolve(&self, _repo: &Path, id: &ObjectId) -> anyhow::Result<LastCommit> {
        self.commits
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown commit {}", id.to_hex()))
    }
}
