//! Commit store
//!
//! Turns a point-query object id into a usable commit record.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use gix_hash::ObjectId;

use crate::model::LastCommit;

/// Resolves object ids to full commits.
#[async_trait]
pub trait CommitStore: Send + Sync {
    async fn resolve(&self, repo: &Path, id: &ObjectId) -> Result<LastCommit>;
}

/// Reads commits out of the on-disk repository via git2.
#[derive(Debug, Default)]
pub struct Git2CommitStore;

impl Git2CommitStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommitStore for Git2CommitStore {
    async fn resolve(&self, repo: &Path, id: &ObjectId) -> Result<LastCommit> {
        let repo = git2::Repository::open(repo).context("Failed to open git repository")?;
        // git2 and gix ids are both raw SHA-1 bytes
        let oid = git2::Oid::from_bytes(id.as_bytes()).context("Invalid object id bytes")?;
        let commit = repo
            .find_commit(oid)
            .with_context(|| format!("Commit {} not found", id.to_hex()))?;
        Ok(LastCommit {
            id: *id,
            timestamp: commit.time().seconds(),
            message: commit.summary().unwrap_or("").to_string(),
        })
    }
}
