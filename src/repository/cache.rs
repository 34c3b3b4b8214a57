//! Last-commit cache
//!
//! The answer for a (head, path) pair never changes, so resolved point
//! queries are persisted and short-circuit later resolutions. Entries
//! written by successful workers stay valid even when the resolution that
//! wrote them ultimately failed elsewhere.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gix_hash::ObjectId;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::str::FromStr;

use crate::model::LastCommit;

use super::SCHEMA_VERSION;

/// Optional cross-resolution cache of last-commit lookups.
/// `repo` is the caller's repository identity key; `head` scopes entries
/// to one starting commit.
#[async_trait]
pub trait LastCommitCache: Send + Sync {
    async fn get(&self, repo: &str, head: &ObjectId, path: &str) -> Result<Option<LastCommit>>;

    async fn put(
        &self,
        repo: &str,
        head: &ObjectId,
        path: &str,
        commit: &LastCommit,
    ) -> Result<()>;
}

/// SQLite-backed cache for last-commit lookups
pub struct SqliteLastCommitCache {
    pool: Pool<Sqlite>,
}

impl SqliteLastCommitCache {
    /// Open (or create) a cache database at the given path
    pub async fn new(db_path: &str) -> Result<Self> {
        // Configure connection options with PRAGMAs applied to every connection
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", db_path))?
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            // Targeted workers hit the cache concurrently
            .max_connections(4)
            .connect_with(options)
            .await
            .context("Failed to connect to cache database")?;

        Ok(Self { pool })
    }

    /// Initialize the cache schema, returns true if schema was rebuilt
    pub async fn init_schema(&self) -> Result<bool> {
        // Create metadata table first (needed to check version)
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        // Check schema version
        let stored_version: Option<String> =
            sqlx::query("SELECT value FROM metadata WHERE key = 'schema_version'")
                .fetch_optional(&self.pool)
                .await?
                .map(|row| row.get("value"));

        let needs_rebuild = stored_version.as_deref() != Some(SCHEMA_VERSION);

        if needs_rebuild {
            sqlx::query("DROP TABLE IF EXISTS last_commits")
                .execute(&self.pool)
                .await?;
            sqlx::query("DELETE FROM metadata").execute(&self.pool).await?;
        }

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS last_commits (
                repo TEXT NOT NULL,
                head TEXT NOT NULL,
                path TEXT NOT NULL,
                commit_id TEXT NOT NULL,
                committed_at INTEGER NOT NULL,
                message TEXT NOT NULL,
                PRIMARY KEY (repo, head, path)
            )",
        )
        .execute(&self.pool)
        .await?;

        if needs_rebuild {
            sqlx::query("INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)")
                .bind(SCHEMA_VERSION)
                .execute(&self.pool)
                .await?;
        }

        Ok(needs_rebuild)
    }
}

#[async_trait]
impl LastCommitCache for SqliteLastCommitCache {
    async fn get(&self, repo: &str, head: &ObjectId, path: &str) -> Result<Option<LastCommit>> {
        let row = sqlx::query(
            "SELECT commit_id, committed_at, message FROM last_commits
             WHERE repo = ? AND head = ? AND path = ?",
        )
        .bind(repo)
        .bind(head.to_hex().to_string())
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let commit_hex: String = row.get("commit_id");
        let id = ObjectId::from_hex(commit_hex.as_bytes())
            .with_context(|| format!("Corrupt cache entry for {}", path))?;
        Ok(Some(LastCommit {
            id,
            timestamp: row.get("committed_at"),
            message: row.get("message"),
        }))
    }

    async fn put(
        &self,
        repo: &str,
        head: &ObjectId,
        path: &str,
        commit: &LastCommit,
    ) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO last_commits
                (repo, head, path, commit_id, committed_at, message)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(repo)
        .bind(head.to_hex().to_string())
        .bind(path)
        .bind(commit.id.to_hex().to_string())
        .bind(commit.timestamp)
        .bind(&commit.message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
