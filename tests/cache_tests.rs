// SQLite last-commit cache tests

use gix_hash::ObjectId;
use tempfile::TempDir;

use lastrev::model::LastCommit;
use lastrev::repository::{LastCommitCache, SqliteLastCommitCache};

fn oid(n: u8) -> ObjectId {
    ObjectId::try_from(&[n; 20][..]).unwrap()
}

fn commit(n: u8, ts: i64, msg: &str) -> LastCommit {
    LastCommit {
        id: oid(n),
        timestamp: ts,
        message: msg.to_string(),
    }
}

async fn create_cache_in_dir(dir: &TempDir) -> SqliteLastCommitCache {
    let db_path = dir.path().join("test.db");
    let cache = SqliteLastCommitCache::new(db_path.to_str().unwrap())
        .await
        .unwrap();
    cache.init_schema().await.unwrap();
    cache
}

#[tokio::test]
async fn test_put_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    let cache = create_cache_in_dir(&dir).await;

    let c = commit(1, 1700000000, "Add resolver");
    cache.put("/repo", &oid(0xaa), "src/main.rs", &c).await.unwrap();

    let got = cache.get("/repo", &oid(0xaa), "src/main.rs").await.unwrap();
    assert_eq!(got, Some(c));
}

#[tokio::test]
async fn test_miss_on_unknown_key() {
    let dir = TempDir::new().unwrap();
    let cache = create_cache_in_dir(&dir).await;

    let c = commit(1, 100, "one");
    cache.put("/repo", &oid(0xaa), "a.txt", &c).await.unwrap();

    // Same path, different head or repo: all misses
    assert_eq!(cache.get("/repo", &oid(0xaa), "b.txt").await.unwrap(), None);
    assert_eq!(cache.get("/repo", &oid(0xbb), "a.txt").await.unwrap(), None);
    assert_eq!(cache.get("/other", &oid(0xaa), "a.txt").await.unwrap(), None);
}

#[tokio::test]
async fn test_put_is_idempotent_replace() {
    let dir = TempDir::new().unwrap();
    let cache = create_cache_in_dir(&dir).await;

    let first = commit(1, 100, "first");
    let second = commit(2, 200, "second");
    cache.put("/repo", &oid(0xaa), "a.txt", &first).await.unwrap();
    cache.put("/repo", &oid(0xaa), "a.txt", &second).await.unwrap();

    let got = cache.get("/repo", &oid(0xaa), "a.txt").await.unwrap();
    assert_eq!(got, Some(second));
}

#[tokio::test]
async fn test_schema_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");

    let cache = SqliteLastCommitCache::new(db_path.to_str().unwrap())
        .await
        .unwrap();
    let rebuilt = cache.init_schema().await.unwrap();
    assert!(rebuilt);

    let c = commit(3, 300, "kept");
    cache.put("/repo", &oid(0xaa), "a.txt", &c).await.unwrap();
    drop(cache);

    // Reopening with the same schema version keeps existing entries
    let cache = SqliteLastCommitCache::new(db_path.to_str().unwrap())
        .await
        .unwrap();
    let rebuilt = cache.init_schema().await.unwrap();
    assert!(!rebuilt);
    let got = cache.get("/repo", &oid(0xaa), "a.txt").await.unwrap();
    assert_eq!(got, Some(c));
}
