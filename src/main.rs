mod model;
mod repository;
mod util;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use gix_hash::ObjectId;

use model::{EntryKind, TreeEntry};
use repository::{
    Git2CommitStore, GitCli, LastCommitCache, LastCommitResolver, SqliteLastCommitCache,
};
use util::{format_timestamp, short_id};

#[derive(Serialize)]
struct ListingRow<'a> {
    name: &'a str,
    kind: &'a str,
    commit: String,
    date: String,
    message: &'a str,
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Dir => "dir",
        EntryKind::Symlink => "symlink",
        EntryKind::Submodule => "submodule",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut repo_arg: Option<String> = None;
    let mut tree_arg: Option<String> = None;
    let mut json = false;
    let mut no_cache = false;
    let mut quiet = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else if arg == "--no-cache" {
            no_cache = true;
        } else if arg == "--quiet" {
            quiet = true;
        } else if repo_arg.is_none() {
            repo_arg = Some(arg);
        } else if tree_arg.is_none() {
            tree_arg = Some(arg);
        } else {
            anyhow::bail!("Unexpected argument: {}", arg);
        }
    }
    let repo_path = repo_arg.unwrap_or_else(|| ".".to_string());
    let tree_path = tree_arg.unwrap_or_default();

    let abs_repo_path = fs::canonicalize(&repo_path)
        .with_context(|| format!("Could not resolve path: {}", repo_path))?;

    let repo = git2::Repository::open(&abs_repo_path).context("Failed to open git repository")?;
    let head = repo.head()?.peel_to_commit()?;
    let head_id =
        ObjectId::try_from(head.id().as_bytes()).context("Unsupported object id format")?;

    // Collect the directory snapshot to resolve
    let head_tree = head.tree()?;
    let tree = if tree_path.is_empty() {
        head_tree
    } else {
        let entry = head_tree
            .get_path(Path::new(&tree_path))
            .with_context(|| format!("No such tree path: {}", tree_path))?;
        entry
            .to_object(&repo)?
            .into_tree()
            .map_err(|_| anyhow::anyhow!("Not a directory: {}", tree_path))?
    };

    let mut entries = Vec::new();
    for entry in tree.iter() {
        let Some(name) = entry.name() else { continue };
        let kind = match entry.kind() {
            Some(git2::ObjectType::Tree) => EntryKind::Dir,
            Some(git2::ObjectType::Commit) => EntryKind::Submodule,
            _ if entry.filemode() == 0o120000 => EntryKind::Symlink,
            _ => EntryKind::File,
        };
        entries.push(TreeEntry::new(name, kind));
    }

    // Per-repository cache database under the user cache directory
    let cache: Option<Arc<dyn LastCommitCache>> = if no_cache {
        None
    } else {
        let cache_dir = dirs::cache_dir()
            .context("Could not determine cache directory")?
            .join("lastrev");
        fs::create_dir_all(&cache_dir)?;

        let repo_name = abs_repo_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("repo");
        let mut hasher = DefaultHasher::new();
        abs_repo_path.hash(&mut hasher);
        let hash = hasher.finish();
        let db_path = cache_dir.join(format!("{}_{:016x}.db", repo_name, hash));

        if !quiet {
            eprintln!("Using cache: {}", db_path.display());
        }

        let db_path_str = db_path.to_str().context("Invalid path encoding")?;
        let db = SqliteLastCommitCache::new(db_path_str).await?;
        db.init_schema().await?;
        let db: Arc<dyn LastCommitCache> = Arc::new(db);
        Some(db)
    };

    let runner = Arc::new(GitCli::new());
    let store = Arc::new(Git2CommitStore::new());
    let resolver = if quiet {
        LastCommitResolver::quiet(runner, store, cache)
    } else {
        LastCommitResolver::new(runner, store, cache)
    };

    let listing = resolver
        .resolve(&abs_repo_path, head_id, &tree_path, entries)
        .await?;

    if json {
        let rows: Vec<ListingRow<'_>> = listing
            .iter()
            .map(|row| ListingRow {
                name: &row.entry.name,
                kind: kind_label(row.entry.kind),
                commit: row.commit.id.to_hex().to_string(),
                date: format_timestamp(row.commit.timestamp),
                message: &row.commit.message,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let width = listing
            .iter()
            .map(|row| row.entry.name.len())
            .max()
            .unwrap_or(0);
        for row in &listing {
            println!(
                "{:<width$}  {}  {}  {}",
                row.entry.name,
                short_id(&row.commit.id),
                format_timestamp(row.commit.timestamp),
                row.commit.message,
                width = width
            );
        }
    }

    Ok(())
}
