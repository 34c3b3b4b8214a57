mod cache;
mod commits;
mod gitcmd;
mod resolver;

pub use cache::{LastCommitCache, SqliteLastCommitCache};
pub use commits::{CommitStore, Git2CommitStore};
pub use gitcmd::{CommandRunner, GitCli, HistoryScan};
pub use resolver::{LastCommitResolver, ResolveConfig, ResolveError, ResolvedEntry};

// Re-export the schema version for callers who need it
pub const SCHEMA_VERSION: &str = "1";
