mod commit;
mod entry;

pub use commit::{LastCommit, PartialCommit};
pub use entry::{EntryKind, TreeEntry};
