mod format;
mod path;

pub use format::{format_timestamp, short_id};
pub use path::{direct_child_path, join_tree_path};
