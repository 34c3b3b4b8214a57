/// Joins a tree path and an entry name into a repo-relative entry path.
///
/// The tree path may be empty (repository root) or carry stray slashes;
/// the result never starts or ends with '/'.
pub fn join_tree_path(tree_path: &str, name: &str) -> String {
    let tree_path = tree_path.trim_matches('/');
    if tree_path.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", tree_path, name)
    }
}

/// Truncates a changed file path to the direct child of `tree_path` it
/// falls under, so a change deep inside a subdirectory attributes to the
/// listed subdirectory itself. Returns `None` when the path is not under
/// `tree_path`; returns the path unchanged when it is a direct child.
pub fn direct_child_path<'a>(tree_path: &str, changed_path: &'a str) -> Option<&'a str> {
    let tree_path = tree_path.trim_matches('/');
    let rel = if tree_path.is_empty() {
        changed_path
    } else {
        changed_path
            .strip_prefix(tree_path)?
            .strip_prefix('/')?
    };
    match rel.find('/') {
        Some(i) => Some(&changed_path[..changed_path.len() - rel.len() + i]),
        None => Some(changed_path),
    }
}
