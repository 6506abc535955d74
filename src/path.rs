//! Storage path normalization and ordering used to group materials.
//!
//! A material's group key is the directory it is stored in, relative to the
//! configured storage root: with root `Assets`, a material stored at
//! `Assets/Characters/skin.mat` groups under `/Characters`, and one stored at
//! `Assets/skin.mat` groups under `/`. Directories outside the root keep
//! their normalized form. Materials whose path cannot be resolved group
//! under [`UNRESOLVED_GROUP`], which sorts before every other key.

use std::cmp::Ordering;

/// Group key for materials without a resolvable storage path.
pub const UNRESOLVED_GROUP: &str = "";

/// Normalize separators in a storage path.
///
/// - Replaces backslashes with forward slashes
/// - Collapses redundant separators (`a///b` → `a/b`)
/// - Drops `.` segments
/// - Strips leading and trailing slashes
///
/// Unlike a filesystem path, nothing here is rejected: the result is only
/// used as a sort and grouping key.
pub fn normalize(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    replaced
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Compute the group key for a resolved storage path.
///
/// `None` and paths that normalize to nothing map to [`UNRESOLVED_GROUP`].
pub fn group_key(resolved: Option<&str>, storage_root: &str) -> String {
    let path = match resolved.map(normalize) {
        Some(path) if !path.is_empty() => path,
        _ => return UNRESOLVED_GROUP.to_string(),
    };
    let directory = match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    };
    strip_root(directory, &normalize(storage_root))
}

fn strip_root(directory: &str, root: &str) -> String {
    if root.is_empty() {
        return format!("/{directory}");
    }
    if directory == root {
        return "/".to_string();
    }
    match directory.strip_prefix(root) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => directory.to_string(),
    }
}

/// Ordinal comparison of resolved paths; unresolved paths sort first.
pub fn compare_paths(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_separators() {
        assert_eq!(normalize("Assets\\Mats//a.mat"), "Assets/Mats/a.mat");
        assert_eq!(normalize("/Assets/./Mats/"), "Assets/Mats");
        assert_eq!(normalize("///"), "");
    }

    #[test]
    fn group_key_strips_root() {
        assert_eq!(group_key(Some("Assets/X/a.mat"), "Assets"), "/X");
        assert_eq!(group_key(Some("Assets/X/Y/a.mat"), "Assets"), "/X/Y");
    }

    #[test]
    fn group_key_root_level_material() {
        assert_eq!(group_key(Some("Assets/a.mat"), "Assets"), "/");
    }

    #[test]
    fn group_key_outside_root() {
        assert_eq!(
            group_key(Some("Packages/toon/m.mat"), "Assets"),
            "Packages/toon"
        );
        // Only whole segments match the root.
        assert_eq!(group_key(Some("AssetsOld/m.mat"), "Assets"), "AssetsOld");
    }

    #[test]
    fn group_key_unresolved() {
        assert_eq!(group_key(None, "Assets"), UNRESOLVED_GROUP);
        assert_eq!(group_key(Some(""), "Assets"), UNRESOLVED_GROUP);
    }

    #[test]
    fn group_key_empty_root() {
        assert_eq!(group_key(Some("Mats/a.mat"), ""), "/Mats");
        assert_eq!(group_key(Some("a.mat"), ""), "/");
    }

    #[test]
    fn group_key_backslash_root() {
        assert_eq!(group_key(Some("Game\\Data\\X\\a.mat"), "Game\\Data"), "/X");
    }

    #[test]
    fn compare_paths_orders_unresolved_first() {
        assert_eq!(compare_paths(None, Some("a")), Ordering::Less);
        assert_eq!(compare_paths(Some("a"), None), Ordering::Greater);
        assert_eq!(compare_paths(None, None), Ordering::Equal);
    }

    #[test]
    fn compare_paths_is_ordinal() {
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(compare_paths(Some("Z"), Some("a")), Ordering::Less);
        assert_eq!(compare_paths(Some("/X"), Some("/Y")), Ordering::Less);
    }
}
