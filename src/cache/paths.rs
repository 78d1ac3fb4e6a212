// Cache path utilities.
// Locates the on-disk cache directory and maps fingerprints to entry files.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/ckan-client on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ckan-client").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the JSON file holding one cache entry.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("ckan.abc123"), "ckan.abc123");
        assert_eq!(sanitize_name("with/slash"), "with_slash");
        assert_eq!(sanitize_name("scheme:name"), "scheme_name");
    }

    #[test]
    fn test_entry_path() {
        let dir = Path::new("/tmp/ckan");
        let path = entry_path(dir, "ckan.deadbeef");
        assert!(path.ends_with("ckan.deadbeef.json"));
        assert!(path.starts_with(dir));
    }

    #[test]
    fn test_cache_dir_names_project() {
        // No home directory in some CI environments.
        if let Some(dir) = cache_dir() {
            assert!(dir.to_string_lossy().contains("ckan-client"));
        }
    }
}
