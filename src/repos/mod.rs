//! Discovery of local Git repositories.
//!
//! The Repos tab lists clones found under a configured root directory.
//! Discovery is a bounded-depth walk looking for `.git` directories; the
//! branch comes from `.git/HEAD` and the origin URL from `.git/config`.
//! No git binary or library is involved - both files are trivially
//! line-oriented.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// How deep below the scan root to look for repositories.
/// Two levels covers the common `~/src/<project>` and `~/src/<org>/<project>`
/// layouts without walking an entire home directory.
const MAX_SCAN_DEPTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepo {
    pub name: String,
    pub path: PathBuf,
    pub branch: Option<String>,
    pub origin_url: Option<String>,
}

impl LocalRepo {
    /// Case-insensitive match against name and origin URL, for local search.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self
                .origin_url
                .as_ref()
                .is_some_and(|url| url.to_lowercase().contains(&query))
    }
}

/// Walk `root` and collect Git repositories, sorted by name.
pub fn scan(root: &Path) -> Vec<LocalRepo> {
    let mut repos = Vec::new();
    walk(root, 0, &mut repos);
    repos.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    debug!(root = %root.display(), count = repos.len(), "Local repository scan complete");
    repos
}

fn walk(dir: &Path, depth: usize, repos: &mut Vec<LocalRepo>) {
    if dir.join(".git").is_dir() {
        repos.push(read_repo(dir));
        // A repository's subdirectories are its working tree, not more repos
        return;
    }

    if depth >= MAX_SCAN_DEPTH {
        return;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if path.is_dir() && !hidden {
            walk(&path, depth + 1, repos);
        }
    }
}

fn read_repo(dir: &Path) -> LocalRepo {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    LocalRepo {
        name,
        path: dir.to_path_buf(),
        branch: read_branch(dir),
        origin_url: read_origin_url(dir),
    }
}

/// Parse the current branch from `.git/HEAD`.
/// Detached HEADs yield a short hash instead of a branch name.
fn read_branch(dir: &Path) -> Option<String> {
    let head = std::fs::read_to_string(dir.join(".git/HEAD")).ok()?;
    let head = head.trim();

    if let Some(reference) = head.strip_prefix("ref: ") {
        reference
            .strip_prefix("refs/heads/")
            .map(|branch| branch.to_string())
    } else {
        // Detached HEAD: the file holds a bare commit hash
        Some(head.chars().take(7).collect())
    }
}

/// Parse the origin remote URL from `.git/config`.
fn read_origin_url(dir: &Path) -> Option<String> {
    let config = std::fs::read_to_string(dir.join(".git/config")).ok()?;

    let mut in_origin = false;
    for line in config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_origin = line == "[remote \"origin\"]";
            continue;
        }
        if in_origin {
            if let Some(url) = line.strip_prefix("url") {
                return Some(url.trim_start_matches([' ', '=']).trim().to_string());
            }
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_repo(root: &Path, name: &str, branch: &str, origin: Option<&str>) {
        let git_dir = root.join(name).join(".git");
        std::fs::create_dir_all(&git_dir).unwrap();
        std::fs::write(git_dir.join("HEAD"), format!("ref: refs/heads/{}\n", branch)).unwrap();
        if let Some(url) = origin {
            std::fs::write(
                git_dir.join("config"),
                format!("[core]\n\tbare = false\n[remote \"origin\"]\n\turl = {}\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n", url),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_scan_finds_repos_with_branch_and_origin() {
        let dir = TempDir::new().unwrap();
        make_repo(
            dir.path(),
            "widget",
            "main",
            Some("git@github.com:acme/widget.git"),
        );
        make_repo(dir.path(), "gadget", "develop", None);

        let repos = scan(dir.path());
        assert_eq!(repos.len(), 2);

        // Sorted by name
        assert_eq!(repos[0].name, "gadget");
        assert_eq!(repos[0].branch.as_deref(), Some("develop"));
        assert_eq!(repos[0].origin_url, None);

        assert_eq!(repos[1].name, "widget");
        assert_eq!(
            repos[1].origin_url.as_deref(),
            Some("git@github.com:acme/widget.git")
        );
    }

    #[test]
    fn test_scan_respects_depth_bound() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a/b/c");
        std::fs::create_dir_all(&deep).unwrap();
        make_repo(&deep, "buried", "main", None);

        let repos = scan(dir.path());
        assert!(repos.is_empty());
    }

    #[test]
    fn test_scan_does_not_descend_into_repos() {
        let dir = TempDir::new().unwrap();
        make_repo(dir.path(), "outer", "main", None);
        // A vendored repo inside the working tree should not be listed
        make_repo(&dir.path().join("outer"), "vendored", "main", None);

        let repos = scan(dir.path());
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "outer");
    }

    #[test]
    fn test_detached_head_short_hash() {
        let dir = TempDir::new().unwrap();
        let git_dir = dir.path().join("detached/.git");
        std::fs::create_dir_all(&git_dir).unwrap();
        std::fs::write(
            git_dir.join("HEAD"),
            "0123456789abcdef0123456789abcdef01234567\n",
        )
        .unwrap();

        let repos = scan(dir.path());
        assert_eq!(repos[0].branch.as_deref(), Some("0123456"));
    }

    #[test]
    fn test_matches_query() {
        let repo = LocalRepo {
            name: "Widget".to_string(),
            path: PathBuf::from("/src/widget"),
            branch: Some("main".to_string()),
            origin_url: Some("git@github.com:acme/widget.git".to_string()),
        };
        assert!(repo.matches("widg"));
        assert!(repo.matches("ACME"));
        assert!(!repo.matches("gadget"));
    }
}
