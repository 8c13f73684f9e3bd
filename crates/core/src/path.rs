//! Local path resolution
//!
//! Paths given on the command line are resolved against the effective
//! working directory of the run, with `~` expanded to the home directory.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` or `~/` to the user's home directory
///
/// Other forms (`~user`) are passed through unchanged.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return Ok(PathBuf::from(path)),
    };

    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))?;
    Ok(home.join(rest.trim_start_matches('/')))
}

/// Lexically normalize a path, removing `.` and folding `..`
///
/// The filesystem is not consulted, so symlinks are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                let at_parent = matches!(out.components().next_back(), Some(Component::ParentDir));
                if at_parent || out.as_os_str().is_empty() {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve `path` against `base`, expanding `~` and normalizing the result
pub fn resolve(base: &Path, path: &str) -> Result<PathBuf> {
    let expanded = expand_home(path)?;
    Ok(normalize(&base.join(expanded)))
}

/// Resolve a working directory argument to an absolute path
pub fn absolute_dir(path: &str) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    resolve(&current, path)
}
