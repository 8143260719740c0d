//! Config file discovery and loading

use std::fs;
use std::path::{self, Component, Path, PathBuf};

use serde::de::DeserializeOwned;

use super::toml_schema::LintfmtToml;
use crate::error::{Error, Result};

/// Search upward from `start_dir` for a file with the given name.
///
/// The walk ends at the filesystem root, where the parent of a directory is
/// the directory itself. If `stop_at_git_root` is true, it also stops at the
/// first directory containing `.git`.
/// Returns `None` if the file is not found.
pub fn find_file_upward(
    start_dir: &Path,
    filename: &str,
    stop_at_git_root: bool,
) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.exists() {
            return Some(file_path);
        }

        if stop_at_git_root && current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

/// Make `path` absolute and drop its `.` and `..` components lexically, so
/// `Path::parent` walks real ancestors.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = path::absolute(path).map_err(|e| Error::io(path, e))?;
    Ok(normalize_path(&absolute))
}

/// Remove `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Find lintfmt.toml by searching upward from the given directory.
///
/// Stops at the first `lintfmt.toml` found, or at the git repository root
/// (directory containing `.git`), whichever comes first.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, "lintfmt.toml", true)
}

/// Load and parse lintfmt.toml from the given path.
pub fn load_config(path: &Path) -> Result<LintfmtToml> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    toml::from_str(&content).map_err(|source| Error::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a JSON config file, tolerating comments and trailing commas.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
    json5::from_str(content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
