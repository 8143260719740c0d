//! Option providers: each reads one kind of config file near the target
//! file and updates the formatter options accordingly.

pub mod editorconfig;
pub mod tslint;

use std::path::{Path, PathBuf};

use crate::config::absolute_path;
use crate::error::Result;

/// Directory the config lookup starts from: the explicit base dir if given,
/// else the directory holding `file_name`. Both are made absolute and
/// normalized.
pub(crate) fn base_dir_for(file_name: &Path, base_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(base_dir) = base_dir {
        return absolute_path(base_dir);
    }

    let file_name = absolute_path(file_name)?;
    Ok(file_name
        .parent()
        .map_or_else(|| file_name.clone(), Path::to_path_buf))
}
