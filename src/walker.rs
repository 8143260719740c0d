use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};

use crate::manifest::SOURCE_EXTENSIONS;

/// True for `.ts` and `.tsx` files
pub fn is_source_file(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Expand paths into source files, respecting gitignore.
///
/// Files named explicitly are kept whatever their extension; directories
/// contribute only `.ts`/`.tsx` files.
pub fn walk_paths(paths: &[PathBuf]) -> impl Iterator<Item = io::Result<PathBuf>> {
    let mut all_files = vec![];

    for path in paths {
        if path.is_file() {
            all_files.push(Ok(path.clone()));
            continue;
        }

        let walker = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                    if is_file && is_source_file(entry.path()) {
                        all_files.push(Ok(entry.into_path()));
                    }
                }
                Err(e) => {
                    all_files.push(Err(io::Error::other(e.to_string())));
                }
            }
        }
    }

    all_files.into_iter()
}
