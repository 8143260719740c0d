//! Resolve the set of source files a `tsconfig.json` manifest selects.
//!
//! The manifest picks exactly one strategy, in priority order:
//! an explicit `files` list, a `filesGlob` list, or `include`/`exclude`
//! patterns. Glob expansion and include/exclude matching go through the
//! [`GlobExpander`] and [`FileMatcher`] collaborators so callers can swap
//! them out.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{absolute_path, normalize_path, read_json};
use crate::error::{Error, Result};

/// Extensions the include/exclude strategy keeps
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx"];

/// Directories wildcard traversal never enters unless an include names them
const IMPLICITLY_EXCLUDED_DIRS: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// File-selection part of a `tsconfig.json`; every other key is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfigJson {
    pub files: Option<Vec<String>>,
    pub files_glob: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

/// Entries of one directory, split by kind
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileSystemEntries {
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

/// Expands glob patterns relative to a directory into file paths.
pub trait GlobExpander {
    fn expand(&self, cwd: &Path, patterns: &[String]) -> Result<Vec<PathBuf>>;
}

/// Matches files under a directory against include/exclude patterns.
///
/// `get_entries` lists one directory; the matcher never touches the
/// filesystem any other way.
pub trait FileMatcher {
    #[allow(clippy::too_many_arguments)]
    fn match_files(
        &self,
        path: &Path,
        extensions: &[&str],
        excludes: &[String],
        includes: &[String],
        case_sensitive: bool,
        current_directory: &Path,
        get_entries: &dyn Fn(&Path) -> FileSystemEntries,
    ) -> Result<Vec<PathBuf>>;
}

/// Turns a manifest into the list of files it selects
pub struct ManifestFileResolver {
    globber: Box<dyn GlobExpander>,
    matcher: Option<Box<dyn FileMatcher>>,
}

impl Default for ManifestFileResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestFileResolver {
    /// Resolver backed by [`StandardGlobExpander`] and [`WildcardFileMatcher`]
    pub fn new() -> Self {
        Self {
            globber: Box::new(StandardGlobExpander),
            matcher: Some(Box::new(WildcardFileMatcher)),
        }
    }

    pub fn with_glob_expander(mut self, globber: impl GlobExpander + 'static) -> Self {
        self.globber = Box::new(globber);
        self
    }

    pub fn with_file_matcher(mut self, matcher: impl FileMatcher + 'static) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    /// Drop include/exclude support; such manifests then fail with
    /// [`Error::MissingCapability`].
    pub fn without_file_matcher(mut self) -> Self {
        self.matcher = None;
        self
    }

    pub fn resolve(&self, manifest_path: &Path) -> Result<Vec<PathBuf>> {
        let manifest_path = absolute_path(manifest_path)?;
        let manifest_dir = manifest_path
            .parent()
            .map_or_else(|| manifest_path.clone(), Path::to_path_buf);
        let tsconfig: TsConfigJson = read_json(&manifest_path)?;

        if let Some(files) = &tsconfig.files {
            debug!("{}: {} listed files", manifest_path.display(), files.len());
            return Ok(files
                .iter()
                .map(|file| normalize_path(&manifest_dir.join(file)))
                .collect());
        }

        if let Some(patterns) = &tsconfig.files_glob {
            debug!("{}: expanding filesGlob", manifest_path.display());
            return self.globber.expand(&manifest_dir, patterns);
        }

        if tsconfig.include.is_some() || tsconfig.exclude.is_some() {
            let Some(matcher) = &self.matcher else {
                return Err(Error::MissingCapability(
                    "include/exclude file matching requires a FileMatcher".to_string(),
                ));
            };
            debug!("{}: matching include/exclude", manifest_path.display());
            return matcher.match_files(
                &manifest_dir,
                SOURCE_EXTENSIONS,
                tsconfig.exclude.as_deref().unwrap_or_default(),
                tsconfig.include.as_deref().unwrap_or_default(),
                true,
                &manifest_dir,
                &get_file_system_entries,
            );
        }

        Err(Error::Configuration {
            path: manifest_path,
            message: r#"no "files", "filesGlob" or "include"/"exclude" section present"#
                .to_string(),
        })
    }
}

/// Resolve the files of a `tsconfig.json` with the default collaborators.
pub fn read_files_from_tsconfig(manifest_path: &Path) -> Result<Vec<PathBuf>> {
    ManifestFileResolver::new().resolve(manifest_path)
}

/// List a directory, following symlinks to classify entries.
///
/// Anything unreadable counts as empty.
pub fn get_file_system_entries(dir: &Path) -> FileSystemEntries {
    let mut entries = FileSystemEntries::default();
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            warn!("cannot list {}: {e}", dir.display());
            return entries;
        }
    };

    for entry in read_dir.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_dir() => entries.directories.push(name),
            Ok(meta) if meta.is_file() => entries.files.push(name),
            _ => {}
        }
    }

    entries.files.sort();
    entries.directories.sort();
    entries
}

/// Path of `path` relative to `root`, with `/` separators
fn relative_slash_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

fn strip_dot_slash(pattern: &str) -> &str {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// [`GlobExpander`] on top of the `glob` crate.
///
/// Patterns apply in order; a pattern starting with `!` removes earlier
/// matches. Only regular files are returned, first-seen order, no duplicates.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardGlobExpander;

impl GlobExpander for StandardGlobExpander {
    fn expand(&self, cwd: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let mut files: Vec<PathBuf> = Vec::new();

        for pattern in patterns {
            if let Some(negated) = pattern.strip_prefix('!') {
                let negated = compile(strip_dot_slash(negated))?;
                files.retain(|file| {
                    relative_slash_path(file, cwd)
                        .map_or(true, |rel| !negated.matches_with(&rel, options))
                });
                continue;
            }

            let full_pattern = format!(
                "{}/{}",
                Pattern::escape(cwd.to_string_lossy().trim_end_matches('/')),
                strip_dot_slash(pattern)
            );
            let entries = glob_with(&full_pattern, options).map_err(
                |source| Error::Pattern {
                    pattern: pattern.clone(),
                    source,
                },
            )?;

            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => {
                        if !files.contains(&path) {
                            files.push(path);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!("glob entry error: {e}"),
                }
            }
        }

        Ok(files)
    }
}

/// [`FileMatcher`] with `tsconfig.json` include/exclude semantics:
///
/// - no include patterns means `**/*`
/// - an include whose last component has no wildcard and no extension names
///   a directory and means everything below it
/// - an exclude matches a file or any directory above it
/// - wildcard traversal skips dot entries and package directories
#[derive(Debug, Default, Clone, Copy)]
pub struct WildcardFileMatcher;

struct MatchContext<'a> {
    root: &'a Path,
    extensions: &'a [&'a str],
    excludes: &'a [Pattern],
    options: MatchOptions,
    enter_hidden: bool,
    get_entries: &'a dyn Fn(&Path) -> FileSystemEntries,
}

impl MatchContext<'_> {
    fn is_excluded(&self, relative: &str) -> bool {
        let mut prefix = String::new();
        for part in relative.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            if self
                .excludes
                .iter()
                .any(|exclude| exclude.matches_with(&prefix, self.options))
            {
                return true;
            }
        }
        false
    }

    fn has_extension(&self, name: &str) -> bool {
        let matches = |ext: &&str| {
            if self.options.case_sensitive {
                name.ends_with(*ext)
            } else {
                name.to_lowercase().ends_with(&ext.to_lowercase())
            }
        };
        self.extensions.iter().any(matches)
    }

    /// Depth-first walk of `dir`, collecting files matching `include`
    fn walk(
        &self,
        dir: &Path,
        include: &Pattern,
        seen: &mut HashSet<PathBuf>,
        out: &mut Vec<PathBuf>,
    ) {
        let entries = (self.get_entries)(dir);

        for name in &entries.files {
            if !self.enter_hidden && name.starts_with('.') {
                continue;
            }
            let path = dir.join(name);
            let Some(relative) = relative_slash_path(&path, self.root) else {
                continue;
            };
            if self.has_extension(name)
                && include.matches_with(&relative, self.options)
                && !self.is_excluded(&relative)
                && seen.insert(path.clone())
            {
                out.push(path);
            }
        }

        for name in &entries.directories {
            if !self.enter_hidden && name.starts_with('.') {
                continue;
            }
            if IMPLICITLY_EXCLUDED_DIRS.contains(&name.as_str())
                && !include.as_str().contains(name.as_str())
            {
                continue;
            }
            let path = dir.join(name);
            match relative_slash_path(&path, self.root) {
                Some(relative) if self.is_excluded(&relative) => continue,
                Some(_) => self.walk(&path, include, seen, out),
                None => {}
            }
        }
    }
}

impl FileMatcher for WildcardFileMatcher {
    fn match_files(
        &self,
        path: &Path,
        extensions: &[&str],
        excludes: &[String],
        includes: &[String],
        case_sensitive: bool,
        current_directory: &Path,
        get_entries: &dyn Fn(&Path) -> FileSystemEntries,
    ) -> Result<Vec<PathBuf>> {
        let root = normalize_path(&current_directory.join(path));
        let options = MatchOptions {
            case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let includes: Vec<String> = if includes.is_empty() {
            vec!["**/*".to_string()]
        } else {
            includes
                .iter()
                .map(|include| include_pattern(strip_dot_slash(include)))
                .collect()
        };
        let excludes = excludes
            .iter()
            .map(|exclude| compile(strip_dot_slash(exclude).trim_end_matches('/')))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for include in &includes {
            let pattern = compile(include)?;
            let context = MatchContext {
                root: &root,
                extensions,
                excludes: &excludes,
                options,
                enter_hidden: names_hidden_entry(include),
                get_entries,
            };
            context.walk(&root, &pattern, &mut seen, &mut files);
        }

        Ok(files)
    }
}

fn names_hidden_entry(include: &str) -> bool {
    include
        .split('/')
        .any(|part| part.starts_with('.') && part != "." && part != "..")
}

/// `src` means `src/**/*`; anything with a wildcard or extension is kept.
fn include_pattern(include: &str) -> String {
    let include = include.trim_end_matches('/');
    let last = include.rsplit('/').next().unwrap_or(include);
    let is_wildcard = last.contains(['*', '?', '[']);
    let has_extension = last.contains('.') && last != "." && last != "..";

    if is_wildcard || has_extension {
        include.to_string()
    } else if include.is_empty() || include == "." {
        "**/*".to_string()
    } else {
        format!("{include}/**/*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "").unwrap();
        path
    }

    fn write_manifest(root: &Path, content: &str) -> PathBuf {
        let path = root.join("tsconfig.json");
        fs::write(&path, content).unwrap();
        path
    }

    fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.sort();
        paths
    }

    // ===========================================
    // Strategy selection
    // ===========================================

    #[test]
    fn test_explicit_files_in_listed_order() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), r#"{"files": ["b.ts", "./lib/../a.ts"]}"#);

        let files = read_files_from_tsconfig(&manifest).unwrap();
        assert_eq!(files, vec![dir.path().join("b.ts"), dir.path().join("a.ts")]);
    }

    #[test]
    fn test_files_preferred_over_include() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/other.ts");
        let manifest = write_manifest(
            dir.path(),
            r#"{"files": ["a.ts"], "filesGlob": ["src/*.ts"], "include": ["src"]}"#,
        );

        let files = read_files_from_tsconfig(&manifest).unwrap();
        assert_eq!(files, vec![dir.path().join("a.ts")]);
    }

    #[test]
    fn test_empty_files_list_still_selects_explicit_strategy() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/a.ts");
        let manifest = write_manifest(dir.path(), r#"{"files": [], "include": ["src"]}"#);

        assert!(read_files_from_tsconfig(&manifest).unwrap().is_empty());
    }

    #[test]
    fn test_no_section_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), r#"{"compilerOptions": {"strict": true}}"#);

        let err = read_files_from_tsconfig(&manifest).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("filesGlob"));
    }

    #[test]
    fn test_empty_manifest_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), "{}");

        assert!(matches!(
            read_files_from_tsconfig(&manifest),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_malformed_manifest_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), r#"{"files": ["a.ts]}"#);

        assert!(matches!(
            read_files_from_tsconfig(&manifest),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_manifest_with_comments() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(
            dir.path(),
            "{\n  // sources\n  \"files\": [\"a.ts\",],\n}\n",
        );

        assert_eq!(
            read_files_from_tsconfig(&manifest).unwrap(),
            vec![dir.path().join("a.ts")]
        );
    }

    #[test]
    fn test_missing_matcher_is_missing_capability() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), r#"{"include": ["src"]}"#);

        let result = ManifestFileResolver::new()
            .without_file_matcher()
            .resolve(&manifest);
        assert!(matches!(result, Err(Error::MissingCapability(_))));
    }

    #[test]
    fn test_custom_matcher_receives_manifest_arguments() {
        struct Recording;

        impl FileMatcher for Recording {
            fn match_files(
                &self,
                path: &Path,
                extensions: &[&str],
                excludes: &[String],
                includes: &[String],
                case_sensitive: bool,
                current_directory: &Path,
                _get_entries: &dyn Fn(&Path) -> FileSystemEntries,
            ) -> Result<Vec<PathBuf>> {
                assert_eq!(path, current_directory);
                assert_eq!(extensions, &[".ts", ".tsx"]);
                assert!(excludes.is_empty());
                assert_eq!(includes, &["lib".to_string()]);
                assert!(case_sensitive);
                Ok(vec![path.join("from-matcher.ts")])
            }
        }

        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), r#"{"include": ["lib"]}"#);

        let files = ManifestFileResolver::new()
            .with_file_matcher(Recording)
            .resolve(&manifest)
            .unwrap();
        assert_eq!(files, vec![dir.path().join("from-matcher.ts")]);
    }

    #[test]
    fn test_custom_glob_expander() {
        struct Fixed;

        impl GlobExpander for Fixed {
            fn expand(&self, cwd: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
                Ok(patterns.iter().map(|p| cwd.join(p)).collect())
            }
        }

        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), r#"{"filesGlob": ["x.ts"]}"#);

        let files = ManifestFileResolver::new()
            .with_glob_expander(Fixed)
            .resolve(&manifest)
            .unwrap();
        assert_eq!(files, vec![dir.path().join("x.ts")]);
    }

    // ===========================================
    // filesGlob
    // ===========================================

    #[test]
    fn test_files_glob_expands_files_only() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "src/a.ts");
        let b = touch(dir.path(), "src/nested/b.ts");
        touch(dir.path(), "src/readme.md");
        fs::create_dir_all(dir.path().join("src/dir.ts")).unwrap();
        let manifest = write_manifest(dir.path(), r#"{"filesGlob": ["./src/**/*.ts"]}"#);

        let files = read_files_from_tsconfig(&manifest).unwrap();
        assert_eq!(sorted(files), vec![a, b]);
    }

    #[test]
    fn test_files_glob_negation_and_dedup() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "src/a.ts");
        touch(dir.path(), "node_modules/pkg/index.ts");
        let manifest = write_manifest(
            dir.path(),
            r#"{"filesGlob": ["**/*.ts", "src/a.ts", "!node_modules/**/*"]}"#,
        );

        let files = read_files_from_tsconfig(&manifest).unwrap();
        assert_eq!(files, vec![a]);
    }

    #[test]
    fn test_files_glob_in_directory_with_glob_characters() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("proj[1]");
        let a = touch(&project, "src/a.ts");
        let manifest = write_manifest(&project, r#"{"filesGlob": ["src/*.ts"]}"#);

        assert_eq!(read_files_from_tsconfig(&manifest).unwrap(), vec![a]);
    }

    #[test]
    fn test_manifest_path_with_parent_dir_components() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "app/src/a.ts");
        fs::create_dir_all(dir.path().join("cwd")).unwrap();
        write_manifest(&dir.path().join("app"), r#"{"filesGlob": ["src/*.ts"]}"#);
        let manifest = dir.path().join("cwd/../app/tsconfig.json");

        assert_eq!(read_files_from_tsconfig(&manifest).unwrap(), vec![a]);
    }

    #[test]
    fn test_files_glob_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(dir.path(), r#"{"filesGlob": ["src/[.ts"]}"#);

        assert!(matches!(
            read_files_from_tsconfig(&manifest),
            Err(Error::Pattern { .. })
        ));
    }

    // ===========================================
    // include/exclude
    // ===========================================

    #[test]
    fn test_include_directory_and_extensions() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "src/a.ts");
        let b = touch(dir.path(), "src/deep/b.tsx");
        touch(dir.path(), "src/c.js");
        touch(dir.path(), "other/d.ts");
        let manifest = write_manifest(dir.path(), r#"{"include": ["src"]}"#);

        let files = read_files_from_tsconfig(&manifest).unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn test_exclude_only_includes_everything_else() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.ts");
        let b = touch(dir.path(), "src/b.ts");
        touch(dir.path(), "dist/out.ts");
        touch(dir.path(), "node_modules/pkg/index.ts");
        touch(dir.path(), ".cache/x.ts");
        let manifest = write_manifest(dir.path(), r#"{"exclude": ["dist"]}"#);

        let files = read_files_from_tsconfig(&manifest).unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn test_exclude_wildcard_pattern() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "src/a.ts");
        touch(dir.path(), "src/a.spec.ts");
        let manifest = write_manifest(
            dir.path(),
            r#"{"include": ["src/**/*"], "exclude": ["**/*.spec.ts"]}"#,
        );

        assert_eq!(read_files_from_tsconfig(&manifest).unwrap(), vec![a]);
    }

    #[test]
    fn test_include_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Src/a.ts");
        let manifest = write_manifest(dir.path(), r#"{"include": ["src/*.ts"]}"#);

        assert!(read_files_from_tsconfig(&manifest).unwrap().is_empty());
    }

    #[test]
    fn test_include_naming_node_modules() {
        let dir = TempDir::new().unwrap();
        let typed = touch(dir.path(), "node_modules/typed/index.ts");
        let manifest = write_manifest(dir.path(), r#"{"include": ["node_modules/typed"]}"#);

        assert_eq!(read_files_from_tsconfig(&manifest).unwrap(), vec![typed]);
    }

    #[test]
    fn test_matcher_uses_entry_callback() {
        let listing = |dir: &Path| {
            if dir == Path::new("/virtual") {
                FileSystemEntries {
                    files: vec!["a.ts".into(), "b.js".into()],
                    directories: vec!["lib".into()],
                }
            } else if dir == Path::new("/virtual/lib") {
                FileSystemEntries {
                    files: vec!["c.tsx".into()],
                    directories: vec![],
                }
            } else {
                FileSystemEntries::default()
            }
        };

        let files = WildcardFileMatcher
            .match_files(
                Path::new("/virtual"),
                SOURCE_EXTENSIONS,
                &[],
                &[],
                true,
                Path::new("/virtual"),
                &listing,
            )
            .unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/virtual/a.ts"),
                PathBuf::from("/virtual/lib/c.tsx")
            ]
        );
    }

    #[test]
    fn test_include_pattern() {
        assert_eq!(include_pattern("src"), "src/**/*");
        assert_eq!(include_pattern("src/"), "src/**/*");
        assert_eq!(include_pattern("src/*.ts"), "src/*.ts");
        assert_eq!(include_pattern("main.ts"), "main.ts");
        assert_eq!(include_pattern("."), "**/*");
    }

    #[test]
    fn test_get_file_system_entries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.ts");
        touch(dir.path(), "a.ts");
        fs::create_dir(dir.path().join("sub")).unwrap();

        let entries = get_file_system_entries(dir.path());
        assert_eq!(entries.files, vec!["a.ts", "b.ts"]);
        assert_eq!(entries.directories, vec!["sub"]);

        assert_eq!(
            get_file_system_entries(&dir.path().join("missing")),
            FileSystemEntries::default()
        );
    }
}
