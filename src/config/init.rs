//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Template lintfmt.toml with documentation
pub const LINTFMT_TOML_TEMPLATE: &str = r#"# lintfmt.toml - Baseline formatter options for lintfmt
#
# lintfmt starts from these values, then applies .editorconfig and
# tslint.json (nearest file above each source file). Command-line flags
# override the values below.

[format]
# Spaces per indentation level.
# Default: 4
# indent_size = 4

# Width of a tab character.
# Default: 4
# tab_size = 4

# Indentation strategy: "none", "block" or "smart".
# Default: "smart"
# indent_style = "smart"

# Line terminator: "lf", "crlf" or "cr".
# Default: "crlf"
# new_line = "crlf"

# Indent with spaces instead of tabs.
# tslint.json "indent" and .editorconfig "indent_style" take precedence.
# Default: true
# convert_tabs_to_spaces = true
"#;

/// Generate lintfmt.toml in the specified directory (or current directory if None).
///
/// Returns an error if lintfmt.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(|| PathBuf::from("lintfmt.toml"), |d| d.join("lintfmt.toml"));

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "lintfmt.toml already exists",
        ));
    }

    fs::write(&path, LINTFMT_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate lintfmt.toml in the current directory.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
