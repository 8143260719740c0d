//! Configuration file support for lintfmt.
//!
//! This module provides:
//! - Nearest-ancestor discovery of config files
//! - JSON-with-comments reading for `tslint.json` and `tsconfig.json`
//! - Loading the `lintfmt.toml` baseline and merging it with CLI args
//! - Template generation with `--init`
//! - `.editorconfig` parsing

mod editorconfig;
mod file;
mod init;
mod merge;
mod toml_schema;

pub use editorconfig::{find_editorconfig, parse_editorconfig, EditorConfigSettings};
pub use file::{
    absolute_path, find_config_file, find_file_upward, load_config, normalize_path, read_json,
};
pub use init::{generate_init_file, generate_init_file_in, LINTFMT_TOML_TEMPLATE};
pub use merge::{merge_format_options, CliFormatOptions};
pub use toml_schema::{FormatSection, LintfmtToml};
