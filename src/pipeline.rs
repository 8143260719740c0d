//! Chains the providers: baseline, then `.editorconfig`, then `tslint.json`

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::options::FormatOptions;
use crate::provider::{editorconfig, tslint};

/// Which providers run and where their lookup starts
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Start config lookups here instead of next to each file
    pub base_dir: Option<PathBuf>,
    pub tslint: bool,
    pub editorconfig: bool,
    /// Options before any provider runs
    pub baseline: FormatOptions,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            tslint: true,
            editorconfig: true,
            baseline: FormatOptions::default(),
        }
    }
}

/// Formatter options for `file_name`.
///
/// Later providers override earlier ones field by field; a missing config
/// file leaves the options as they were.
pub fn resolve_format_options(file_name: &Path, opts: &ProviderOptions) -> Result<FormatOptions> {
    let base_dir = opts.base_dir.as_deref();
    let mut options = opts.baseline.clone();

    if opts.editorconfig {
        options = editorconfig::make_format_code_options(file_name, base_dir, options)?;
    }
    if opts.tslint {
        options = tslint::make_format_code_options(file_name, base_dir, options)?;
    }

    Ok(options)
}

/// Text fixups to run on the formatter's output for `file_name`.
pub fn post_process_text(
    file_name: &Path,
    formatted: &str,
    opts: &ProviderOptions,
) -> Result<String> {
    if !opts.tslint {
        return Ok(formatted.to_string());
    }
    tslint::post_process(file_name, formatted, opts.base_dir.as_deref())
}
