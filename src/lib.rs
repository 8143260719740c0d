//! Derive TypeScript formatter options from `tslint.json` and
//! `.editorconfig`, apply the text fixups those rules ask for, and resolve
//! project files from `tsconfig.json`.

pub mod config;
pub mod error;
pub mod manifest;
pub mod options;
mod output;
pub mod pipeline;
pub mod provider;
pub mod walker;

pub use config::{
    find_config_file, find_file_upward, generate_init_file, load_config, merge_format_options,
    CliFormatOptions, LintfmtToml,
};
pub use error::{Error, Result};
pub use manifest::{read_files_from_tsconfig, ManifestFileResolver};
pub use options::{FormatOptions, IndentStyle, NewLine};
pub use output::{print_diff, Config, OutputContext, OutputMode, RunResult};
pub use pipeline::{post_process_text, resolve_format_options, ProviderOptions};
pub use provider::tslint::{make_format_code_options, post_process, AdditionalFormatOptions};
pub use walker::walk_paths;

use std::fs;
use std::path::{Path, PathBuf};

const BINARY_CHECK_SIZE: usize = 8192;

/// Check if content is binary by looking for null bytes in first 8192 bytes
pub fn is_binary(content: &[u8]) -> bool {
    let check_len = content.len().min(BINARY_CHECK_SIZE);
    content[..check_len].contains(&0)
}

/// Main entry point: resolve options for every file and apply the fixups.
///
/// Per-file failures are reported and counted, the remaining files are
/// still processed.
pub fn run(files: &[PathBuf], config: &Config, ctx: &OutputContext) -> RunResult {
    let mut result = RunResult::default();

    for path in files {
        if let Err(e) = process_file(path, config, &mut result, ctx) {
            output::print_error(path, &e, ctx);
            result.errors += 1;
        }
    }

    output::print_summary(&result, config, ctx);

    result
}

fn process_file(
    path: &Path,
    config: &Config,
    result: &mut RunResult,
    ctx: &OutputContext,
) -> Result<()> {
    // Resolving first surfaces broken rule files even when nothing changes
    let options = resolve_format_options(path, &config.providers)?;
    if config.print_options {
        output::print_options(path, &options);
        return Ok(());
    }

    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;

    if bytes.is_empty() {
        if ctx.verbose {
            output::print_skipped(path, "empty", ctx);
        }
        return Ok(());
    }

    if is_binary(&bytes) {
        if ctx.verbose {
            output::print_skipped(path, "binary", ctx);
        }
        return Ok(());
    }

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(_) => {
            if ctx.verbose {
                output::print_skipped(path, "non-UTF-8", ctx);
            }
            return Ok(());
        }
    };

    let processed = post_process_text(path, &content, &config.providers)?;

    if processed == content {
        if ctx.verbose {
            output::print_checked(path, ctx);
        }
        return Ok(());
    }

    if config.check_only {
        result.files_with_problems += 1;
        output::print_check_result(path, &content, &processed, ctx);
    } else {
        fs::write(path, &processed).map_err(|e| Error::io(path, e))?;
        result.files_fixed += 1;
        output::print_fix_result(path, &content, &processed, ctx);
    }

    Ok(())
}
