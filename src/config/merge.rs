//! Baseline options merging
//!
//! Priority: CLI args > lintfmt.toml > defaults

use crate::options::{FormatOptions, NewLine};

use super::toml_schema::FormatSection;

/// Baseline overrides given on the command line.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliFormatOptions {
    pub indent_size: Option<usize>,
    pub tab_size: Option<usize>,
    pub new_line: Option<NewLine>,
}

/// Build the baseline handed to the providers.
pub fn merge_format_options(
    cli: &CliFormatOptions,
    toml: Option<&FormatSection>,
) -> FormatOptions {
    let defaults = FormatOptions::default();

    FormatOptions {
        indent_size: cli
            .indent_size
            .or_else(|| toml.and_then(|t| t.indent_size))
            .unwrap_or(defaults.indent_size),
        tab_size: cli
            .tab_size
            .or_else(|| toml.and_then(|t| t.tab_size))
            .unwrap_or(defaults.tab_size),
        new_line_character: cli
            .new_line
            .or_else(|| toml.and_then(|t| t.new_line))
            .unwrap_or(defaults.new_line_character),
        indent_style: toml
            .and_then(|t| t.indent_style)
            .unwrap_or(defaults.indent_style),
        convert_tabs_to_spaces: toml
            .and_then(|t| t.convert_tabs_to_spaces)
            .unwrap_or(defaults.convert_tabs_to_spaces),
        ..defaults
    }
}
