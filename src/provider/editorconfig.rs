//! Formatter options derived from `.editorconfig`

use std::path::Path;

use tracing::debug;

use super::base_dir_for;
use crate::config::{find_editorconfig, parse_editorconfig};
use crate::error::Result;
use crate::options::{FormatOptions, NewLine};

/// Apply `indent_style`, `indent_size`, `tab_width` and `end_of_line` from
/// the nearest `.editorconfig`.
pub fn make_format_code_options(
    file_name: &Path,
    base_dir: Option<&Path>,
    mut format_options: FormatOptions,
) -> Result<FormatOptions> {
    let base_dir = base_dir_for(file_name, base_dir)?;
    let Some(config_file) = find_editorconfig(&base_dir) else {
        return Ok(format_options);
    };
    debug!("read {} for {}", config_file.display(), file_name.display());

    let name = file_name
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let settings = parse_editorconfig(&config_file, &name)?;

    match settings.indent_style.as_deref() {
        Some("tab") => format_options.convert_tabs_to_spaces = false,
        Some("space") => format_options.convert_tabs_to_spaces = true,
        _ => {}
    }
    if let Some(size) = settings.indent_size {
        format_options.indent_size = size;
    }
    if let Some(width) = settings.tab_width {
        format_options.tab_size = width;
    }
    if let Some(new_line) = settings.end_of_line.as_deref().and_then(NewLine::from_name) {
        format_options.new_line_character = new_line;
    }

    Ok(format_options)
}
