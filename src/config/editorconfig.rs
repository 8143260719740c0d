//! .editorconfig parsing

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use super::file::find_file_upward;
use crate::error::{Error, Result};

/// Indentation-related settings that apply to one file
#[derive(Debug, Default, PartialEq)]
pub struct EditorConfigSettings {
    pub indent_style: Option<String>,
    pub indent_size: Option<usize>,
    pub tab_width: Option<usize>,
    pub end_of_line: Option<String>,
}

/// Find .editorconfig by searching upward from the given directory.
pub fn find_editorconfig(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, ".editorconfig", false)
}

/// Parse .editorconfig and collect the settings for `file_name`.
///
/// Sections apply in file order and later ones win. A section header is
/// matched against the bare file name; `[*]` matches everything.
pub fn parse_editorconfig(path: &Path, file_name: &str) -> Result<EditorConfigSettings> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut settings = EditorConfigSettings::default();
    let mut in_matching_section = false;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_matching_section = section_matches(&line[1..line.len() - 1], file_name);
            continue;
        }

        // Preamble keys (`root = true`) sit outside any section
        if !in_matching_section {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_lowercase();
            let value = value.trim().to_lowercase();

            match key.as_str() {
                "indent_style" => settings.indent_style = Some(value),
                "indent_size" => {
                    if let Ok(size) = value.parse() {
                        settings.indent_size = Some(size);
                    }
                }
                "tab_width" => {
                    if let Ok(width) = value.parse() {
                        settings.tab_width = Some(width);
                    }
                }
                "end_of_line" => settings.end_of_line = Some(value),
                _ => {}
            }
        }
    }

    Ok(settings)
}

fn section_matches(glob: &str, file_name: &str) -> bool {
    expand_braces(glob).iter().any(|alternative| {
        Pattern::new(alternative)
            .map(|p| p.matches(file_name))
            .unwrap_or(false)
    })
}

/// Expand a single `{a,b}` group: `*.{ts,tsx}` becomes `*.ts` and `*.tsx`.
fn expand_braces(glob: &str) -> Vec<String> {
    let (Some(open), Some(close)) = (glob.find('{'), glob.find('}')) else {
        return vec![glob.to_string()];
    };
    if close < open {
        return vec![glob.to_string()];
    }

    let (prefix, suffix) = (&glob[..open], &glob[close + 1..]);
    glob[open + 1..close]
        .split(',')
        .map(|alternative| format!("{prefix}{alternative}{suffix}"))
        .collect()
}
