//! TOML schema definitions for lintfmt.toml

use serde::Deserialize;

use crate::options::{IndentStyle, NewLine};

/// Root structure for lintfmt.toml
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LintfmtToml {
    /// Baseline formatter settings
    #[serde(default)]
    pub format: FormatSection,
}

/// `[format]` section in lintfmt.toml
///
/// Every key is optional; unset keys keep the built-in default.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FormatSection {
    pub indent_size: Option<usize>,
    pub tab_size: Option<usize>,
    pub indent_style: Option<IndentStyle>,
    pub new_line: Option<NewLine>,
    pub convert_tabs_to_spaces: Option<bool>,
}
