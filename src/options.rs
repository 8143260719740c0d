//! Formatter options record handed to the code formatter

use serde::{Deserialize, Serialize};

/// How the formatter indents continuation lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    None = 0,
    Block = 1,
    Smart = 2,
}

// Config files name the style; the formatter takes its numeric value.
impl Serialize for IndentStyle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Line terminator written by the formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLine {
    Lf,
    CrLf,
    Cr,
}

impl NewLine {
    pub fn as_str(self) -> &'static str {
        match self {
            NewLine::Lf => "\n",
            NewLine::CrLf => "\r\n",
            NewLine::Cr => "\r",
        }
    }

    /// Parse the `end_of_line` / `--new-line` spelling (`lf`, `crlf`, `cr`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lf" => Some(NewLine::Lf),
            "crlf" => Some(NewLine::CrLf),
            "cr" => Some(NewLine::Cr),
            _ => None,
        }
    }
}

// Formatters expect the literal character sequence, not the name.
impl Serialize for NewLine {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Whitespace and indentation settings consumed by the formatter.
///
/// Providers update an instance field by field; every field is independent
/// of the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FormatOptions {
    pub indent_size: usize,
    pub tab_size: usize,
    pub indent_style: IndentStyle,
    pub new_line_character: NewLine,
    pub convert_tabs_to_spaces: bool,
    pub insert_space_after_comma_delimiter: bool,
    pub insert_space_after_semicolon_in_for_statements: bool,
    pub insert_space_before_and_after_binary_operators: bool,
    pub insert_space_after_keywords_in_control_flow_statements: bool,
    pub insert_space_after_function_keyword_for_anonymous_functions: bool,
    pub insert_space_after_opening_and_before_closing_nonempty_parenthesis: bool,
    pub insert_space_after_opening_and_before_closing_nonempty_brackets: bool,
    pub insert_space_after_opening_and_before_closing_template_string_braces: bool,
    pub place_open_brace_on_new_line_for_functions: bool,
    pub place_open_brace_on_new_line_for_control_blocks: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            tab_size: 4,
            indent_style: IndentStyle::Smart,
            new_line_character: NewLine::CrLf,
            convert_tabs_to_spaces: true,
            insert_space_after_comma_delimiter: true,
            insert_space_after_semicolon_in_for_statements: true,
            insert_space_before_and_after_binary_operators: true,
            insert_space_after_keywords_in_control_flow_statements: true,
            insert_space_after_function_keyword_for_anonymous_functions: false,
            insert_space_after_opening_and_before_closing_nonempty_parenthesis: false,
            insert_space_after_opening_and_before_closing_nonempty_brackets: false,
            insert_space_after_opening_and_before_closing_template_string_braces: false,
            place_open_brace_on_new_line_for_functions: false,
            place_open_brace_on_new_line_for_control_blocks: false,
        }
    }
}
