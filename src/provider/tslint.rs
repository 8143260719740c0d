//! Formatter options and text fixups derived from `tslint.json`

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::base_dir_for;
use crate::config::{find_file_upward, read_json};
use crate::error::Result;
use crate::options::FormatOptions;

pub const TSLINT_FILE_NAME: &str = "tslint.json";

/// Fixups the formatter itself cannot express
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdditionalFormatOptions {
    pub no_consecutive_blank_lines: bool,
}

/// Apply the `indent` and `whitespace` rules of the nearest `tslint.json`.
///
/// Returns `format_options` untouched when there is no rule file or it has
/// no `rules` object. Rules only switch fields on, except `indent`, which
/// picks tabs or spaces.
pub fn make_format_code_options(
    file_name: &Path,
    base_dir: Option<&Path>,
    mut format_options: FormatOptions,
) -> Result<FormatOptions> {
    let Some(rules) = load_rules(file_name, base_dir)? else {
        return Ok(format_options);
    };

    if let Some(indent) = enabled_rule(&rules, "indent") {
        match rule_argument(indent, 1).and_then(Value::as_str) {
            Some("spaces") => format_options.convert_tabs_to_spaces = true,
            Some("tabs") => format_options.convert_tabs_to_spaces = false,
            _ => {}
        }
    }

    if let Some(whitespace) = enabled_rule(&rules, "whitespace") {
        for value in rule_values(whitespace).filter_map(Value::as_str) {
            match value {
                "check-branch" => {
                    format_options.insert_space_after_keywords_in_control_flow_statements = true;
                }
                "check-operator" => {
                    format_options.insert_space_before_and_after_binary_operators = true;
                }
                "check-separator" => {
                    format_options.insert_space_after_comma_delimiter = true;
                    format_options.insert_space_after_semicolon_in_for_statements = true;
                }
                // Recognized, nothing in FormatOptions corresponds
                "check-decl" | "check-type" => {}
                _ => {}
            }
        }
    }

    Ok(format_options)
}

/// Apply the text fixups enabled in the nearest `tslint.json`.
pub fn post_process(
    file_name: &Path,
    formatted_code: &str,
    base_dir: Option<&Path>,
) -> Result<String> {
    let Some(rules) = load_rules(file_name, base_dir)? else {
        return Ok(formatted_code.to_string());
    };

    let additional = additional_format_options(&rules);

    if additional.no_consecutive_blank_lines {
        return Ok(collapse_blank_lines(formatted_code));
    }

    Ok(formatted_code.to_string())
}

fn additional_format_options(rules: &Map<String, Value>) -> AdditionalFormatOptions {
    let mut options = AdditionalFormatOptions::default();
    if rules.get("no-consecutive-blank-lines") == Some(&Value::Bool(true)) {
        options.no_consecutive_blank_lines = true;
    }
    options
}

/// Locate and read the rule file, returning its `rules` object if any.
fn load_rules(file_name: &Path, base_dir: Option<&Path>) -> Result<Option<Map<String, Value>>> {
    let base_dir = base_dir_for(file_name, base_dir)?;
    let Some(config_file) = find_file_upward(&base_dir, TSLINT_FILE_NAME, false) else {
        return Ok(None);
    };
    debug!("read {} for {}", config_file.display(), file_name.display());

    let config: Value = read_json(&config_file)?;
    match config {
        Value::Object(mut root) => match root.remove("rules") {
            Some(Value::Object(rules)) => Ok(Some(rules)),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

/// The rule's configuration, if its enabled flag (first element) is truthy.
fn enabled_rule<'a>(rules: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    rules
        .get(key)
        .filter(|rule| rule_argument(rule, 0).is_some_and(is_truthy))
}

/// Element `index` of a list-style rule, written either as an array or as
/// an object keyed by position.
fn rule_argument(rule: &Value, index: usize) -> Option<&Value> {
    match rule {
        Value::Array(items) => items.get(index),
        Value::Object(entries) => entries.get(&index.to_string()),
        _ => None,
    }
}

fn rule_values(rule: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match rule {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(entries) => Box::new(entries.values()),
        _ => Box::new(std::iter::empty()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

static LEADING_BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(\r?\n)(?:\r?\n)+").expect("valid regex"));
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\r?\n)(\r?\n)(?:\r?\n)+").expect("valid regex"));

/// Reduce every run of two or more empty lines to a single empty line.
///
/// A run of k empty lines after a line is k + 1 line breaks; at the start of
/// the text it is k line breaks.
fn collapse_blank_lines(content: &str) -> String {
    let content = LEADING_BLANK_RUN.replace(content, "${1}");
    BLANK_RUN.replace_all(&content, "${1}${2}").into_owned()
}
