use crate::options::FormatOptions;
use similar::{ChangeTag, TextDiff};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
    Diff,
}

pub struct Config {
    pub check_only: bool,
    pub print_options: bool,
    pub output_mode: OutputMode,
    pub providers: crate::ProviderOptions,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub verbose: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, verbose: bool) -> Self {
        Self { mode, verbose }
    }
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub files_fixed: usize,
    pub files_with_problems: usize,
    pub errors: usize,
}

impl RunResult {
    pub fn has_problems(&self) -> bool {
        self.files_with_problems > 0
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

pub fn print_options(path: &Path, options: &FormatOptions) {
    if let Ok(json) = serde_json::to_string_pretty(options) {
        println!("{}: {json}", path.display());
    }
}

pub fn print_check_result(path: &Path, original: &str, content: &str, ctx: &OutputContext) {
    match ctx.mode {
        OutputMode::Quiet => println!("{}", path.display()),
        OutputMode::Diff => print_diff(&path.display().to_string(), original, content),
        OutputMode::Normal => {
            println!("Error: {}", path.display());
            let removed = original.lines().count().saturating_sub(content.lines().count());
            println!("  - {removed} consecutive blank line(s) to remove");
        }
    }
}

pub fn print_fix_result(path: &Path, original: &str, content: &str, ctx: &OutputContext) {
    match ctx.mode {
        OutputMode::Quiet => println!("{}", path.display()),
        OutputMode::Diff => print_diff(&path.display().to_string(), original, content),
        OutputMode::Normal => println!("Fixed: {}", path.display()),
    }
}

pub fn print_checked(path: &Path, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    println!("Checked: {}", path.display());
}

pub fn print_skipped(path: &Path, reason: &str, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    println!("Skipping {reason}: {}", path.display());
}

pub fn print_error(path: &Path, error: &crate::Error, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    eprintln!("Error processing {}: {error}", path.display());
}

pub fn print_diff(label: &str, original: &str, content: &str) {
    let diff = TextDiff::from_lines(original, content);

    println!("--- {label}");
    println!("+++ {label}");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                print!("{sign}{change}");
            }
        }
    }
}

pub fn print_summary(result: &RunResult, config: &Config, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet || config.print_options {
        return;
    }

    if config.check_only {
        if result.files_with_problems > 0 {
            println!();
            println!("{} files with problems", result.files_with_problems);
        }
    } else if result.files_fixed > 0 {
        println!();
        println!("{} files fixed", result.files_fixed);
    }
}
