use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lintfmt::{
    find_config_file, generate_init_file, load_config, merge_format_options,
    read_files_from_tsconfig, run, walk_paths, CliFormatOptions, Config, LintfmtToml, NewLine,
    OutputContext, OutputMode, ProviderOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lintfmt")]
#[command(
    version,
    about = "Derive TypeScript formatter options from tslint.json and .editorconfig"
)]
struct Cli {
    /// Target files or directories
    #[arg(required_unless_present_any = ["init", "project"])]
    paths: Vec<PathBuf>,

    /// Take files from this tsconfig.json
    #[arg(short, long, value_name = "TSCONFIG")]
    project: Option<PathBuf>,

    /// Check only (no modifications), exit 1 if fixups are needed
    #[arg(short, long)]
    check: bool,

    /// Show changes in diff format
    #[arg(short, long)]
    diff: bool,

    /// Output only modified file names
    #[arg(short, long)]
    quiet: bool,

    /// Print the resolved formatter options of each file as JSON
    #[arg(long)]
    print_options: bool,

    /// Print the resolved file list and exit
    #[arg(long)]
    list_files: bool,

    /// Look up tslint.json and .editorconfig from this directory
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Ignore tslint.json
    #[arg(long)]
    no_tslint: bool,

    /// Ignore .editorconfig
    #[arg(long)]
    no_editorconfig: bool,

    /// Baseline indent size
    #[arg(long, value_name = "N")]
    indent_size: Option<usize>,

    /// Baseline tab size
    #[arg(long, value_name = "N")]
    tab_size: Option<usize>,

    /// Baseline line ending (lf, crlf, cr)
    #[arg(long, value_name = "EOL", value_parser = parse_new_line)]
    new_line: Option<NewLine>,

    /// Generate a template lintfmt.toml configuration file
    #[arg(long)]
    init: bool,

    /// Specify config file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log config file lookups
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.init {
        return handle_init();
    }

    let files = match collect_files(&cli) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if cli.list_files {
        for file in &files {
            println!("{}", file.display());
        }
        return ExitCode::SUCCESS;
    }

    let toml_config = load_configuration(&cli.config, cli.quiet);

    // Merge baseline: CLI > TOML > defaults
    let baseline = merge_format_options(
        &build_cli_options(&cli),
        toml_config.as_ref().map(|c| &c.format),
    );

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.diff {
        OutputMode::Diff
    } else {
        OutputMode::Normal
    };

    let config = Config {
        check_only: cli.check,
        print_options: cli.print_options,
        output_mode,
        providers: ProviderOptions {
            base_dir: cli.base_dir.clone(),
            tslint: !cli.no_tslint,
            editorconfig: !cli.no_editorconfig,
            baseline,
        },
    };
    let ctx = OutputContext::new(output_mode, cli.verbose);

    let result = run(&files, &config, &ctx);
    if result.has_errors() || (config.check_only && result.has_problems()) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "lintfmt=debug" } else { "lintfmt=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn collect_files(cli: &Cli) -> lintfmt::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if let Some(project) = &cli.project {
        files.extend(read_files_from_tsconfig(project)?);
    }

    for path in walk_paths(&cli.paths) {
        match path {
            Ok(path) if !files.contains(&path) => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("{e}"),
        }
    }

    Ok(files)
}

fn load_configuration(explicit_path: &Option<PathBuf>, quiet: bool) -> Option<LintfmtToml> {
    let config_path = explicit_path.clone().or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|d| find_config_file(&d))
    });

    config_path.and_then(|p| match load_config(&p) {
        Ok(config) => {
            if !quiet {
                eprintln!("Using config: {}", p.display());
            }
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: {e}");
            None
        }
    })
}

fn build_cli_options(cli: &Cli) -> CliFormatOptions {
    CliFormatOptions {
        indent_size: cli.indent_size,
        tab_size: cli.tab_size,
        new_line: cli.new_line,
    }
}

fn parse_new_line(value: &str) -> Result<NewLine, String> {
    NewLine::from_name(value).ok_or_else(|| format!("expected lf, crlf or cr, got '{value}'"))
}
