use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_options_core::{ErrorKind, Matches, OptionTable, ParseMode};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod table_file;

use table_file::load_table;

/// Exit status for a command line the table rejects.
const EXIT_INVALID_COMMAND_LINE: i32 = 2;

/// CLI-specific parse mode enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliParseMode {
    Interleaved,
    Posix,
    Subcommand,
}

impl From<CliParseMode> for ParseMode {
    fn from(mode: CliParseMode) -> Self {
        match mode {
            CliParseMode::Interleaved => Self::Interleaved,
            CliParseMode::Posix => Self::Posix,
            CliParseMode::Subcommand => Self::Subcommand,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "options-trace")]
#[command(about = "Show how an option table classifies a command line")]
struct Cli {
    /// Log parser decisions to stderr (filter with RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens against an option table and print what was recognized.
    Parse(ParseArgs),
    /// Validate one or more option table files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Option table file (YAML, or JSON with a .json extension).
    #[arg(long)]
    table: PathBuf,
    /// Parsing discipline (default: the table's own mode).
    #[arg(long)]
    mode: Option<CliParseMode>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse, usually given after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Option table files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

/// How a parse run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Parsed,
    HelpRequested,
    VersionRequested,
    Rejected,
}

#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    command: &'a str,
    mode: ParseMode,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<Matches>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    if !verbose {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("command_options_core=trace,options_trace=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<i32, String> {
    let table = load_table(&args.table)
        .map_err(|err| format!("Failed to load '{}': {err}", args.table.display()))?;
    let mode = args.mode.map_or(table.mode, ParseMode::from);

    let report = build_report(&table, mode, &args.tokens);
    debug!(outcome = ?report.outcome, "Parse finished");

    let raw = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?,
    };
    println!("{}", raw.trim_end());

    Ok(match report.outcome {
        Outcome::Rejected => EXIT_INVALID_COMMAND_LINE,
        _ => 0,
    })
}

fn build_report<'a>(table: &'a OptionTable, mode: ParseMode, tokens: &[String]) -> ParseReport<'a> {
    let (outcome, error, matches) = match table.parse_with(mode, tokens) {
        Ok(matches) => (Outcome::Parsed, None, Some(matches)),
        Err(err) => {
            let outcome = match err.kind() {
                ErrorKind::HelpRequested => Outcome::HelpRequested,
                ErrorKind::VersionRequested => Outcome::VersionRequested,
                _ => Outcome::Rejected,
            };
            (outcome, Some(err.to_string()), None)
        }
    };

    ParseReport {
        command: &table.command,
        mode,
        outcome,
        error,
        matches,
    }
}

fn run_validate(args: ValidateArgs) -> Result<i32, String> {
    for path in &args.inputs {
        load_table(path).map_err(|err| format!("'{}': {err}", path.display()))?;
    }
    println!("Validated {} option table(s).", args.inputs.len());
    Ok(0)
}
