//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cardops",
    version,
    about = "Import, validate and submit card-management spreadsheets",
    long_about = "Import operator spreadsheets (.csv with ';' or .xlsx) for the \
                  card-management back office.\n\n\
                  Rows are validated against the screen's rules; valid rows are \
                  staged for export or submission, invalid rows are reported by line."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow CPFs, names and other cell values in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the available screens.
    Screens,

    /// Write the sample spreadsheet of one screen, or of every screen.
    Template(TemplateArgs),

    /// Import spreadsheets into a screen's staging table.
    Import(ImportArgs),

    /// Validate one manually entered record.
    ValidateRecord(ValidateRecordArgs),
}

#[derive(Args)]
pub struct TemplateArgs {
    /// Screen id (see `cardops screens`); all screens when omitted.
    #[arg(value_name = "SCREEN")]
    pub screen: Option<String>,

    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(value_name = "SCREEN")]
    pub screen: String,

    /// Spreadsheets to import, in order.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Contract number (14 digits, mask allowed).
    #[arg(long = "contract", value_name = "NUMBER")]
    pub contract: String,

    /// Write the staged entries to `{contract}_{operation}.csv`.
    #[arg(long = "export")]
    pub export: bool,

    /// Export directory (default: settings, then the current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Send the staged entries to the submission endpoint.
    #[arg(long = "submit")]
    pub submit: bool,

    /// Submission endpoint (overrides settings).
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Print the submission payload instead of sending it.
    #[arg(long = "dry-run", requires = "submit")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ValidateRecordArgs {
    #[arg(value_name = "SCREEN")]
    pub screen: String,

    #[arg(long = "contract", value_name = "NUMBER", default_value = "")]
    pub contract: String,

    /// Field value as `key=value`; repeat for each field.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub values: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
