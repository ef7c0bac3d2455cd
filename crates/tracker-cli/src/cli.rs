//! CLI argument definitions for the tracker importer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracker_model::{AtomicMode, IdScheme};

#[derive(Parser)]
#[command(
    name = "tracker-import",
    version,
    about = "Validate tracker import batches against a reference snapshot",
    long_about = "Validate a batch of tracked entities and events before import.\n\n\
                  Records are checked against a reference snapshot of metadata and\n\
                  persisted data; passing records are written out according to the\n\
                  atomic mode."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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

    /// Allow attribute and data values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a batch of records and report conflicts.
    Validate(ValidateArgs),

    /// List the error codes reported by validation.
    Codes,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// JSON array of records to import.
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// JSON reference snapshot (metadata and persisted records).
    #[arg(long = "snapshot", value_name = "PATH")]
    pub snapshot: PathBuf,

    /// TOML import options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the full import report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Write the records that passed validation as JSON.
    #[arg(long = "accepted", value_name = "PATH")]
    pub accepted: Option<PathBuf>,

    /// Override the atomic mode from the options file.
    #[arg(long = "atomic-mode", value_enum)]
    pub atomic_mode: Option<AtomicModeArg>,

    /// Resolve every reference with this identifier scheme.
    #[arg(long = "id-scheme", value_enum)]
    pub id_scheme: Option<IdSchemeArg>,

    /// Accept generated attribute values without checking their pattern.
    #[arg(long = "skip-pattern-validation")]
    pub skip_pattern_validation: bool,

    /// Worker threads for validation (default: one per core).
    #[arg(long = "threads", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AtomicModeArg {
    All,
    Object,
}

impl From<AtomicModeArg> for AtomicMode {
    fn from(value: AtomicModeArg) -> Self {
        match value {
            AtomicModeArg::All => AtomicMode::All,
            AtomicModeArg::Object => AtomicMode::Object,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IdSchemeArg {
    Uid,
    Code,
    Name,
}

impl From<IdSchemeArg> for IdScheme {
    fn from(value: IdSchemeArg) -> Self {
        match value {
            IdSchemeArg::Uid => IdScheme::Uid,
            IdSchemeArg::Code => IdScheme::Code,
            IdSchemeArg::Name => IdScheme::Name,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
