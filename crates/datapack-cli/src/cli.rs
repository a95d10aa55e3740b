//! CLI argument definitions for the data package builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "datapack",
    version,
    about = "OEPS data package builder - from data dictionaries to published packages",
    long_about = "Build Opioid Environment Policy Scan (OEPS) data packages.\n\n\
                  Generates resource schemas from hand-authored data dictionaries,\n\
                  assembles versioned packages with manifests and foreign keys,\n\
                  and materializes normalized row data for downstream loading."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate resource schemas from a data dictionary spreadsheet.
    Schema(SchemaArgs),

    /// Assemble a data package from resource schema files.
    Export(ExportArgs),

    /// Load and normalize the rows behind one resource schema.
    Rows(RowsArgs),
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Data dictionary file (.xlsx or .csv). The filename prefix before
    /// the first underscore is the geography scale code (S, C, T, Z).
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Directory the generated schema files are written to.
    #[arg(long = "destination", value_name = "DIR", default_value = "schemas")]
    pub destination: PathBuf,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Resource schema file, or directory of schema files, to package.
    #[arg(long = "source", value_name = "PATH", default_value = "schemas")]
    pub source: PathBuf,

    /// Directory the package is assembled into.
    #[arg(long = "destination", value_name = "DIR")]
    pub destination: PathBuf,

    /// Also archive the finished package to a sibling .zip.
    #[arg(long = "zip")]
    pub zip: bool,
}

#[derive(Parser)]
pub struct RowsArgs {
    /// Resource schema file describing the dataset to load. Remote data
    /// paths are downloaded to a temp directory before loading.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Write records to this file as newline-delimited JSON instead of
    /// printing them to stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
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
