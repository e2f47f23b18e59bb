// kwfilter/src/cli.rs
//! This file defines the command-line interface (CLI) for the kwfilter application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "kwfilter",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mask, remove and rewrite keywords in text",
    long_about = "kwfilter finds every occurrence of a keyword vocabulary in text using a single trie with failure links. It can mask matches, strip them, or rewrite them through a cascading replacement table, and reports what it found per rule.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for the kwfilter crates)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `kwfilter` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filters an input file or stdin with the configured keyword rules.
    #[command(about = "Filters an input file or stdin with the configured keyword rules.")]
    Filter(FilterCommand),

    /// Counts keyword matches per rule without changing the text.
    #[command(about = "Counts keyword matches per rule without changing the text.")]
    Scan(ScanCommand),

    /// Applies an ad-hoc cascading replacement table.
    #[command(about = "Applies an ad-hoc cascading replacement table given on the command line.")]
    Replace(ReplaceCommand),

    /// Compares two version strings.
    #[command(name = "version-cmp", about = "Compares two version strings and prints <, = or >.")]
    VersionCmp {
        #[arg(value_name = "A")]
        left: String,
        #[arg(value_name = "B")]
        right: String,
    },
}

/// Arguments for the `filter` command.
#[derive(Parser, Debug)]
pub struct FilterCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write filtered output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Path to a custom rule configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "KWFILTER_CONFIG", help = "Path to a custom rule configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Select which filter engine to use.
    #[arg(long = "engine", value_name = "ENGINE", default_value = "mask", help = "Select a filter engine ('mask' or 'pipeline').")]
    pub engine: EngineChoice,

    /// Explicitly enable these rule names (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', help = "Explicitly enable these rule names, including opt-in rules (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule names (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', help = "Explicitly disable these rule names (comma-separated).")]
    pub disable: Vec<String>,

    /// Suppress the filter summary.
    #[arg(long = "no-summary", help = "Suppress the filter summary.")]
    pub no_summary: bool,

    /// Print the filter summary as JSON on stderr.
    #[arg(long = "json-summary", conflicts_with = "no_summary", help = "Print the filter summary to stderr as JSON.")]
    pub json_summary: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Path to a custom rule configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "KWFILTER_CONFIG", help = "Path to a custom rule configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Select which filter engine's view of the rules to report.
    #[arg(long = "engine", value_name = "ENGINE", default_value = "mask", help = "Select a filter engine ('mask' or 'pipeline').")]
    pub engine: EngineChoice,

    /// Explicitly enable these rule names (comma-separated).
    #[arg(long = "enable", short = 'e', value_delimiter = ',', help = "Explicitly enable these rule names, including opt-in rules (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule names (comma-separated).
    #[arg(long = "disable", short = 'x', value_delimiter = ',', help = "Explicitly disable these rule names (comma-separated).")]
    pub disable: Vec<String>,

    /// Exit with a non-zero code if the total number of matches exceeds this threshold.
    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with a non-zero code if the total number of keyword matches exceeds this threshold.")]
    pub fail_over_threshold: Option<usize>,

    /// Print scan summary as JSON to stdout.
    #[arg(long = "json-stdout", help = "Export the scan statistics to stdout as JSON.")]
    pub json_stdout: bool,
}

/// Arguments for the `replace` command.
#[derive(Parser, Debug)]
pub struct ReplaceCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Replacement pairs in FROM=TO form; repeat the flag for more pairs.
    #[arg(long = "map", short = 'm', value_name = "FROM=TO", required = true, help = "A replacement pair in FROM=TO form. Repeat for more pairs.")]
    pub map: Vec<String>,

    /// Maximum number of substitutions before rewriting stops.
    #[arg(long = "max-cascades", value_name = "N", help = "Stop after N substitutions (default 65536).")]
    pub max_cascades: Option<usize>,
}

/// Enum for selecting the filter engine.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EngineChoice {
    /// Mask and remove rules against the original text.
    Mask,
    /// All rules chained as a normalization pipeline.
    Pipeline,
}
