// kwfilter/src/main.rs
//! kwfilter entry point.
//!
//! Parses arguments, configures logging and dispatches to a subcommand.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use kwfilter::cli::{Cli, Commands};
use kwfilter::commands::{error_msg, filter, replace, scan, version_cmp};
use kwfilter::logger;
use kwfilter::ui::theme::ThemeStyle;

fn run(cli: Cli) -> Result<()> {
    let theme_map = ThemeStyle::default_theme_map();
    match &cli.command {
        Commands::Filter(cmd) => filter::run_filter(cmd, cli.quiet, &theme_map),
        Commands::Scan(cmd) => scan::run_scan(cmd, cli.quiet, &theme_map),
        Commands::Replace(cmd) => replace::run_replace(cmd, cli.quiet, &theme_map),
        Commands::VersionCmp { left, right } => version_cmp::run_version_cmp(left, right),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    if let Err(e) = run(cli) {
        error_msg(format!("{:#}", e), &ThemeStyle::default_theme_map());
        std::process::exit(1);
    }
}
