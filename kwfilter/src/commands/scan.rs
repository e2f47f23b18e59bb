//! `kwfilter scan`: reports keyword matches per rule without filtering.

use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use log::info;
use std::io;

use kwfilter_core::FilterEngine;

use crate::cli::ScanCommand;
use crate::commands::{build_engine, load_config, read_input, source_name, warn_msg};
use crate::ui::output::{self, JsonReport};
use crate::ui::theme::ThemeMap;

pub fn run_scan(cmd: &ScanCommand, quiet: bool, theme_map: &ThemeMap) -> Result<()> {
    info!("Starting kwfilter scan operation.");
    let config = load_config(cmd.config.as_deref(), &cmd.enable, &cmd.disable)?;
    let engine = build_engine(cmd.engine, config)?;
    let input = read_input(cmd.input_file.as_deref())?;
    let source = source_name(cmd.input_file.as_ref());

    let summary = engine.analyze_for_stats(&input, &source)?;
    let report = JsonReport::new(&source, &summary);

    if cmd.json_stdout {
        output::print_json_report(&mut io::stdout(), &report)?;
    } else if !quiet {
        let mut stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        output::print_summary(&summary, &mut stderr, theme_map, supports_color)?;
    }

    if let Some(threshold) = cmd.fail_over_threshold {
        if report.total_matches > threshold {
            warn_msg(
                format!(
                    "FAIL-OVER triggered: Found {} keyword matches, which exceeds the specified threshold of {}.",
                    report.total_matches, threshold
                ),
                theme_map,
            );
            bail!("Match count {} exceeds threshold {}", report.total_matches, threshold);
        }
    }

    info!("kwfilter scan completed with {} matches.", report.total_matches);
    Ok(())
}
