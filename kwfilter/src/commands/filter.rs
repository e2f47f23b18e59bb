//! `kwfilter filter`: runs the configured rules over the input.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};

use kwfilter_core::{FilterEngine, FilterSummaryItem};

use crate::cli::FilterCommand;
use crate::commands::{build_engine, info_msg, load_config, read_input, source_name};
use crate::ui::output::{self, JsonReport};
use crate::ui::theme::ThemeMap;

pub fn run_filter(cmd: &FilterCommand, quiet: bool, theme_map: &ThemeMap) -> Result<()> {
    info!("Starting kwfilter filter operation.");
    let config = load_config(cmd.config.as_deref(), &cmd.enable, &cmd.disable)?;
    let engine = build_engine(cmd.engine, config)?;
    let input = read_input(cmd.input_file.as_deref())?;
    let source = source_name(cmd.input_file.as_ref());

    let (filtered, summary) = run_engine(engine.as_ref(), &input, &source)?;

    write_primary_output(cmd, &filtered, quiet, theme_map)?;
    write_summary(cmd, &source, &summary, quiet, theme_map)?;
    info!("kwfilter filter operation completed.");
    Ok(())
}

/// Filters one input with an already built engine.
pub fn run_engine(engine: &dyn FilterEngine, input: &str, source: &str) -> Result<(String, Vec<FilterSummaryItem>)> {
    let (filtered, summary) = engine.filter(input, source).context("Filtering failed")?;
    debug!(
        "Content filtered. Original length: {}, filtered length: {}",
        input.len(),
        filtered.len()
    );
    Ok((filtered, summary))
}

fn write_primary_output(cmd: &FilterCommand, filtered: &str, quiet: bool, theme_map: &ThemeMap) -> Result<()> {
    match &cmd.output {
        Some(path) => {
            if !quiet {
                info_msg(format!("Writing filtered content to file: {}", path.display()), theme_map);
            }
            fs::write(path, filtered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer.write_all(filtered.as_bytes())?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_summary(
    cmd: &FilterCommand,
    source: &str,
    summary: &[FilterSummaryItem],
    quiet: bool,
    theme_map: &ThemeMap,
) -> Result<()> {
    let mut stderr = io::stderr();
    if cmd.json_summary {
        output::print_json_report(&mut stderr, &JsonReport::new(source, summary))?;
    } else if !cmd.no_summary && !quiet {
        let supports_color = stderr.is_terminal();
        output::print_summary(summary, &mut stderr, theme_map, supports_color)?;
    }
    Ok(())
}
