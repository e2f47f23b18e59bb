//! Console output for kwfilter: status messages and per-rule summaries.
//!
//! Everything here writes to a caller-supplied writer, normally stderr, so
//! that stdout carries only filtered text or JSON.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use kwfilter_core::FilterSummaryItem;

use crate::ui::theme::{styled, ThemeEntry, ThemeMap};

/// Maximum number of distinct samples listed per rule.
pub const MAX_SAMPLES: usize = 5;

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, theme_map: &ThemeMap, enable_colors: bool) -> Result<()> {
    writeln!(writer, "{}", styled(message, ThemeEntry::Info, theme_map, enable_colors))?;
    Ok(())
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, theme_map: &ThemeMap, enable_colors: bool) -> Result<()> {
    let line = format!("WARNING: {}", message);
    writeln!(writer, "{}", styled(&line, ThemeEntry::Warn, theme_map, enable_colors))?;
    Ok(())
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, theme_map: &ThemeMap, enable_colors: bool) -> Result<()> {
    let line = format!("ERROR: {}", message);
    writeln!(writer, "{}", styled(&line, ThemeEntry::Error, theme_map, enable_colors))?;
    Ok(())
}

/// Distinct (original, filtered) pairs of a rule, capped at `MAX_SAMPLES`.
fn samples(item: &FilterSummaryItem) -> Vec<(&str, &str)> {
    let mut out: Vec<(&str, &str)> = Vec::new();
    for (original, filtered) in item.original_texts.iter().zip(&item.filtered_texts) {
        if out.len() == MAX_SAMPLES {
            break;
        }
        if !out.iter().any(|(o, _)| *o == original.as_str()) {
            out.push((original.as_str(), filtered.as_str()));
        }
    }
    out
}

/// Prints the per-rule summary table.
pub fn print_summary<W: Write>(
    summary: &[FilterSummaryItem],
    writer: &mut W,
    theme_map: &ThemeMap,
    enable_colors: bool,
) -> Result<()> {
    if summary.is_empty() {
        writeln!(
            writer,
            "{}",
            styled("No keywords matched.", ThemeEntry::Success, theme_map, enable_colors)
        )?;
        return Ok(());
    }

    writeln!(writer, "{}", styled("--- Filter Summary ---", ThemeEntry::Header, theme_map, enable_colors))?;
    for item in summary {
        writeln!(
            writer,
            "{} ({} occurrences)",
            styled(&item.rule_name, ThemeEntry::SummaryRuleName, theme_map, enable_colors),
            styled(&item.occurrences.to_string(), ThemeEntry::SummaryOccurrences, theme_map, enable_colors),
        )?;
        for (original, filtered) in samples(item) {
            writeln!(
                writer,
                "    '{}' -> '{}'",
                original,
                styled(filtered, ThemeEntry::FilteredText, theme_map, enable_colors)
            )?;
        }
    }
    writeln!(writer, "{}", styled("----------------------", ThemeEntry::Header, theme_map, enable_colors))?;
    Ok(())
}

/// JSON view of a run, used by `--json-summary` and `--json-stdout`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub source: &'a str,
    pub total_matches: usize,
    pub rules: &'a [FilterSummaryItem],
}

impl<'a> JsonReport<'a> {
    pub fn new(source: &'a str, rules: &'a [FilterSummaryItem]) -> Self {
        Self {
            source,
            total_matches: rules.iter().map(|r| r.occurrences).sum(),
            rules,
        }
    }
}

pub fn print_json_report<W: Write>(writer: &mut W, report: &JsonReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}
