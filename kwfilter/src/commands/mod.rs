//! Subcommand implementations for the kwfilter CLI.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use kwfilter_core::{merge_rules, FilterConfig, FilterEngine, MaskEngine, PipelineEngine};

use crate::cli::EngineChoice;
use crate::ui::output;
use crate::ui::theme::ThemeMap;

pub mod filter;
pub mod replace;
pub mod scan;
pub mod version_cmp;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Reads the whole input, from a file or stdin. Invalid UTF-8 is replaced
/// rather than rejected.
pub fn read_input(input_file: Option<&Path>) -> Result<String> {
    let bytes = match input_file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    debug!("Read {} bytes of input.", bytes.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Name used for the input in logs and reports.
pub fn source_name(input_file: Option<&PathBuf>) -> String {
    input_file
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string())
}

/// Default rules merged with an optional user file, then the enable/disable lists.
pub fn load_config(config_path: Option<&Path>, enable: &[String], disable: &[String]) -> Result<FilterConfig> {
    let defaults = FilterConfig::load_default_rules()?;
    let user = config_path.map(FilterConfig::load_from_file).transpose()?;
    let mut config = merge_rules(defaults, user);
    config.set_active_rules(enable, disable);
    Ok(config)
}

pub fn build_engine(choice: EngineChoice, config: FilterConfig) -> Result<Box<dyn FilterEngine>> {
    let engine: Box<dyn FilterEngine> = match choice {
        EngineChoice::Mask => Box::new(MaskEngine::new(config)?),
        EngineChoice::Pipeline => Box::new(PipelineEngine::new(config)?),
    };
    Ok(engine)
}
