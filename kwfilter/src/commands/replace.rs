//! `kwfilter replace`: applies a replacement table given as `--map FROM=TO`.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::io::{self, Write};

use kwfilter_trie::{Replacer, ReplacerOptions};

use crate::cli::ReplaceCommand;
use crate::commands::{read_input, warn_msg};
use crate::ui::theme::ThemeMap;

/// Splits `FROM=TO` at the first `=`. `TO` may be empty; `FROM` may not.
pub fn parse_pair(raw: &str) -> Result<(String, String)> {
    let (from, to) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid --map value '{}': expected FROM=TO", raw))?;
    if from.is_empty() {
        return Err(anyhow!("Invalid --map value '{}': FROM must not be empty", raw));
    }
    Ok((from.to_string(), to.to_string()))
}

pub fn run_replace(cmd: &ReplaceCommand, quiet: bool, theme_map: &ThemeMap) -> Result<()> {
    let pairs = cmd
        .map
        .iter()
        .map(|raw| parse_pair(raw))
        .collect::<Result<Vec<_>>>()?;
    debug!("Building replacer from {} pairs.", pairs.len());

    let options = match cmd.max_cascades {
        Some(max) => ReplacerOptions::with_max_cascades(max),
        None => ReplacerOptions::default(),
    };
    let replacer = Replacer::with_options(pairs, options);

    let input = read_input(cmd.input_file.as_deref())?;
    let outcome = replacer.replace_with_outcome(&input);
    if outcome.truncated {
        warn!("Replacement stopped at the cascade cap after {} substitutions.", outcome.cascades);
        if !quiet {
            warn_msg(
                format!(
                    "Stopped after {} substitutions; the output may still contain keys.",
                    outcome.cascades
                ),
                theme_map,
            );
        }
    }

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writer.write_all(outcome.text.as_bytes())?;
    writer.flush()?;
    Ok(())
}
