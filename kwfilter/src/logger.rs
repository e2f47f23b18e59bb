// kwfilter/src/logger.rs
//! Logger setup for the kwfilter binary.
//!
//! `RUST_LOG` drives the filter (default `warn`). An explicit level overrides
//! it for the kwfilter crates only, so dependency noise stays down.

use env_logger::{Builder, Env};
use log::LevelFilter;

const WORKSPACE_CRATES: &[&str] = &["kwfilter", "kwfilter_core", "kwfilter_trie"];

/// Initializes `env_logger`. Safe to call more than once; later calls are no-ops.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp(None).format_target(true);

    match level_override {
        Some(LevelFilter::Off) => {
            builder.filter_level(LevelFilter::Off);
        }
        Some(level) => {
            for krate in WORKSPACE_CRATES {
                builder.filter_module(krate, level);
            }
        }
        None => {}
    }

    let _ = builder.try_init();
}
