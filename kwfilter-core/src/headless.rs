// kwfilter-core/src/headless.rs
//! Convenience wrappers for using the core engines without the CLI.
//!
//! Provides a one-shot helper that builds an engine, filters a string and
//! discards the summary.

use anyhow::Result;

use crate::config::FilterConfig;
use crate::engine::FilterEngine;
use crate::engines::mask_engine::MaskEngine;
use crate::engines::pipeline_engine::PipelineEngine;

/// Selects the engine used by [`headless_filter_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadlessEngineType {
    #[default]
    Mask,
    Pipeline,
}

/// Filters `content` with a freshly built engine.
///
/// # Arguments
///
/// * `config` - The merged `FilterConfig` (defaults + optional user overrides).
/// * `content` - The string to be filtered.
/// * `source_id` - A stable identifier for the input (file path or pseudo id).
/// * `engine_type` - Which engine to use (`Mask` or `Pipeline`).
pub fn headless_filter_string(
    config: FilterConfig,
    content: &str,
    source_id: &str,
    engine_type: HeadlessEngineType,
) -> Result<String> {
    let engine: Box<dyn FilterEngine> = match engine_type {
        HeadlessEngineType::Mask => Box::new(MaskEngine::new(config)?),
        HeadlessEngineType::Pipeline => Box::new(PipelineEngine::new(config)?),
    };

    let (filtered, _) = engine.filter(content, source_id)?;
    Ok(filtered)
}
