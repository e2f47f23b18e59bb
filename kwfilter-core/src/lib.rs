// kwfilter-core/src/lib.rs
//! # kwfilter Core Library
//!
//! `kwfilter-core` provides the platform-independent logic behind the
//! `kwfilter` CLI. It defines keyword rules and their YAML configuration,
//! compiles them into the automata of `kwfilter-trie`, and applies them
//! through the pluggable `FilterEngine` trait.
//!
//! The library holds no process-wide state apart from read-only defaults.
//! Compiled rules are immutable and can be shared across threads.
//!
//! ## Modules
//!
//! * `config`: `FilterRule`s, engine settings, loading, merging and validation.
//! * `filters`: Compiles rules into pattern sets and cascading replacers.
//! * `engine`: The `FilterEngine` trait.
//! * `engines`: `MaskEngine` and `PipelineEngine`.
//! * `keyword_match`: Match records and PII-safe debug logging.
//! * `headless`: One-shot filtering without the CLI.
//! * `version`: Version-string normalization and ordering.
//! * `errors`: The `KwFilterError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use kwfilter_core::{headless_filter_string, FilterConfig, HeadlessEngineType};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = FilterConfig::load_default_rules()?;
//!     let query = headless_filter_string(
//!         config,
//!         "Can you find golang jobs in NYC",
//!         "query",
//!         HeadlessEngineType::Pipeline,
//!     )?;
//!     assert_eq!(query, "find go jobs in new_york");
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod filters;
pub mod headless;
pub mod keyword_match;
pub mod version;

/// Re-exports the public configuration types and functions for managing keyword rules.
pub use config::{
    merge_rules,
    validate_config,
    EngineConfig,
    FilterConfig,
    FilterRule,
    FilterSummaryItem,
    RuleKind,
    MAX_KEYWORD_LENGTH,
};

pub use errors::KwFilterError;

pub use engine::{summarize_matches, FilterEngine};

pub use engines::mask_engine::MaskEngine;
pub use engines::pipeline_engine::PipelineEngine;

pub use keyword_match::{canonical_sample_hash, redact_sensitive, KeywordMatch};

pub use headless::{headless_filter_string, HeadlessEngineType};

pub use filters::compiler::{compile_config, compile_rules, CompiledRule, CompiledRules, RuleMatcher};

pub use version::{compare_versions, VersionNormalizer};
