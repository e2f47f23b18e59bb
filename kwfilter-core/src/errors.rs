//! errors.rs - Custom error types for the kwfilter-core library.
//!
//! Matching itself never fails; these errors come from loading, validating
//! and compiling rule configurations.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types surfaced by `kwfilter-core`.
///
/// `#[non_exhaustive]` so that new variants are not a breaking change.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KwFilterError {
    #[error("Rule '{0}': mask character '{1}' must be exactly one Unicode scalar value")]
    InvalidMaskChar(String, String),

    #[error("Rule '{0}': replacement keys must not be empty")]
    EmptyReplacementKey(String),

    #[error("Rule '{0}': keyword length ({1}) exceeds maximum allowed ({2})")]
    KeywordLengthExceeded(String, usize, usize),

    #[error("Rule validation failed:\n{0}")]
    RuleValidation(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
