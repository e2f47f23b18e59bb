// kwfilter-core/src/keyword_match.rs
//! Match records produced by the filter engines, plus helpers for logging
//! them without leaking matched text.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

lazy_static! {
    /// Whether matched text may appear verbatim in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("KWFILTER_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// One keyword occurrence found by a rule.
///
/// `start` and `end` are code-point offsets into the text the rule ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeywordMatch {
    pub rule_name: String,
    pub original_string: String,
    pub filtered_string: String,
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub sample_hash: Option<String>,
    #[serde(default)]
    pub source_id: String,
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_keyword_match_debug(module_path: &str, m: &KeywordMatch) {
    debug!(
        "{} Found KeywordMatch: Rule='{}', Original='{}', Filtered='{}', Span={}..{}",
        module_path,
        m.rule_name,
        get_loggable_content(&m.original_string),
        get_loggable_content(&m.filtered_string),
        m.start,
        m.end
    );
}

/// Stable fingerprint of a matched keyword, independent of case and spacing.
pub fn canonical_sample_hash(rule_id: &str, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(rule_id.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn ensure_match_hashes(matches: &mut [KeywordMatch]) {
    for m in matches.iter_mut() {
        if m.sample_hash.is_none() {
            m.sample_hash = Some(canonical_sample_hash(&m.rule_name, &m.original_string));
        }
    }
}
