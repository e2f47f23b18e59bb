// kwfilter-core/src/engines/mod.rs
//! Concrete `FilterEngine` implementations.
//!
//! `mask_engine` applies every mask and remove rule to the original text at
//! once. `pipeline_engine` chains all rules, each one seeing the previous
//! rule's output.

use kwfilter_trie::{MatchSpan, Substitution};

use crate::keyword_match::{log_keyword_match_debug, KeywordMatch};

pub mod mask_engine;
pub mod pipeline_engine;

/// Builds the report record for one scanned span of `chars`.
pub(crate) fn span_match(
    rule_name: &str,
    chars: &[char],
    span: MatchSpan,
    filtered_string: String,
    source_id: &str,
) -> KeywordMatch {
    report(
        rule_name,
        span.extract(chars),
        filtered_string,
        span.start(),
        span.stop(),
        source_id,
    )
}

/// Builds the report record for one substitution a replacer performed.
pub(crate) fn substitution_match(rule_name: &str, substitution: &Substitution, source_id: &str) -> KeywordMatch {
    report(
        rule_name,
        substitution.key.clone(),
        substitution.replacement.clone(),
        substitution.start,
        substitution.stop,
        source_id,
    )
}

fn report(
    rule_name: &str,
    original_string: String,
    filtered_string: String,
    start: usize,
    stop: usize,
    source_id: &str,
) -> KeywordMatch {
    let m = KeywordMatch {
        rule_name: rule_name.to_string(),
        original_string,
        filtered_string,
        start: start as u64,
        end: stop as u64,
        sample_hash: None,
        source_id: source_id.to_string(),
    };
    log_keyword_match_debug("[kwfilter_core::engines]", &m);
    m
}
