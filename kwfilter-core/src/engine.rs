// kwfilter-core/src/engine.rs
//! Defines the core `FilterEngine` trait.
//!
//! The trait decouples the CLI from the way rules are applied. The mask
//! engine treats every rule as an independent view of the original text,
//! while the pipeline engine chains rules into a normalization pass.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;

use crate::config::{FilterConfig, FilterSummaryItem};
use crate::filters::compiler::CompiledRules;
use crate::keyword_match::KeywordMatch;

/// A pluggable keyword filtering engine.
pub trait FilterEngine: Send + Sync {
    /// Filters `content`, returning the new text and a per-rule summary.
    ///
    /// # Arguments
    /// * `content` - The input string to filter.
    /// * `source_id` - The name or identifier of the source being processed.
    fn filter(&self, content: &str, source_id: &str) -> Result<(String, Vec<FilterSummaryItem>)>;

    /// Reports what `filter` would match without producing filtered text.
    fn analyze_for_stats(&self, content: &str, source_id: &str) -> Result<Vec<FilterSummaryItem>>;

    /// Every keyword occurrence, flattened and sorted by start offset, with
    /// sample hashes filled in.
    fn find_matches(&self, content: &str, source_id: &str) -> Result<Vec<KeywordMatch>>;

    fn compiled_rules(&self) -> &CompiledRules;

    fn get_rules(&self) -> &FilterConfig;
}

/// Groups matches by rule, keeping rules in the order they first matched.
pub fn summarize_matches(matches: &[KeywordMatch]) -> Vec<FilterSummaryItem> {
    let mut summary: Vec<FilterSummaryItem> = Vec::new();
    for m in matches {
        let item = match summary.iter().position(|s| s.rule_name == m.rule_name) {
            Some(i) => &mut summary[i],
            None => {
                summary.push(FilterSummaryItem {
                    rule_name: m.rule_name.clone(),
                    occurrences: 0,
                    original_texts: Vec::new(),
                    filtered_texts: Vec::new(),
                });
                let last = summary.len() - 1;
                &mut summary[last]
            }
        };
        item.occurrences += 1;
        item.original_texts.push(m.original_string.clone());
        item.filtered_texts.push(m.filtered_string.clone());
    }
    summary
}
