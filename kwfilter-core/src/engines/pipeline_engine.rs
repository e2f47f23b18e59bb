// kwfilter-core/src/engines/pipeline_engine.rs
//! A `FilterEngine` that runs rules as a query-normalization pipeline.
//!
//! Rules apply in configuration order and each one sees the previous rule's
//! output: mask rules overwrite matches, remove rules delete them, replace
//! rules rewrite until the text is stable. Replace rules report the
//! substitutions that actually fired, cascaded ones included. Reported offsets
//! are relative to the text each rule (or substitution) ran on.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;

use kwfilter_trie::Scanner;

use crate::config::{FilterConfig, FilterSummaryItem, PipelineConfig};
use crate::engine::{summarize_matches, FilterEngine};
use crate::engines::{span_match, substitution_match};
use crate::filters::compiler::{compile_config, CompiledRule, CompiledRules, RuleMatcher};
use crate::keyword_match::{ensure_match_hashes, KeywordMatch};

#[derive(Debug)]
pub struct PipelineEngine {
    compiled_rules: Arc<CompiledRules>,
    config: FilterConfig,
}

/// Collapses whitespace runs into single spaces and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl PipelineEngine {
    pub fn new(config: FilterConfig) -> Result<Self> {
        let compiled_rules =
            compile_config(&config).context("Failed to compile keyword rules for PipelineEngine")?;
        Ok(Self {
            compiled_rules,
            config,
        })
    }

    pub fn options(&self) -> &PipelineConfig {
        &self.config.engines.pipeline
    }

    /// Applies one rule, appending its matches and returning the new text.
    fn apply(&self, rule: &CompiledRule, text: &str, source_id: &str, matches: &mut Vec<KeywordMatch>) -> String {
        match &rule.matcher {
            RuleMatcher::Mask { patterns, mask_char } => {
                let (chars, spans) = Scanner::new(patterns, text).into_parts();
                let mut masked = chars.clone();
                for span in spans {
                    masked[span.start()..span.stop()].fill(*mask_char);
                    let filtered = std::iter::repeat(*mask_char).take(span.len()).collect();
                    matches.push(span_match(&rule.name, &chars, span, filtered, source_id));
                }
                masked.into_iter().collect()
            }
            RuleMatcher::Remove { patterns } => {
                let chars: Vec<char> = text.chars().collect();
                for span in patterns.scan_matches(text) {
                    matches.push(span_match(&rule.name, &chars, span, String::new(), source_id));
                }
                patterns.filter_with_transform(text, |_| String::new())
            }
            RuleMatcher::Replace { replacer } => {
                let outcome = replacer.replace_with_outcome(text);
                matches.extend(
                    outcome
                        .substitutions
                        .iter()
                        .map(|substitution| substitution_match(&rule.name, substitution, source_id)),
                );
                if outcome.truncated {
                    warn!(
                        "Rule '{}' hit the cascade cap after {} substitutions on '{}'; output may not be stable.",
                        rule.name, outcome.cascades, source_id
                    );
                } else {
                    debug!("Rule '{}' settled after {} substitutions.", rule.name, outcome.cascades);
                }
                outcome.text
            }
        }
    }

    fn run(&self, content: &str, source_id: &str) -> (String, Vec<KeywordMatch>) {
        let options = self.options();
        let mut text = if options.lowercase() {
            content.to_lowercase()
        } else {
            content.to_string()
        };

        let mut matches = Vec::new();
        for rule in &self.compiled_rules.rules {
            text = self.apply(rule, &text, source_id, &mut matches);
        }

        if options.collapse_whitespace() {
            text = collapse_whitespace(&text);
        }
        (text, matches)
    }
}

impl FilterEngine for PipelineEngine {
    fn filter(&self, content: &str, source_id: &str) -> Result<(String, Vec<FilterSummaryItem>)> {
        debug!("PipelineEngine filtering {} bytes from '{}'.", content.len(), source_id);
        let (text, matches) = self.run(content, source_id);
        info!(
            "PipelineEngine ran {} rules over '{}': {} matches.",
            self.compiled_rules.rules.len(),
            source_id,
            matches.len()
        );
        Ok((text, summarize_matches(&matches)))
    }

    fn analyze_for_stats(&self, content: &str, source_id: &str) -> Result<Vec<FilterSummaryItem>> {
        let (_, matches) = self.run(content, source_id);
        Ok(summarize_matches(&matches))
    }

    fn find_matches(&self, content: &str, source_id: &str) -> Result<Vec<KeywordMatch>> {
        let (_, mut matches) = self.run(content, source_id);
        ensure_match_hashes(&mut matches);
        matches.sort_by_key(|m| m.start);
        Ok(matches)
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }

    fn get_rules(&self) -> &FilterConfig {
        &self.config
    }
}
