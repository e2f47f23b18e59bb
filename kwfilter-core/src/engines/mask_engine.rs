// kwfilter-core/src/engines/mask_engine.rs
//! A `FilterEngine` that masks and removes keywords found in the original
//! text.
//!
//! Every mask and remove rule scans the unmodified input, so rules never see
//! each other's output. Covered code points are unioned across rules: a point
//! claimed by any remove rule is dropped, any other claimed point takes the
//! mask character of the first mask rule that claimed it.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;

use crate::config::{FilterConfig, FilterSummaryItem};
use crate::engine::{summarize_matches, FilterEngine};
use crate::engines::span_match;
use crate::filters::compiler::{compile_config, CompiledRules, RuleMatcher};
use crate::keyword_match::{ensure_match_hashes, KeywordMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    Mask(char),
    Remove,
}

#[derive(Debug)]
pub struct MaskEngine {
    compiled_rules: Arc<CompiledRules>,
    config: FilterConfig,
}

impl MaskEngine {
    pub fn new(config: FilterConfig) -> Result<Self> {
        let compiled_rules =
            compile_config(&config).context("Failed to compile keyword rules for MaskEngine")?;
        Ok(Self {
            compiled_rules,
            config,
        })
    }

    /// Scans every rule over `chars` and records which code points it claims.
    fn collect(&self, content: &str, chars: &[char], source_id: &str) -> (Vec<Option<Claim>>, Vec<KeywordMatch>) {
        let mut claims = vec![None; chars.len()];
        let mut matches = Vec::new();

        for rule in &self.compiled_rules.rules {
            let (patterns, claim) = match &rule.matcher {
                RuleMatcher::Mask { patterns, mask_char } => (patterns, Claim::Mask(*mask_char)),
                RuleMatcher::Remove { patterns } => (patterns, Claim::Remove),
                RuleMatcher::Replace { .. } => {
                    debug!("MaskEngine skips replace rule '{}'.", rule.name);
                    continue;
                }
            };

            for span in patterns.scan_matches(content) {
                for slot in &mut claims[span.start()..span.stop()] {
                    match (claim, *slot) {
                        (Claim::Remove, _) | (_, None) => *slot = Some(claim),
                        _ => {}
                    }
                }
                let filtered = match claim {
                    Claim::Mask(c) => std::iter::repeat(c).take(span.len()).collect(),
                    Claim::Remove => String::new(),
                };
                matches.push(span_match(&rule.name, chars, span, filtered, source_id));
            }
        }

        (claims, matches)
    }
}

impl FilterEngine for MaskEngine {
    fn filter(&self, content: &str, source_id: &str) -> Result<(String, Vec<FilterSummaryItem>)> {
        debug!("MaskEngine filtering {} bytes from '{}'.", content.len(), source_id);
        let chars: Vec<char> = content.chars().collect();
        let (claims, matches) = self.collect(content, &chars, source_id);

        let mut filtered = String::with_capacity(content.len());
        for (c, claim) in chars.iter().zip(&claims) {
            match claim {
                None => filtered.push(*c),
                Some(Claim::Mask(mask)) => filtered.push(*mask),
                Some(Claim::Remove) => {}
            }
        }

        let summary = summarize_matches(&matches);
        info!(
            "MaskEngine applied {} rules to '{}': {} matches.",
            self.compiled_rules.rules.len(),
            source_id,
            matches.len()
        );
        Ok((filtered, summary))
    }

    fn analyze_for_stats(&self, content: &str, source_id: &str) -> Result<Vec<FilterSummaryItem>> {
        let chars: Vec<char> = content.chars().collect();
        let (_, matches) = self.collect(content, &chars, source_id);
        Ok(summarize_matches(&matches))
    }

    fn find_matches(&self, content: &str, source_id: &str) -> Result<Vec<KeywordMatch>> {
        let chars: Vec<char> = content.chars().collect();
        let (_, mut matches) = self.collect(content, &chars, source_id);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterRule, RuleKind};

    fn rule(name: &str, kind: RuleKind, keywords: &[&str], mask_char: Option<&str>) -> FilterRule {
        FilterRule {
            name: name.to_string(),
            kind,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            mask_char: mask_char.map(str::to_string),
            ..Default::default()
        }
    }

    fn engine(rules: Vec<FilterRule>) -> MaskEngine {
        MaskEngine::new(FilterConfig {
            rules,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_nested_keywords_mask_whole_span() {
        let engine = engine(vec![rule("cast", RuleKind::Mask, &["AV", "ACTOR", "AVAC"], None)]);
        let (out, summary) = engine.filter("AVACTOR", "t").unwrap();
        assert_eq!(out, "*******");
        assert_eq!(summary[0].occurrences, 3);
    }

    #[test]
    fn test_first_mask_rule_owns_overlap() {
        let engine = engine(vec![
            rule("hash", RuleKind::Mask, &["abc"], Some("#")),
            rule("star", RuleKind::Mask, &["cde"], None),
        ]);
        let (out, _) = engine.filter("abcdef", "t").unwrap();
        assert_eq!(out, "###**f");
    }

    #[test]
    fn test_remove_wins_over_mask() {
        let engine = engine(vec![
            rule("mask", RuleKind::Mask, &["secret"], None),
            rule("drop", RuleKind::Remove, &["cret"], None),
        ]);
        let (out, summary) = engine.filter("a secret!", "t").unwrap();
        assert_eq!(out, "a **!");
        let names: Vec<&str> = summary.iter().map(|s| s.rule_name.as_str()).collect();
        assert_eq!(names, vec!["mask", "drop"]);
    }

    #[test]
    fn test_replace_rules_are_ignored() {
        let replace = FilterRule {
            name: "syn".to_string(),
            kind: RuleKind::Replace,
            replacements: [("nyc".to_string(), "new york".to_string())].into_iter().collect(),
            ..Default::default()
        };
        let engine = engine(vec![replace]);
        let (out, summary) = engine.filter("nyc", "t").unwrap();
        assert_eq!(out, "nyc");
        assert!(summary.is_empty());
    }

    #[test]
    fn test_find_matches_sorted_and_hashed() {
        let engine = engine(vec![
            rule("late", RuleKind::Mask, &["fox"], None),
            rule("early", RuleKind::Remove, &["quick"], None),
        ]);
        let matches = engine.find_matches("the quick fox", "src").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].rule_name, "early");
        assert_eq!((matches[0].start, matches[0].end), (4, 9));
        assert_eq!((matches[1].start, matches[1].end), (10, 13));
        assert!(matches.iter().all(|m| m.sample_hash.is_some() && m.source_id == "src"));
    }

    #[test]
    fn test_multibyte_offsets_are_code_points() {
        let engine = engine(vec![rule("cn", RuleKind::Mask, &["北京"], Some("•"))]);
        let (out, _) = engine.filter("我爱北京天安门", "t").unwrap();
        assert_eq!(out, "我爱••天安门");
        let matches = engine.find_matches("我爱北京天安门", "t").unwrap();
        assert_eq!((matches[0].start, matches[0].end), (2, 4));
    }
}
