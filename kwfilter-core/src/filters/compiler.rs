//! compiler.rs - Compiles filter rules into keyword automata.
//!
//! Each active `FilterRule` becomes a `CompiledRule`. Compiled rules are
//! immutable and shared behind an `Arc`, so an engine can be used from many
//! threads without locking.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;

use kwfilter_trie::{PatternSet, Replacer, ReplacerOptions, DEFAULT_MASK_CHAR};

use crate::config::{parse_mask_char, EngineConfig, FilterConfig, FilterRule, RuleKind, MAX_KEYWORD_LENGTH};
use crate::errors::KwFilterError;

/// The automaton behind a compiled rule.
#[derive(Debug)]
pub enum RuleMatcher {
    Mask { patterns: PatternSet, mask_char: char },
    Remove { patterns: PatternSet },
    Replace { replacer: Replacer },
}

/// A single compiled rule, ready to run.
#[derive(Debug)]
pub struct CompiledRule {
    /// The unique name of the rule.
    pub name: String,
    pub matcher: RuleMatcher,
}

impl CompiledRule {
    pub fn kind(&self) -> RuleKind {
        match self.matcher {
            RuleMatcher::Mask { .. } => RuleKind::Mask,
            RuleMatcher::Remove { .. } => RuleKind::Remove,
            RuleMatcher::Replace { .. } => RuleKind::Replace,
        }
    }

    /// The pattern set scanned for reporting. For replace rules this is the
    /// replacer's key vocabulary.
    pub fn patterns(&self) -> &PatternSet {
        match &self.matcher {
            RuleMatcher::Mask { patterns, .. } | RuleMatcher::Remove { patterns } => patterns,
            RuleMatcher::Replace { replacer } => replacer.patterns(),
        }
    }
}

/// All compiled rules of a configuration, in configuration order.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

fn compile_rule(rule: FilterRule, engines: &EngineConfig) -> Result<CompiledRule, KwFilterError> {
    let longest = rule
        .keywords
        .iter()
        .chain(rule.replacements.keys())
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0);
    if longest > MAX_KEYWORD_LENGTH {
        return Err(KwFilterError::KeywordLengthExceeded(rule.name, longest, MAX_KEYWORD_LENGTH));
    }

    let matcher = match rule.kind {
        RuleKind::Mask => {
            let mask_char = match rule.mask_char.as_deref().or(engines.mask.mask_char.as_deref()) {
                Some(raw) => parse_mask_char(&rule.name, raw)?,
                None => DEFAULT_MASK_CHAR,
            };
            RuleMatcher::Mask {
                patterns: PatternSet::new(&rule.keywords),
                mask_char,
            }
        }
        RuleKind::Remove => RuleMatcher::Remove {
            patterns: PatternSet::new(&rule.keywords),
        },
        RuleKind::Replace => {
            if rule.replacements.contains_key("") {
                return Err(KwFilterError::EmptyReplacementKey(rule.name));
            }
            let options = match engines.replace.max_cascades {
                Some(max) => ReplacerOptions::with_max_cascades(max),
                None => ReplacerOptions::default(),
            };
            RuleMatcher::Replace {
                replacer: Replacer::with_options(rule.replacements, options),
            }
        }
    };

    Ok(CompiledRule {
        name: rule.name,
        matcher,
    })
}

/// Compiles the active rules, collecting every failure into one error.
pub fn compile_rules(rules_to_compile: Vec<FilterRule>, engines: &EngineConfig) -> Result<CompiledRules, KwFilterError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    let mut compiled_rules = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if !rule.is_active() {
            debug!("Skipping inactive rule '{}'.", rule.name);
            continue;
        }

        let name = rule.name.clone();
        match compile_rule(rule, engines) {
            Ok(compiled) => {
                let size = compiled.patterns().len();
                if size == 0 {
                    warn!("Rule '{}' compiled to an empty vocabulary and will never match.", name);
                }
                debug!(
                    "Rule '{}' ({}) compiled with {} keywords.",
                    name,
                    compiled.kind().as_str(),
                    size
                );
                compiled_rules.push(compiled);
            }
            Err(e) => compilation_errors.push(e),
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(KwFilterError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
        Ok(CompiledRules { rules: compiled_rules })
    }
}

/// Compiles a whole configuration into shareable rules.
pub fn compile_config(config: &FilterConfig) -> Result<Arc<CompiledRules>> {
    let compiled = compile_rules(config.rules.clone(), &config.engines)?;
    Ok(Arc::new(compiled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn mask_rule(name: &str, keywords: &[&str]) -> FilterRule {
        FilterRule {
            name: name.to_string(),
            kind: RuleKind::Mask,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mask_char_falls_back_to_engine_setting() {
        let engines = EngineConfig {
            mask: crate::config::MaskConfig {
                mask_char: Some("#".to_string()),
            },
            ..Default::default()
        };
        let mut own = mask_rule("own", &["a"]);
        own.mask_char = Some("x".to_string());
        let compiled = compile_rules(vec![mask_rule("inherit", &["a"]), own], &engines).unwrap();

        let chars: Vec<char> = compiled
            .rules
            .iter()
            .map(|r| match r.matcher {
                RuleMatcher::Mask { mask_char, .. } => mask_char,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(chars, vec!['#', 'x']);
    }

    #[test]
    fn test_inactive_rules_are_skipped() {
        let mut opt_in = mask_rule("opt", &["a"]);
        opt_in.opt_in = true;
        let mut disabled = mask_rule("off", &["a"]);
        disabled.enabled = Some(false);
        let compiled = compile_rules(vec![opt_in, disabled, mask_rule("on", &["a"])], &EngineConfig::default()).unwrap();
        assert_eq!(compiled.rules.len(), 1);
        assert_eq!(compiled.rules[0].name, "on");
    }

    #[test]
    fn test_errors_are_collected() {
        let mut bad_char = mask_rule("bad_char", &["a"]);
        bad_char.mask_char = Some("ab".to_string());
        let bad_key = FilterRule {
            name: "bad_key".to_string(),
            kind: RuleKind::Replace,
            replacements: BTreeMap::from([(String::new(), "x".to_string())]),
            ..Default::default()
        };
        let err = compile_rules(vec![bad_char, bad_key], &EngineConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to compile 2 rule(s)"));
        assert!(message.contains("bad_char"));
        assert!(message.contains("bad_key"));
    }

    #[test]
    fn test_replace_rule_uses_configured_cap() {
        let rule = FilterRule {
            name: "loop".to_string(),
            kind: RuleKind::Replace,
            replacements: BTreeMap::from([
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "a".to_string()),
            ]),
            ..Default::default()
        };
        let engines = EngineConfig {
            replace: crate::config::ReplaceConfig { max_cascades: Some(3) },
            ..Default::default()
        };
        let compiled = compile_rules(vec![rule], &engines).unwrap();
        match &compiled.rules[0].matcher {
            RuleMatcher::Replace { replacer } => {
                let outcome = replacer.replace_with_outcome("a");
                assert!(outcome.truncated);
                assert_eq!(outcome.cascades, 3);
            }
            other => panic!("unexpected matcher {:?}", other),
        }
    }
}
