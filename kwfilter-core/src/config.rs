//! Configuration management for `kwfilter-core`.
//!
//! This module defines the keyword rules and engine settings, handles their
//! YAML (de)serialization, and provides utilities for loading, merging,
//! activating and validating them.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::errors::KwFilterError;

/// Maximum allowed length, in code points, of a single keyword.
pub const MAX_KEYWORD_LENGTH: usize = 256;

/// What a rule does with the keywords it finds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Overwrite every matched code point with the mask character.
    #[default]
    Mask,
    /// Delete matched keywords.
    Remove,
    /// Rewrite keys into their mapped values, cascading until stable.
    Replace,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Mask => "mask",
            RuleKind::Remove => "remove",
            RuleKind::Replace => "replace",
        }
    }
}

/// A single named keyword rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterRule {
    /// Unique identifier for the rule (e.g., "stop_words").
    pub name: String,
    pub description: Option<String>,
    pub kind: RuleKind,
    /// Vocabulary for `mask` and `remove` rules.
    pub keywords: Vec<String>,
    /// Substring to replacement mapping for `replace` rules.
    pub replacements: BTreeMap<String, String>,
    /// Per-rule mask character; falls back to `engines.mask.mask_char`.
    pub mask_char: Option<String>,
    /// If true, the rule is inactive unless explicitly enabled.
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl FilterRule {
    /// Whether the rule participates in compilation.
    pub fn is_active(&self) -> bool {
        self.enabled.unwrap_or(!self.opt_in)
    }
}

/// Settings for mask rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Mask character for rules that do not set their own (default `*`).
    pub mask_char: Option<String>,
}

/// Settings for replace rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplaceConfig {
    /// Substitutions allowed per replace call before rewriting stops.
    pub max_cascades: Option<usize>,
}

/// Settings for the rule pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Lowercase the input before the first rule runs.
    pub lowercase: Option<bool>,
    /// Collapse whitespace runs and trim the result after the last rule.
    pub collapse_whitespace: Option<bool>,
}

impl PipelineConfig {
    pub fn lowercase(&self) -> bool {
        self.lowercase.unwrap_or(false)
    }

    pub fn collapse_whitespace(&self) -> bool {
        self.collapse_whitespace.unwrap_or(false)
    }
}

/// Container for all engine-specific configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mask: MaskConfig,
    pub replace: ReplaceConfig,
    pub pipeline: PipelineConfig,
}

/// Top-level configuration: an ordered rule list plus engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterConfig {
    pub rules: Vec<FilterRule>,
    #[serde(default)]
    pub engines: EngineConfig,
}

/// Aggregated matches of one rule, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummaryItem {
    pub rule_name: String,
    pub occurrences: usize,
    pub original_texts: Vec<String>,
    pub filtered_texts: Vec<String>,
}

impl FilterConfig {
    /// Loads rules from a YAML file and validates them.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: FilterConfig = serde_yml::from_str(text).context("Invalid YAML")?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Loads the built-in rules embedded at compile time.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: FilterConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Applies enable/disable lists.
    ///
    /// Disabled rules are dropped. Opt-in rules survive only when enabled, and
    /// enabled rules are marked active regardless of their own flags.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();
        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }
        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| {
            let name = rule.name.as_str();
            !disable_set.contains(name) && (!rule.opt_in || enable_set.contains(name))
        });
        for rule in &mut self.rules {
            if enable_set.contains(rule.name.as_str()) {
                rule.enabled = Some(true);
            }
        }

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }

    pub fn rule(&self, name: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

/// Merges user rules and engine settings over the defaults.
///
/// Rule order matters to the pipeline: a user rule with a default's name
/// replaces it in place, new user rules are appended.
pub fn merge_rules(default_config: FilterConfig, user_config: Option<FilterConfig>) -> FilterConfig {
    debug!(
        "merge_rules called. Initial default rules count: {}",
        default_config.rules.len()
    );

    let mut rules = default_config.rules;
    let mut engines = default_config.engines;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        let mut positions: HashMap<String, usize> = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();

        for user_rule in user_cfg.rules {
            match positions.get(&user_rule.name) {
                Some(&i) => rules[i] = user_rule,
                None => {
                    positions.insert(user_rule.name.clone(), rules.len());
                    rules.push(user_rule);
                }
            }
        }

        if let Some(mask_char) = user_cfg.engines.mask.mask_char {
            debug!("Overriding mask character with user value: {}", mask_char);
            engines.mask.mask_char = Some(mask_char);
        }
        if let Some(max_cascades) = user_cfg.engines.replace.max_cascades {
            debug!("Overriding cascade cap with user value: {}", max_cascades);
            engines.replace.max_cascades = Some(max_cascades);
        }
        if let Some(lowercase) = user_cfg.engines.pipeline.lowercase {
            debug!("Overriding pipeline lowercasing with user value: {}", lowercase);
            engines.pipeline.lowercase = Some(lowercase);
        }
        if let Some(collapse) = user_cfg.engines.pipeline.collapse_whitespace {
            debug!("Overriding pipeline whitespace collapsing with user value: {}", collapse);
            engines.pipeline.collapse_whitespace = Some(collapse);
        }
    }

    debug!("Final total rules after merge: {}", rules.len());
    FilterConfig { rules, engines }
}

/// Parses a configured mask character, which must be exactly one scalar value.
pub fn parse_mask_char(rule_name: &str, raw: &str) -> Result<char, KwFilterError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(KwFilterError::InvalidMaskChar(rule_name.to_string(), raw.to_string())),
    }
}

/// Validates rule integrity: names, vocabularies, mask characters.
pub fn validate_config(config: &FilterConfig) -> Result<(), KwFilterError> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    if let Some(raw) = &config.engines.mask.mask_char {
        if let Err(e) = parse_mask_char("engines.mask", raw) {
            errors.push(e.to_string());
        }
    }

    for rule in &config.rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        match rule.kind {
            RuleKind::Mask | RuleKind::Remove => {
                if rule.keywords.iter().all(|k| k.is_empty()) {
                    errors.push(format!(
                        "Rule '{}' ({}) has no keywords.",
                        rule.name,
                        rule.kind.as_str()
                    ));
                }
                if !rule.replacements.is_empty() {
                    warn!("Rule '{}' ignores `replacements`; only replace rules use them.", rule.name);
                }
            }
            RuleKind::Replace => {
                if rule.replacements.is_empty() {
                    errors.push(format!("Rule '{}' (replace) has no replacements.", rule.name));
                }
                if rule.replacements.contains_key("") {
                    errors.push(KwFilterError::EmptyReplacementKey(rule.name.clone()).to_string());
                }
                if !rule.keywords.is_empty() {
                    warn!("Rule '{}' ignores `keywords`; replace rules use `replacements`.", rule.name);
                }
            }
        }

        let longest = rule
            .keywords
            .iter()
            .chain(rule.replacements.keys())
            .map(|k| k.chars().count())
            .max()
            .unwrap_or(0);
        if longest > MAX_KEYWORD_LENGTH {
            errors.push(
                KwFilterError::KeywordLengthExceeded(rule.name.clone(), longest, MAX_KEYWORD_LENGTH)
                    .to_string(),
            );
        }

        if let Some(raw) = &rule.mask_char {
            if let Err(e) = parse_mask_char(&rule.name, raw) {
                errors.push(e.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(KwFilterError::RuleValidation(errors.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, kind: RuleKind) -> FilterRule {
        FilterRule {
            name: name.to_string(),
            kind,
            keywords: vec!["k".to_string()],
            replacements: BTreeMap::from([("k".to_string(), "v".to_string())]),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_mask_char() {
        assert_eq!(parse_mask_char("r", "#").unwrap(), '#');
        assert_eq!(parse_mask_char("r", "█").unwrap(), '█');
        assert!(parse_mask_char("r", "").is_err());
        assert!(parse_mask_char("r", "**").is_err());
    }

    #[test]
    fn test_is_active_respects_opt_in() {
        let mut r = rule("a", RuleKind::Mask);
        assert!(r.is_active());
        r.opt_in = true;
        assert!(!r.is_active());
        r.enabled = Some(true);
        assert!(r.is_active());
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let config = FilterConfig {
            rules: vec![rule("dup", RuleKind::Mask), rule("dup", RuleKind::Replace)],
            engines: EngineConfig::default(),
        };
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("Duplicate rule name found: 'dup'"));
    }

    #[test]
    fn test_validate_rejects_empty_vocabulary() {
        let mut r = rule("empty", RuleKind::Remove);
        r.keywords = vec![String::new()];
        let config = FilterConfig {
            rules: vec![r],
            engines: EngineConfig::default(),
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_merge_preserves_order_and_overrides_in_place() {
        let defaults = FilterConfig {
            rules: vec![rule("first", RuleKind::Remove), rule("second", RuleKind::Replace)],
            engines: EngineConfig::default(),
        };
        let mut override_first = rule("first", RuleKind::Mask);
        override_first.description = Some("user".to_string());
        let user = FilterConfig {
            rules: vec![rule("third", RuleKind::Mask), override_first],
            engines: EngineConfig {
                replace: ReplaceConfig { max_cascades: Some(7) },
                ..Default::default()
            },
        };

        let merged = merge_rules(defaults, Some(user));
        let names: Vec<&str> = merged.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(merged.rules[0].kind, RuleKind::Mask);
        assert_eq!(merged.engines.replace.max_cascades, Some(7));
    }

    #[test]
    fn test_merge_lets_user_turn_pipeline_options_off() {
        let defaults = FilterConfig::load_default_rules().unwrap();
        assert!(defaults.engines.pipeline.lowercase());
        assert!(defaults.engines.pipeline.collapse_whitespace());

        let user = FilterConfig::from_yaml_str(
            "rules: []\nengines:\n  pipeline:\n    lowercase: false\n    collapse_whitespace: false\n",
        )
        .unwrap();
        let merged = merge_rules(defaults.clone(), Some(user));
        assert!(!merged.engines.pipeline.lowercase());
        assert!(!merged.engines.pipeline.collapse_whitespace());

        // Options the user leaves unset keep the default.
        let user = FilterConfig::from_yaml_str("rules: []\nengines:\n  pipeline:\n    lowercase: false\n").unwrap();
        let merged = merge_rules(defaults, Some(user));
        assert!(!merged.engines.pipeline.lowercase());
        assert!(merged.engines.pipeline.collapse_whitespace());
    }

    #[test]
    fn test_default_rules_are_valid() {
        let config = FilterConfig::load_default_rules().unwrap();
        validate_config(&config).unwrap();
        assert!(config.rule("synonyms").is_some());
    }
}
