// kwfilter-trie/src/replacer/mod.rs
//! Cascading substring replacement driven by the failure-link automaton.
//!
//! One pass walks the buffer with Aho-Corasick transitions. The first position
//! at which a keyword ends fires a substitution: the finished prefix, the
//! replacement and the untouched remainder are joined into a new buffer, and
//! scanning restarts at offset zero so that keywords formed across a
//! replacement boundary are caught. A pass with no substitution ends the run.

extern crate alloc;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::trie::{NodeId, PatternSet, PatternSetBuilder};

/// Substitutions allowed per call unless configured otherwise.
pub const DEFAULT_MAX_CASCADES: usize = 65_536;

/// Tuning knobs for a [`Replacer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacerOptions {
    /// Upper bound on substitutions per call. `None` removes the bound, which
    /// is only safe for mappings that cannot re-trigger themselves.
    pub max_cascades: Option<usize>,
}

impl Default for ReplacerOptions {
    fn default() -> Self {
        Self {
            max_cascades: Some(DEFAULT_MAX_CASCADES),
        }
    }
}

impl ReplacerOptions {
    pub fn unbounded() -> Self {
        Self { max_cascades: None }
    }

    pub fn with_max_cascades(max_cascades: usize) -> Self {
        Self {
            max_cascades: Some(max_cascades),
        }
    }
}

/// Result of [`Replacer::replace_with_outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub text: String,
    /// Substitutions performed.
    pub cascades: usize,
    /// True when the cascade cap stopped rewriting before a clean pass.
    pub truncated: bool,
    /// Substitutions in the order they fired.
    pub substitutions: Vec<Substitution>,
}

/// One substitution performed during a run.
///
/// `start` and `stop` are code-point offsets into the buffer as it stood when
/// the substitution fired, so later entries may refer to text produced by
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub start: usize,
    pub stop: usize,
    pub key: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Scanning,
    Matched { start: usize, stop: usize, node: NodeId },
    Flush,
    Done,
}

/// An immutable substring-to-replacement rewriter.
#[derive(Debug, Clone)]
pub struct Replacer {
    automaton: PatternSet,
    mapping: BTreeMap<String, String>,
    /// Replacement per terminal node; `None` for identity entries.
    targets: Vec<Option<String>>,
    options: ReplacerOptions,
}

impl Replacer {
    /// Builds a replacer with the default cascade cap.
    ///
    /// Empty keys are dropped. When a key repeats, the last value wins.
    pub fn new<I, K, V>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_options(mapping, ReplacerOptions::default())
    }

    pub fn with_options<I, K, V>(mapping: I, options: ReplacerOptions) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mapping: BTreeMap<String, String> = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        let mut builder = PatternSetBuilder::new();
        let terminals: Vec<(NodeId, Option<&String>)> = mapping
            .iter()
            .filter_map(|(key, value)| {
                let node = builder.insert(key)?;
                // A key mapped onto itself can never change the buffer.
                Some((node, (key != value).then_some(value)))
            })
            .collect();
        let automaton = builder.build();

        let mut targets = vec![None; automaton.node_count()];
        for (node, value) in terminals {
            targets[node.index()] = value.cloned();
        }

        Self {
            automaton,
            mapping,
            targets,
            options,
        }
    }

    pub fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }

    pub fn options(&self) -> ReplacerOptions {
        self.options
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.automaton
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Rewrites `text` until no keyword remains or the cascade cap is hit.
    pub fn replace(&self, text: &str) -> String {
        self.replace_with_outcome(text).text
    }

    pub fn replace_with_outcome(&self, text: &str) -> ReplaceOutcome {
        let mut pass = Pass::new(text.chars().collect());
        let mut substitutions = Vec::new();
        let mut truncated = false;
        let mut state = State::Scanning;

        loop {
            state = match state {
                State::Scanning => self.scan(&mut pass),
                State::Matched { start, stop, node } => {
                    if self.options.max_cascades.is_some_and(|max| substitutions.len() >= max) {
                        truncated = true;
                        State::Flush
                    } else {
                        match self.target(node) {
                            Some(replacement) => {
                                substitutions.push(Substitution {
                                    start,
                                    stop,
                                    key: pass.buffer[start..stop].iter().collect(),
                                    replacement: replacement.clone(),
                                });
                                pass.substitute(start, stop, replacement);
                                State::Scanning
                            }
                            None => State::Scanning,
                        }
                    }
                }
                State::Flush => {
                    pass.flush();
                    State::Done
                }
                State::Done => break,
            };
        }

        ReplaceOutcome {
            text: pass.out,
            cascades: substitutions.len(),
            truncated,
            substitutions,
        }
    }

    fn target(&self, node: NodeId) -> Option<&String> {
        self.targets.get(node.index()).and_then(Option::as_ref)
    }

    /// The longest rewriting keyword ending at the current automaton node.
    fn firing(&self, node: NodeId) -> Option<NodeId> {
        if self.target(node).is_some() {
            return Some(node);
        }
        let mut candidate = self.automaton.output(node);
        while let Some(terminal) = candidate {
            if self.target(terminal).is_some() {
                return Some(terminal);
            }
            candidate = self.automaton.output(terminal);
        }
        None
    }

    /// Advances the pass until a keyword ends or the buffer runs out.
    fn scan(&self, pass: &mut Pass) -> State {
        while let Some(&c) = pass.buffer.get(pass.pos) {
            loop {
                if let Some(next) = self.automaton.child(pass.node, c) {
                    pass.node = next;
                    pass.pos += 1;
                    break;
                }
                if pass.node == NodeId::ROOT {
                    pass.pos += 1;
                    pass.emit_to(pass.pos);
                    break;
                }
                // Only the part of the path the failure target drops is finished.
                let fail = self.automaton.fail(pass.node);
                let dropped = self.automaton.depth(pass.node) - self.automaton.depth(fail);
                pass.emit_to(pass.flushed + dropped);
                pass.node = fail;
            }

            if let Some(node) = self.firing(pass.node) {
                return State::Matched {
                    start: pass.pos - self.automaton.depth(node),
                    stop: pass.pos,
                    node,
                };
            }
        }
        State::Flush
    }
}

/// Working state of one replacement run.
///
/// `buffer[..flushed]` has been copied into `out`; `buffer[flushed..pos]` is
/// the path spelled by `node`.
struct Pass {
    buffer: Vec<char>,
    out: String,
    flushed: usize,
    pos: usize,
    node: NodeId,
}

impl Pass {
    fn new(buffer: Vec<char>) -> Self {
        let capacity = buffer.len();
        Self {
            buffer,
            out: String::with_capacity(capacity),
            flushed: 0,
            pos: 0,
            node: NodeId::ROOT,
        }
    }

    fn emit_to(&mut self, end: usize) {
        self.out.extend(&self.buffer[self.flushed..end]);
        self.flushed = end;
    }

    /// Joins output, replacement and remainder into a fresh buffer and rewinds.
    fn substitute(&mut self, start: usize, stop: usize, replacement: &str) {
        self.emit_to(start);
        self.out.push_str(replacement);
        self.out.extend(&self.buffer[stop..]);

        self.buffer = self.out.chars().collect();
        self.out.clear();
        self.flushed = 0;
        self.pos = 0;
        self.node = NodeId::ROOT;
    }

    fn flush(&mut self) {
        let end = self.buffer.len();
        self.emit_to(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_example() {
        let replacer = Replacer::new([("AB", "X"), ("XC", "Y")]);
        let outcome = replacer.replace_with_outcome("ABC");
        assert_eq!(outcome.text, "Y");
        assert_eq!(outcome.cascades, 2);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_identity_mapping_is_identity() {
        let replacer = Replacer::new([("a", "a"), ("bc", "bc")]);
        let outcome = replacer.replace_with_outcome("abcabc and more");
        assert_eq!(outcome.text, "abcabc and more");
        assert_eq!(outcome.cascades, 0);
    }

    #[test]
    fn test_fail_links_recover_suffix_match() {
        let replacer = Replacer::new([("abcd", "1"), ("bce", "2")]);
        assert_eq!(replacer.replace("abce"), "a2");
        assert_eq!(replacer.replace("abcd"), "1");
    }

    #[test]
    fn test_suffix_keyword_inside_longer_path() {
        let replacer = Replacer::new([("abcde", "1"), ("bc", "2")]);
        assert_eq!(replacer.replace("abcdx"), "a2dx");
    }

    #[test]
    fn test_longest_keyword_ending_first_wins() {
        let replacer = Replacer::new([("york", "Y"), ("new york", "NY")]);
        assert_eq!(replacer.replace("in new york today"), "in NY today");
    }

    #[test]
    fn test_replacement_exposes_boundary_match() {
        let replacer = Replacer::new([("ab", "c"), ("cd", "!")]);
        assert_eq!(replacer.replace("xabd"), "x!");
    }

    #[test]
    fn test_substitutions_record_what_fired() {
        let replacer = Replacer::new([("york", "Y"), ("new york", "NY")]);
        let outcome = replacer.replace_with_outcome("new york");
        assert_eq!(
            outcome.substitutions,
            vec![Substitution {
                start: 0,
                stop: 8,
                key: "new york".into(),
                replacement: "NY".into(),
            }]
        );

        let replacer = Replacer::new([("ab", "c"), ("cd", "!")]);
        let outcome = replacer.replace_with_outcome("abd");
        let fired: Vec<(&str, &str, usize, usize)> = outcome
            .substitutions
            .iter()
            .map(|s| (s.key.as_str(), s.replacement.as_str(), s.start, s.stop))
            .collect();
        assert_eq!(fired, vec![("ab", "c", 0, 2), ("cd", "!", 0, 2)]);
        assert_eq!(outcome.cascades, 2);
    }

    #[test]
    fn test_empty_mapping_and_empty_text() {
        let empty = Replacer::new(Vec::<(String, String)>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.replace("unchanged"), "unchanged");

        let replacer = Replacer::new([("a", "b")]);
        assert_eq!(replacer.replace(""), "");
    }

    #[test]
    fn test_empty_keys_are_dropped() {
        let replacer = Replacer::new([("", "boom"), ("k", "v")]);
        assert_eq!(replacer.len(), 1);
        assert_eq!(replacer.replace("kk"), "vv");
    }

    #[test]
    fn test_removal_mapping() {
        let replacer = Replacer::new([("v", ""), ("V", "")]);
        assert_eq!(replacer.replace("v1.2.3"), "1.2.3");
    }

    #[test]
    fn test_cyclic_mapping_stops_at_cap() {
        let replacer =
            Replacer::with_options([("a", "b"), ("b", "a")], ReplacerOptions::with_max_cascades(5));
        let outcome = replacer.replace_with_outcome("a");
        assert!(outcome.truncated);
        assert_eq!(outcome.cascades, 5);
        assert_eq!(outcome.text, "b");
    }

    #[test]
    fn test_zero_cap_leaves_text_untouched() {
        let replacer = Replacer::with_options([("a", "b")], ReplacerOptions::with_max_cascades(0));
        let outcome = replacer.replace_with_outcome("aaa");
        assert_eq!(outcome.text, "aaa");
        assert!(outcome.truncated);
    }

    #[test]
    fn test_multibyte_replacement() {
        let replacer = Replacer::new([("北京", "beijing"), ("ing", "ING")]);
        assert_eq!(replacer.replace("去北京"), "去beijING");
    }
}
