// kwfilter-trie/src/scanner/mod.rs
//! Nested-match scanning over a [`PatternSet`].
//!
//! The scanner restarts a plain trie descent at every code-point offset and
//! never consults failure links, so it reports every keyword occurrence,
//! including ones nested inside or overlapping longer occurrences.

extern crate alloc;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use crate::trie::{NodeId, PatternSet};

/// Character used by [`PatternSet::mask_filter`] callers that have no preference.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Half-open code-point range `[start, stop)` of one keyword occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchSpan {
    start: usize,
    stop: usize,
}

impl MatchSpan {
    pub fn new(start: usize, stop: usize) -> Self {
        debug_assert!(start <= stop, "span start {} past stop {}", start, stop);
        Self { start, stop }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// Collects the covered code points of `chars` into a `String`.
    pub fn extract(&self, chars: &[char]) -> String {
        chars[self.start..self.stop].iter().collect()
    }
}

/// Result of [`PatternSet::mask_filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOutcome {
    pub masked: String,
    /// Distinct matched substrings, taken from the unmasked input.
    pub keywords: BTreeSet<String>,
    pub found: bool,
}

/// Iterator over every keyword occurrence in a text.
///
/// Spans come out ordered by start offset, and by stop offset within one start.
pub struct Scanner<'p> {
    patterns: &'p PatternSet,
    chars: Vec<char>,
    start: usize,
    pos: usize,
    cursor: NodeId,
}

impl<'p> Scanner<'p> {
    pub fn new(patterns: &'p PatternSet, text: &str) -> Self {
        Self::from_chars(patterns, text.chars().collect())
    }

    pub fn from_chars(patterns: &'p PatternSet, chars: Vec<char>) -> Self {
        // An empty vocabulary can never match; skip straight to exhaustion.
        let start = if patterns.is_empty() { chars.len() } else { 0 };
        Self {
            patterns,
            chars,
            start,
            pos: start,
            cursor: NodeId::ROOT,
        }
    }

    /// The decoded code points being scanned.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Drains the remaining spans, handing back the decoded text alongside them.
    pub fn into_parts(mut self) -> (Vec<char>, Vec<MatchSpan>) {
        let spans: Vec<MatchSpan> = self.by_ref().collect();
        (self.chars, spans)
    }
}

impl Iterator for Scanner<'_> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<Self::Item> {
        while self.start < self.chars.len() {
            if let Some(&c) = self.chars.get(self.pos) {
                if let Some(next) = self.patterns.child(self.cursor, c) {
                    self.cursor = next;
                    self.pos += 1;
                    if self.patterns.is_end(next) {
                        return Some(MatchSpan::new(self.start, self.pos));
                    }
                    continue;
                }
            }

            // Dead end or end of text: restart the descent one offset later.
            self.start += 1;
            self.pos = self.start;
            self.cursor = NodeId::ROOT;
        }
        None
    }
}

impl PatternSet {
    /// Every keyword occurrence in `text`, nested and overlapping ones included.
    pub fn scan_matches(&self, text: &str) -> Vec<MatchSpan> {
        Scanner::new(self, text).collect()
    }

    /// Overwrites every code point covered by a match with `mask_char`.
    pub fn mask_filter(&self, text: &str, mask_char: char) -> MaskOutcome {
        let (chars, spans) = Scanner::new(self, text).into_parts();
        if spans.is_empty() {
            return MaskOutcome {
                masked: String::from(text),
                keywords: BTreeSet::new(),
                found: false,
            };
        }

        let mut masked = chars.clone();
        let mut keywords = BTreeSet::new();
        for span in &spans {
            keywords.insert(span.extract(&chars));
            masked[span.start..span.stop].fill(mask_char);
        }

        MaskOutcome {
            masked: masked.into_iter().collect(),
            found: !keywords.is_empty(),
            keywords,
        }
    }

    /// Distinct keywords occurring in `text`.
    pub fn find_keywords(&self, text: &str) -> BTreeSet<String> {
        let (chars, spans) = Scanner::new(self, text).into_parts();
        spans.iter().map(|span| span.extract(&chars)).collect()
    }

    /// Replaces matches with `transform(keyword)` in one left-to-right pass.
    ///
    /// `transform` runs once per distinct matched keyword. Spans are applied in
    /// scan order and a span overlapping an already replaced one is skipped.
    /// Replacement output is never re-scanned.
    pub fn filter_with_transform<F>(&self, text: &str, mut transform: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let (chars, spans) = Scanner::new(self, text).into_parts();
        if spans.is_empty() {
            return String::from(text);
        }

        let mut replacements: BTreeMap<String, String> = BTreeMap::new();
        let keyed: Vec<(MatchSpan, String)> = spans
            .into_iter()
            .map(|span| {
                let keyword = span.extract(&chars);
                if !replacements.contains_key(&keyword) {
                    let replacement = transform(&keyword);
                    replacements.insert(keyword.clone(), replacement);
                }
                (span, keyword)
            })
            .collect();

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for (span, keyword) in &keyed {
            if span.start < cursor {
                continue;
            }
            out.extend(&chars[cursor..span.start]);
            if let Some(replacement) = replacements.get(keyword) {
                out.push_str(replacement);
            }
            cursor = span.stop;
        }
        out.extend(&chars[cursor..]);
        out
    }
}
