// kwfilter-core/src/version.rs
//! Version-string normalization and ordering.
//!
//! Release labels arrive as `v1.2`, `release-1.2.0`, `Version 2` and so on.
//! The normalizer strips a known prefix when it makes up the whole label in
//! front of the first digit, and drops build metadata, so the remainder can be
//! compared component by component.
//!
//! Stripping runs through a single [`Replacer`] whose keys are the prefixes
//! wrapped in start/end sentinels, so a prefix only fires when it spans the
//! entire label (`vendor1` keeps its `v`).

use lazy_static::lazy_static;
use log::debug;
use std::cmp::Ordering;

use kwfilter_trie::Replacer;

/// Prefixes stripped by [`VersionNormalizer::default`].
pub const DEFAULT_VERSION_PREFIXES: &[&str] = &["version", "Version", "ver", "release-", "v", "V"];

const LABEL_START: char = '\u{2}';
const LABEL_END: char = '\u{3}';

lazy_static! {
    static ref DEFAULT_NORMALIZER: VersionNormalizer = VersionNormalizer::default();
}

#[derive(Debug, Clone)]
pub struct VersionNormalizer {
    prefixes: Replacer,
}

impl Default for VersionNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_PREFIXES.iter().copied())
    }
}

/// One `.`/`-`/`_` separated piece: its numeric head and whatever follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Component<'a> {
    /// Leading digits with leading zeros removed.
    digits: &'a str,
    tail: &'a str,
}

impl<'a> Component<'a> {
    const ZERO: Component<'static> = Component { digits: "", tail: "" };

    fn parse(raw: &'a str) -> Self {
        let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
        let (digits, tail) = raw.split_at(split);
        Component {
            digits: digits.trim_start_matches('0'),
            tail,
        }
    }
}

impl Ord for Component<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(other.digits))
            .then_with(|| match (self.tail.is_empty(), other.tail.is_empty()) {
                (true, true) => Ordering::Equal,
                // A bare number is a release; any tail marks a pre-release.
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.tail.cmp(other.tail),
            })
    }
}

impl PartialOrd for Component<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl VersionNormalizer {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mapping: Vec<(String, String)> = prefixes
            .into_iter()
            .filter(|prefix| !prefix.as_ref().is_empty())
            .map(|prefix| (anchored(prefix.as_ref()), anchored("")))
            .collect();
        Self {
            prefixes: Replacer::new(mapping),
        }
    }

    /// Drops `label` entirely when it is one of the known prefixes.
    fn strip_label(&self, label: &str) -> String {
        let label = label.trim();
        let sentinels: &[char] = &[LABEL_START, LABEL_END];
        if label.is_empty() || label.contains(sentinels) {
            return label.to_string();
        }
        self.prefixes
            .replace(&anchored(label))
            .trim_matches(sentinels)
            .to_string()
    }

    /// Trims `raw`, strips known prefixes and drops `+build` metadata.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let without_build = trimmed.split_once('+').map_or(trimmed, |(head, _)| head);

        let label_end = without_build
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(without_build.len());
        let (label, rest) = without_build.split_at(label_end);

        let normalized = format!("{}{}", self.strip_label(label), rest);
        debug!("Normalized version '{}' to '{}'.", raw, normalized);
        normalized
    }

    /// Orders two version strings after normalization.
    ///
    /// Components compare numerically, missing components count as zero, and
    /// a component with a non-numeric tail sorts before the same bare number.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let a = self.normalize(a);
        let b = self.normalize(b);
        let separators: &[char] = &['.', '-', '_'];
        let left: Vec<Component> = a.split(separators).map(Component::parse).collect();
        let right: Vec<Component> = b.split(separators).map(Component::parse).collect();

        (0..left.len().max(right.len()))
            .map(|i| {
                let l = left.get(i).copied().unwrap_or(Component::ZERO);
                let r = right.get(i).copied().unwrap_or(Component::ZERO);
                l.cmp(&r)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

fn anchored(label: &str) -> String {
    format!("{}{}{}", LABEL_START, label, LABEL_END)
}

/// Compares two versions with the default prefix set.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    DEFAULT_NORMALIZER.compare(a, b)
}
