// kwfilter-trie/src/lib.rs
//! Keyword automaton for kwfilter.
//!
//! A prefix tree stored in an index arena, with Aho-Corasick failure links.
//! Two matching strategies sit on top of the same [`PatternSet`]:
//!
//! * [`Scanner`] performs a plain trie descent from every start offset and
//!   reports every nested and overlapping keyword occurrence. Masking and
//!   keyword discovery are built on it.
//! * [`Replacer`] drives the failure-link automaton to rewrite text, and
//!   re-scans the rewritten buffer after each substitution until no keyword
//!   remains (bounded by a configurable cascade cap).
//!
//! All offsets are Unicode code-point indices, never byte offsets.
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod replacer;
pub mod scanner;
pub mod trie;

pub use replacer::{ReplaceOutcome, Replacer, ReplacerOptions, Substitution, DEFAULT_MAX_CASCADES};
pub use scanner::{MaskOutcome, MatchSpan, Scanner, DEFAULT_MASK_CHAR};
pub use trie::{NodeId, PatternSet, PatternSetBuilder};
