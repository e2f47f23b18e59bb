//! Rule compilation for kwfilter.
//!
//! Turns `FilterRule` configuration into the immutable automata from
//! `kwfilter-trie` that the engines run: a `PatternSet` for mask and remove
//! rules, a cascading `Replacer` for replace rules.

pub mod compiler;
