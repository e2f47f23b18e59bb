//! Terminal presentation for kwfilter.

pub mod output;
pub mod theme;
