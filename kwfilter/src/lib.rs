// kwfilter/src/lib.rs
//! # kwfilter CLI Application
//!
//! Command-line front end for `kwfilter-core`: argument parsing, logger
//! setup, subcommands and terminal output.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
