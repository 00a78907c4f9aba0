//! UI module - Command line front-end
//!
//! Provides the reedline-based REPL and the output helpers shared with the
//! one-shot subcommands.

pub mod cli;
