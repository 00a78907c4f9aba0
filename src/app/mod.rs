//! App module - front-end session state and commands
//!
//! Holds the target selection a front-end keeps between requests and the
//! command vocabulary of the interactive shell.

mod commands;
mod state;

pub use commands::*;
pub use state::*;
