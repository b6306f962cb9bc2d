//! Crate-level errors
//!
//! Failures that stop a console run outright. Everything a user types
//! wrong is reported inside the session instead and never reaches here.

use crate::util::config::ConfigError;

/// Errors surfaced by the console front ends
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Unified result type
pub type Result<T, E = ConsoleError> = std::result::Result<T, E>;
