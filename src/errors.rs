// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActuatorError {
    /// Pipe or stream setup failed before anything was spawned.
    #[error("Launch error: {0}")]
    Launch(#[source] std::io::Error),

    /// The command could not be spawned, or died inside the start window.
    #[error("command exited")]
    CommandExited,

    #[error("executor was already started")]
    AlreadyStarted,

    #[error("executor is not running (never started or already stopped)")]
    NotStarted,

    /// I/O failure while exchanging a request/response pair.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ActuatorError {
    /// The underlying I/O error of a failed interaction, if any.
    pub fn as_io(&self) -> Option<&std::io::Error> {
        match self {
            ActuatorError::Io(e) | ActuatorError::Launch(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ActuatorError>;
