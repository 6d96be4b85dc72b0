// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `actionloop`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "actionloop",
    version,
    about = "Run an action process and feed it one request line per activation.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Actionloop.toml` in the current directory is used when
    /// it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ACTIONLOOP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Pass `OW_DEBUG` to the action.
    #[arg(long)]
    pub debug: bool,

    /// Startup grace window in milliseconds.
    #[arg(long, value_name = "MS")]
    pub start_timeout_ms: Option<u64>,

    /// Resolve and print the launch settings, but don't start the action.
    #[arg(long)]
    pub dry_run: bool,

    /// Action command and its arguments (overrides `[action]`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
