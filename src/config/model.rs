// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::{LaunchOptions, DEFAULT_DEBUG_LOG_PATH};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// start_timeout_ms = 5
/// debug = false
/// debug_log_path = "/tmp/action.log"
/// stdout_log = "/var/log/action.out"
/// stderr_log = "/var/log/action.err"
///
/// [action]
/// command = "/action/exec"
/// args = ["--flag"]
/// ```
///
/// All sections are optional and have reasonable defaults. The action
/// command can also be given on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub action: Option<ActionSection>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub action: Option<ActionSection>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, action: Option<ActionSection>) -> Self {
        Self { config, action }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Startup grace window in milliseconds.
    #[serde(default = "default_start_timeout_ms")]
    pub start_timeout_ms: u64,

    /// Ask the action to write a debug log (`OW_DEBUG`).
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_debug_log_path")]
    pub debug_log_path: PathBuf,

    /// File receiving the action's stdout. Defaults to our stderr.
    #[serde(default)]
    pub stdout_log: Option<PathBuf>,

    /// File receiving the action's stderr. Defaults to our stderr.
    #[serde(default)]
    pub stderr_log: Option<PathBuf>,
}

fn default_start_timeout_ms() -> u64 {
    5
}

fn default_debug_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_DEBUG_LOG_PATH)
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            start_timeout_ms: default_start_timeout_ms(),
            debug: false,
            debug_log_path: default_debug_log_path(),
            stdout_log: None,
            stderr_log: None,
        }
    }
}

impl ConfigSection {
    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            debug: self.debug,
            debug_log_path: self.debug_log_path.clone(),
            start_timeout: self.start_timeout(),
        }
    }
}

/// `[action]` section: what to run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSection {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}
