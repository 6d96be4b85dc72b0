// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ActuatorError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ActuatorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.action))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_action(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.start_timeout_ms == 0 {
        return Err(ActuatorError::Config(
            "[config].start_timeout_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.config.debug_log_path.as_os_str().is_empty() {
        return Err(ActuatorError::Config(
            "[config].debug_log_path must not be empty".to_string(),
        ));
    }

    if cfg.config.stdout_log.is_some() != cfg.config.stderr_log.is_some() {
        return Err(ActuatorError::Config(
            "[config].stdout_log and [config].stderr_log must be set together".to_string(),
        ));
    }

    Ok(())
}

fn validate_action(cfg: &RawConfigFile) -> Result<()> {
    if let Some(action) = &cfg.action {
        if action.command.trim().is_empty() {
            return Err(ActuatorError::Config(
                "[action].command must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
