// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects every failure instead of stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::DostbotConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &DostbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    if config.openrouter.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openrouter.model must not be empty".to_string(),
        });
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of trace, debug, info, warn, error",
                config.agent.log_level
            ),
        });
    }

    if config
        .openrouter
        .pool_keys()
        .iter()
        .any(|k| k.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "openrouter api keys must not be empty strings".to_string(),
        });
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be an empty string".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = DostbotConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_persona_name_fails() {
        let mut config = DostbotConfig::default();
        config.agent.name = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("agent.name"))
        ));
    }

    #[test]
    fn bad_log_level_fails() {
        let mut config = DostbotConfig::default();
        config.agent.log_level = "loud".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
        ));
    }

    #[test]
    fn empty_api_key_string_fails() {
        let mut config = DostbotConfig::default();
        config.openrouter.api_key = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("api keys"))
        ));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = DostbotConfig::default();
        config.agent.name = "".into();
        config.agent.log_level = "loud".into();
        config.openrouter.model = "".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
