// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Dostbot configuration system.

use dostbot_config::diagnostic::ConfigError;
use dostbot_config::loader::{load_config_from_path, load_config_from_str};
use dostbot_config::{load_and_validate_path, load_and_validate_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_dostbot_config() {
    let toml = r#"
[agent]
name = "Yaar"
owner = "Suman"
system_prompt = "Respond concisely in Hinglish."
log_level = "debug"

[telegram]
bot_token = "123:ABC"

[openrouter]
api_key = "sk-or-primary"
extra_api_keys = ["sk-or-b", "sk-or-c"]
model = "deepseek/deepseek-chat-v3.1:free"
site_url = "https://dostbot.example"
site_name = "Dostbot"

[chat]
home_group_link = "https://t.me/yaar_adda"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "Yaar");
    assert_eq!(config.agent.owner, "Suman");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.preamble(), "Respond concisely in Hinglish.");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(
        config.openrouter.pool_keys(),
        vec!["sk-or-primary", "sk-or-b", "sk-or-c"]
    );
    assert_eq!(config.openrouter.site_url, "https://dostbot.example");
    assert_eq!(config.chat.home_group_link, "https://t.me/yaar_adda");
}

/// Unknown field in a section is rejected by deny_unknown_fields.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[telegram]
bot_tken = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("bot_tken"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing sections fall back to defaults without error.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should load defaults");
    assert_eq!(config.agent.name, "Dost");
    assert_eq!(config.openrouter.model, "deepseek/deepseek-chat-v3.1:free");
    assert!(config.telegram.bot_token.is_none());
    assert!(config.openrouter.pool_keys().is_empty());
}

/// Validation failures come back as one diagnostic per problem.
#[test]
fn validation_collects_every_failure() {
    let errors = load_and_validate_str(
        r#"
[agent]
name = ""
log_level = "loud"

[openrouter]
model = ""
"#,
    )
    .expect_err("invalid values should fail validation");

    assert_eq!(errors.len(), 3);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// A parse failure surfaces as a Parse diagnostic, not a panic.
#[test]
fn malformed_toml_is_a_parse_diagnostic() {
    let errors = load_and_validate_str("[agent\nname = ").expect_err("should fail to parse");
    assert!(errors.iter().any(|e| matches!(e, ConfigError::Parse(_))));
}

/// An explicit file path (the CLI's `--config`) loads that file.
#[test]
fn explicit_path_loads_the_named_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[agent]\nname = \"Yaar\"\n").expect("write config");

    let config = load_config_from_path(&path).expect("path config should load");
    assert_eq!(config.agent.name, "Yaar");

    let config = load_and_validate_path(&path).expect("path config should validate");
    assert_eq!(config.agent.name, "Yaar");
}

/// Validation still runs on path-loaded configs.
#[test]
fn explicit_path_config_is_validated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[agent]\nlog_level = \"loud\"\n").expect("write config");

    let errors = load_and_validate_path(&path).expect_err("bad level should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { .. })));
}
