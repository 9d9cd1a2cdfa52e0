// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dostbot.toml` > `~/.config/dostbot/dostbot.toml`
//! > `/etc/dostbot/dostbot.toml` with environment variable overrides via the
//! `DOSTBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DostbotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dostbot/dostbot.toml` (system-wide)
/// 3. `~/.config/dostbot/dostbot.toml` (user XDG config)
/// 4. `./dostbot.toml` (local directory)
/// 5. `DOSTBOT_*` environment variables
pub fn load_config() -> Result<DostbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DostbotConfig::default()))
        .merge(Toml::file("/etc/dostbot/dostbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dostbot/dostbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dostbot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DostbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DostbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DostbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DostbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DOSTBOT_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("DOSTBOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DOSTBOT_OPENROUTER_API_KEY -> "openrouter_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("openrouter_", "openrouter.", 1)
            .replacen("chat_", "chat.", 1);
        mapped.into()
    })
}
