// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Dostbot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Dostbot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; only the Telegram token and at least one OpenRouter key have no
/// default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DostbotConfig {
    /// Assistant persona and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// OpenRouter API settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Canned-reply settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Assistant persona and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Persona name the bot answers identity queries with.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Display name of the bot's owner.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// System preamble for every transcript. When unset, a default built
    /// from the persona name is used.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            owner: default_owner(),
            system_prompt: None,
            log_level: default_log_level(),
        }
    }
}

impl AgentConfig {
    /// The system preamble, defaulting to a persona-naming Hinglish prompt.
    pub fn preamble(&self) -> String {
        self.system_prompt.clone().unwrap_or_else(|| {
            format!(
                "You are {}, a friendly assistant. Respond concisely in Hinglish.",
                self.name
            )
        })
    }
}

fn default_agent_name() -> String {
    "Dost".to_string()
}

fn default_owner() -> String {
    "the Dostbot team".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required for `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// OpenRouter API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// Primary OpenRouter API key. Env-friendly single value.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Additional pool keys (TOML list). Rotated together with `api_key`.
    #[serde(default)]
    pub extra_api_keys: Vec<String>,

    /// Model identifier for generation calls.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sent as the `HTTP-Referer` attribution header.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Sent as the `X-Title` attribution header.
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            extra_api_keys: Vec::new(),
            model: default_model(),
            site_url: default_site_url(),
            site_name: default_site_name(),
        }
    }
}

impl OpenRouterConfig {
    /// The full credential set for the pool, primary key first.
    pub fn pool_keys(&self) -> Vec<String> {
        self.api_key
            .iter()
            .cloned()
            .chain(self.extra_api_keys.iter().cloned())
            .collect()
    }
}

fn default_model() -> String {
    "deepseek/deepseek-chat-v3.1:free".to_string()
}

fn default_site_url() -> String {
    "https://example.com".to_string()
}

fn default_site_name() -> String {
    "Dostbot".to_string()
}

/// Canned-reply configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Link sent in reply to the home-group query.
    #[serde(default = "default_home_group_link")]
    pub home_group_link: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            home_group_link: default_home_group_link(),
        }
    }
}

fn default_home_group_link() -> String {
    "https://t.me/dostbot_home".to_string()
}
