// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the OpenRouter chat-completions API.

use serde::{Deserialize, Serialize};

use dostbot_core::{Role, Turn};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
}

impl ChatRequest {
    pub fn new(model: &str, turns: &[Turn]) -> Self {
        Self {
            model: model.to_string(),
            messages: turns.iter().map(ApiMessage::from).collect(),
        }
    }
}

/// One message in the chat-completions wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

impl From<&Turn> for ApiMessage {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: turn.content.clone(),
        }
    }
}

/// Response body. OpenRouter can return an `error` object inside a 200
/// response, so both halves are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ApiMessage,
}

/// Response-level error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}
