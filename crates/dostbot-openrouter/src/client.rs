// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions API.
//!
//! One blocking call per attempt; retry policy lives entirely in the
//! dispatcher. This client's job is request construction, attribution
//! headers, and classifying every failure mode into [`CompletionError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use dostbot_core::{ApiKey, BotError, CompletionError, KeyedCompleter, Turn};

use crate::types::{ChatRequest, ChatResponse};

/// Base URL for the OpenRouter chat-completions endpoint.
const API_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter API client implementing [`KeyedCompleter`].
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    /// Creates a new client. `site_url` and `site_name` become the
    /// `HTTP-Referer` and `X-Title` attribution headers OpenRouter asks
    /// integrators to send.
    pub fn new(site_url: &str, site_name: &str) -> Result<Self, BotError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "HTTP-Referer",
            HeaderValue::from_str(site_url)
                .map_err(|e| BotError::Config(format!("invalid site_url header value: {e}")))?,
        );
        headers.insert(
            "X-Title",
            HeaderValue::from_str(site_name)
                .map_err(|e| BotError::Config(format!("invalid site_name header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| BotError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl KeyedCompleter for OpenRouterClient {
    async fn complete(
        &self,
        key: &ApiKey,
        model: &str,
        turns: &[Turn],
    ) -> Result<String, CompletionError> {
        let request = ChatRequest::new(model, turns);

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&key.secret)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        debug!(status = %status, key_id = key.id, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transient(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::Fatal(format!("unparseable API response: {e}")))?;

        // OpenRouter reports some failures as an error object inside a
        // 200 response; treat them identically to status-level failures.
        if let Some(err) = parsed.error {
            return Err(classify_api_error(err.code, &err.message));
        }

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompletionError::Fatal("response contained no choices".into()))
    }
}

fn classify_transport_error(e: reqwest::Error) -> CompletionError {
    // Timeouts, connect failures, and mid-body drops are all worth a
    // rotate-and-retry.
    CompletionError::Transient(format!("HTTP request failed: {e}"))
}

fn classify_status(status: reqwest::StatusCode, body: &str) -> CompletionError {
    let detail = error_message(body).unwrap_or_else(|| truncate(body));
    match status.as_u16() {
        429 => CompletionError::RateLimited(detail),
        401 | 403 => CompletionError::Unauthorized(detail),
        408 | 500..=599 => CompletionError::Transient(format!("{status}: {detail}")),
        _ => CompletionError::Fatal(format!("{status}: {detail}")),
    }
}

fn classify_api_error(code: Option<i64>, message: &str) -> CompletionError {
    let lower = message.to_lowercase();
    match code {
        Some(429) => CompletionError::RateLimited(message.to_string()),
        Some(401) | Some(403) => CompletionError::Unauthorized(message.to_string()),
        Some(c) if (500..600).contains(&c) || c == 408 => {
            CompletionError::Transient(message.to_string())
        }
        // No usable code: fall back to the classification substrings the
        // original system matched on.
        _ if lower.contains("rate limit") || lower.contains("quota") => {
            CompletionError::RateLimited(message.to_string())
        }
        _ if lower.contains("invalid api key") || lower.contains("unauthorized") => {
            CompletionError::Unauthorized(message.to_string())
        }
        _ if lower.contains("timeout") || lower.contains("overloaded") => {
            CompletionError::Transient(message.to_string())
        }
        _ => CompletionError::Fatal(message.to_string()),
    }
}

/// Pulls the error message out of an error-shaped body, if it is one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ChatResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| e.message)
}

fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}
