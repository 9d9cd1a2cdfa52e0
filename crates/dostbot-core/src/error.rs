// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dostbot chat bot.

use thiserror::Error;

/// The primary error type used across Dostbot's transport and wiring layers.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration errors (missing token, empty key pool, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Telegram transport errors (send failure, malformed update).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generation provider errors surfaced past the retry loop.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Typed classification of a single failed generation attempt.
///
/// Replaces the original design's substring sniffing of provider error
/// messages: the provider adapter maps HTTP statuses and response-level
/// error fields onto these classes, and the dispatcher switches on the
/// class alone.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Provider signalled an over-quota / 429-class condition.
    /// Recoverable: ban the key briefly, back off, rotate.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Provider rejected the credential (401/403-class).
    /// Recoverable: ban the key for a long cooldown, rotate immediately.
    #[error("credential rejected: {0}")]
    Unauthorized(String),

    /// Network, timeout, or server-side failure (5xx-class).
    /// Recoverable: rotate and back off.
    #[error("transient provider failure: {0}")]
    Transient(String),

    /// Anything else (e.g. unknown model). Retrying cannot help.
    #[error("provider error: {0}")]
    Fatal(String),
}

impl CompletionError {
    /// True if another attempt with a different key or after a delay could
    /// plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CompletionError::Fatal(_))
    }
}
