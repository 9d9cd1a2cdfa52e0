// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between the router, the dispatcher, and the provider adapter.

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::types::{ApiKey, ChatId, Turn};

/// A generation provider reachable with an explicit credential.
///
/// Implemented by the OpenRouter adapter; the resilient dispatcher drives
/// it with keys drawn from the pool.
#[async_trait]
pub trait KeyedCompleter: Send + Sync {
    async fn complete(
        &self,
        key: &ApiKey,
        model: &str,
        turns: &[Turn],
    ) -> Result<String, CompletionError>;
}

/// A generation call with credential handling and retries already applied.
///
/// The router depends on this seam so its tests can substitute a mock
/// without any pool or network behind it.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, model: &str, turns: &[Turn]) -> Result<String, CompletionError>;
}

/// Best-effort "typing" hint sent before a slow generation call.
///
/// Implementations swallow their own failures; this is fire-and-forget and
/// must never surface an error to the router.
#[async_trait]
pub trait TypingIndicator: Send + Sync {
    async fn typing(&self, chat: ChatId);
}
