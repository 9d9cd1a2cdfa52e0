// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter provider adapter for Dostbot.
//!
//! Implements [`KeyedCompleter`] against the OpenRouter chat-completions
//! API, mapping HTTP statuses and response-level error fields onto the
//! typed [`CompletionError`] classification the dispatcher switches on.

pub mod client;
pub mod types;

pub use client::OpenRouterClient;
