// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dostbot chat bot.
//!
//! This crate provides the shared types, error enums, and seam traits used
//! throughout the Dostbot workspace: the inbound/outbound message model, the
//! credential type for the provider key pool, and the completion traits the
//! dispatcher and router are wired through.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BotError, CompletionError};
pub use traits::{ChatCompleter, KeyedCompleter, TypingIndicator};
pub use types::{
    ApiKey, BotIdentity, ChatId, ChatKind, ChatRef, InboundMessage, Mention, MentionKind, Reply,
    ReplyRef, Role, Sender, Turn, UserId,
};
