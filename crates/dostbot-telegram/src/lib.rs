// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for Dostbot, via teloxide.
//!
//! `inbound` converts raw Telegram messages into the channel-agnostic
//! [`dostbot_core::InboundMessage`]; `outbound` delivers router replies,
//! rendering rich mentions in MarkdownV2 with a plain-text fallback.

pub mod inbound;
pub mod markdown;
pub mod outbound;

pub use inbound::to_inbound;
pub use outbound::TelegramSender;
