// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing for Dostbot.
//!
//! Classifies each inbound text message into exactly one intent via an
//! ordered decision list (first match wins) and executes the matching
//! handler: profile updates, canned answers, moderation notices,
//! rate-gated greetings, or escalation to generation.

pub mod greeting;
pub mod moderation;
pub mod router;
pub mod stores;

pub use router::{Intent, IntentRouter, RouterConfig};
