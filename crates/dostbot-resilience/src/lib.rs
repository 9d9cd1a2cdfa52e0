// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure-tolerant generation dispatch for Dostbot.
//!
//! Holds the pool of interchangeable provider credentials and the bounded
//! retry loop that rotates through them, classifying failures and backing
//! off between attempts so provider-side rate limiting and outages stay
//! invisible to chat users.

pub mod dispatch;
pub mod pool;

pub use dispatch::{Dispatcher, BACKOFF_BASE, MAX_ATTEMPTS};
pub use pool::{KeyPool, INVALID_KEY_COOLDOWN, RATE_LIMIT_COOLDOWN};
