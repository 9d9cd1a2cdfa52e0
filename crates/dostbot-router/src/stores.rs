// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owned in-memory stores for sender profiles and nickname bindings.
//!
//! Process-lifetime state, each store behind its own mutex. Keys are never
//! expired; a profile is overwritten by the next "remember my name"
//! utterance, a nickname by the next binding.

use std::collections::HashMap;
use std::sync::Mutex;

use dostbot_core::{ChatId, UserId};

/// Preferred display names, keyed by sender identity.
#[derive(Default)]
pub struct ProfileStore {
    inner: Mutex<HashMap<UserId, String>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user: UserId, name: impl Into<String>) {
        self.inner
            .lock()
            .expect("profile lock poisoned")
            .insert(user, name.into());
    }

    pub fn get(&self, user: UserId) -> Option<String> {
        self.inner
            .lock()
            .expect("profile lock poisoned")
            .get(&user)
            .cloned()
    }
}

/// A nickname bound to a user within one chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicknameEntry {
    pub user: UserId,
    pub display: String,
}

/// Per-chat lowercase nickname bindings, populated by the explicit `/nick`
/// binding operation and consulted by the greeting resolver.
#[derive(Default)]
pub struct NicknameTable {
    inner: Mutex<HashMap<ChatId, HashMap<String, NicknameEntry>>>,
}

impl NicknameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `nickname` (lowercased) to `user` in `chat`, replacing any
    /// previous binding of the same nickname.
    pub fn bind(&self, chat: ChatId, nickname: &str, user: UserId, display: impl Into<String>) {
        self.inner
            .lock()
            .expect("nickname lock poisoned")
            .entry(chat)
            .or_default()
            .insert(
                nickname.to_lowercase(),
                NicknameEntry {
                    user,
                    display: display.into(),
                },
            );
    }

    pub fn lookup(&self, chat: ChatId, nickname: &str) -> Option<NicknameEntry> {
        self.inner
            .lock()
            .expect("nickname lock poisoned")
            .get(&chat)
            .and_then(|table| table.get(&nickname.to_lowercase()))
            .cloned()
    }
}
