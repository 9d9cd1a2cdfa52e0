// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-chat conversation transcripts.
//!
//! Each chat's transcript starts with one pinned system turn carrying the
//! assistant persona preamble. The retained length is capped; eviction is
//! FIFO over the oldest non-system turns, so the preamble survives any
//! amount of traffic. State is process-lifetime only.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use dostbot_core::{ChatId, Role, Turn};

/// Maximum retained turns per chat, the pinned system turn included.
pub const HISTORY_CAP: usize = 48;

/// Owned store of per-chat transcripts, guarded by one mutex.
///
/// Concurrent appends for the same chat are a realistic race (two group
/// members talking at once), so all access goes through the lock.
pub struct ConversationStore {
    preamble: String,
    transcripts: Mutex<HashMap<ChatId, Vec<Turn>>>,
}

impl ConversationStore {
    /// `preamble` is the system turn every transcript starts with.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
            transcripts: Mutex::new(HashMap::new()),
        }
    }

    /// Appends one turn, initializing the transcript with the system
    /// preamble on first use and enforcing the retention cap.
    pub fn append(&self, chat: ChatId, role: Role, content: impl Into<String>) {
        let mut transcripts = self.transcripts.lock().expect("transcript lock poisoned");
        let turns = transcripts
            .entry(chat)
            .or_insert_with(|| vec![Turn::system(self.preamble.clone())]);
        turns.push(Turn {
            role,
            content: content.into(),
        });
        // FIFO eviction of the oldest non-system turns; index 0 is pinned.
        while turns.len() > HISTORY_CAP {
            turns.remove(1);
        }
    }

    /// Ordered copy of the chat's transcript. A chat with no history yet
    /// yields just the system preamble.
    pub fn snapshot(&self, chat: ChatId) -> Vec<Turn> {
        let transcripts = self.transcripts.lock().expect("transcript lock poisoned");
        transcripts
            .get(&chat)
            .cloned()
            .unwrap_or_else(|| vec![Turn::system(self.preamble.clone())])
    }

    /// Drops the chat's transcript entirely; the next `append` reinitializes
    /// it. Returns whether anything was stored.
    pub fn reset(&self, chat: ChatId) -> bool {
        let removed = self
            .transcripts
            .lock()
            .expect("transcript lock poisoned")
            .remove(&chat)
            .is_some();
        debug!(chat = %chat, removed, "transcript reset");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(42);

    fn store() -> ConversationStore {
        ConversationStore::new("Respond concisely in Hinglish.")
    }

    #[test]
    fn first_append_initializes_with_system_preamble() {
        let s = store();
        s.append(CHAT, Role::User, "hi");

        let turns = s.snapshot(CHAT);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[0].content, "Respond concisely in Hinglish.");
        assert_eq!(turns.last().unwrap(), &Turn::user("hi"));
    }

    #[test]
    fn snapshot_of_unknown_chat_is_preamble_only() {
        let s = store();
        let turns = s.snapshot(ChatId(999));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::System);
    }

    #[test]
    fn cap_never_exceeded_and_preamble_survives() {
        let s = store();
        for i in 0..200 {
            s.append(CHAT, Role::User, format!("msg {i}"));
            s.append(CHAT, Role::Assistant, format!("reply {i}"));
        }

        let turns = s.snapshot(CHAT);
        assert_eq!(turns.len(), HISTORY_CAP);
        assert_eq!(turns[0].role, Role::System);
        // The newest turn is retained; eviction dropped the oldest.
        assert_eq!(turns.last().unwrap().content, "reply 199");
        assert!(!turns.iter().skip(1).any(|t| t.role == Role::System));
    }

    #[test]
    fn eviction_is_fifo_on_non_system_turns() {
        let s = store();
        for i in 0..HISTORY_CAP + 5 {
            s.append(CHAT, Role::User, format!("m{i}"));
        }
        let turns = s.snapshot(CHAT);
        // Turns m0..m5 were evicted (cap includes the system turn).
        assert_eq!(turns[1].content, "m6");
    }

    #[test]
    fn reset_drops_and_reinitializes() {
        let s = store();
        s.append(CHAT, Role::User, "hello");
        assert!(s.reset(CHAT));
        assert!(!s.reset(CHAT));

        s.append(CHAT, Role::User, "fresh start");
        let turns = s.snapshot(CHAT);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].content, "fresh start");
    }

    #[test]
    fn chats_are_isolated() {
        let s = store();
        s.append(ChatId(1), Role::User, "one");
        s.append(ChatId(2), Role::User, "two");
        assert_eq!(s.snapshot(ChatId(1))[1].content, "one");
        assert_eq!(s.snapshot(ChatId(2))[1].content, "two");
    }
}
