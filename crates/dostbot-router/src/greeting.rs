// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-gated group greetings.
//!
//! A message whose first word is a salutation may trigger a canned greeting
//! even when the bot was not addressed. Two gates bound the chatter: a
//! per-sender cooldown within each chat and a shorter per-chat debounce.
//! Both are checked and stamped atomically so concurrent messages cannot
//! double-fire.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use dostbot_core::{ChatId, InboundMessage, MentionKind, UserId};

use crate::stores::NicknameTable;

/// Minimum gap between greetings aimed at the same sender in one chat.
pub const USER_COOLDOWN: Duration = Duration::from_secs(60);
/// Minimum gap between any two greetings in one chat.
pub const CHAT_DEBOUNCE: Duration = Duration::from_secs(20);

/// Salutations recognized as the first word of a message.
const GREETING_WORDS: &[&str] = &[
    "hi", "hii", "hiii", "hello", "hey", "namaste", "namaskar", "yo", "hola", "oye",
];

/// Lowercases and strips everything non-alphanumeric, so "Hello!!" and
/// "hello" compare equal.
pub(crate) fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True iff the first word of `text` normalizes to a known salutation.
pub fn is_greeting(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .map(normalize_word)
        .is_some_and(|w| GREETING_WORDS.contains(&w.as_str()))
}

/// Whom a greeting message is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreetTarget {
    /// No target named; the sender themselves gets greeted back.
    SelfGreeting,
    /// A concrete user, resolved from a rich mention or a nickname.
    User { id: UserId, name: String },
    /// A bare `@handle` with no user identity attached.
    Handle(String),
}

/// Resolves the target of a greeting message.
///
/// Returns `None` when the message does not open with a salutation.
/// Otherwise picks, in priority order: a rich mention carrying a user id,
/// then a plain `@handle` mention, then a nickname bound in this chat to
/// the word after the salutation, and finally the sender themselves.
pub fn resolve_target(msg: &InboundMessage, nicknames: &NicknameTable) -> Option<GreetTarget> {
    if !is_greeting(&msg.text) {
        return None;
    }

    for mention in &msg.mentions {
        if let MentionKind::User { id, name } = &mention.kind {
            return Some(GreetTarget::User {
                id: *id,
                name: name.clone(),
            });
        }
    }
    for mention in &msg.mentions {
        if let MentionKind::Handle(handle) = &mention.kind {
            return Some(GreetTarget::Handle(handle.clone()));
        }
    }

    if let Some(second) = msg.text.split_whitespace().nth(1) {
        let word = normalize_word(second);
        if !word.is_empty()
            && let Some(entry) = nicknames.lookup(msg.chat.id, &word)
        {
            return Some(GreetTarget::User {
                id: entry.user,
                name: entry.display,
            });
        }
    }

    Some(GreetTarget::SelfGreeting)
}

#[derive(Default)]
struct Gates {
    per_user: HashMap<(ChatId, UserId), Instant>,
    per_chat: HashMap<ChatId, Instant>,
}

/// Tracks greeting timestamps and enforces both gates.
#[derive(Default)]
pub struct GreetEngine {
    gates: Mutex<Gates>,
}

impl GreetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and stamps both gates if a greeting may fire now for
    /// this (chat, sender) pair. A single lock covers check and stamp.
    pub fn try_fire(&self, chat: ChatId, sender: UserId, now: Instant) -> bool {
        let mut gates = self.gates.lock().expect("greeting lock poisoned");

        if let Some(last) = gates.per_user.get(&(chat, sender))
            && now.duration_since(*last) < USER_COOLDOWN
        {
            return false;
        }
        if let Some(last) = gates.per_chat.get(&chat)
            && now.duration_since(*last) < CHAT_DEBOUNCE
        {
            return false;
        }

        gates.per_user.insert((chat, sender), now);
        gates.per_chat.insert(chat, now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dostbot_core::{ChatKind, ChatRef, Mention, Sender};

    fn group_msg(text: &str) -> InboundMessage {
        InboundMessage {
            chat: ChatRef {
                id: ChatId(-100),
                kind: ChatKind::Group,
                title: Some("Adda".into()),
            },
            sender: Sender {
                id: UserId(7),
                display_name: "Priya".into(),
                username: Some("priya".into()),
            },
            text: text.into(),
            reply_to: None,
            mentions: Vec::new(),
        }
    }

    #[test]
    fn first_word_greeting_detection() {
        assert!(is_greeting("hello everyone"));
        assert!(is_greeting("Namaste!"));
        assert!(is_greeting("HII"));
        assert!(!is_greeting("well hello"));
        assert!(!is_greeting("highway to hell"));
        assert!(!is_greeting(""));
    }

    #[test]
    fn no_target_means_self_greeting() {
        let nicknames = NicknameTable::new();
        let target = resolve_target(&group_msg("hello sab log"), &nicknames);
        assert_eq!(target, Some(GreetTarget::SelfGreeting));
    }

    #[test]
    fn non_greeting_resolves_to_none() {
        let nicknames = NicknameTable::new();
        assert!(resolve_target(&group_msg("kya chal raha hai"), &nicknames).is_none());
    }

    #[test]
    fn rich_mention_beats_handle_and_nickname() {
        let nicknames = NicknameTable::new();
        nicknames.bind(ChatId(-100), "raju", UserId(50), "Rajesh");

        let mut msg = group_msg("hi raju @someone");
        msg.mentions = vec![
            Mention {
                offset: 8,
                length: 8,
                kind: MentionKind::Handle("someone".into()),
            },
            Mention {
                offset: 3,
                length: 4,
                kind: MentionKind::User {
                    id: UserId(42),
                    name: "Amit".into(),
                },
            },
        ];
        assert_eq!(
            resolve_target(&msg, &nicknames),
            Some(GreetTarget::User {
                id: UserId(42),
                name: "Amit".into()
            })
        );
    }

    #[test]
    fn handle_mention_without_identity() {
        let nicknames = NicknameTable::new();
        let mut msg = group_msg("hey @dost_ka_dost");
        msg.mentions = vec![Mention {
            offset: 4,
            length: 13,
            kind: MentionKind::Handle("dost_ka_dost".into()),
        }];
        assert_eq!(
            resolve_target(&msg, &nicknames),
            Some(GreetTarget::Handle("dost_ka_dost".into()))
        );
    }

    #[test]
    fn second_word_nickname_resolves() {
        let nicknames = NicknameTable::new();
        nicknames.bind(ChatId(-100), "raju", UserId(50), "Rajesh");

        assert_eq!(
            resolve_target(&group_msg("namaste Raju!"), &nicknames),
            Some(GreetTarget::User {
                id: UserId(50),
                name: "Rajesh".into()
            })
        );
    }

    #[test]
    fn gates_block_then_release() {
        let engine = GreetEngine::new();
        let chat = ChatId(-1);
        let t0 = Instant::now();

        assert!(engine.try_fire(chat, UserId(1), t0));
        // Chat debounce blocks a different sender right away.
        assert!(!engine.try_fire(chat, UserId(2), t0 + Duration::from_secs(5)));
        // After the debounce the other sender may fire.
        assert!(engine.try_fire(chat, UserId(2), t0 + Duration::from_secs(21)));
        // The first sender is still inside the per-user cooldown.
        assert!(!engine.try_fire(chat, UserId(1), t0 + Duration::from_secs(45)));
        assert!(engine.try_fire(chat, UserId(1), t0 + Duration::from_secs(61)));
    }

    #[test]
    fn gates_are_per_chat() {
        let engine = GreetEngine::new();
        let t0 = Instant::now();
        assert!(engine.try_fire(ChatId(-1), UserId(1), t0));
        assert!(engine.try_fire(ChatId(-2), UserId(1), t0));
    }

    #[test]
    fn failed_attempt_does_not_stamp() {
        let engine = GreetEngine::new();
        let chat = ChatId(-1);
        let t0 = Instant::now();

        assert!(engine.try_fire(chat, UserId(1), t0));
        assert!(!engine.try_fire(chat, UserId(2), t0 + Duration::from_secs(10)));
        // The blocked attempt must not have refreshed the chat debounce.
        assert!(engine.try_fire(chat, UserId(2), t0 + Duration::from_secs(21)));
    }
}
