// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Dostbot workspace.

use serde::{Deserialize, Serialize};

/// Telegram chat identifier (negative for groups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Telegram user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a conversation turn, serialized in the wire format the
/// chat-completions API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a per-chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Whether a chat is a one-on-one conversation or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
}

/// The chat a message arrived in.
#[derive(Debug, Clone)]
pub struct ChatRef {
    pub id: ChatId,
    pub kind: ChatKind,
    /// Group title, if the chat has one.
    pub title: Option<String>,
}

impl ChatRef {
    pub fn is_group(&self) -> bool {
        self.kind == ChatKind::Group
    }
}

/// The sender of an inbound message.
#[derive(Debug, Clone)]
pub struct Sender {
    pub id: UserId,
    pub display_name: String,
    pub username: Option<String>,
}

/// A structured mention annotation attached to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionKind {
    /// A plain `@handle` mention; the handle text without the `@`.
    Handle(String),
    /// A mention resolved by the platform to a concrete user.
    User { id: UserId, name: String },
}

/// A mention with its position in the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// Byte offset into the message text.
    pub offset: usize,
    pub length: usize,
    pub kind: MentionKind,
}

/// Metadata about the message this message replies to.
#[derive(Debug, Clone)]
pub struct ReplyRef {
    pub sender: Option<UserId>,
    pub sender_name: Option<String>,
    /// True when the replied-to message was sent by the bot itself.
    pub from_bot: bool,
}

/// A channel-agnostic inbound text message.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat: ChatRef,
    pub sender: Sender,
    pub text: String,
    pub reply_to: Option<ReplyRef>,
    pub mentions: Vec<Mention>,
}

impl InboundMessage {
    /// True when the message either replies to the bot's own message or
    /// mentions the bot explicitly. Group chats require one of these
    /// signals before free-form generation.
    pub fn addresses_bot(&self, bot: &BotIdentity) -> bool {
        if self.reply_to.as_ref().is_some_and(|r| r.from_bot) {
            return true;
        }
        self.mentions.iter().any(|m| match &m.kind {
            MentionKind::User { id, .. } => *id == bot.id,
            MentionKind::Handle(handle) => handle.eq_ignore_ascii_case(&bot.username),
        })
    }
}

/// The bot's own platform identity, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub id: UserId,
    pub username: String,
}

/// An outbound reply produced by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text.
    Text(String),
    /// Text prefixed with a rendered mention of `user`. Transports that
    /// cannot render rich mentions fall back to the display name.
    Mention {
        user: UserId,
        display: String,
        text: String,
    },
}

impl Reply {
    /// Plain-text rendition, used by transports as the rich-format fallback.
    pub fn plain_text(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Mention { display, text, .. } => format!("{display}{text}"),
        }
    }
}

/// One credential usable against the generation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Stable index within the owning pool.
    pub id: usize,
    pub secret: String,
}
