// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of raw Telegram messages into channel-agnostic inbound
//! messages.
//!
//! Telegram annotates mentions as entities with UTF-16 offsets into the
//! message text; conversion resolves those to byte spans and keeps only
//! the two entity kinds the router cares about: plain `@handle` mentions
//! and text mentions carrying a resolved user.

use teloxide::types::{ChatKind as TgChatKind, Message, MessageEntityKind};
use tracing::debug;

use dostbot_core::{
    BotIdentity, ChatId, ChatKind, ChatRef, InboundMessage, Mention, MentionKind, ReplyRef,
    Sender, UserId,
};

/// Maps a UTF-16 code-unit span onto byte indices into `text`.
fn utf16_span(text: &str, offset: usize, length: usize) -> Option<(usize, usize)> {
    let mut units = 0;
    let mut byte_start = None;
    let mut byte_end = None;
    for (i, ch) in text.char_indices() {
        if units == offset {
            byte_start = Some(i);
        }
        units += ch.len_utf16();
        if byte_start.is_some() && units == offset + length {
            byte_end = Some(i + ch.len_utf8());
            break;
        }
    }
    Some((byte_start?, byte_end?))
}

fn collect_mentions(msg: &Message, text: &str) -> Vec<Mention> {
    let mut mentions = Vec::new();
    for entity in msg.entities().unwrap_or_default() {
        let Some((start, end)) = utf16_span(text, entity.offset, entity.length) else {
            debug!(offset = entity.offset, "entity span out of bounds, skipping");
            continue;
        };
        match &entity.kind {
            MessageEntityKind::Mention => {
                let handle = text[start..end].trim_start_matches('@').to_string();
                mentions.push(Mention {
                    offset: start,
                    length: end - start,
                    kind: MentionKind::Handle(handle),
                });
            }
            MessageEntityKind::TextMention { user } => {
                mentions.push(Mention {
                    offset: start,
                    length: end - start,
                    kind: MentionKind::User {
                        id: UserId(user.id.0),
                        name: user.full_name(),
                    },
                });
            }
            _ => {}
        }
    }
    mentions
}

/// Converts a Telegram message into an [`InboundMessage`].
///
/// Returns `None` for messages the bot never processes: non-text messages,
/// messages without a sender (channel posts), and messages authored by
/// bots, its own included.
pub fn to_inbound(msg: &Message, bot: &BotIdentity) -> Option<InboundMessage> {
    let text = msg.text()?.to_string();
    let from = msg.from.as_ref()?;
    if from.is_bot {
        return None;
    }

    let kind = if matches!(msg.chat.kind, TgChatKind::Private(_)) {
        ChatKind::Private
    } else {
        ChatKind::Group
    };

    let reply_to = msg.reply_to_message().map(|replied| {
        let sender = replied.from.as_ref();
        ReplyRef {
            sender: sender.map(|u| UserId(u.id.0)),
            sender_name: sender.map(|u| u.full_name()),
            from_bot: sender.is_some_and(|u| u.id.0 == bot.id.0),
        }
    });

    let mentions = collect_mentions(msg, &text);

    Some(InboundMessage {
        chat: ChatRef {
            id: ChatId(msg.chat.id.0),
            kind,
            title: msg.chat.title().map(str::to_string),
        },
        sender: Sender {
            id: UserId(from.id.0),
            display_name: from.full_name(),
            username: from.username.clone(),
        },
        text,
        reply_to,
        mentions,
    })
}
