// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery of router replies back into Telegram.
//!
//! Plain replies go out with no parse mode. Mention replies render a
//! `tg://user` deep link in MarkdownV2; if Telegram rejects the markup the
//! reply is re-sent as plain text, so a formatting problem never costs the
//! user their answer.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId as TgChatId, ParseMode, Recipient};
use tracing::{debug, warn};

use dostbot_core::{BotError, ChatId, Reply, TypingIndicator, UserId};

use crate::markdown::escape_markdown_v2;

/// Renders the MarkdownV2 body for a mention reply.
fn mention_body(user: UserId, display: &str, text: &str) -> String {
    format!(
        "[{}](tg://user?id={user}){}",
        escape_markdown_v2(display),
        escape_markdown_v2(text)
    )
}

/// Sends router replies and typing hints through one teloxide bot handle.
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Delivers one reply to `chat`.
    pub async fn deliver(&self, chat: ChatId, reply: &Reply) -> Result<(), BotError> {
        match reply {
            Reply::Text(text) => self.send_plain(chat, text).await,
            Reply::Mention {
                user,
                display,
                text,
            } => {
                let body = mention_body(*user, display, text);
                let sent = self
                    .bot
                    .send_message(Recipient::Id(TgChatId(chat.0)), &body)
                    .parse_mode(ParseMode::MarkdownV2)
                    .await;
                match sent {
                    Ok(_) => Ok(()),
                    Err(err) => {
                        warn!(error = %err, "rich mention failed, sending plain text");
                        self.send_plain(chat, &reply.plain_text()).await
                    }
                }
            }
        }
    }

    async fn send_plain(&self, chat: ChatId, text: &str) -> Result<(), BotError> {
        self.bot
            .send_message(Recipient::Id(TgChatId(chat.0)), text)
            .await
            .map(|_| ())
            .map_err(|err| BotError::Channel {
                message: format!("failed to send message: {err}"),
                source: Some(Box::new(err)),
            })
    }
}

#[async_trait]
impl TypingIndicator for TelegramSender {
    /// Fire-and-forget; a failed typing hint is logged and swallowed.
    async fn typing(&self, chat: ChatId) {
        if let Err(err) = self
            .bot
            .send_chat_action(TgChatId(chat.0), ChatAction::Typing)
            .await
        {
            debug!(error = %err, "typing indicator failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_body_links_and_escapes() {
        let body = mention_body(UserId(50), "Raju (boss)", ", namaste!");
        assert_eq!(body, "[Raju \\(boss\\)](tg://user?id=50), namaste\\!");
    }

    #[test]
    fn plain_fallback_matches_reply_rendering() {
        let reply = Reply::Mention {
            user: UserId(50),
            display: "Raju".into(),
            text: ", namaste!".into(),
        };
        assert_eq!(reply.plain_text(), "Raju, namaste!");
    }
}
