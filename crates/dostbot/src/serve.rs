// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot startup and the long-polling message loop.
//!
//! Wires the configuration into the concrete stack: key pool, OpenRouter
//! client, resilient dispatcher, conversation store, intent router, and
//! the Telegram transport. Each inbound message is processed on its own
//! task so a slow generation call never stalls polling.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info};

use dostbot_config::DostbotConfig;
use dostbot_core::{BotError, BotIdentity, ChatCompleter, TypingIndicator, UserId};
use dostbot_context::ConversationStore;
use dostbot_openrouter::OpenRouterClient;
use dostbot_resilience::{Dispatcher as ResilientDispatcher, KeyPool};
use dostbot_router::{IntentRouter, RouterConfig};
use dostbot_telegram::{inbound, TelegramSender};

/// Runs the bot until the polling loop terminates (ctrl-c).
pub async fn run(config: DostbotConfig) -> Result<(), BotError> {
    let token = config
        .telegram
        .bot_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BotError::Config("telegram.bot_token is required for serve".into()))?;

    let bot = Bot::new(token);
    let me = bot.get_me().await.map_err(|err| BotError::Channel {
        message: format!("getMe failed: {err}"),
        source: Some(Box::new(err)),
    })?;
    let identity = BotIdentity {
        id: UserId(me.user.id.0),
        username: me.user.username.clone().unwrap_or_default(),
    };
    info!(username = %identity.username, "connected to Telegram");

    let pool = KeyPool::new(config.openrouter.pool_keys())?;
    let provider = OpenRouterClient::new(&config.openrouter.site_url, &config.openrouter.site_name)?;
    let dispatcher: Arc<dyn ChatCompleter> = Arc::new(ResilientDispatcher::new(provider, pool));

    let store = Arc::new(ConversationStore::new(config.agent.preamble()));
    let sender = TelegramSender::new(bot.clone());
    let typing: Arc<dyn TypingIndicator> = Arc::new(sender.clone());

    let router = Arc::new(IntentRouter::new(
        RouterConfig {
            persona: config.agent.name.clone(),
            owner: config.agent.owner.clone(),
            home_link: config.chat.home_group_link.clone(),
            model: config.openrouter.model.clone(),
            bot: identity.clone(),
        },
        store,
        dispatcher,
        Some(typing),
    ));

    info!("starting Telegram long polling");

    let handler = Update::filter_message().endpoint(move |msg: Message| {
        let router = Arc::clone(&router);
        let sender = sender.clone();
        let identity = identity.clone();
        async move {
            if let Some(msg) = inbound::to_inbound(&msg, &identity) {
                // One task per message; a slow dispatch must not block
                // polling or other chats.
                tokio::spawn(async move {
                    let chat = msg.chat.id;
                    if let Some(reply) = router.route(&msg).await
                        && let Err(err) = sender.deliver(chat, &reply).await
                    {
                        error!(chat = %chat, error = %err, "failed to deliver reply");
                    }
                });
            }
            respond(())
        }
    });

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {}) // Silently ignore non-message updates
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
