// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intent state machine.
//!
//! `classify` turns one inbound message into exactly one [`Intent`] via an
//! ordered decision list; first match wins and the order encodes priority.
//! `IntentRouter` executes the matching handler. Moderation pre-empts
//! generation, and the group gate pre-empts the canned intents so a lone
//! "home" in a group never spams the chat.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use dostbot_core::{
    BotIdentity, ChatCompleter, InboundMessage, MentionKind, Reply, Role, TypingIndicator,
};
use dostbot_context::ConversationStore;

use crate::greeting::{self, GreetEngine, GreetTarget};
use crate::moderation;
use crate::stores::{NicknameTable, ProfileStore};

/// Slash commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Reset,
    /// `/nick <name>`, argument text after the command token.
    Nick(String),
    /// A `/command` we do not know.
    Unknown,
    /// A command explicitly addressed to a different bot, e.g.
    /// `/start@otherbot`. Ignored without a reply.
    Foreign,
}

/// The single action chosen for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Command(Command),
    /// "mera naam X" and friends; carries the captured name.
    SetName(String),
    /// "what's my name".
    WhoAmI,
    /// "what's your name" / who made you.
    BotIdentity,
    /// Denylist hit.
    Moderation,
    /// Group message that does not address the bot; greeting-or-silence.
    GroupGate,
    /// "where's the home group".
    HomeQuery,
    /// Current time.
    TimeQuery,
    /// Everything else escalates to generation.
    Generate,
}

/// Phrases that ask the bot who the sender is.
const WHOAMI_PHRASES: &[&str] = &[
    "mera naam kya",
    "what is my name",
    "whats my name",
    "what's my name",
    "my username",
];

/// Phrases that ask about the bot itself.
const IDENTITY_PHRASES: &[&str] = &[
    "tumhara naam",
    "tera naam",
    "your name",
    "who made you",
    "kisne banaya",
];

fn has_word(lower: &str, word: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

/// Captures the name from a name-assignment utterance, or `None` when the
/// text is not one. Matches on normalized word windows so punctuation and
/// case never matter; a "kya"/"what" in the name slot means the sender is
/// asking, not telling, and is rejected here so the self-identity branch
/// can claim it.
fn extract_name(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let norm: Vec<String> = words.iter().map(|w| greeting::normalize_word(w)).collect();

    let name_at = |j: usize| -> Option<String> {
        let raw: String = words
            .get(j)?
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_string();
        if raw.is_empty() || matches!(raw.to_lowercase().as_str(), "kya" | "what") {
            None
        } else {
            Some(raw)
        }
    };
    let word_is = |j: usize, expected: &str| norm.get(j).is_some_and(|w| w == expected);

    for i in 0..norm.len() {
        if word_is(i, "mera")
            && word_is(i + 1, "naam")
            && let Some(name) = name_at(i + 2)
        {
            return Some(name);
        }
        if word_is(i, "my")
            && word_is(i + 1, "name")
            && word_is(i + 2, "is")
            && let Some(name) = name_at(i + 3)
        {
            return Some(name);
        }
        if word_is(i, "set")
            && word_is(i + 1, "my")
            && word_is(i + 2, "name")
            && word_is(i + 3, "to")
            && let Some(name) = name_at(i + 4)
        {
            return Some(name);
        }
    }
    None
}

/// Parses a leading slash command. `None` when the text is not a command.
fn parse_command(text: &str, bot: &BotIdentity) -> Option<Command> {
    let mut parts = text.splitn(2, char::is_whitespace);
    let head = parts.next()?.strip_prefix('/')?;
    let arg = parts.next().unwrap_or("").trim().to_string();

    let (name, suffix) = match head.split_once('@') {
        Some((name, suffix)) => (name, Some(suffix)),
        None => (head, None),
    };
    if let Some(suffix) = suffix
        && !suffix.eq_ignore_ascii_case(&bot.username)
    {
        return Some(Command::Foreign);
    }

    Some(match name.to_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "reset" => Command::Reset,
        "nick" => Command::Nick(arg),
        _ => Command::Unknown,
    })
}

/// Classifies one inbound message. The branch order is the contract:
/// commands, name assignment, self-identity, bot identity, moderation,
/// group gate, canned queries, generation.
pub fn classify(msg: &InboundMessage, bot: &BotIdentity) -> Intent {
    let text = msg.text.trim();
    let lower = text.to_lowercase();

    if let Some(command) = parse_command(text, bot) {
        return Intent::Command(command);
    }
    if let Some(name) = extract_name(text) {
        return Intent::SetName(name);
    }
    if WHOAMI_PHRASES.iter().any(|p| lower.contains(p)) {
        return Intent::WhoAmI;
    }
    if IDENTITY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Intent::BotIdentity;
    }
    if moderation::flags(text) {
        return Intent::Moderation;
    }
    if msg.chat.is_group() && !msg.addresses_bot(bot) {
        return Intent::GroupGate;
    }
    if has_word(&lower, "home") {
        return Intent::HomeQuery;
    }
    if has_word(&lower, "time") || has_word(&lower, "samay") || has_word(&lower, "baje") {
        return Intent::TimeQuery;
    }
    Intent::Generate
}

/// Static configuration the router needs to answer canned intents and to
/// invoke generation.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Assistant persona name used in identity replies.
    pub persona: String,
    /// Who the bot says built it.
    pub owner: String,
    /// Link returned for the home-group query.
    pub home_link: String,
    /// Model identifier forwarded to the completer.
    pub model: String,
    /// The bot's own platform identity for the group gate.
    pub bot: BotIdentity,
}

/// Executes the intent chosen by [`classify`].
///
/// Owns all process-lifetime chat state except the transcript store, which
/// is shared with callers that need to inspect it.
pub struct IntentRouter {
    cfg: RouterConfig,
    store: Arc<ConversationStore>,
    completer: Arc<dyn ChatCompleter>,
    typing: Option<Arc<dyn TypingIndicator>>,
    profiles: ProfileStore,
    nicknames: NicknameTable,
    greeter: GreetEngine,
}

const APOLOGY: &str = "Arre, abhi reply nahi aa paya. Thodi der baad try karo. 🙏";

impl IntentRouter {
    pub fn new(
        cfg: RouterConfig,
        store: Arc<ConversationStore>,
        completer: Arc<dyn ChatCompleter>,
        typing: Option<Arc<dyn TypingIndicator>>,
    ) -> Self {
        Self {
            cfg,
            store,
            completer,
            typing,
            profiles: ProfileStore::new(),
            nicknames: NicknameTable::new(),
            greeter: GreetEngine::new(),
        }
    }

    /// Routes one message to completion. `None` means no outbound reply.
    pub async fn route(&self, msg: &InboundMessage) -> Option<Reply> {
        if msg.text.trim().is_empty() {
            return None;
        }
        let intent = classify(msg, &self.cfg.bot);
        debug!(chat = %msg.chat.id, sender = %msg.sender.id, ?intent, "routing message");

        match intent {
            Intent::Command(command) => self.handle_command(msg, command),
            Intent::SetName(name) => {
                self.profiles.set(msg.sender.id, name.clone());
                Some(Reply::Text(format!(
                    "Theek hai {name}, yaad rakh liya 👍"
                )))
            }
            Intent::WhoAmI => Some(Reply::Text(self.whoami_reply(msg))),
            Intent::BotIdentity => Some(Reply::Text(format!(
                "Main {} hoon, mujhe {} ne banaya hai. 🤖",
                self.cfg.persona, self.cfg.owner
            ))),
            Intent::Moderation => Some(Reply::Mention {
                user: msg.sender.id,
                display: msg.sender.display_name.clone(),
                text: ", aise words mat use karo yaar. 🙏".into(),
            }),
            Intent::GroupGate => self.handle_group_gate(msg),
            Intent::HomeQuery => Some(Reply::Text(format!(
                "Home group yahan hai: {}",
                self.cfg.home_link
            ))),
            Intent::TimeQuery => Some(Reply::Text(self.time_reply(msg))),
            Intent::Generate => Some(self.handle_generate(msg).await),
        }
    }

    fn handle_command(&self, msg: &InboundMessage, command: Command) -> Option<Reply> {
        match command {
            Command::Start => Some(Reply::Text(format!(
                "Namaste! Main {} hoon. Hinglish me baat karo, main reply dunga. /help se commands dekho.",
                self.cfg.persona
            ))),
            Command::Help => Some(Reply::Text(
                "Bas message bhejo, main AI se reply de dunga.\n\
                 /reset se context clear hoga.\n\
                 /nick <naam> se kisi ko nickname do (uske message pe reply karke)."
                    .into(),
            )),
            Command::Reset => {
                self.store.reset(msg.chat.id);
                Some(Reply::Text("Context reset ho gaya.".into()))
            }
            Command::Nick(arg) => Some(self.bind_nickname(msg, &arg)),
            // Unregistered commands and commands aimed at other bots get
            // no reply at all.
            Command::Unknown | Command::Foreign => None,
        }
    }

    fn whoami_reply(&self, msg: &InboundMessage) -> String {
        match self.profiles.get(msg.sender.id) {
            Some(name) => format!("Tumhara naam {name} hai."),
            None => {
                let fallback = msg
                    .sender
                    .username
                    .as_deref()
                    .unwrap_or(&msg.sender.display_name);
                format!("Tumne abhi tak naam nahi bataya! Filhaal: {fallback}")
            }
        }
    }

    /// Binds a nickname in this chat. Target priority: the replied-to user,
    /// then a resolved text mention, then the sender themselves.
    fn bind_nickname(&self, msg: &InboundMessage, arg: &str) -> Reply {
        let nickname = arg
            .split_whitespace()
            .next()
            .map(greeting::normalize_word)
            .unwrap_or_default();
        if nickname.is_empty() {
            return Reply::Text(
                "Aise use karo: /nick <naam> (kisi ke message pe reply karke).".into(),
            );
        }

        let (user, display) = if let Some(reply) = &msg.reply_to
            && let Some(id) = reply.sender
        {
            let display = reply
                .sender_name
                .clone()
                .unwrap_or_else(|| nickname.clone());
            (id, display)
        } else if let Some((id, name)) = msg.mentions.iter().find_map(|m| match &m.kind {
            MentionKind::User { id, name } => Some((*id, name.clone())),
            MentionKind::Handle(_) => None,
        }) {
            (id, name)
        } else {
            (msg.sender.id, msg.sender.display_name.clone())
        };

        self.nicknames.bind(msg.chat.id, &nickname, user, display.clone());
        Reply::Text(format!("Done! Ab se \"{nickname}\" matlab {display}. 😄"))
    }

    fn time_reply(&self, msg: &InboundMessage) -> String {
        let now = chrono::Local::now().format("%I:%M %p, %d %b %Y");
        match &msg.chat.title {
            Some(title) => format!("{title} me abhi time hai: {now}"),
            None => format!("Abhi time hai: {now}"),
        }
    }

    /// The fire-or-ignore greeting path for unaddressed group messages.
    fn handle_group_gate(&self, msg: &InboundMessage) -> Option<Reply> {
        let target = greeting::resolve_target(msg, &self.nicknames)?;
        if !self.greeter.try_fire(msg.chat.id, msg.sender.id, Instant::now()) {
            return None;
        }
        Some(match target {
            GreetTarget::SelfGreeting => Reply::Mention {
                user: msg.sender.id,
                display: msg.sender.display_name.clone(),
                text: ", namaste! 🙏".into(),
            },
            GreetTarget::User { id, name } => Reply::Mention {
                user: id,
                display: name,
                text: ", namaste! 🙏".into(),
            },
            GreetTarget::Handle(handle) => Reply::Text(format!("Namaste @{handle}! 🙏")),
        })
    }

    async fn handle_generate(&self, msg: &InboundMessage) -> Reply {
        if let Some(typing) = &self.typing {
            typing.typing(msg.chat.id).await;
        }

        self.store.append(msg.chat.id, Role::User, msg.text.clone());
        let turns = self.store.snapshot(msg.chat.id);

        match self.completer.complete(&self.cfg.model, &turns).await {
            Ok(text) => {
                self.store
                    .append(msg.chat.id, Role::Assistant, text.clone());
                Reply::Text(text)
            }
            Err(err) => {
                error!(chat = %msg.chat.id, error = %err, "generation failed");
                Reply::Text(APOLOGY.into())
            }
        }
    }
}
