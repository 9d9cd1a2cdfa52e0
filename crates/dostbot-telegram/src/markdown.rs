// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MarkdownV2 escaping for Telegram Bot API.
//!
//! Only the bot's own mention replies are sent with a parse mode; generated
//! text goes out plain. The escaper therefore escapes every special
//! character unconditionally, backticks included.

/// Characters Telegram requires escaping in MarkdownV2 text.
const SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes `text` for use inside a MarkdownV2 message.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
