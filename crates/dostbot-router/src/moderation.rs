// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical moderation filter.
//!
//! A fixed denylist matched against whole words of the lowercased text.
//! Purely lexical: no stemming, no context understanding, and no claim of
//! catching everything.

/// Words that trigger the moderation reply (whole-word, case-insensitive).
const DENYLIST: &[&str] = &[
    "chutiya", "bhosdike", "madarchod", "behenchod", "bhenchod", "gandu", "harami", "kamina",
    "saala", "kutte",
];

/// True iff the text contains any denylist entry as a whole word.
pub fn flags(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|word| DENYLIST.contains(&word))
}
