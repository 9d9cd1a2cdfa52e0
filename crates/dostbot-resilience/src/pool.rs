// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Round-robin credential pool with per-key cooldowns.
//!
//! Keys are never removed at runtime, only temporarily disabled: a
//! rate-limited key sits out for tens of seconds, a rejected key for an
//! hour. Selection is deterministic given the blocked-state snapshot, and
//! when every key is blocked the cursor's key is returned anyway so the
//! caller can still make a best-effort attempt.

use std::time::{Duration, Instant};

use tracing::warn;

use dostbot_core::{ApiKey, BotError};

/// Cooldown applied after the provider signals a quota condition.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(30);

/// Cooldown applied after the provider rejects the credential outright.
pub const INVALID_KEY_COOLDOWN: Duration = Duration::from_secs(3600);

struct Slot {
    key: ApiKey,
    blocked_until: Option<Instant>,
}

impl Slot {
    fn usable(&self, now: Instant) -> bool {
        match self.blocked_until {
            Some(until) => now >= until,
            None => true,
        }
    }
}

/// Ordered set of provider credentials plus a rotation cursor.
pub struct KeyPool {
    slots: Vec<Slot>,
    cursor: usize,
}

impl KeyPool {
    /// Builds a pool from the configured secrets. At least one is required.
    pub fn new(secrets: Vec<String>) -> Result<Self, BotError> {
        if secrets.is_empty() {
            return Err(BotError::Config(
                "openrouter credential pool needs at least one api key".into(),
            ));
        }
        let slots = secrets
            .into_iter()
            .enumerate()
            .map(|(id, secret)| Slot {
                key: ApiKey { id, secret },
                blocked_until: None,
            })
            .collect();
        Ok(Self { slots, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns a usable key: the cursor's key if its cooldown has expired,
    /// otherwise the first unblocked key scanning forward with wraparound.
    /// If every key is blocked, the cursor's key is returned regardless.
    pub fn current(&self, now: Instant) -> ApiKey {
        for step in 0..self.slots.len() {
            let idx = (self.cursor + step) % self.slots.len();
            if self.slots[idx].usable(now) {
                return self.slots[idx].key.clone();
            }
        }
        self.slots[self.cursor].key.clone()
    }

    /// Moves the cursor to the next key, wrapping. Applied after every
    /// attempt so load spreads round-robin under contention.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    /// Disables `key_id` for the short rate-limit cooldown and rotates.
    pub fn ban_rate_limited(&mut self, key_id: usize, now: Instant) {
        warn!(key_id, cooldown_secs = RATE_LIMIT_COOLDOWN.as_secs(), "key rate limited");
        self.ban(key_id, now + RATE_LIMIT_COOLDOWN);
    }

    /// Disables `key_id` for the long invalid-credential cooldown and rotates.
    pub fn ban_invalid(&mut self, key_id: usize, now: Instant) {
        warn!(key_id, cooldown_secs = INVALID_KEY_COOLDOWN.as_secs(), "key rejected by provider");
        self.ban(key_id, now + INVALID_KEY_COOLDOWN);
    }

    fn ban(&mut self, key_id: usize, until: Instant) {
        if let Some(slot) = self.slots.get_mut(key_id) {
            slot.blocked_until = Some(until);
        }
        self.advance();
    }

    /// Number of keys currently sitting out a cooldown.
    pub fn blocked_count(&self, now: Instant) -> usize {
        self.slots.iter().filter(|s| !s.usable(now)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> KeyPool {
        KeyPool::new((0..n).map(|i| format!("sk-{i}")).collect()).unwrap()
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert!(KeyPool::new(vec![]).is_err());
    }

    #[test]
    fn current_returns_cursor_key_when_unblocked() {
        let p = pool(3);
        let now = Instant::now();
        assert_eq!(p.current(now).id, 0);
    }

    #[test]
    fn current_always_returns_a_pool_member() {
        let mut p = pool(3);
        let now = Instant::now();
        for _ in 0..10 {
            let key = p.current(now);
            assert!(key.id < 3);
            assert_eq!(key.secret, format!("sk-{}", key.id));
            p.advance();
        }
    }

    #[test]
    fn banned_key_is_skipped_until_cooldown_expires() {
        let mut p = pool(3);
        let now = Instant::now();

        p.ban_invalid(0, now);
        // Cursor advanced past the banned key; key 0 must not come back.
        assert_ne!(p.current(now).id, 0);

        // Within the cooldown window it stays excluded even when the
        // cursor wraps around to it.
        p.advance();
        p.advance();
        assert_eq!(p.blocked_count(now), 1);
        let just_before = now + INVALID_KEY_COOLDOWN - Duration::from_secs(1);
        assert_ne!(p.current(just_before).id, 0);

        // After expiry it becomes selectable again.
        let after = now + INVALID_KEY_COOLDOWN;
        assert_eq!(p.blocked_count(after), 0);
    }

    #[test]
    fn rate_limit_cooldown_is_short() {
        let mut p = pool(2);
        let now = Instant::now();
        p.ban_rate_limited(0, now);
        assert_eq!(p.current(now).id, 1);
        assert_eq!(p.blocked_count(now), 1);
        assert_eq!(p.blocked_count(now + RATE_LIMIT_COOLDOWN), 0);
    }

    #[test]
    fn all_blocked_returns_cursor_key_best_effort() {
        let mut p = pool(2);
        let now = Instant::now();
        p.ban_rate_limited(0, now);
        p.ban_rate_limited(1, now);
        // Every key blocked: current still yields a member for a
        // best-effort attempt.
        let key = p.current(now);
        assert!(key.id < 2);
        assert_eq!(key.id, p.cursor);
    }

    #[test]
    fn advance_wraps() {
        let mut p = pool(2);
        assert_eq!(p.cursor, 0);
        p.advance();
        assert_eq!(p.cursor, 1);
        p.advance();
        assert_eq!(p.cursor, 0);
    }

    #[test]
    fn ban_rotates_the_cursor() {
        let mut p = pool(3);
        let now = Instant::now();
        p.ban_rate_limited(0, now);
        assert_eq!(p.cursor, 1);
        p.ban_invalid(1, now);
        assert_eq!(p.cursor, 2);
    }
}
