// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry loop over the credential pool.
//!
//! Wraps a single generation call: each attempt draws the pool's current
//! key, and failures are classified to decide how the pool reacts and
//! whether a backoff sleep is owed before the next attempt. A fatal error
//! aborts immediately; exhausting the attempt budget surfaces the last
//! observed error.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use dostbot_core::{ChatCompleter, CompletionError, KeyedCompleter, Turn};

use crate::pool::KeyPool;

/// Fixed attempt budget per generation call.
pub const MAX_ATTEMPTS: u32 = 6;

/// Multiplicative backoff base in seconds. The schedule is deterministic,
/// so a fully failing call has a bounded wall time.
pub const BACKOFF_BASE: f64 = 1.5;

/// Resilient dispatcher: one provider, one pool, a fixed retry budget.
pub struct Dispatcher<P> {
    provider: P,
    pool: Mutex<KeyPool>,
}

impl<P: KeyedCompleter> Dispatcher<P> {
    pub fn new(provider: P, pool: KeyPool) -> Self {
        Self {
            provider,
            pool: Mutex::new(pool),
        }
    }

    /// Executes one generation call, rotating credentials and backing off
    /// until success, a non-retryable error, or an exhausted budget.
    pub async fn complete(&self, model: &str, turns: &[Turn]) -> Result<String, CompletionError> {
        let mut last_error = None;

        for attempt in 0..MAX_ATTEMPTS {
            let key = self.pool.lock().await.current(Instant::now());
            debug!(attempt, key_id = key.id, "generation attempt");

            match self.provider.complete(&key, model, turns).await {
                Ok(text) => {
                    self.pool.lock().await.advance();
                    return Ok(text);
                }
                Err(CompletionError::RateLimited(msg)) => {
                    self.pool.lock().await.ban_rate_limited(key.id, Instant::now());
                    warn!(attempt, key_id = key.id, %msg, "rate limited, backing off");
                    tokio::time::sleep(backoff_delay(attempt)).await;
                    last_error = Some(CompletionError::RateLimited(msg));
                }
                Err(CompletionError::Unauthorized(msg)) => {
                    // Another key is likely fine; rotate without sleeping.
                    self.pool.lock().await.ban_invalid(key.id, Instant::now());
                    warn!(attempt, key_id = key.id, %msg, "key rejected, rotating");
                    last_error = Some(CompletionError::Unauthorized(msg));
                }
                Err(CompletionError::Transient(msg)) => {
                    self.pool.lock().await.advance();
                    warn!(attempt, key_id = key.id, %msg, "transient failure, backing off");
                    tokio::time::sleep(backoff_delay(attempt)).await;
                    last_error = Some(CompletionError::Transient(msg));
                }
                Err(fatal @ CompletionError::Fatal(_)) => {
                    // Retrying cannot help; surface immediately.
                    return Err(fatal);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CompletionError::Fatal("attempt budget exhausted without an attempt".into())
        }))
    }

    /// Snapshot accessor for the pool, used by wiring and tests.
    pub async fn with_pool<R>(&self, f: impl FnOnce(&KeyPool) -> R) -> R {
        let pool = self.pool.lock().await;
        f(&pool)
    }
}

#[async_trait]
impl<P: KeyedCompleter> ChatCompleter for Dispatcher<P> {
    async fn complete(&self, model: &str, turns: &[Turn]) -> Result<String, CompletionError> {
        Dispatcher::complete(self, model, turns).await
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs_f64(BACKOFF_BASE.powi(attempt as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dostbot_test_utils::ScriptedProvider;

    fn pool(n: usize) -> KeyPool {
        KeyPool::new((0..n).map(|i| format!("sk-{i}")).collect()).unwrap()
    }

    fn turns() -> Vec<Turn> {
        vec![Turn::system("be brief"), Turn::user("hi")]
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt() {
        let provider = ScriptedProvider::new(vec![Ok("namaste".into())]);
        let dispatcher = Dispatcher::new(provider, pool(2));

        let text = dispatcher.complete("test-model", &turns()).await.unwrap();
        assert_eq!(text, "namaste");
        assert_eq!(dispatcher.with_pool(|p| p.blocked_count(Instant::now())).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn two_rate_limits_then_success_bans_two_keys() {
        let provider = ScriptedProvider::new(vec![
            Err(CompletionError::RateLimited("quota".into())),
            Err(CompletionError::RateLimited("quota".into())),
            Ok("done".into()),
        ]);
        let dispatcher = Dispatcher::new(provider, pool(3));

        let text = dispatcher.complete("test-model", &turns()).await.unwrap();
        assert_eq!(text, "done");
        // Exactly two keys consumed a ban; no further attempts were made.
        assert_eq!(dispatcher.with_pool(|p| p.blocked_count(Instant::now())).await, 2);
        assert_eq!(dispatcher.provider.calls().await.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_rotates_without_reusing_the_key() {
        let provider = ScriptedProvider::new(vec![
            Err(CompletionError::Unauthorized("bad key".into())),
            Ok("ok".into()),
        ]);
        let dispatcher = Dispatcher::new(provider, pool(2));

        dispatcher.complete("test-model", &turns()).await.unwrap();
        let calls = dispatcher.provider.calls().await;
        assert_eq!(calls, vec![0, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_aborts_immediately() {
        let provider = ScriptedProvider::new(vec![
            Err(CompletionError::Fatal("unknown model".into())),
            Ok("never reached".into()),
        ]);
        let dispatcher = Dispatcher::new(provider, pool(2));

        let err = dispatcher.complete("bad-model", &turns()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Fatal(_)));
        assert_eq!(dispatcher.provider.calls().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_surfaces_last_error() {
        let script: Vec<Result<String, CompletionError>> = (0..MAX_ATTEMPTS)
            .map(|i| Err(CompletionError::Transient(format!("attempt {i}"))))
            .collect();
        let provider = ScriptedProvider::new(script);
        let dispatcher = Dispatcher::new(provider, pool(2));

        let err = dispatcher.complete("test-model", &turns()).await.unwrap_err();
        match err {
            CompletionError::Transient(msg) => {
                assert_eq!(msg, format!("attempt {}", MAX_ATTEMPTS - 1));
            }
            other => panic!("expected Transient, got {other:?}"),
        }
        assert_eq!(dispatcher.provider.calls().await.len(), MAX_ATTEMPTS as usize);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_spread_across_keys() {
        let provider = ScriptedProvider::new(vec![
            Err(CompletionError::Transient("503".into())),
            Err(CompletionError::Transient("503".into())),
            Ok("ok".into()),
        ]);
        let dispatcher = Dispatcher::new(provider, pool(3));

        dispatcher.complete("test-model", &turns()).await.unwrap();
        assert_eq!(dispatcher.provider.calls().await, vec![0, 1, 2]);
    }

    #[test]
    fn backoff_is_multiplicative() {
        assert_eq!(backoff_delay(0), Duration::from_secs_f64(1.0));
        assert!(backoff_delay(3) > backoff_delay(2));
        assert_eq!(backoff_delay(2), Duration::from_secs_f64(2.25));
    }
}
