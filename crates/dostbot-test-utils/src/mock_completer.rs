// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned-response completers.
//!
//! `MockCompleter` stands in for the full dispatcher in router tests;
//! `ScriptedProvider` stands in for the OpenRouter adapter in dispatcher
//! tests, replaying a fixed outcome script and recording which key each
//! attempt used.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dostbot_core::{ApiKey, ChatCompleter, CompletionError, KeyedCompleter, Turn};

/// A mock `ChatCompleter` that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" text is returned. Every call's transcript is
/// recorded for assertion.
pub struct MockCompleter {
    responses: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    requests: Arc<Mutex<Vec<Vec<Turn>>>>,
}

impl MockCompleter {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        let queue = responses.into_iter().map(Ok).collect();
        Self {
            responses: Arc::new(Mutex::new(queue)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a failure outcome.
    pub async fn push_error(&self, err: CompletionError) {
        self.responses.lock().await.push_back(Err(err));
    }

    /// Transcripts passed to `complete`, in call order.
    pub async fn requests(&self) -> Vec<Vec<Turn>> {
        self.requests.lock().await.clone()
    }

    /// Number of completion calls made so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockCompleter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatCompleter for MockCompleter {
    async fn complete(&self, _model: &str, turns: &[Turn]) -> Result<String, CompletionError> {
        self.requests.lock().await.push(turns.to_vec());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

/// A scripted `KeyedCompleter` replaying fixed outcomes in order.
///
/// Records the id of the key used for each attempt. When the script is
/// exhausted, further calls fail fatally so runaway retry loops show up
/// as test failures.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Key ids used per attempt, in order.
    pub async fn calls(&self) -> Vec<usize> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl KeyedCompleter for ScriptedProvider {
    async fn complete(
        &self,
        key: &ApiKey,
        _model: &str,
        _turns: &[Turn],
    ) -> Result<String, CompletionError> {
        self.calls.lock().await.push(key.id);
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Fatal("script exhausted".into())))
    }
}
