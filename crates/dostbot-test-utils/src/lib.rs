// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completer implementations for deterministic, CI-runnable tests
//! without external API calls.

pub mod mock_completer;

pub use mock_completer::{MockCompleter, ScriptedProvider};
