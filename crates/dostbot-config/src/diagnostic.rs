// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics rendered through miette.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A semantic validation failure for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(dostbot::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// A deserialization or merge failure reported by Figment.
    #[error("configuration error: {0}")]
    #[diagnostic(
        code(dostbot::config::parse),
        help("check dostbot.toml and DOSTBOT_* environment variables")
    )]
    Parse(String),
}

/// Convert a `figment::Error` (which may hold several errors) into
/// diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse(e.to_string()))
        .collect()
}

/// Render all errors to stderr via miette's fancy report formatting.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        let report = miette::Report::msg(format!("{error}"));
        eprintln!("{report:?}");
        if let Some(help) = error.help() {
            eprintln!("  help: {help}");
        }
    }
}
