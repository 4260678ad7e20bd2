// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error kinds shared by every tool response.
//!
//! Agent-visible messages are phrased to be self-correcting ("Did you mean
//! 'X'?", "Available arguments: …"); the kind tells the agent which class of
//! mistake to fix.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Name, type, argument, or value-shape problems.
    Validation,
    /// Field/argument/type not present on the cached schema.
    Schema,
    /// Input complexity, pagination cap, or query complexity limits.
    Limit,
    /// Unknown or expired session id.
    Session,
    /// Backend I/O failed on both the primary and the fallback path.
    Store,
    /// Non-2xx or GraphQL `errors[]` from introspection or execution.
    Upstream,
    Timeout,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::Schema => "SCHEMA",
            Self::Limit => "LIMIT",
            Self::Session => "SESSION",
            Self::Store => "STORE",
            Self::Upstream => "UPSTREAM",
            Self::Timeout => "TIMEOUT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, agent-visible failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    kind: ErrorKind,
    message: String,
    suggestion: Option<String>,
    path: Option<String>,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), suggestion: None, path: None }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    pub fn limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Limit, message)
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Session, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ToolError};

    #[test]
    fn kind_serializes_screaming_snake() {
        assert_eq!(serde_json::to_value(ErrorKind::Validation).expect("to_value"), "VALIDATION");
        assert_eq!(serde_json::to_value(ErrorKind::Limit).expect("to_value"), "LIMIT");
    }

    #[test]
    fn display_includes_kind_and_suggestion() {
        let err = ToolError::schema("Field 'pokemn' not found on type 'Query'. Did you mean 'pokemons'?")
            .with_suggestion("pokemons");
        assert_eq!(
            err.to_string(),
            "SCHEMA: Field 'pokemn' not found on type 'Query'. Did you mean 'pokemons'? (pokemons)"
        );
    }
}
