// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// An opaque session identifier: exactly 32 lowercase hex characters.
///
/// Freshly minted ids come from a v4 UUID in `simple` form, but any value
/// matching the shape is accepted so ids survive a JSON round-trip and can be
/// replayed by an agent across reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn parse(value: impl Into<String>) -> Result<Self, SessionIdError> {
        let value = value.into();
        if value.len() != 32 {
            return Err(SessionIdError::Length(value.len()));
        }
        if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit() || c.is_ascii_uppercase())
        {
            return Err(SessionIdError::Character(bad));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SessionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdError {
    Length(usize),
    Character(char),
}

impl fmt::Display for SessionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(found) => {
                write!(f, "session id must be 32 hex characters (got {found})")
            }
            Self::Character(found) => {
                write!(f, "session id must be lowercase hex (got '{found}')")
            }
        }
    }
}

impl std::error::Error for SessionIdError {}

#[cfg(test)]
mod tests {
    use super::{SessionId, SessionIdError};

    #[test]
    fn random_id_is_32_lowercase_hex() {
        let id = SessionId::random();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(SessionId::parse("abc"), Err(SessionIdError::Length(3)));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let raw = "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz";
        assert_eq!(SessionId::parse(raw), Err(SessionIdError::Character('z')));
    }

    #[test]
    fn parse_rejects_uppercase_hex() {
        let raw = "ABCDEF00112233445566778899aabbcc";
        assert_eq!(SessionId::parse(raw), Err(SessionIdError::Character('A')));
    }

    #[test]
    fn parse_round_trips_random_id() {
        let id = SessionId::random();
        assert_eq!(SessionId::parse(id.as_str()), Ok(id));
    }
}
