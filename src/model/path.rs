// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// A dotted path addressing a field inside the query structure.
///
/// Each segment is a child's *selection key* (alias if set, field name
/// otherwise) from the root selection set down to the target field. The
/// empty string addresses the root selection set itself. A segment of the
/// form `on:Type` descends into the inline fragment added for `Type`, so
/// `pokemons.on:Pokemon.id` addresses `id` inside `... on Pokemon`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, FieldPathError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(FieldPathError::EmptySegment { path: raw.to_owned() });
            }
            segments.push(segment.to_owned());
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path of the addressed field's parent (`None` at the root).
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self { segments: self.segments[..self.segments.len() - 1].to_vec() })
    }

    pub fn child(&self, selection_key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(selection_key.into());
        Self { segments }
    }
}

/// The type condition when a segment descends into an inline fragment
/// (`on:Pokemon` → `Pokemon`), `None` for plain selection-key segments.
pub fn inline_segment(segment: &str) -> Option<&str> {
    segment.strip_prefix("on:")
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPathError {
    EmptySegment { path: String },
}

impl fmt::Display for FieldPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySegment { path } => {
                write!(f, "field path '{path}' contains an empty segment")
            }
        }
    }
}

impl std::error::Error for FieldPathError {}

#[cfg(test)]
mod tests {
    use super::{FieldPath, FieldPathError};

    #[test]
    fn empty_string_is_root() {
        let path = FieldPath::parse("").expect("parse");
        assert!(path.is_root());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn splits_on_dots() {
        let path = FieldPath::parse("pokemons.evolutions").expect("parse");
        assert_eq!(path.segments(), ["pokemons", "evolutions"]);
        assert_eq!(path.to_string(), "pokemons.evolutions");
    }

    #[test]
    fn rejects_empty_segment() {
        assert_eq!(
            FieldPath::parse("a..b"),
            Err(FieldPathError::EmptySegment { path: "a..b".to_owned() })
        );
    }

    #[test]
    fn parent_walks_up_and_stops_at_root() {
        let path = FieldPath::parse("a.b").expect("parse");
        let parent = path.parent().expect("parent");
        assert_eq!(parent.segments(), ["a"]);
        assert_eq!(parent.parent(), Some(FieldPath::root()));
        assert_eq!(FieldPath::root().parent(), None);
    }

    #[test]
    fn child_appends_selection_key() {
        let path = FieldPath::parse("a").expect("parse").child("b");
        assert_eq!(path.to_string(), "a.b");
    }

    #[test]
    fn inline_segments_carry_a_type_condition() {
        assert_eq!(super::inline_segment("on:Pokemon"), Some("Pokemon"));
        assert_eq!(super::inline_segment("pokemons"), None);
    }
}
