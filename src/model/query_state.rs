// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::path::FieldPath;

/// Marker key used in the persisted JSON layout for pre-quoted string
/// literals. In memory this is the [`ArgValue::PreQuoted`] variant; the key
/// only survives in serialized form and inside raw values.
pub const GRAPHQL_STRING_MARKER: &str = "__graphqlString";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub fn parse(raw: &str) -> Result<Self, OperationTypeError> {
        match raw {
            "query" => Ok(Self::Query),
            "mutation" => Ok(Self::Mutation),
            "subscription" => Ok(Self::Subscription),
            _ => Err(OperationTypeError { found: raw.to_owned() }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTypeError {
    pub found: String,
}

impl fmt::Display for OperationTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown operation type '{}' (expected query|mutation|subscription)",
            self.found
        )
    }
}

impl std::error::Error for OperationTypeError {}

/// An argument value in exactly one of five shapes.
///
/// The JSON layout mirrors the persisted session format: tagged flag objects
/// (`{"is_variable":true,"value":"$id"}`), a bare `$`-prefixed string as
/// variable shorthand, and `{"value":{"__graphqlString":"…"}}` for pre-quoted
/// literals.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Reference to a declared variable; `name` keeps the leading `$`.
    Variable { name: String },
    /// A bare enum symbol, printed without quotes.
    Enum { symbol: String },
    /// A value validated against a schema type at set time.
    Typed { value: Value, type_name: String },
    /// A generic JSON value printed with GraphQL literal syntax.
    Raw { value: Value },
    /// An already-quoted string literal emitted verbatim (minus the marker).
    PreQuoted { text: String },
}

impl ArgValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Variable { name } => {
                serde_json::json!({ "is_variable": true, "value": name })
            }
            Self::Enum { symbol } => {
                serde_json::json!({ "is_enum": true, "value": symbol })
            }
            Self::Typed { value, type_name } => {
                serde_json::json!({ "is_typed": true, "type_name": type_name, "value": value })
            }
            Self::Raw { value } => serde_json::json!({ "value": value }),
            Self::PreQuoted { text } => {
                serde_json::json!({ "value": { GRAPHQL_STRING_MARKER: text } })
            }
        }
    }

    pub fn from_json(raw: Value) -> Result<Self, ArgValueError> {
        match raw {
            Value::String(s) => {
                if s.starts_with('$') {
                    Ok(Self::Variable { name: s })
                } else {
                    Ok(Self::Raw { value: Value::String(s) })
                }
            }
            Value::Object(map) => {
                let flag = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);
                let value = map.get("value").cloned();

                if flag("is_variable") {
                    match value {
                        Some(Value::String(name)) if name.starts_with('$') => {
                            Ok(Self::Variable { name })
                        }
                        _ => Err(ArgValueError::BadVariable),
                    }
                } else if flag("is_enum") {
                    match value {
                        Some(Value::String(symbol)) => Ok(Self::Enum { symbol }),
                        _ => Err(ArgValueError::BadEnum),
                    }
                } else if flag("is_typed") {
                    let type_name = map
                        .get("type_name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned();
                    match value {
                        Some(value) => Ok(Self::Typed { value, type_name }),
                        None => Err(ArgValueError::MissingValue),
                    }
                } else {
                    match value {
                        Some(value) => Ok(Self::from_raw_value(value)),
                        None => Err(ArgValueError::MissingValue),
                    }
                }
            }
            other => Ok(Self::Raw { value: other }),
        }
    }

    /// Wraps a raw value, recognizing the pre-quoted marker object.
    pub fn from_raw_value(value: Value) -> Self {
        if let Value::Object(map) = &value {
            if map.len() == 1 {
                if let Some(Value::String(text)) = map.get(GRAPHQL_STRING_MARKER) {
                    return Self::PreQuoted { text: text.clone() };
                }
            }
        }
        Self::Raw { value }
    }

    /// The variable name (with `$`) when this value references one.
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::Variable { name } => Some(name),
            _ => None,
        }
    }
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArgValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValueError {
    BadVariable,
    BadEnum,
    MissingValue,
}

impl fmt::Display for ArgValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadVariable => {
                f.write_str("is_variable requires a string value with a leading '$'")
            }
            Self::BadEnum => f.write_str("is_enum requires a string value"),
            Self::MissingValue => f.write_str("argument object requires a 'value' field"),
        }
    }
}

impl std::error::Error for ArgValueError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveArgument {
    pub name: String,
    pub value: ArgValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<DirectiveArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineFragment {
    pub on_type: String,
    #[serde(default)]
    pub selections: IndexMap<String, FieldNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentDef {
    pub on_type: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldNode>,
}

/// One field selection plus everything hanging off it.
///
/// Children are keyed by *selection key* (`alias || field_name`); sibling
/// uniqueness is enforced by the map and re-checked at insertion so an alias
/// cannot shadow an existing field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    field_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    alias: Option<String>,
    #[serde(default)]
    args: IndexMap<String, ArgValue>,
    #[serde(default)]
    directives: Vec<Directive>,
    #[serde(default)]
    fields: IndexMap<String, FieldNode>,
    #[serde(default)]
    fragment_spreads: Vec<String>,
    #[serde(default)]
    inline_fragments: Vec<InlineFragment>,
}

impl FieldNode {
    pub fn new(field_name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            field_name: field_name.into(),
            alias,
            args: IndexMap::new(),
            directives: Vec::new(),
            fields: IndexMap::new(),
            fragment_spreads: Vec::new(),
            inline_fragments: Vec::new(),
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn selection_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.field_name)
    }

    pub fn args(&self) -> &IndexMap<String, ArgValue> {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut IndexMap<String, ArgValue> {
        &mut self.args
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn directives_mut(&mut self) -> &mut Vec<Directive> {
        &mut self.directives
    }

    pub fn fields(&self) -> &IndexMap<String, FieldNode> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut IndexMap<String, FieldNode> {
        &mut self.fields
    }

    pub fn fragment_spreads(&self) -> &[String] {
        &self.fragment_spreads
    }

    pub fn fragment_spreads_mut(&mut self) -> &mut Vec<String> {
        &mut self.fragment_spreads
    }

    pub fn inline_fragments(&self) -> &[InlineFragment] {
        &self.inline_fragments
    }

    pub fn inline_fragments_mut(&mut self) -> &mut Vec<InlineFragment> {
        &mut self.inline_fragments
    }

    /// The inline fragment for a type condition; the most recently added one
    /// wins when a type was added twice.
    pub fn inline_fragment(&self, on_type: &str) -> Option<&InlineFragment> {
        self.inline_fragments.iter().rev().find(|inline| inline.on_type == on_type)
    }

    pub fn inline_fragment_mut(&mut self, on_type: &str) -> Option<&mut InlineFragment> {
        self.inline_fragments.iter_mut().rev().find(|inline| inline.on_type == on_type)
    }

    pub fn has_selections(&self) -> bool {
        !self.fields.is_empty()
            || !self.fragment_spreads.is_empty()
            || !self.inline_fragments.is_empty()
    }
}

/// The serializable workspace one session holds: the operation under
/// construction plus variables, fragments, and forwarded headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    headers: IndexMap<String, String>,
    operation_type: OperationType,
    operation_type_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    operation_name: Option<String>,
    query_structure: FieldNode,
    fragments: IndexMap<String, FragmentDef>,
    variables_schema: IndexMap<String, String>,
    variables_defaults: IndexMap<String, Value>,
    variables_values: IndexMap<String, Value>,
    operation_directives: Vec<Directive>,
    created_at: String,
}

impl QueryState {
    /// A fresh state rooted at the schema's root type for `operation_type`.
    ///
    /// The root pseudo-node's `field_name` is the root type name; it is never
    /// rendered and path resolution starts below it.
    pub fn new(
        headers: IndexMap<String, String>,
        operation_type: OperationType,
        operation_type_name: impl Into<String>,
    ) -> Self {
        let operation_type_name = operation_type_name.into();
        Self {
            headers,
            operation_type,
            operation_type_name: operation_type_name.clone(),
            operation_name: None,
            query_structure: FieldNode::new(operation_type_name, None),
            fragments: IndexMap::new(),
            variables_schema: IndexMap::new(),
            variables_defaults: IndexMap::new(),
            variables_values: IndexMap::new(),
            operation_directives: Vec::new(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    pub fn operation_type_name(&self) -> &str {
        &self.operation_type_name
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    pub fn set_operation_name(&mut self, name: Option<String>) {
        self.operation_name = name;
    }

    pub fn query_structure(&self) -> &FieldNode {
        &self.query_structure
    }

    pub fn query_structure_mut(&mut self) -> &mut FieldNode {
        &mut self.query_structure
    }

    pub fn fragments(&self) -> &IndexMap<String, FragmentDef> {
        &self.fragments
    }

    pub fn fragments_mut(&mut self) -> &mut IndexMap<String, FragmentDef> {
        &mut self.fragments
    }

    pub fn variables_schema(&self) -> &IndexMap<String, String> {
        &self.variables_schema
    }

    pub fn variables_schema_mut(&mut self) -> &mut IndexMap<String, String> {
        &mut self.variables_schema
    }

    pub fn variables_defaults(&self) -> &IndexMap<String, Value> {
        &self.variables_defaults
    }

    pub fn variables_defaults_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.variables_defaults
    }

    pub fn variables_values(&self) -> &IndexMap<String, Value> {
        &self.variables_values
    }

    pub fn variables_values_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.variables_values
    }

    pub fn operation_directives(&self) -> &[Directive] {
        &self.operation_directives
    }

    pub fn operation_directives_mut(&mut self) -> &mut Vec<Directive> {
        &mut self.operation_directives
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn variable_declared(&self, name_with_dollar: &str) -> bool {
        self.variables_schema.contains_key(name_with_dollar)
    }

    /// Resolves a dotted path to the node it addresses (the root node for the
    /// empty path). Segments are selection keys; `on:Type` segments step
    /// through the matching inline fragment and must be followed by a
    /// selection key from its selections.
    pub fn node_at(&self, path: &FieldPath) -> Option<&FieldNode> {
        let mut node = &self.query_structure;
        let mut segments = path.segments().iter();
        while let Some(segment) = segments.next() {
            if let Some(on_type) = super::path::inline_segment(segment) {
                let inline = node.inline_fragment(on_type)?;
                let selection_key = segments.next()?;
                node = inline.selections.get(selection_key)?;
            } else {
                node = node.fields().get(segment)?;
            }
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &FieldPath) -> Option<&mut FieldNode> {
        let mut node = &mut self.query_structure;
        let mut segments = path.segments().iter();
        while let Some(segment) = segments.next() {
            if let Some(on_type) = super::path::inline_segment(segment) {
                let inline = node.inline_fragment_mut(on_type)?;
                let selection_key = segments.next()?;
                node = inline.selections.get_mut(selection_key)?;
            } else {
                node = node.fields_mut().get_mut(segment)?;
            }
        }
        Some(node)
    }

    /// The mutable selection map the path addresses: a field's children, or
    /// an inline fragment's own selections when the last segment is
    /// `on:Type`.
    pub fn selections_at_mut(
        &mut self,
        path: &FieldPath,
    ) -> Option<&mut IndexMap<String, FieldNode>> {
        if let Some(last) = path.segments().last() {
            if let Some(on_type) = super::path::inline_segment(last) {
                let parent = path.parent().expect("non-empty path has a parent");
                let node = self.node_at_mut(&parent)?;
                return node.inline_fragment_mut(on_type).map(|inline| &mut inline.selections);
            }
        }
        self.node_at_mut(path).map(FieldNode::fields_mut)
    }

    /// True when there is nothing to render: no fields, no spreads, no inline
    /// fragments, and no fragment definitions.
    pub fn is_empty(&self) -> bool {
        !self.query_structure.has_selections() && self.fragments.is_empty()
    }
}
