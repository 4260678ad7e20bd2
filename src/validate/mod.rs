// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Validation: pure name/type/value primitives plus schema-aware checks.
//!
//! Everything here is synchronous and side-effect free. Failures come back as
//! [`ToolError`]s whose messages are written for the agent to self-correct.

pub mod coerce;
pub mod similar;

use std::sync::OnceLock;

use apollo_compiler::ast::{Document, FieldDefinition};
use apollo_compiler::validation::Valid;
use apollo_compiler::{ExecutableDocument, Schema};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::ToolError;
use crate::model::{FieldNode, QueryState};
use crate::schema::CachedSchema;

pub use coerce::{
    coerce_string_value, coerce_to_boolean, coerce_to_float, coerce_to_integer, StringCoercion,
};
pub use similar::{closest_match, levenshtein_distance, suggestion_threshold};

pub const MAX_STRING_LENGTH: usize = 8192;
pub const MAX_PAGINATION_VALUE: i64 = 500;
pub const MAX_VARIABLE_TYPE_DEPTH: usize = 5;
pub const MAX_INPUT_DEPTH: usize = 10;
pub const MAX_INPUT_ELEMENTS: usize = 1000;

/// Argument names treated as pagination knobs.
pub const PAGINATION_ARG_NAMES: [&str; 5] = ["first", "last", "limit", "top", "count"];

const SCALAR_NAMES: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new("^[_A-Za-z][_0-9A-Za-z]*$").expect("static pattern"))
}

pub fn is_valid_graphql_name(name: &str) -> bool {
    name_regex().is_match(name)
}

pub fn validate_operation_name(name: &str) -> Result<(), ToolError> {
    if is_valid_graphql_name(name) {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "Invalid operation name '{name}'. Names must match ^[_A-Za-z][_0-9A-Za-z]*$."
        )))
    }
}

/// Variable names carry the leading `$` everywhere in the state.
pub fn validate_variable_name(name: &str) -> Result<(), ToolError> {
    let Some(bare) = name.strip_prefix('$') else {
        return Err(ToolError::validation(format!(
            "Invalid variable name '{name}'. Variable names must start with '$'."
        )));
    };
    if is_valid_graphql_name(bare) {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "Invalid variable name '{name}'. After '$', names must match ^[_A-Za-z][_0-9A-Za-z]*$."
        )))
    }
}

pub fn validate_field_alias(alias: &str) -> Result<(), ToolError> {
    if is_valid_graphql_name(alias) {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "Invalid field alias '{alias}'. Aliases must match ^[_A-Za-z][_0-9A-Za-z]*$."
        )))
    }
}

pub fn validate_fragment_name(name: &str) -> Result<(), ToolError> {
    if is_valid_graphql_name(name) && name != "on" {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "Invalid fragment name '{name}'. Names must match ^[_A-Za-z][_0-9A-Za-z]*$ and must not be 'on'."
        )))
    }
}

/// Directive names may be passed with or without the leading `@`.
pub fn validate_directive_name(name: &str) -> Result<(), ToolError> {
    let bare = name.strip_prefix('@').unwrap_or(name);
    if is_valid_graphql_name(bare) {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "Invalid directive name '{name}'. Names must match ^[_A-Za-z][_0-9A-Za-z]*$."
        )))
    }
}

pub fn validate_string_length(value: &str, name: &str) -> Result<(), ToolError> {
    if value.chars().count() > MAX_STRING_LENGTH {
        return Err(ToolError::limit(format!(
            "Value for '{name}' exceeds maximum length of {MAX_STRING_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_no_control_characters(value: &str, name: &str) -> Result<(), ToolError> {
    if value
        .chars()
        .any(|c| matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}'))
    {
        return Err(ToolError::validation(format!(
            "Value for '{name}' contains control characters"
        )));
    }
    Ok(())
}

/// Length and control-character guard for any agent-supplied string.
pub fn validate_text_input(value: &str, name: &str) -> Result<(), ToolError> {
    validate_string_length(value, name)?;
    validate_no_control_characters(value, name)
}

/// Caps numeric pagination arguments at 500. Non-pagination names and
/// non-numeric values pass untouched.
pub fn validate_pagination_value(arg_name: &str, value: &Value) -> Result<(), ToolError> {
    if !PAGINATION_ARG_NAMES.contains(&arg_name) {
        return Ok(());
    }
    let numeric = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.parse::<f64>().ok(),
        _ => None,
    };
    if let Some(number) = numeric {
        if number > MAX_PAGINATION_VALUE as f64 {
            return Err(ToolError::limit(format!(
                "Pagination value for '{arg_name}' ({number}) exceeds maximum of {MAX_PAGINATION_VALUE}."
            )));
        }
    }
    Ok(())
}

/// Parses `query Test($v: T) { __typename }` to see whether `T` is a
/// syntactically valid type.
fn probe_parse_type(type_string: &str) -> Result<(), Vec<String>> {
    let probe = format!("query Test($v: {type_string}) {{ __typename }}");
    match Document::parse(probe, "probe.graphql") {
        Ok(_) => Ok(()),
        Err(with_errors) => {
            Err(with_errors.errors.iter().map(|diagnostic| diagnostic.to_string()).collect())
        }
    }
}

pub fn validate_variable_type(type_string: &str) -> Result<(), ToolError> {
    let trimmed = type_string.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation("Variable type must not be empty"));
    }
    let depth = trimmed.chars().filter(|c| *c == '[').count();
    if depth > MAX_VARIABLE_TYPE_DEPTH {
        return Err(ToolError::limit(format!(
            "Variable type '{trimmed}' nests {depth} list levels (maximum {MAX_VARIABLE_TYPE_DEPTH})"
        )));
    }
    if probe_parse_type(trimmed).is_err() {
        return Err(ToolError::validation(format!("Invalid variable type '{trimmed}'")));
    }
    Ok(())
}

fn common_type_mistake(base: &str) -> Option<&'static str> {
    match base.to_ascii_lowercase().as_str() {
        "integer" | "int" | "long" => Some("Int"),
        "number" | "num" => Some("Int"),
        "bool" | "boolean" => Some("Boolean"),
        "string" | "str" | "text" => Some("String"),
        "float" | "double" | "decimal" => Some("Float"),
        "id" | "uuid" => Some("ID"),
        _ => None,
    }
}

/// Type-string sanity for agent-declared variables: built-in scalars pass,
/// common mistakes get a pointed suggestion, everything else is probe-parsed.
pub fn validate_graphql_type(type_string: &str) -> Result<(), ToolError> {
    let trimmed = type_string.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation("Type must not be empty"));
    }

    let base: String =
        trimmed.chars().filter(|c| !matches!(c, '[' | ']' | '!' | ' ')).collect();
    if SCALAR_NAMES.contains(&base.as_str()) {
        return Ok(());
    }
    if let Some(suggestion) = common_type_mistake(&base) {
        return Err(ToolError::validation(format!(
            "Invalid type '{base}'. Did you mean '{suggestion}'?"
        ))
        .with_suggestion(suggestion));
    }
    match probe_parse_type(trimmed) {
        Ok(()) => Ok(()),
        Err(messages) => Err(ToolError::validation(format!(
            "Invalid GraphQL type '{trimmed}': {}",
            messages.join("; ")
        ))),
    }
}

/// Parse-only check: syntax errors as a plain message list.
pub fn validate_query_syntax(document: &str) -> Vec<String> {
    match Document::parse(document.to_owned(), "query.graphql") {
        Ok(_) => Vec::new(),
        Err(with_errors) => {
            with_errors.errors.iter().map(|diagnostic| diagnostic.to_string()).collect()
        }
    }
}

/// Parse plus full schema validation; every diagnostic as a message.
pub fn validate_against_schema(document: &str, schema: &Valid<Schema>) -> Vec<String> {
    match ExecutableDocument::parse_and_validate(schema, document.to_owned(), "query.graphql") {
        Ok(_) => Vec::new(),
        Err(with_errors) => {
            with_errors.errors.iter().map(|diagnostic| diagnostic.to_string()).collect()
        }
    }
}

pub fn validate_field_in_schema(
    schema: &CachedSchema,
    parent_type: &str,
    field_name: &str,
) -> Result<(), ToolError> {
    if !schema.type_exists(parent_type) {
        return Err(ToolError::schema(format!("Type '{parent_type}' not found in schema")));
    }
    if schema.field_def(parent_type, field_name).is_some() {
        return Ok(());
    }

    let siblings = schema.field_names(parent_type);
    match closest_match(field_name, siblings.iter().copied()) {
        Some(suggestion) => Err(ToolError::schema(format!(
            "Field '{field_name}' not found on type '{parent_type}'. Did you mean '{suggestion}'?"
        ))
        .with_suggestion(suggestion)),
        None => Err(ToolError::schema(format!(
            "Field '{field_name}' not found on type '{parent_type}'."
        ))),
    }
}

pub fn validate_argument_in_schema(
    field_def: &FieldDefinition,
    arg_name: &str,
    path: &str,
) -> Result<(), ToolError> {
    if field_def.arguments.iter().any(|arg| arg.name.as_str() == arg_name) {
        return Ok(());
    }

    let field_name = field_def.name.as_str();
    let available: Vec<&str> =
        field_def.arguments.iter().map(|arg| arg.name.as_str()).collect();

    if available.is_empty() {
        return Err(ToolError::schema(format!(
            "Field '{field_name}' does not accept any arguments"
        ))
        .with_path(path));
    }
    if let Some(suggestion) = closest_match(arg_name, available.iter().copied()) {
        return Err(ToolError::schema(format!(
            "Argument '{arg_name}' not found on field '{field_name}'. Did you mean '{suggestion}'?"
        ))
        .with_suggestion(suggestion)
        .with_path(path));
    }
    let listed = available.iter().take(5).copied().collect::<Vec<_>>().join(", ");
    Err(ToolError::schema(format!(
        "Argument '{arg_name}' not found on field '{field_name}'. Available arguments: {listed}"
    ))
    .with_path(path))
}

/// A GraphQL type string decomposed for shape checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Named(String),
    NonNull(Box<TypeShape>),
    List(Box<TypeShape>),
}

pub fn parse_type_shape(raw: &str) -> Option<TypeShape> {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed.strip_suffix('!') {
        return parse_type_shape(inner).map(|shape| TypeShape::NonNull(Box::new(shape)));
    }
    if let Some(rest) = trimmed.strip_prefix('[') {
        let inner = rest.strip_suffix(']')?;
        return parse_type_shape(inner).map(|shape| TypeShape::List(Box::new(shape)));
    }
    if !is_valid_graphql_name(trimmed) {
        return None;
    }
    Some(TypeShape::Named(trimmed.to_owned()))
}

/// Checks a JSON value against a GraphQL type string. `None` means
/// compatible; `Some` carries the mismatch message.
///
/// Enums, input objects, and custom scalars pass here; full document
/// validation covers them later.
pub fn validate_value_against_type(value: &Value, type_string: &str) -> Option<String> {
    let Some(shape) = parse_type_shape(type_string) else {
        return Some(format!("Cannot parse type '{type_string}'"));
    };
    check_value_shape(value, &shape, type_string)
}

fn check_value_shape(value: &Value, shape: &TypeShape, full_type: &str) -> Option<String> {
    match shape {
        TypeShape::NonNull(inner) => {
            if value.is_null() {
                return Some(format!("Type '{full_type}' is non-null but the value is null"));
            }
            check_value_shape(value, inner, full_type)
        }
        _ if value.is_null() => None,
        TypeShape::List(inner) => match value {
            Value::Array(items) => {
                items.iter().find_map(|item| check_value_shape(item, inner, full_type))
            }
            // GraphQL coerces a single value to a one-element list.
            single => check_value_shape(single, inner, full_type),
        },
        TypeShape::Named(name) => match name.as_str() {
            "String" => (!value.is_string())
                .then(|| format!("Expected String but got {}", short_value(value))),
            "ID" => match value {
                Value::String(_) => None,
                Value::Number(number) if number.as_i64().is_some() => None,
                other => {
                    Some(format!("Expected ID (string or integer) but got {}", short_value(other)))
                }
            },
            "Int" => coerce_to_integer(value)
                .is_none()
                .then(|| format!("Expected Int but got {}", short_value(value))),
            "Float" => coerce_to_float(value)
                .is_none()
                .then(|| format!("Expected Float but got {}", short_value(value))),
            "Boolean" => coerce_to_boolean(value)
                .is_none()
                .then(|| format!("Expected Boolean but got {}", short_value(value))),
            _ => None,
        },
    }
}

fn short_value(value: &Value) -> String {
    let mut rendered = value.to_string();
    if rendered.chars().count() > 80 {
        rendered = rendered.chars().take(77).collect();
        rendered.push('…');
    }
    rendered
}

/// Walks the structure against the schema and warns (never fails) for every
/// selected field missing a non-null argument without a default.
pub fn validate_required_arguments(schema: &CachedSchema, state: &QueryState) -> Vec<String> {
    let mut warnings = Vec::new();
    walk_required(
        schema,
        state.operation_type_name(),
        state.query_structure().fields(),
        "",
        &mut warnings,
    );
    for inline in state.query_structure().inline_fragments() {
        walk_required(schema, &inline.on_type, &inline.selections, "", &mut warnings);
    }
    for (fragment_name, fragment) in state.fragments() {
        let prefix = format!("fragment {fragment_name}");
        walk_required(schema, &fragment.on_type, &fragment.fields, &prefix, &mut warnings);
    }
    warnings
}

fn walk_required(
    schema: &CachedSchema,
    parent_type: &str,
    fields: &IndexMap<String, FieldNode>,
    path: &str,
    warnings: &mut Vec<String>,
) {
    for child in fields.values() {
        let child_path = if path.is_empty() {
            child.selection_key().to_owned()
        } else {
            format!("{path}.{}", child.selection_key())
        };

        let Some(field_def) = schema.field_def(parent_type, child.field_name()) else {
            continue;
        };

        for arg in &field_def.arguments {
            if arg.ty.is_non_null()
                && arg.default_value.is_none()
                && !child.args().contains_key(arg.name.as_str())
            {
                warnings.push(format!(
                    "Field '{}' at '{child_path}' is missing required argument '{}'",
                    child.field_name(),
                    arg.name
                ));
            }
        }

        let child_type = schema.field_base_type(field_def).to_owned();
        walk_required(schema, &child_type, child.fields(), &child_path, warnings);
        for inline in child.inline_fragments() {
            walk_required(schema, &inline.on_type, &inline.selections, &child_path, warnings);
        }
    }
}

/// Depth, element-count, and per-string limits for an agent-supplied value.
pub fn validate_input_complexity(value: &Value, name: &str) -> Result<(), ToolError> {
    let mut elements = 0usize;
    check_input(value, name, 0, &mut elements)
}

fn check_input(
    value: &Value,
    name: &str,
    depth: usize,
    elements: &mut usize,
) -> Result<(), ToolError> {
    if depth > MAX_INPUT_DEPTH {
        return Err(ToolError::limit(format!(
            "Input value for '{name}' exceeds maximum nesting depth of {MAX_INPUT_DEPTH}"
        )));
    }
    *elements += 1;
    if *elements > MAX_INPUT_ELEMENTS {
        return Err(ToolError::limit(format!(
            "Input value for '{name}' exceeds maximum element count of {MAX_INPUT_ELEMENTS}"
        )));
    }

    match value {
        Value::String(raw) => validate_text_input(raw, name),
        Value::Array(items) => {
            for item in items {
                check_input(item, name, depth + 1, elements)?;
            }
            Ok(())
        }
        Value::Object(entries) => {
            for (key, item) in entries {
                validate_text_input(key, name)?;
                check_input(item, name, depth + 1, elements)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
