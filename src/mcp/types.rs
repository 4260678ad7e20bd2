// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StartSessionParams {
    /// One of `query`, `mutation`, `subscription`.
    pub operation_type: String,
    pub operation_name: Option<String>,
    /// HTTP headers forwarded to the upstream for this session.
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StartSessionResponse {
    pub ok: bool,
    pub session_id: String,
    pub operation_type: String,
    /// The schema's root type for the chosen operation.
    pub root_type: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SessionParams {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetOperationNameParams {
    pub session_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectFieldParams {
    pub session_id: String,
    /// Dotted selection-key path of the parent; empty or omitted for the root
    /// selection set.
    pub parent_path: Option<String>,
    pub field_name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetArgumentParams {
    pub session_id: String,
    /// Dotted selection-key path of the field carrying the argument.
    pub field_path: String,
    pub arg_name: String,
    pub value: Value,
    /// Treat `value` as a `$variable` reference.
    pub is_variable: Option<bool>,
    /// Treat `value` as a bare enum symbol.
    pub is_enum: Option<bool>,
    /// Validate `value` against the argument's schema type and print it as
    /// that scalar.
    pub is_typed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetTypedArgumentParams {
    pub session_id: String,
    pub field_path: String,
    pub arg_name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetVariableParams {
    pub session_id: String,
    /// Variable name including the leading `$`.
    pub var_name: String,
    /// GraphQL type string, e.g. `[Int!]!`.
    pub var_type: String,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetVariableValueParams {
    pub session_id: String,
    pub var_name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DirectiveArgumentInput {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddDirectiveParams {
    pub session_id: String,
    /// Dotted field path, or the literal `operation` for operation-level
    /// directives.
    pub path: String,
    pub name: String,
    pub arguments: Option<Vec<DirectiveArgumentInput>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SpreadFragmentParams {
    pub session_id: String,
    pub path: Option<String>,
    pub fragment_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DefineFragmentParams {
    pub session_id: String,
    pub name: String,
    pub on_type: String,
    /// Field names selected by the fragment, validated against `on_type`.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddInlineFragmentParams {
    pub session_id: String,
    pub path: Option<String>,
    pub on_type: String,
}

/// Shared response for state mutations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MutationResponse {
    pub ok: bool,
    pub session_id: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuildQueryResponse {
    pub ok: bool,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidateQueryResponse {
    pub ok: bool,
    pub valid: bool,
    pub query: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteQueryResponse {
    pub ok: bool,
    pub query: String,
    /// The upstream response JSON, verbatim.
    pub response: Value,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EndSessionResponse {
    pub ok: bool,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryStateResponse {
    pub ok: bool,
    /// The persisted session layout, verbatim.
    pub state: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemaInfoResponse {
    pub ok: bool,
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub type_count: usize,
    pub type_names: Vec<String>,
}
