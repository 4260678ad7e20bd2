// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Upstream schema: one-shot introspection per endpoint, cached for the
//! process lifetime.
//!
//! The cached form is apollo-compiler's validated [`Schema`] (built from SDL
//! synthesized out of the introspection JSON) plus the raw JSON itself. Small
//! navigation helpers keep the validators agnostic of the GraphQL library.

pub mod introspection;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::ToolError;
use crate::model::OperationType;

pub use introspection::{introspection_to_sdl, IntrospectionError, INTROSPECTION_QUERY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaBuildError {
    MissingSchemaObject,
    Introspection(IntrospectionError),
    InvalidSdl(Vec<String>),
}

impl fmt::Display for SchemaBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSchemaObject => {
                f.write_str("introspection result has no '__schema' object")
            }
            Self::Introspection(err) => write!(f, "{err}"),
            Self::InvalidSdl(messages) => {
                write!(f, "schema failed validation: {}", messages.join("; "))
            }
        }
    }
}

impl std::error::Error for SchemaBuildError {}

impl From<IntrospectionError> for SchemaBuildError {
    fn from(err: IntrospectionError) -> Self {
        Self::Introspection(err)
    }
}

/// A typed upstream schema plus the raw introspection it came from.
#[derive(Debug)]
pub struct CachedSchema {
    schema: Valid<Schema>,
    raw: Value,
}

impl CachedSchema {
    /// Builds from the `data` object of an introspection response.
    pub fn from_introspection(data: &Value) -> Result<Self, SchemaBuildError> {
        let schema_json =
            data.get("__schema").ok_or(SchemaBuildError::MissingSchemaObject)?;
        let sdl = introspection_to_sdl(schema_json)?;
        let schema = parse_sdl(&sdl)?;
        Ok(Self { schema, raw: data.clone() })
    }

    /// Builds directly from SDL; the raw introspection slot stays null.
    pub fn from_sdl(sdl: &str) -> Result<Self, SchemaBuildError> {
        Ok(Self { schema: parse_sdl(sdl)?, raw: Value::Null })
    }

    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    pub fn raw_introspection(&self) -> &Value {
        &self.raw
    }

    pub fn root_type_name(&self, operation_type: OperationType) -> Option<&str> {
        let operation_type = match operation_type {
            OperationType::Query => apollo_compiler::ast::OperationType::Query,
            OperationType::Mutation => apollo_compiler::ast::OperationType::Mutation,
            OperationType::Subscription => apollo_compiler::ast::OperationType::Subscription,
        };
        self.schema.root_operation(operation_type).map(|name| name.as_str())
    }

    pub fn type_exists(&self, type_name: &str) -> bool {
        self.schema.types.contains_key(type_name)
    }

    /// Field definition on an object or interface type.
    pub fn field_def(&self, parent_type: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.schema
            .type_field(parent_type, field_name)
            .ok()
            .map(|component| component.as_ref())
    }

    /// Sibling field names of a composite type (empty for non-composites).
    pub fn field_names(&self, parent_type: &str) -> Vec<&str> {
        match self.schema.types.get(parent_type) {
            Some(ExtendedType::Object(object)) => {
                object.fields.keys().map(|name| name.as_str()).collect()
            }
            Some(ExtendedType::Interface(interface)) => {
                interface.fields.keys().map(|name| name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// The named type a field resolves to, lists and non-nulls stripped.
    pub fn field_base_type<'a>(&self, field: &'a FieldDefinition) -> &'a str {
        field.ty.inner_named_type().as_str()
    }

    /// Navigates `field_names` (actual field names, not aliases) from
    /// `root_type` and returns the named argument's type on the terminal
    /// field, rendered as a GraphQL type string.
    pub fn argument_type(
        &self,
        root_type: &str,
        field_names: &[&str],
        arg_name: &str,
    ) -> Option<String> {
        let mut parent = root_type;
        let mut terminal: Option<&FieldDefinition> = None;
        for field_name in field_names {
            let field = self.field_def(parent, field_name)?;
            parent = self.field_base_type(field);
            terminal = Some(field);
        }
        terminal?
            .arguments
            .iter()
            .find(|arg| arg.name.as_str() == arg_name)
            .map(|arg| arg.ty.to_string())
    }
}

fn parse_sdl(sdl: &str) -> Result<Valid<Schema>, SchemaBuildError> {
    Schema::parse_and_validate(sdl, "upstream.graphql").map_err(|with_errors| {
        SchemaBuildError::InvalidSdl(
            with_errors.errors.iter().map(|diagnostic| diagnostic.to_string()).collect(),
        )
    })
}

/// Per-process schema cache keyed by endpoint URL.
///
/// The entry map lock is held across the introspection fetch so concurrent
/// first requests for the same endpoint introspect exactly once.
pub struct SchemaCache {
    client: reqwest::Client,
    entries: Mutex<HashMap<String, Arc<CachedSchema>>>,
}

impl SchemaCache {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client, entries: Mutex::new(HashMap::new()) }
    }

    /// Pre-populates an endpoint entry (tests and warm starts).
    pub async fn seed(&self, endpoint: impl Into<String>, schema: CachedSchema) {
        self.entries.lock().await.insert(endpoint.into(), Arc::new(schema));
    }

    pub async fn get_or_fetch(
        &self,
        endpoint: &str,
        headers: &IndexMap<String, String>,
        timeout: Duration,
    ) -> Result<Arc<CachedSchema>, ToolError> {
        let mut entries = self.entries.lock().await;
        if let Some(cached) = entries.get(endpoint) {
            return Ok(Arc::clone(cached));
        }

        debug!(endpoint, "fetching introspection");
        let data = self.fetch_introspection(endpoint, headers, timeout).await?;
        let cached = CachedSchema::from_introspection(&data)
            .map(Arc::new)
            .map_err(|err| ToolError::upstream(format!("unusable introspection result: {err}")))?;
        entries.insert(endpoint.to_owned(), Arc::clone(&cached));
        info!(endpoint, types = cached.schema.types.len(), "schema cached");
        Ok(cached)
    }

    async fn fetch_introspection(
        &self,
        endpoint: &str,
        headers: &IndexMap<String, String>,
        timeout: Duration,
    ) -> Result<Value, ToolError> {
        let response = self
            .client
            .post(endpoint)
            .headers(header_map(headers)?)
            .timeout(timeout)
            .json(&serde_json::json!({ "query": INTROSPECTION_QUERY }))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ToolError::timeout(format!(
                        "introspection request timed out after {}s",
                        timeout.as_secs()
                    ))
                } else {
                    ToolError::upstream(format!("introspection request failed: {err}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::upstream(format!("introspection returned HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ToolError::upstream(format!("introspection body is not JSON: {err}")))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(ToolError::upstream(format!(
                    "introspection returned errors: {}",
                    serde_json::to_string(errors).unwrap_or_default()
                )));
            }
        }

        body.get("data")
            .cloned()
            .ok_or_else(|| ToolError::upstream("introspection returned no data"))
    }
}

/// Default headers under session headers; the session wins on conflicts.
pub fn merged_headers(
    defaults: &IndexMap<String, String>,
    session: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut merged = defaults.clone();
    for (key, value) in session {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

pub fn header_map(headers: &IndexMap<String, String>) -> Result<HeaderMap, ToolError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::try_from(key.as_str())
            .map_err(|_| ToolError::validation(format!("invalid header name '{key}'")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|_| ToolError::validation(format!("invalid value for header '{key}'")))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod tests;
