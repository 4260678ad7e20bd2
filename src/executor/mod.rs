// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The execute pipeline: render, parse, validate against the schema, bound
//! complexity, then POST to the configured upstream.
//!
//! Nothing is written back after the outbound call starts, so a timeout can
//! never leave a session half-mutated.

use std::time::Duration;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::complexity::analyze_structure;
use crate::error::ToolError;
use crate::model::QueryState;
use crate::render::render_document;
use crate::schema::{header_map, merged_headers, CachedSchema};
use crate::validate::{
    validate_against_schema, validate_query_syntax, validate_required_arguments,
};

/// Outcome of a full validation pass; shared by `validate-query` and the
/// execute preflight.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub query: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Renders and validates the state without touching the network.
pub fn validate_state(state: &QueryState, schema: &CachedSchema) -> ValidationReport {
    let query = render_document(state);
    let mut report = ValidationReport { query, ..ValidationReport::default() };

    if report.query.is_empty() {
        report.errors.push("Query has no selections yet; use select-field first".to_owned());
        return report;
    }

    let syntax_errors = validate_query_syntax(&report.query);
    if !syntax_errors.is_empty() {
        report.errors = syntax_errors;
        return report;
    }

    report.errors.extend(validate_against_schema(&report.query, schema.schema()));

    let complexity = analyze_structure(state.query_structure());
    report.errors.extend(complexity.errors);
    report.warnings.extend(complexity.warnings);

    report.warnings.extend(validate_required_arguments(schema, state));
    report
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub query: String,
    /// The upstream JSON, verbatim.
    pub response: Value,
    pub warnings: Vec<String>,
}

pub struct Executor {
    client: reqwest::Client,
}

impl Executor {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        state: &QueryState,
        schema: &CachedSchema,
        endpoint: &str,
        default_headers: &IndexMap<String, String>,
        timeout: Duration,
    ) -> Result<ExecutionOutcome, ToolError> {
        let query = render_document(state);
        if query.is_empty() {
            return Err(ToolError::validation(
                "Query has no selections yet; use select-field first",
            ));
        }

        let syntax_errors = validate_query_syntax(&query);
        if !syntax_errors.is_empty() {
            return Err(ToolError::validation(format!(
                "Query has syntax errors: {}",
                syntax_errors.join("; ")
            )));
        }

        let schema_errors = validate_against_schema(&query, schema.schema());
        if !schema_errors.is_empty() {
            return Err(ToolError::schema(format!(
                "Query failed schema validation: {}",
                schema_errors.join("; ")
            )));
        }

        let complexity = analyze_structure(state.query_structure());
        if !complexity.within_limits() {
            return Err(ToolError::limit(complexity.errors.join("; ")));
        }

        let mut warnings = complexity.warnings;
        warnings.extend(validate_required_arguments(schema, state));

        let mut body = json!({
            "query": query,
            "variables": variables_object(state),
        });
        if let Some(name) = state.operation_name() {
            body["operationName"] = json!(name);
        }

        let headers = header_map(&merged_headers(default_headers, state.headers()))?;
        debug!(endpoint, operation = ?state.operation_name(), "executing query");

        let response = self
            .client
            .post(endpoint)
            .headers(headers)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ToolError::timeout(format!(
                        "execution timed out after {}s",
                        timeout.as_secs()
                    ))
                } else {
                    ToolError::upstream(format!("execution request failed: {err}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::upstream(format!("upstream returned HTTP {status}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ToolError::upstream(format!("upstream body is not JSON: {err}")))?;

        Ok(ExecutionOutcome { query, response: payload, warnings })
    }
}

/// Runtime variables as the upstream expects them: bare names, no `$`.
fn variables_object(state: &QueryState) -> Value {
    let mut variables = Map::new();
    for (name, value) in state.variables_values() {
        let bare = name.strip_prefix('$').unwrap_or(name);
        variables.insert(bare.to_owned(), value.clone());
    }
    Value::Object(variables)
}

#[cfg(test)]
mod tests;
