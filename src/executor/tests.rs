// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use indexmap::IndexMap;
use serde_json::json;

use super::{validate_state, Executor};
use crate::error::ErrorKind;
use crate::model::{ArgValue, FieldNode, OperationType, QueryState};
use crate::schema::fixtures::pokemon_schema;

fn state_selecting(field_name: &str) -> QueryState {
    let mut state = QueryState::new(IndexMap::new(), OperationType::Query, "Query");
    let mut field = FieldNode::new(field_name, None);
    field.fields_mut().insert("name".to_owned(), FieldNode::new("name", None));
    state.query_structure_mut().fields_mut().insert(field_name.to_owned(), field);
    state
}

#[test]
fn valid_state_produces_clean_report() {
    let schema = pokemon_schema();
    let report = validate_state(&state_selecting("pokemons"), &schema);
    assert!(report.is_valid(), "errors: {:?}", report.errors);
    assert!(report.query.contains("pokemons"));
}

#[test]
fn empty_state_reports_missing_selections() {
    let schema = pokemon_schema();
    let state = QueryState::new(IndexMap::new(), OperationType::Query, "Query");
    let report = validate_state(&state, &schema);
    assert!(!report.is_valid());
    assert_eq!(report.query, "");
}

#[test]
fn unknown_field_fails_schema_validation() {
    let schema = pokemon_schema();
    let report = validate_state(&state_selecting("nonexistent"), &schema);
    assert!(!report.is_valid());
}

#[test]
fn required_argument_gaps_surface_as_warnings_not_errors() {
    let schema = pokemon_schema();
    let mut state = QueryState::new(IndexMap::new(), OperationType::Query, "Query");
    let mut pokemon = FieldNode::new("pokemon", None);
    pokemon.fields_mut().insert("name".to_owned(), FieldNode::new("name", None));
    state.query_structure_mut().fields_mut().insert("pokemon".to_owned(), pokemon);

    let report = validate_state(&state, &schema);
    // Schema validation also flags the missing required argument as an error;
    // the dedicated warning names the exact field and argument.
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.contains("missing required argument 'id'")));
}

#[tokio::test]
async fn execute_rejects_invalid_state_before_any_network_call() {
    let schema = pokemon_schema();
    let executor = Executor::new(reqwest::Client::new());

    let err = executor
        .execute(
            &state_selecting("nonexistent"),
            &schema,
            "http://127.0.0.1:1/graphql",
            &IndexMap::new(),
            Duration::from_secs(1),
        )
        .await
        .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[tokio::test]
async fn execute_rejects_empty_state() {
    let schema = pokemon_schema();
    let executor = Executor::new(reqwest::Client::new());
    let state = QueryState::new(IndexMap::new(), OperationType::Query, "Query");

    let err = executor
        .execute(
            &state,
            &schema,
            "http://127.0.0.1:1/graphql",
            &IndexMap::new(),
            Duration::from_secs(1),
        )
        .await
        .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn variables_are_posted_with_bare_names() {
    let mut state = state_selecting("pokemons");
    state.variables_schema_mut().insert("$first".to_owned(), "Int".to_owned());
    state.variables_values_mut().insert("$first".to_owned(), json!(10));
    state
        .query_structure_mut()
        .fields_mut()
        .get_mut("pokemons")
        .expect("node")
        .args_mut()
        .insert("first".to_owned(), ArgValue::Variable { name: "$first".to_owned() });

    let variables = super::variables_object(&state);
    assert_eq!(variables, json!({ "first": 10 }));
}
