// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;
use serde_json::json;

use super::fixtures::pokemon_schema;
use super::{merged_headers, CachedSchema, SchemaBuildError};
use crate::model::OperationType;

#[test]
fn root_type_names_follow_schema_definition() {
    let schema = pokemon_schema();
    assert_eq!(schema.root_type_name(OperationType::Query), Some("Query"));
    assert_eq!(schema.root_type_name(OperationType::Mutation), Some("Mutation"));
    assert_eq!(schema.root_type_name(OperationType::Subscription), None);
}

#[test]
fn field_def_resolves_object_fields() {
    let schema = pokemon_schema();
    let field = schema.field_def("Query", "pokemons").expect("field");
    assert_eq!(field.name.as_str(), "pokemons");
    assert_eq!(schema.field_base_type(field), "Pokemon");

    assert!(schema.field_def("Query", "pokemn").is_none());
    assert!(schema.field_def("NoSuchType", "pokemons").is_none());
}

#[test]
fn field_names_cover_composites_only() {
    let schema = pokemon_schema();
    let names = schema.field_names("Query");
    assert_eq!(names, ["pokemons", "pokemon", "trainers"]);
    assert!(schema.field_names("PokemonKind").is_empty());
}

#[test]
fn argument_type_navigates_nested_fields() {
    let schema = pokemon_schema();
    assert_eq!(
        schema.argument_type("Query", &["pokemons"], "first").as_deref(),
        Some("Int")
    );
    assert_eq!(
        schema.argument_type("Query", &["pokemons", "evolutions"], "first").as_deref(),
        Some("Int")
    );
    assert_eq!(
        schema.argument_type("Mutation", &["renamePokemon"], "name").as_deref(),
        Some("String!")
    );
    assert_eq!(schema.argument_type("Query", &["pokemons"], "nope"), None);
    assert_eq!(schema.argument_type("Query", &["nope"], "first"), None);
}

#[test]
fn from_introspection_builds_a_queryable_schema() {
    let data = json!({
        "__schema": {
            "queryType": { "name": "Query" },
            "types": [
                {
                    "kind": "OBJECT",
                    "name": "Query",
                    "fields": [
                        {
                            "name": "greeting",
                            "args": [
                                {
                                    "name": "loud",
                                    "type": { "kind": "SCALAR", "name": "Boolean" },
                                    "defaultValue": "false"
                                }
                            ],
                            "type": { "kind": "SCALAR", "name": "String" }
                        }
                    ]
                }
            ]
        }
    });

    let schema = CachedSchema::from_introspection(&data).expect("schema");
    assert_eq!(schema.root_type_name(OperationType::Query), Some("Query"));
    assert!(schema.field_def("Query", "greeting").is_some());
    assert_eq!(schema.raw_introspection(), &data);
}

#[test]
fn from_introspection_requires_schema_object() {
    assert_eq!(
        CachedSchema::from_introspection(&json!({})).expect_err("must fail"),
        SchemaBuildError::MissingSchemaObject
    );
}

#[test]
fn merged_headers_let_session_win() {
    let mut defaults = IndexMap::new();
    defaults.insert("authorization".to_owned(), "Bearer env".to_owned());
    defaults.insert("x-default".to_owned(), "1".to_owned());

    let mut session = IndexMap::new();
    session.insert("authorization".to_owned(), "Bearer session".to_owned());

    let merged = merged_headers(&defaults, &session);
    assert_eq!(merged.get("authorization").map(String::as_str), Some("Bearer session"));
    assert_eq!(merged.get("x-default").map(String::as_str), Some("1"));
}
