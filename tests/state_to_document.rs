// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end over the public API: build a state the way the tools do,
//! render it, and confirm the document parses and validates.

use indexmap::IndexMap;
use serde_json::json;

use querysculptor::model::{
    ArgValue, Directive, DirectiveArgument, FieldNode, FragmentDef, OperationType, QueryState,
};
use querysculptor::render::render_document;
use querysculptor::schema::CachedSchema;
use querysculptor::validate::{validate_against_schema, validate_query_syntax};

const SDL: &str = r#"
schema {
  query: Query
}

type Query {
  pokemons(first: Int, kind: PokemonKind): [Pokemon]
}

type Pokemon {
  id: ID!
  name: String
  kind: PokemonKind
  evolutions(first: Int): [Pokemon]
}

enum PokemonKind {
  FIRE
  WATER
  GRASS
}
"#;

fn full_state() -> QueryState {
    let mut state = QueryState::new(IndexMap::new(), OperationType::Query, "Query");
    state.set_operation_name(Some("Dex".to_owned()));
    state.variables_schema_mut().insert("$first".to_owned(), "Int".to_owned());
    state.variables_defaults_mut().insert("$first".to_owned(), json!(10));
    state.variables_values_mut().insert("$first".to_owned(), json!(3));

    let mut pokemons = FieldNode::new("pokemons", Some("starters".to_owned()));
    pokemons
        .args_mut()
        .insert("first".to_owned(), ArgValue::Variable { name: "$first".to_owned() });
    pokemons
        .args_mut()
        .insert("kind".to_owned(), ArgValue::Enum { symbol: "FIRE".to_owned() });
    pokemons.directives_mut().push(Directive {
        name: "skip".to_owned(),
        arguments: vec![DirectiveArgument {
            name: "if".to_owned(),
            value: ArgValue::Raw { value: json!(false) },
        }],
    });
    pokemons.fields_mut().insert("name".to_owned(), FieldNode::new("name", None));

    let mut evolutions = FieldNode::new("evolutions", None);
    evolutions.args_mut().insert(
        "first".to_owned(),
        ArgValue::Typed { value: json!("2"), type_name: "Int".to_owned() },
    );
    evolutions.fields_mut().insert("id".to_owned(), FieldNode::new("id", None));
    pokemons.fields_mut().insert("evolutions".to_owned(), evolutions);

    pokemons.fragment_spreads_mut().push("Basics".to_owned());
    state.query_structure_mut().fields_mut().insert("starters".to_owned(), pokemons);

    state.fragments_mut().insert(
        "Basics".to_owned(),
        FragmentDef {
            on_type: "Pokemon".to_owned(),
            fields: IndexMap::from([
                ("id".to_owned(), FieldNode::new("id", None)),
                ("kind".to_owned(), FieldNode::new("kind", None)),
            ]),
        },
    );

    state
}

#[test]
fn rendered_state_parses_and_validates_against_the_schema() {
    let schema = CachedSchema::from_sdl(SDL).expect("schema");
    let state = full_state();

    let document = render_document(&state);
    assert!(
        validate_query_syntax(&document).is_empty(),
        "must parse, got: {document}"
    );
    assert!(
        validate_against_schema(&document, schema.schema()).is_empty(),
        "must validate, got: {document}"
    );
}

#[test]
fn state_survives_a_json_round_trip_and_renders_identically() {
    let state = full_state();
    let encoded = serde_json::to_string(&state).expect("serialize");
    let decoded: QueryState = serde_json::from_str(&encoded).expect("deserialize");

    assert_eq!(decoded, state);
    assert_eq!(render_document(&decoded), render_document(&state));
}

#[test]
fn rendered_document_pins_the_expected_shape() {
    let document = render_document(&full_state());
    assert!(
        document.starts_with("query Dex($first: Int = 10) {"),
        "header: {document}"
    );
    assert!(document.contains("starters: pokemons(first: $first, kind: FIRE) @skip(if: false) {"));
    assert!(document.contains("evolutions(first: 2) {"));
    assert!(document.contains("...Basics"));
    assert!(document.ends_with("fragment Basics on Pokemon {\n  id\n  kind\n}"));
}
