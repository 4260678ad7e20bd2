// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;
use serde_json::json;

use super::{quote_graphql_string, render_arg_value, render_document, serialize_graphql_value};
use crate::model::{
    ArgValue, Directive, DirectiveArgument, FieldNode, FragmentDef, InlineFragment, OperationType,
    QueryState,
};
use crate::validate::validate_query_syntax;

fn empty_state() -> QueryState {
    QueryState::new(IndexMap::new(), OperationType::Query, "Query")
}

#[test]
fn empty_state_renders_empty_string() {
    assert_eq!(render_document(&empty_state()), "");
}

#[test]
fn renders_simple_query_with_typed_argument() {
    let mut state = empty_state();
    let mut pokemons = FieldNode::new("pokemons", None);
    pokemons.args_mut().insert(
        "first".to_owned(),
        ArgValue::Typed { value: json!(10), type_name: "Int".to_owned() },
    );
    pokemons.fields_mut().insert("name".to_owned(), FieldNode::new("name", None));
    state.query_structure_mut().fields_mut().insert("pokemons".to_owned(), pokemons);

    assert_eq!(
        render_document(&state),
        "query {\n  pokemons(first: 10) {\n    name\n  }\n}"
    );
}

#[test]
fn renders_variable_definitions_without_operation_name() {
    let mut state = empty_state();
    state.variables_schema_mut().insert("$n".to_owned(), "Int".to_owned());

    let mut pokemons = FieldNode::new("pokemons", None);
    pokemons
        .args_mut()
        .insert("first".to_owned(), ArgValue::Variable { name: "$n".to_owned() });
    state.query_structure_mut().fields_mut().insert("pokemons".to_owned(), pokemons);

    let document = render_document(&state);
    assert!(document.starts_with("query ($n: Int) {"), "got: {document}");
    assert!(document.contains("pokemons(first: $n)"), "got: {document}");
}

#[test]
fn renders_operation_name_variables_and_defaults() {
    let mut state = empty_state();
    state.set_operation_name(Some("FetchPokemons".to_owned()));
    state.variables_schema_mut().insert("$first".to_owned(), "Int".to_owned());
    state.variables_schema_mut().insert("$kinds".to_owned(), "[PokemonKind!]".to_owned());
    state.variables_defaults_mut().insert("$first".to_owned(), json!(10));

    state
        .query_structure_mut()
        .fields_mut()
        .insert("pokemons".to_owned(), FieldNode::new("pokemons", None));

    let document = render_document(&state);
    assert!(
        document.starts_with("query FetchPokemons($first: Int = 10, $kinds: [PokemonKind!]) {"),
        "got: {document}"
    );
}

#[test]
fn renders_aliases_directives_spreads_and_inline_fragments() {
    let mut state = empty_state();

    let mut pokemons = FieldNode::new("pokemons", Some("critters".to_owned()));
    pokemons.directives_mut().push(Directive {
        name: "include".to_owned(),
        arguments: vec![DirectiveArgument {
            name: "if".to_owned(),
            value: ArgValue::Variable { name: "$withPokemons".to_owned() },
        }],
    });
    pokemons.fields_mut().insert("name".to_owned(), FieldNode::new("name", None));
    pokemons.fragment_spreads_mut().push("PokemonBits".to_owned());
    pokemons.inline_fragments_mut().push(InlineFragment {
        on_type: "Pokemon".to_owned(),
        selections: IndexMap::from([("id".to_owned(), FieldNode::new("id", None))]),
    });
    state.query_structure_mut().fields_mut().insert("critters".to_owned(), pokemons);

    state.fragments_mut().insert(
        "PokemonBits".to_owned(),
        FragmentDef {
            on_type: "Pokemon".to_owned(),
            fields: IndexMap::from([("number".to_owned(), FieldNode::new("number", None))]),
        },
    );

    let expected = "query {\n\
                    \x20 critters: pokemons @include(if: $withPokemons) {\n\
                    \x20   name\n\
                    \x20   ...PokemonBits\n\
                    \x20   ... on Pokemon {\n\
                    \x20     id\n\
                    \x20   }\n\
                    \x20 }\n\
                    }\n\
                    \n\
                    fragment PokemonBits on Pokemon {\n\
                    \x20 number\n\
                    }";
    assert_eq!(render_document(&state), expected);
}

#[test]
fn empty_inline_fragments_do_not_render() {
    let mut state = empty_state();
    let mut pokemons = FieldNode::new("pokemons", None);
    pokemons.fields_mut().insert("name".to_owned(), FieldNode::new("name", None));
    pokemons.inline_fragments_mut().push(InlineFragment {
        on_type: "Pokemon".to_owned(),
        selections: IndexMap::new(),
    });
    state.query_structure_mut().fields_mut().insert("pokemons".to_owned(), pokemons);

    let document = render_document(&state);
    assert!(!document.contains("... on"), "got: {document}");
    assert!(validate_query_syntax(&document).is_empty(), "got: {document}");
}

#[test]
fn field_with_only_an_empty_inline_fragment_renders_as_a_leaf() {
    let mut state = empty_state();
    let mut pokemons = FieldNode::new("pokemons", None);
    pokemons.inline_fragments_mut().push(InlineFragment {
        on_type: "Pokemon".to_owned(),
        selections: IndexMap::new(),
    });
    state.query_structure_mut().fields_mut().insert("pokemons".to_owned(), pokemons);

    assert_eq!(render_document(&state), "query {\n  pokemons\n}");
}

#[test]
fn fragment_only_state_renders_definitions_without_an_operation() {
    let mut state = empty_state();
    state.fragments_mut().insert(
        "Bits".to_owned(),
        FragmentDef {
            on_type: "Pokemon".to_owned(),
            fields: IndexMap::from([("name".to_owned(), FieldNode::new("name", None))]),
        },
    );

    let document = render_document(&state);
    assert_eq!(document, "fragment Bits on Pokemon {\n  name\n}");
    assert!(validate_query_syntax(&document).is_empty(), "got: {document}");
}

#[test]
fn renders_operation_directives_after_variables() {
    let mut state = empty_state();
    state.operation_directives_mut().push(Directive {
        name: "cached".to_owned(),
        arguments: vec![DirectiveArgument {
            name: "ttl".to_owned(),
            value: ArgValue::Raw { value: json!(60) },
        }],
    });
    state
        .query_structure_mut()
        .fields_mut()
        .insert("pokemons".to_owned(), FieldNode::new("pokemons", None));

    assert_eq!(render_document(&state), "query @cached(ttl: 60) {\n  pokemons\n}");
}

#[test]
fn rendered_documents_parse_cleanly() {
    let mut state = empty_state();
    state.set_operation_name(Some("Big".to_owned()));
    state.variables_schema_mut().insert("$id".to_owned(), "ID!".to_owned());

    let mut pokemon = FieldNode::new("pokemon", None);
    pokemon.args_mut().insert("id".to_owned(), ArgValue::Variable { name: "$id".to_owned() });
    let mut evolutions = FieldNode::new("evolutions", None);
    evolutions.args_mut().insert(
        "first".to_owned(),
        ArgValue::Typed { value: json!("5"), type_name: "Int".to_owned() },
    );
    evolutions.fields_mut().insert("name".to_owned(), FieldNode::new("name", None));
    pokemon.fields_mut().insert("evolutions".to_owned(), evolutions);
    state.query_structure_mut().fields_mut().insert("pokemon".to_owned(), pokemon);

    let document = render_document(&state);
    assert!(
        validate_query_syntax(&document).is_empty(),
        "rendered document must parse: {document}"
    );
    assert!(document.contains("evolutions(first: 5)"), "typed string prints as Int: {document}");
}

#[test]
fn arg_value_variants_render_distinctly() {
    assert_eq!(render_arg_value(&ArgValue::Variable { name: "$id".to_owned() }), "$id");
    assert_eq!(render_arg_value(&ArgValue::Enum { symbol: "FIRE".to_owned() }), "FIRE");
    assert_eq!(
        render_arg_value(&ArgValue::Typed { value: json!(true), type_name: "Boolean".to_owned() }),
        "true"
    );
    assert_eq!(
        render_arg_value(&ArgValue::Raw { value: json!("water") }),
        "\"water\""
    );
    assert_eq!(
        render_arg_value(&ArgValue::PreQuoted { text: "as-is".to_owned() }),
        "\"as-is\""
    );
}

#[test]
fn serialize_value_covers_graphql_literals() {
    assert_eq!(serialize_graphql_value(&json!(null)), "null");
    assert_eq!(serialize_graphql_value(&json!(true)), "true");
    assert_eq!(serialize_graphql_value(&json!(42)), "42");
    assert_eq!(serialize_graphql_value(&json!(4.5)), "4.5");
    assert_eq!(serialize_graphql_value(&json!("text")), "\"text\"");
    assert_eq!(serialize_graphql_value(&json!("$var")), "$var");
    assert_eq!(serialize_graphql_value(&json!([1, "two"])), "[1, \"two\"]");
    assert_eq!(
        serialize_graphql_value(&json!({"nameContains": "chu"})),
        "{nameContains: \"chu\"}"
    );
    let two_keys = serialize_graphql_value(&json!({"nameContains": "chu", "limit": 3}));
    assert!(two_keys.starts_with('{') && two_keys.ends_with('}'));
    assert!(two_keys.contains("limit: 3") && two_keys.contains("nameContains: \"chu\""));
    assert_eq!(
        serialize_graphql_value(&json!({"__graphqlString": "pre quoted"})),
        "\"pre quoted\""
    );
}

#[test]
fn serialization_is_idempotent_for_plain_scalars() {
    // Quoting a rendered literal again must not double-escape.
    let first = quote_graphql_string("line\nbreak \"quoted\"");
    assert_eq!(first, "\"line\\nbreak \\\"quoted\\\"\"");

    let prequoted = ArgValue::PreQuoted { text: "stable".to_owned() };
    assert_eq!(render_arg_value(&prequoted), render_arg_value(&prequoted));
}

#[test]
fn quote_escapes_control_characters() {
    assert_eq!(quote_graphql_string("bell\u{0007}"), "\"bell\\u0007\"");
    assert_eq!(quote_graphql_string("tab\there"), "\"tab\\there\"");
}
