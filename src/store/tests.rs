// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;
use serde_json::json;

use super::SessionStore;
use crate::model::{ArgValue, FieldNode, OperationType, QueryState, SessionId};

fn sample_state() -> QueryState {
    let mut headers = IndexMap::new();
    headers.insert("x-api-key".to_owned(), "secret".to_owned());

    let mut state = QueryState::new(headers, OperationType::Query, "Query");
    let mut pokemons = FieldNode::new("pokemons", None);
    pokemons.args_mut().insert(
        "first".to_owned(),
        ArgValue::Typed { value: json!(10), type_name: "Int".to_owned() },
    );
    state.query_structure_mut().fields_mut().insert("pokemons".to_owned(), pokemons);
    state.variables_schema_mut().insert("$n".to_owned(), "Int".to_owned());
    state
}

#[tokio::test]
async fn memory_round_trip_preserves_state_byte_for_byte() {
    let store = SessionStore::memory_only();
    let session_id = SessionId::random();
    let state = sample_state();

    store.save(&session_id, &state).await.expect("save");
    let loaded = store.load(&session_id).await.expect("load").expect("present");

    assert_eq!(loaded, state);
    assert_eq!(
        serde_json::to_string(&loaded).expect("serialize"),
        serde_json::to_string(&state).expect("serialize"),
    );
}

#[tokio::test]
async fn load_of_unknown_session_is_none() {
    let store = SessionStore::memory_only();
    assert!(store.load(&SessionId::random()).await.expect("load").is_none());
}

#[tokio::test]
async fn delete_removes_the_session() {
    let store = SessionStore::memory_only();
    let session_id = SessionId::random();
    store.save(&session_id, &sample_state()).await.expect("save");

    store.delete(&session_id).await.expect("delete");
    assert!(store.load(&session_id).await.expect("load").is_none());
}

#[tokio::test]
async fn save_overwrites_previous_state() {
    let store = SessionStore::memory_only();
    let session_id = SessionId::random();

    let mut first = sample_state();
    store.save(&session_id, &first).await.expect("save");

    first.set_operation_name(Some("Renamed".to_owned()));
    store.save(&session_id, &first).await.expect("save again");

    let loaded = store.load(&session_id).await.expect("load").expect("present");
    assert_eq!(loaded.operation_name(), Some("Renamed"));
}

#[tokio::test]
async fn unreachable_redis_falls_back_to_memory() {
    // Port 1 refuses connections immediately; init must degrade, not fail.
    let store = SessionStore::new(Some("redis://127.0.0.1:1/".to_owned()));
    let session_id = SessionId::random();
    let state = sample_state();

    store.save(&session_id, &state).await.expect("save");
    let loaded = store.load(&session_id).await.expect("load").expect("present");
    assert_eq!(loaded, state);
}
