// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared test schema. Small enough to read, rich enough to exercise
//! arguments, enums, input objects, nesting, and both operation roots.

use super::CachedSchema;

pub(crate) const POKEMON_SDL: &str = r#"
schema {
  query: Query
  mutation: Mutation
}

type Query {
  pokemons(first: Int, last: Int, filter: PokemonFilter): [Pokemon]
  pokemon(id: ID!): Pokemon
  trainers: [Trainer]
}

type Mutation {
  renamePokemon(id: ID!, name: String!): Pokemon
}

type Pokemon {
  id: ID!
  name: String
  number: Int
  kind: PokemonKind
  evolutions(first: Int): [Pokemon]
  attacks(limit: Int): [Attack]
}

type Attack {
  name: String
  damage: Int
}

type Trainer {
  name: String
  team(first: Int): [Pokemon]
}

enum PokemonKind {
  FIRE
  WATER
  GRASS
}

input PokemonFilter {
  nameContains: String
  kinds: [PokemonKind]
}
"#;

pub(crate) fn pokemon_schema() -> CachedSchema {
    CachedSchema::from_sdl(POKEMON_SDL).expect("fixture schema parses")
}
