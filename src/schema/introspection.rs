// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The standard introspection query and its JSON-to-SDL translation.
//!
//! The upstream answers introspection with JSON; apollo-compiler wants SDL.
//! The translation keeps exactly what validation needs (type system shape,
//! argument defaults, custom directives) and drops descriptions and
//! deprecation metadata.

use std::fmt;
use std::fmt::Write as _;

use serde_json::Value;

pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      kind
      name
      fields(includeDeprecated: true) {
        name
        args { ...InputValue }
        type { ...TypeRef }
      }
      inputFields { ...InputValue }
      interfaces { ...TypeRef }
      enumValues(includeDeprecated: true) { name }
      possibleTypes { ...TypeRef }
    }
    directives {
      name
      locations
      args { ...InputValue }
    }
  }
}

fragment InputValue on __InputValue {
  name
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType { kind name }
            }
          }
        }
      }
    }
  }
}
"#;

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];
const BUILTIN_DIRECTIVES: [&str; 4] = ["skip", "include", "deprecated", "specifiedBy"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    MissingField(&'static str),
    BadTypeRef,
    UnknownTypeKind(String),
}

impl fmt::Display for IntrospectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => {
                write!(f, "introspection result is missing '{field}'")
            }
            Self::BadTypeRef => f.write_str("introspection type reference cannot be resolved"),
            Self::UnknownTypeKind(kind) => {
                write!(f, "introspection reports unknown type kind '{kind}'")
            }
        }
    }
}

impl std::error::Error for IntrospectionError {}

/// Renders the `__schema` object of an introspection result as SDL.
pub fn introspection_to_sdl(schema_json: &Value) -> Result<String, IntrospectionError> {
    let mut sdl = String::new();

    let root_name = |key: &'static str| -> Option<&str> {
        schema_json.get(key).and_then(|t| t.get("name")).and_then(Value::as_str)
    };
    let query_type = root_name("queryType").ok_or(IntrospectionError::MissingField("queryType"))?;

    sdl.push_str("schema {\n");
    writeln!(sdl, "  query: {query_type}").expect("write to string");
    if let Some(mutation_type) = root_name("mutationType") {
        writeln!(sdl, "  mutation: {mutation_type}").expect("write to string");
    }
    if let Some(subscription_type) = root_name("subscriptionType") {
        writeln!(sdl, "  subscription: {subscription_type}").expect("write to string");
    }
    sdl.push_str("}\n");

    for directive in schema_json
        .get("directives")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let name = directive
            .get("name")
            .and_then(Value::as_str)
            .ok_or(IntrospectionError::MissingField("directives[].name"))?;
        if BUILTIN_DIRECTIVES.contains(&name) {
            continue;
        }
        let locations = directive
            .get("locations")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>();
        if locations.is_empty() {
            continue;
        }

        sdl.push('\n');
        write!(sdl, "directive @{name}").expect("write to string");
        write_arguments(&mut sdl, directive.get("args"))?;
        writeln!(sdl, " on {}", locations.join(" | ")).expect("write to string");
    }

    let types = schema_json
        .get("types")
        .and_then(Value::as_array)
        .ok_or(IntrospectionError::MissingField("types"))?;

    for ty in types {
        let Some(name) = ty.get("name").and_then(Value::as_str) else {
            continue;
        };
        if name.starts_with("__") || BUILTIN_SCALARS.contains(&name) {
            continue;
        }
        let kind = ty
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(IntrospectionError::MissingField("types[].kind"))?;

        sdl.push('\n');
        match kind {
            "SCALAR" => {
                writeln!(sdl, "scalar {name}").expect("write to string");
            }
            "OBJECT" | "INTERFACE" => {
                let keyword = if kind == "OBJECT" { "type" } else { "interface" };
                write!(sdl, "{keyword} {name}").expect("write to string");
                write_implements(&mut sdl, ty.get("interfaces"))?;
                write_fields(&mut sdl, ty.get("fields"))?;
            }
            "UNION" => {
                let members = ty
                    .get("possibleTypes")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|member| member.get("name").and_then(Value::as_str))
                    .collect::<Vec<_>>();
                writeln!(sdl, "union {name} = {}", members.join(" | ")).expect("write to string");
            }
            "ENUM" => {
                writeln!(sdl, "enum {name} {{").expect("write to string");
                for member in ty
                    .get("enumValues")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default()
                {
                    if let Some(member_name) = member.get("name").and_then(Value::as_str) {
                        writeln!(sdl, "  {member_name}").expect("write to string");
                    }
                }
                sdl.push_str("}\n");
            }
            "INPUT_OBJECT" => {
                writeln!(sdl, "input {name} {{").expect("write to string");
                for input_field in ty
                    .get("inputFields")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default()
                {
                    sdl.push_str("  ");
                    write_input_value(&mut sdl, input_field)?;
                    sdl.push('\n');
                }
                sdl.push_str("}\n");
            }
            other => return Err(IntrospectionError::UnknownTypeKind(other.to_owned())),
        }
    }

    Ok(sdl)
}

fn write_implements(
    sdl: &mut String,
    interfaces: Option<&Value>,
) -> Result<(), IntrospectionError> {
    let names = interfaces
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|interface| interface.get("name").and_then(Value::as_str))
        .collect::<Vec<_>>();
    if !names.is_empty() {
        write!(sdl, " implements {}", names.join(" & ")).expect("write to string");
    }
    Ok(())
}

fn write_fields(sdl: &mut String, fields: Option<&Value>) -> Result<(), IntrospectionError> {
    let fields = fields.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    if fields.is_empty() {
        sdl.push('\n');
        return Ok(());
    }

    sdl.push_str(" {\n");
    for field in fields {
        let name = field
            .get("name")
            .and_then(Value::as_str)
            .ok_or(IntrospectionError::MissingField("fields[].name"))?;
        write!(sdl, "  {name}").expect("write to string");
        write_arguments(sdl, field.get("args"))?;
        let ty = type_ref_to_string(
            field.get("type").ok_or(IntrospectionError::MissingField("fields[].type"))?,
        )?;
        writeln!(sdl, ": {ty}").expect("write to string");
    }
    sdl.push_str("}\n");
    Ok(())
}

fn write_arguments(sdl: &mut String, args: Option<&Value>) -> Result<(), IntrospectionError> {
    let args = args.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    if args.is_empty() {
        return Ok(());
    }

    sdl.push('(');
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            sdl.push_str(", ");
        }
        write_input_value(sdl, arg)?;
    }
    sdl.push(')');
    Ok(())
}

fn write_input_value(sdl: &mut String, input: &Value) -> Result<(), IntrospectionError> {
    let name = input
        .get("name")
        .and_then(Value::as_str)
        .ok_or(IntrospectionError::MissingField("args[].name"))?;
    let ty = type_ref_to_string(
        input.get("type").ok_or(IntrospectionError::MissingField("args[].type"))?,
    )?;
    write!(sdl, "{name}: {ty}").expect("write to string");

    // defaultValue arrives as a GraphQL literal string; emit it verbatim.
    if let Some(default) = input.get("defaultValue").and_then(Value::as_str) {
        write!(sdl, " = {default}").expect("write to string");
    }
    Ok(())
}

pub fn type_ref_to_string(type_ref: &Value) -> Result<String, IntrospectionError> {
    match type_ref.get("kind").and_then(Value::as_str) {
        Some("NON_NULL") => {
            let inner =
                type_ref.get("ofType").ok_or(IntrospectionError::BadTypeRef)?;
            Ok(format!("{}!", type_ref_to_string(inner)?))
        }
        Some("LIST") => {
            let inner =
                type_ref.get("ofType").ok_or(IntrospectionError::BadTypeRef)?;
            Ok(format!("[{}]", type_ref_to_string(inner)?))
        }
        Some(_) => type_ref
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(IntrospectionError::BadTypeRef),
        None => Err(IntrospectionError::BadTypeRef),
    }
}
