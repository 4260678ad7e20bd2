// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deterministic rendering of a [`QueryState`] into a GraphQL document.
//!
//! Insertion order is the only order: variables, arguments, selections, and
//! fragments print exactly as the agent added them, so the same state always
//! renders to the same text.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde_json::Value;

use crate::model::{
    ArgValue, Directive, FieldNode, InlineFragment, QueryState, GRAPHQL_STRING_MARKER,
};
use crate::validate::{coerce_to_boolean, coerce_to_float, coerce_to_integer};

const INDENT: &str = "  ";

/// True when the node contributes rendered selections. Inline fragments
/// count only once they hold fields, so no empty `{ }` block can form.
fn has_renderable_selections(node: &FieldNode) -> bool {
    !node.fields().is_empty()
        || !node.fragment_spreads().is_empty()
        || node.inline_fragments().iter().any(|inline| !inline.selections.is_empty())
}

/// Renders the whole document: operation header, selection set, fragment
/// definitions. Returns the empty string when there is nothing to render.
///
/// The operation block is emitted only once the root has renderable
/// selections; a state holding only fragment definitions renders them alone
/// (still a parseable document).
pub fn render_document(state: &QueryState) -> String {
    let mut out = String::new();

    if has_renderable_selections(state.query_structure()) {
        out.push_str(state.operation_type().as_str());

        if let Some(name) = state.operation_name() {
            out.push(' ');
            out.push_str(name);
        }

        if !state.variables_schema().is_empty() {
            let defs = state
                .variables_schema()
                .iter()
                .map(|(name, type_string)| {
                    let bare = name.strip_prefix('$').unwrap_or(name);
                    match state.variables_defaults().get(name) {
                        Some(default) => {
                            format!("${bare}: {type_string} = {}", serialize_graphql_value(default))
                        }
                        None => format!("${bare}: {type_string}"),
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            if state.operation_name().is_none() {
                out.push(' ');
            }
            write!(out, "({defs})").expect("write to string");
        }

        for directive in state.operation_directives() {
            out.push(' ');
            out.push_str(&render_directive(directive));
        }

        out.push_str(" {\n");
        render_selections(
            &mut out,
            state.query_structure().fields(),
            state.query_structure().fragment_spreads(),
            state.query_structure().inline_fragments(),
            1,
        );
        out.push('}');
    }

    for (name, fragment) in state.fragments() {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        write!(out, "fragment {name} on {} {{\n", fragment.on_type).expect("write to string");
        render_selections(&mut out, &fragment.fields, &[], &[], 1);
        out.push('}');
    }

    out.trim_end().to_owned()
}

fn render_selections(
    out: &mut String,
    fields: &IndexMap<String, FieldNode>,
    fragment_spreads: &[String],
    inline_fragments: &[InlineFragment],
    depth: usize,
) {
    let indent = INDENT.repeat(depth);

    for node in fields.values() {
        render_field(out, node, depth);
    }
    for spread in fragment_spreads {
        writeln!(out, "{indent}...{spread}").expect("write to string");
    }
    for inline in inline_fragments {
        // An empty selection set would not parse; skip until fields arrive.
        if inline.selections.is_empty() {
            continue;
        }
        writeln!(out, "{indent}... on {} {{", inline.on_type).expect("write to string");
        render_selections(out, &inline.selections, &[], &[], depth + 1);
        writeln!(out, "{indent}}}").expect("write to string");
    }
}

fn render_field(out: &mut String, node: &FieldNode, depth: usize) {
    let indent = INDENT.repeat(depth);
    out.push_str(&indent);

    if let Some(alias) = node.alias() {
        write!(out, "{alias}: ").expect("write to string");
    }
    out.push_str(node.field_name());

    if !node.args().is_empty() {
        let args = node
            .args()
            .iter()
            .map(|(name, value)| format!("{name}: {}", render_arg_value(value)))
            .collect::<Vec<_>>()
            .join(", ");
        write!(out, "({args})").expect("write to string");
    }

    for directive in node.directives() {
        out.push(' ');
        out.push_str(&render_directive(directive));
    }

    if has_renderable_selections(node) {
        out.push_str(" {\n");
        render_selections(
            out,
            node.fields(),
            node.fragment_spreads(),
            node.inline_fragments(),
            depth + 1,
        );
        out.push_str(&indent);
        out.push_str("}\n");
    } else {
        out.push('\n');
    }
}

fn render_directive(directive: &Directive) -> String {
    let name = directive.name.strip_prefix('@').unwrap_or(&directive.name);
    if directive.arguments.is_empty() {
        return format!("@{name}");
    }
    let args = directive
        .arguments
        .iter()
        .map(|arg| format!("{}: {}", arg.name, render_arg_value(&arg.value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("@{name}({args})")
}

/// Prints one argument value according to its variant.
pub fn render_arg_value(value: &ArgValue) -> String {
    match value {
        ArgValue::Variable { name } => name.clone(),
        ArgValue::Enum { symbol } => symbol.clone(),
        ArgValue::Typed { value, type_name } => render_typed_value(value, type_name),
        ArgValue::Raw { value } => serialize_graphql_value(value),
        ArgValue::PreQuoted { text } => quote_graphql_string(text),
    }
}

/// Scalar-aware printing for typed values: a string that was accepted for an
/// Int/Float/Boolean argument prints as the scalar, not as a quoted string.
fn render_typed_value(value: &Value, type_name: &str) -> String {
    let base = type_name.trim_matches(|c| matches!(c, '[' | ']' | '!'));
    match base {
        "Int" => coerce_to_integer(value)
            .map(|int| int.to_string())
            .unwrap_or_else(|| serialize_graphql_value(value)),
        "Float" => coerce_to_float(value)
            .map(|float| format_float(float))
            .unwrap_or_else(|| serialize_graphql_value(value)),
        "Boolean" => coerce_to_boolean(value)
            .map(|flag| flag.to_string())
            .unwrap_or_else(|| serialize_graphql_value(value)),
        _ => serialize_graphql_value(value),
    }
}

/// GraphQL-literal printing for a loose JSON value.
///
/// Strings starting with `$` print verbatim (variable references); an object
/// whose only key is the `__graphqlString` marker prints as the quoted inner
/// string; everything else follows GraphQL literal syntax.
pub fn serialize_graphql_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(unsigned) = number.as_u64() {
                unsigned.to_string()
            } else {
                format_float(number.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(raw) => {
            if raw.starts_with('$') {
                raw.clone()
            } else {
                quote_graphql_string(raw)
            }
        }
        Value::Array(items) => {
            let rendered =
                items.iter().map(serialize_graphql_value).collect::<Vec<_>>().join(", ");
            format!("[{rendered}]")
        }
        Value::Object(entries) => {
            if entries.len() == 1 {
                if let Some(Value::String(text)) = entries.get(GRAPHQL_STRING_MARKER) {
                    return quote_graphql_string(text);
                }
            }
            let rendered = entries
                .iter()
                .map(|(key, item)| format!("{key}: {}", serialize_graphql_value(item)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{rendered}}}")
        }
    }
}

fn format_float(float: f64) -> String {
    format!("{float}")
}

/// GraphQL String literal quoting.
pub fn quote_graphql_string(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                write!(quoted, "\\u{:04x}", c as u32).expect("write to string");
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests;
