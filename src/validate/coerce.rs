// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scalar coercions.
//!
//! Used twice: once to check values against declared types, and once to warn
//! an agent that a string it sent ("42") would usually be a typed scalar.

use serde_json::Value;

/// Integer numbers, or strings whose base-10 parse round-trips exactly.
/// Booleans never coerce.
pub fn coerce_to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Some(int);
            }
            number
                .as_f64()
                .filter(|float| {
                    float.is_finite()
                        && float.fract() == 0.0
                        && *float >= i64::MIN as f64
                        && *float <= i64::MAX as f64
                })
                .map(|float| float as i64)
        }
        Value::String(raw) => raw.parse::<i64>().ok().filter(|int| int.to_string() == *raw),
        _ => None,
    }
}

/// Finite numbers, or strings that parse as a finite float.
pub fn coerce_to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|float| float.is_finite()),
        Value::String(raw) => raw.parse::<f64>().ok().filter(|float| float.is_finite()),
        _ => None,
    }
}

/// Booleans, or the case-insensitive strings "true"/"false". Numbers never
/// coerce.
pub fn coerce_to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(raw) => {
            if raw.eq_ignore_ascii_case("true") {
                Some(true)
            } else if raw.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringCoercion {
    pub scalar: &'static str,
    pub warning: String,
}

/// Opportunistic detection for string inputs: Int, then Float, then Boolean.
///
/// The Float branch only fires when the integer parse failed, so `"42"`
/// reports Int alone and `"4.2"` reports Float.
pub fn coerce_string_value(raw: &str) -> Option<StringCoercion> {
    let as_value = Value::String(raw.to_owned());

    if coerce_to_integer(&as_value).is_some() {
        return Some(string_coercion(raw, "Int", "an"));
    }
    if coerce_to_float(&as_value).is_some() {
        return Some(string_coercion(raw, "Float", "a"));
    }
    if coerce_to_boolean(&as_value).is_some() {
        return Some(string_coercion(raw, "Boolean", "a"));
    }
    None
}

fn string_coercion(raw: &str, scalar: &'static str, article: &str) -> StringCoercion {
    StringCoercion {
        scalar,
        warning: format!(
            "String value \"{raw}\" looks like {article} {scalar}. Consider using \
             set-typed-argument to send it as {scalar} instead of String."
        ),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{json, Value};

    use super::{
        coerce_string_value, coerce_to_boolean, coerce_to_float, coerce_to_integer,
    };

    #[rstest]
    #[case(json!(42), Some(42))]
    #[case(json!(-7), Some(-7))]
    #[case(json!(3.0), Some(3))]
    #[case(json!(3.5), None)]
    #[case(json!("42"), Some(42))]
    #[case(json!("-42"), Some(-42))]
    #[case(json!("042"), None)]
    #[case(json!("4.2"), None)]
    #[case(json!("42x"), None)]
    #[case(json!(true), None)]
    #[case(json!(null), None)]
    fn integer_coercion(#[case] value: Value, #[case] expected: Option<i64>) {
        assert_eq!(coerce_to_integer(&value), expected);
    }

    #[test]
    fn integer_string_round_trips() {
        // coerce_to_integer(s) = n implies n.to_string() == s
        for raw in ["0", "7", "-13", "500"] {
            let coerced = coerce_to_integer(&json!(raw)).expect("coerces");
            assert_eq!(coerced.to_string(), raw);
        }
    }

    #[rstest]
    #[case(json!(4.2), Some(4.2))]
    #[case(json!(42), Some(42.0))]
    #[case(json!("4.2"), Some(4.2))]
    #[case(json!("abc"), None)]
    #[case(json!(false), None)]
    fn float_coercion(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(coerce_to_float(&value), expected);
    }

    #[rstest]
    #[case(json!(true), Some(true))]
    #[case(json!("TRUE"), Some(true))]
    #[case(json!("false"), Some(false))]
    #[case(json!("yes"), None)]
    #[case(json!(1), None)]
    fn boolean_coercion(#[case] value: Value, #[case] expected: Option<bool>) {
        assert_eq!(coerce_to_boolean(&value), expected);
    }

    #[test]
    fn string_coercion_prefers_int_then_float_then_boolean() {
        assert_eq!(coerce_string_value("42").expect("int").scalar, "Int");
        assert_eq!(coerce_string_value("4.2").expect("float").scalar, "Float");
        assert_eq!(coerce_string_value("true").expect("bool").scalar, "Boolean");
        assert_eq!(coerce_string_value("charizard"), None);
    }

    #[test]
    fn string_coercion_warning_names_the_typed_tool() {
        let coercion = coerce_string_value("42").expect("int");
        assert_eq!(
            coercion.warning,
            "String value \"42\" looks like an Int. Consider using set-typed-argument \
             to send it as Int instead of String."
        );
    }
}
