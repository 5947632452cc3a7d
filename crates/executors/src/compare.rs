//! Structural comparison of JSON values.
//!
//! Two values are considered equal when their canonical serialized forms
//! agree: object keys are compared as a set regardless of insertion order,
//! arrays element by element, and numbers by numeric value so that `1` and
//! `1.0` match.

use serde_json::Value;

pub fn structurally_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            if a == b {
                return true;
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| {
                    b.get(key)
                        .map(|y| structurally_equal(x, y))
                        .unwrap_or(false)
                })
        }
        _ => false,
    }
}
