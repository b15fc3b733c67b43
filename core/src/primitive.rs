//! Atomic validators for strings, booleans, numbers and big integers.

use num_bigint::BigInt;
use serde_json::json;

use crate::engine::Direction;
use crate::error::ValidationError;
use crate::value::{Value, bigint_to_number};

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Exact string check.
    String,
    /// Exact boolean check.
    Boolean,
    /// Any finite number.
    Number,
    /// Arbitrary-precision integer; integral wire numbers map to it.
    BigInt,
    /// Any present value.
    Unknown,
}

impl Primitive {
    /// Label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Number => "number",
            Primitive::BigInt => "bigint",
            Primitive::Unknown => "unknown",
        }
    }

    /// Checks `value` and returns it in the target representation.
    ///
    /// Only [`Primitive::BigInt`] differs between directions: mapping
    /// accepts integral JSON numbers and produces [`Value::BigInt`],
    /// unmapping accepts only [`Value::BigInt`] and produces a JSON number
    /// whenever the integer fits in 64 bits.
    pub(crate) fn check(self, value: &Value, direction: Direction) -> Result<Value, ValidationError> {
        let accepted = match (self, value) {
            (Primitive::Unknown, _)
            | (Primitive::String, Value::String(_))
            | (Primitive::Boolean, Value::Bool(_))
            | (Primitive::Number, Value::Number(_)) => Some(value.clone()),
            (Primitive::BigInt, _) => check_bigint(value, direction),
            _ => None,
        };
        accepted.ok_or_else(|| ValidationError::type_mismatch(self.label(), Some(value)))
    }

    pub(crate) fn json_schema(self) -> serde_json::Value {
        match self {
            Primitive::String => json!({"type": "string"}),
            Primitive::Boolean => json!({"type": "boolean"}),
            Primitive::Number => json!({"type": "number"}),
            Primitive::BigInt => json!({"type": "integer"}),
            Primitive::Unknown => json!({}),
        }
    }
}

fn check_bigint(value: &Value, direction: Direction) -> Option<Value> {
    match (direction, value) {
        (Direction::Map, Value::BigInt(_)) => Some(value.clone()),
        (Direction::Map, Value::Number(n)) => {
            if let Some(small) = n.as_i64() {
                Some(Value::BigInt(BigInt::from(small)))
            } else {
                n.as_u64().map(|large| Value::BigInt(BigInt::from(large)))
            }
        }
        (Direction::Unmap, Value::BigInt(n)) => Some(
            bigint_to_number(n).map_or_else(|| value.clone(), Value::Number),
        ),
        _ => None,
    }
}
