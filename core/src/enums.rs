//! Closed sets of symbolic members backed by numbers or strings.

use serde_json::{Number, json};

use crate::error::ValidationError;
use crate::value::{Value, numbers_equal};

/// Representation shared by all members of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    /// Members are numbers.
    Number,
    /// Members are strings.
    String,
}

/// One symbolic member and its wire value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// Symbolic name, e.g. `Hearts`.
    pub name: String,
    /// Wire value, e.g. `1`.
    pub value: Value,
}

/// Validator for a closed member set.
///
/// Unmatched input fails unless `allow_unknown` is set, in which case it
/// passes through unchanged so newer wire values survive older clients.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    kind: EnumKind,
    members: Vec<EnumMember>,
    allow_unknown: bool,
}

impl EnumSchema {
    pub(crate) fn numbers<N, V>(members: impl IntoIterator<Item = (N, V)>, allow_unknown: bool) -> Self
    where
        N: Into<String>,
        V: Into<Number>,
    {
        Self {
            kind: EnumKind::Number,
            members: members
                .into_iter()
                .map(|(name, value)| EnumMember {
                    name: name.into(),
                    value: Value::Number(value.into()),
                })
                .collect(),
            allow_unknown,
        }
    }

    pub(crate) fn strings<N, V>(members: impl IntoIterator<Item = (N, V)>, allow_unknown: bool) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: EnumKind::String,
            members: members
                .into_iter()
                .map(|(name, value)| EnumMember {
                    name: name.into(),
                    value: Value::String(value.into()),
                })
                .collect(),
            allow_unknown,
        }
    }

    /// `Enum<v1,v2,...>` with string members quoted.
    pub fn label(&self) -> String {
        let values = self
            .members
            .iter()
            .map(|member| member.value.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("Enum<{values}>")
    }

    fn find(&self, value: &Value) -> Option<&EnumMember> {
        self.members.iter().find(|member| match (&member.value, value) {
            (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        })
    }

    fn has_kind(&self, value: &Value) -> bool {
        matches!(
            (self.kind, value),
            (EnumKind::Number, Value::Number(_)) | (EnumKind::String, Value::String(_))
        )
    }

    /// Returns the canonical member matching `value`, the value itself when
    /// unknown members are allowed and it has the members' kind, or a
    /// mismatch error.
    pub(crate) fn check(&self, value: &Value) -> Result<Value, ValidationError> {
        match self.find(value) {
            Some(member) => Ok(member.value.clone()),
            None if self.allow_unknown && self.has_kind(value) => Ok(value.clone()),
            None => Err(ValidationError::type_mismatch(self.label(), Some(value))),
        }
    }

    pub(crate) fn json_schema(&self) -> serde_json::Value {
        let kind = match self.kind {
            EnumKind::Number => "number",
            EnumKind::String => "string",
        };
        if self.allow_unknown {
            return json!({"type": kind});
        }
        let values: Vec<serde_json::Value> = self
            .members
            .iter()
            .map(|member| member.value.clone().into())
            .collect();
        let names: Vec<&str> = self.members.iter().map(|m| m.name.as_str()).collect();
        json!({"type": kind, "enum": values, "x-enum-varnames": names})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suits(allow_unknown: bool) -> EnumSchema {
        EnumSchema::numbers(
            [("Hearts", 1), ("Spades", 2), ("Clubs", 3), ("Diamonds", 4)],
            allow_unknown,
        )
    }

    #[test]
    fn test_label_joins_values_in_declaration_order() {
        assert_eq!(suits(false).label(), "Enum<1,2,3,4>");
        let colors = EnumSchema::strings([("Red", "red"), ("Blue", "blue")], false);
        assert_eq!(colors.label(), r#"Enum<"red","blue">"#);
    }

    #[test]
    fn test_unmatched_value_fails_when_closed() {
        let error = suits(false).check(&Value::from(5)).unwrap_err();
        assert_eq!(error.expected_type, "Enum<1,2,3,4>");
        assert_eq!(error.value, Some(Value::from(5)));
    }

    #[test]
    fn test_unmatched_value_passes_when_open() {
        assert_eq!(suits(true).check(&Value::from(5)), Ok(Value::from(5)));
    }

    #[test]
    fn test_open_enum_still_requires_member_kind() {
        let error = suits(true).check(&Value::from("not-a-number")).unwrap_err();
        assert_eq!(error.expected_type, "Enum<1,2,3,4>");
        assert_eq!(error.actual_type(), "string");

        let mut entries = crate::value::Map::new();
        entries.insert("x".to_string(), Value::from(1));
        assert!(suits(true).check(&Value::Object(entries)).is_err());
        assert!(suits(true).check(&Value::Null).is_err());

        let colors = EnumSchema::strings([("Red", "red"), ("Blue", "blue")], true);
        assert_eq!(colors.check(&Value::from("green")), Ok(Value::from("green")));
        let error = colors.check(&Value::from(3)).unwrap_err();
        assert_eq!(error.expected_type, r#"Enum<"red","blue">"#);
        assert!(colors.check(&Value::from(true)).is_err());
    }

    #[test]
    fn test_match_returns_canonical_member() {
        assert_eq!(suits(false).check(&Value::from(2.0)), Ok(Value::from(2)));
        assert!(suits(false).check(&Value::from("2")).is_err());
    }

    #[test]
    fn test_json_schema_lists_members() {
        assert_eq!(
            suits(false).json_schema(),
            json!({
                "type": "number",
                "enum": [1, 2, 3, 4],
                "x-enum-varnames": ["Hearts", "Spades", "Clubs", "Diamonds"]
            })
        );
        assert_eq!(suits(true).json_schema(), json!({"type": "number"}));
    }
}
