//! Object shapes: the declared fields of object and expando-object schemas.

use crate::engine::Direction;
use crate::error::SchemaError;
use crate::schema::Schema;

/// A declared object property.
#[derive(Debug, Clone)]
pub struct Field {
    /// Key used by application code.
    pub domain_key: String,
    /// Key used on the wire.
    pub wire_key: String,
    /// Schema of the property value.
    pub schema: Schema,
}

impl Field {
    /// Key read from the input when traversing in `direction`.
    pub(crate) fn source_key(&self, direction: Direction) -> &str {
        match direction {
            Direction::Map => &self.wire_key,
            Direction::Unmap => &self.domain_key,
        }
    }

    /// Key written to the output when traversing in `direction`.
    pub(crate) fn target_key(&self, direction: Direction) -> &str {
        match direction {
            Direction::Map => &self.domain_key,
            Direction::Unmap => &self.wire_key,
        }
    }
}

/// Ordered mapping from domain property names to `(wire key, schema)`.
///
/// Declaration order carries no meaning for validation; it only fixes the
/// order of generated JSON Schema properties.
///
/// # Examples
///
/// ```
/// use wireshape_core::{ObjectShape, Schema};
///
/// let shape = ObjectShape::new()
///     .field("accessToken", "access_token", Schema::string())
///     .field("expiresIn", "expires_in", Schema::optional(Schema::bigint()));
///
/// assert_eq!(shape.len(), 2);
/// assert_eq!(shape.required_wire_keys(), vec!["access_token"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectShape {
    fields: Vec<Field>,
}

impl ObjectShape {
    /// Creates an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, rejecting duplicate domain or wire keys.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateDomainKey`] or
    /// [`SchemaError::DuplicateWireKey`] when a key is already declared.
    pub fn try_field(
        mut self,
        domain_key: impl Into<String>,
        wire_key: impl Into<String>,
        schema: Schema,
    ) -> Result<Self, SchemaError> {
        let domain_key = domain_key.into();
        let wire_key = wire_key.into();
        if self.fields.iter().any(|f| f.domain_key == domain_key) {
            return Err(SchemaError::DuplicateDomainKey(domain_key));
        }
        if self.fields.iter().any(|f| f.wire_key == wire_key) {
            return Err(SchemaError::DuplicateWireKey(wire_key));
        }
        self.fields.push(Field {
            domain_key,
            wire_key,
            schema,
        });
        Ok(self)
    }

    /// Adds a field.
    ///
    /// # Panics
    ///
    /// Panics if the domain or wire key is already declared; use
    /// [`try_field`](Self::try_field) for shapes built from untrusted input.
    pub fn field(
        self,
        domain_key: impl Into<String>,
        wire_key: impl Into<String>,
        schema: Schema,
    ) -> Self {
        match self.try_field(domain_key, wire_key, schema) {
            Ok(shape) => shape,
            Err(err) => panic!("invalid object shape: {err}"),
        }
    }

    /// Adds a field whose domain and wire keys are the same.
    ///
    /// # Panics
    ///
    /// Panics on duplicate keys, like [`field`](Self::field).
    pub fn field_same(self, key: impl Into<String>, schema: Schema) -> Self {
        let key = key.into();
        self.field(key.clone(), key, schema)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire keys of fields that must be present.
    pub fn required_wire_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.schema.is_optional())
            .map(|f| f.wire_key.as_str())
            .collect()
    }

    /// Returns `true` if `key` is a declared input key for `direction`.
    pub(crate) fn declares_source(&self, key: &str, direction: Direction) -> bool {
        self.fields.iter().any(|f| f.source_key(direction) == key)
    }

    /// `{k1,k2}` over wire keys, used in object labels.
    pub(crate) fn key_list(&self) -> String {
        let keys = self
            .fields
            .iter()
            .map(|f| f.wire_key.as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!("{{{keys}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_field_rejects_duplicate_domain_key() {
        let result = ObjectShape::new()
            .field("id", "id", Schema::string())
            .try_field("id", "identifier", Schema::string());
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateDomainKey("id".to_string())
        );
    }

    #[test]
    fn test_try_field_rejects_duplicate_wire_key() {
        let result = ObjectShape::new()
            .field("userId", "user_id", Schema::string())
            .try_field("ownerId", "user_id", Schema::string());
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateWireKey("user_id".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "duplicate domain key")]
    fn test_field_panics_on_duplicate() {
        let _ = ObjectShape::new()
            .field_same("a", Schema::string())
            .field_same("a", Schema::number());
    }

    #[test]
    fn test_source_and_target_keys_swap_with_direction() {
        let shape = ObjectShape::new().field("accessToken", "access_token", Schema::string());
        let field = &shape.fields()[0];
        assert_eq!(field.source_key(Direction::Map), "access_token");
        assert_eq!(field.target_key(Direction::Map), "accessToken");
        assert_eq!(field.source_key(Direction::Unmap), "accessToken");
        assert!(shape.declares_source("accessToken", Direction::Unmap));
        assert_eq!(shape.key_list(), "{access_token}");
    }
}
