//! Declarative schema documents.
//!
//! A document is a YAML (or JSON) file holding named schema definitions.
//! Definitions may reference each other, and themselves, with `ref`.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! definitions:
//!   OAuthToken:
//!     type: object
//!     fields:
//!       - name: accessToken
//!         wire: access_token
//!         schema: { type: string }
//!       - name: expiresIn
//!         wire: expires_in
//!         schema: { type: optional, schema: { type: bigint } }
//!   Category:
//!     type: object
//!     fields:
//!       - name: name
//!         schema: { type: string }
//!       - name: children
//!         schema: { type: array, items: { type: ref, name: Category } }
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Format version written by [`SchemaDocument::new`].
pub const DOCUMENT_VERSION: &str = "1.0";

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// A set of named schema definitions.
///
/// # Examples
///
/// ```
/// use wireshape_registry::{SchemaDescriptor, SchemaDocument};
///
/// let document = SchemaDocument::from_yaml_str(
///     "definitions:\n  Name:\n    type: string\n",
/// ).unwrap();
/// assert_eq!(document.version, "1.0");
/// assert_eq!(document.definitions["Name"], SchemaDescriptor::String);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Document format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Definitions keyed by name.
    #[serde(default)]
    pub definitions: BTreeMap<String, SchemaDescriptor>,
}

/// Declarative form of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaDescriptor {
    /// String.
    String,
    /// Boolean.
    Boolean,
    /// Number.
    Number,
    /// Arbitrary-precision integer.
    Bigint,
    /// Any value.
    Unknown,
    /// Exactly `value`.
    Literal {
        /// The accepted value.
        value: serde_json::Value,
    },
    /// Number or string enumeration.
    Enum {
        /// Members in declaration order; all numbers or all strings.
        members: Vec<EnumMemberDescriptor>,
        /// Let unmatched values pass through.
        #[serde(default)]
        allow_unknown: bool,
    },
    /// May be absent.
    Optional {
        /// Wrapped schema.
        schema: Box<SchemaDescriptor>,
    },
    /// May be `null`.
    Nullable {
        /// Wrapped schema.
        schema: Box<SchemaDescriptor>,
    },
    /// Absent or `null` becomes `value`.
    Defaults {
        /// Wrapped schema.
        schema: Box<SchemaDescriptor>,
        /// Default value.
        value: serde_json::Value,
    },
    /// Sequence.
    Array {
        /// Element schema.
        items: Box<SchemaDescriptor>,
    },
    /// String-keyed map.
    Dict {
        /// Value schema.
        values: Box<SchemaDescriptor>,
    },
    /// Closed object.
    Object {
        /// Declared fields.
        fields: Vec<FieldDescriptor>,
    },
    /// Open object keeping undeclared keys.
    ExpandoObject {
        /// Declared fields.
        fields: Vec<FieldDescriptor>,
    },
    /// First matching candidate, emitted as `oneOf`.
    OneOf {
        /// Candidates in order.
        schemas: Vec<SchemaDescriptor>,
    },
    /// First matching candidate, emitted as `anyOf`.
    AnyOf {
        /// Candidates in order.
        schemas: Vec<SchemaDescriptor>,
    },
    /// Another definition of the same registry.
    Ref {
        /// Definition name.
        name: String,
    },
}

/// An object field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Domain key.
    pub name: String,
    /// Wire key; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire: Option<String>,
    /// Field schema.
    pub schema: SchemaDescriptor,
}

impl FieldDescriptor {
    /// Wire key, falling back to the domain key.
    pub fn wire_key(&self) -> &str {
        self.wire.as_deref().unwrap_or(&self.name)
    }
}

/// An enumeration member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMemberDescriptor {
    /// Symbolic name.
    pub name: String,
    /// Number or string value.
    pub value: serde_json::Value,
}

impl SchemaDocument {
    /// Creates an empty document at the current format version.
    pub fn new() -> Self {
        Self {
            version: default_version(),
            definitions: BTreeMap::new(),
        }
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](RegistryError::YamlError) if parsing fails.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](RegistryError::JsonError) if parsing fails.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a document, choosing the parser by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](RegistryError::UnsupportedFormat) for
    /// extensions other than `yaml`, `yml` and `json`,
    /// [`IoError`](RegistryError::IoError) if the file cannot be read, or a
    /// parse error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let document = match format {
            DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
            DocumentFormat::Json => serde_json::from_reader(reader)?,
        };
        Ok(document)
    }

    /// Saves the document, choosing the format by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](RegistryError::UnsupportedFormat),
    /// [`IoError`](RegistryError::IoError) if the file cannot be written, or a
    /// serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            DocumentFormat::Yaml => serde_yaml::to_writer(writer, self)?,
            DocumentFormat::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }
}

impl Default for SchemaDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(RegistryError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_descriptors() {
        let document = SchemaDocument::from_yaml_str(
            r#"
version: "1.0"
definitions:
  Token:
    type: object
    fields:
      - name: accessToken
        wire: access_token
        schema: { type: string }
      - name: scopes
        schema: { type: optional, schema: { type: array, items: { type: string } } }
"#,
        )
        .unwrap();

        let SchemaDescriptor::Object { fields } = &document.definitions["Token"] else {
            panic!("expected object descriptor");
        };
        assert_eq!(fields[0].wire_key(), "access_token");
        assert_eq!(fields[1].wire_key(), "scopes");
        assert!(matches!(fields[1].schema, SchemaDescriptor::Optional { .. }));
    }

    #[test]
    fn test_enum_allow_unknown_defaults_to_false() {
        let document = SchemaDocument::from_json_str(
            r#"{"definitions": {"Suit": {"type": "enum", "members": [{"name": "Hearts", "value": 1}]}}}"#,
        )
        .unwrap();
        assert!(matches!(
            document.definitions["Suit"],
            SchemaDescriptor::Enum { allow_unknown: false, .. }
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.yml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.json")).unwrap(),
            DocumentFormat::Json
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("a.toml")),
            Err(RegistryError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        let result = SchemaDocument::from_yaml_str("definitions:\n  X:\n    type: tuple\n");
        assert!(matches!(result, Err(RegistryError::YamlError(_))));
    }
}
