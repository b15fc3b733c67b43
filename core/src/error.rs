//! Validation diagnostics and schema construction errors.
//!
//! Validation failures are data, not control flow: every schema operation
//! returns a [`SchemaResult`] whose error side is a list of
//! [`ValidationError`]s, one per structurally independent failure.

use std::fmt;

use thiserror::Error;

use crate::value::{Value, render, runtime_type_of};

/// Outcome of mapping or unmapping a value: the converted value, or every
/// failure found during the traversal.
pub type SchemaResult<T> = Result<T, Vec<ValidationError>>;

/// One step of a [`ValidationError::path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property name.
    Key(String),
    /// Array position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single validation diagnostic.
///
/// The `Display` impl prints the fully rendered [`message`](Self::message).
///
/// # Examples
///
/// ```
/// use wireshape_core::{Schema, Value};
///
/// let errors = Schema::string().map(&Value::from(123)).unwrap_err();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].expected_type, "string");
/// assert!(errors[0].to_string().starts_with("Expected value to be of type 'string'"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Property names and indices from the root to the failure; empty at the
    /// root.
    pub path: Vec<PathSegment>,
    /// Values visited from the root down to the failure point.
    pub branch: Vec<Value>,
    /// Label of the expected type, e.g. `string` or `Enum<1,2,3,4>`.
    pub expected_type: String,
    /// The offending value; `None` when a required value was absent.
    pub value: Option<Value>,
    /// Rendered diagnostic text.
    pub message: String,
}

impl ValidationError {
    /// Builds a type-mismatch error located at the current node.
    pub fn type_mismatch(expected_type: impl Into<String>, value: Option<&Value>) -> Self {
        let expected_type = expected_type.into();
        let message = type_mismatch_message(&expected_type, value);
        Self {
            path: Vec::new(),
            branch: value.cloned().into_iter().collect(),
            expected_type,
            value: value.cloned(),
            message,
        }
    }

    /// Re-roots the error one level up: `segment` becomes the first path
    /// step and `parent` the first branch entry.
    pub(crate) fn nested(mut self, segment: PathSegment, parent: &Value) -> Self {
        self.path.insert(0, segment);
        self.branch.insert(0, parent.clone());
        self
    }

    /// Runtime category of the offending value (`undefined` when absent).
    pub fn actual_type(&self) -> &'static str {
        runtime_type_of(self.value.as_ref())
    }

    /// Dotted rendering of [`path`](Self::path), e.g. `items.0.name`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Renders the canonical type-mismatch message.
///
/// # Examples
///
/// ```
/// use wireshape_core::{Value, type_mismatch_message};
///
/// let message = type_mismatch_message("Enum<1,2,3,4>", Some(&Value::from(5)));
/// assert_eq!(
///     message,
///     "Expected value to be of type 'Enum<1,2,3,4>' but found 'number'.\n\
///      \n\
///      Given value: 5\n\
///      Type: 'number'\n\
///      Expected type: 'Enum<1,2,3,4>'"
/// );
/// ```
pub fn type_mismatch_message(expected_type: &str, value: Option<&Value>) -> String {
    let actual_type = runtime_type_of(value);
    format!(
        "Expected value to be of type '{expected_type}' but found '{actual_type}'.\n\
         \n\
         Given value: {}\n\
         Type: '{actual_type}'\n\
         Expected type: '{expected_type}'",
        render(value)
    )
}

/// Programmer errors detected while composing a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields of one object shape share a domain key.
    #[error("duplicate domain key in object shape: {0}")]
    DuplicateDomainKey(String),
    /// Two fields of one object shape share a wire key.
    #[error("duplicate wire key in object shape: {0}")]
    DuplicateWireKey(String),
}
