//! Error types for schema registry operations.
//!
//! Covers every failure mode of loading and using a registry: I/O, document
//! parsing, invalid or dangling definitions, and validation failures
//! reported by the schemas themselves.

use thiserror::Error;
use wireshape_core::ValidationError;

/// Errors that can occur while loading or querying a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not `.yaml`, `.yml` or `.json`.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Lookup of a definition that the registry does not contain.
    #[error("unknown definition: {0}")]
    UnknownDefinition(String),

    /// A `ref` descriptor names a definition that does not exist.
    #[error("definition '{definition}' references unknown definition '{reference}'")]
    UnresolvedReference {
        /// Definition containing the reference.
        definition: String,
        /// Name that could not be resolved.
        reference: String,
    },

    /// Two documents define the same name.
    #[error("duplicate definition: {0}")]
    DuplicateDefinition(String),

    /// A descriptor cannot be turned into a schema.
    #[error("invalid definition '{definition}': {reason}")]
    InvalidDescriptor {
        /// Definition containing the descriptor.
        definition: String,
        /// What is wrong with it.
        reason: String,
    },

    /// All configured loader sources failed.
    #[error("no schema sources available")]
    NoSourcesAvailable,

    /// The value did not satisfy the schema.
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
