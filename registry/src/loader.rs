//! Schema registry loading with builder pattern and fallback chains.
//!
//! Provides [`SchemaRegistry`] for named schema lookup and
//! [`RegistryBuilder`] for constructing a registry from multiple sources with
//! automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use wireshape_registry::SchemaRegistry;
//!
//! // Load every document in a directory
//! let registry = SchemaRegistry::from_dir("schemas/").unwrap();
//! assert!(registry.get("OAuthToken").is_some());
//!
//! // Load a single YAML or JSON document
//! let registry = SchemaRegistry::from_file("schemas/auth.yaml").unwrap();
//!
//! // Use the builder for a fallback chain
//! let registry = SchemaRegistry::builder()
//!     .from_dir("/etc/app/schemas/")
//!     .from_file("schemas/bundled.json")
//!     .build()
//!     .unwrap();
//! ```
//!
//! Every definition is compiled while loading, so dangling references and
//! malformed shapes surface here rather than during validation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use wireshape_core::{Schema, Value};

use crate::compile::compile;
use crate::document::{DocumentFormat, SchemaDocument};
use crate::error::{RegistryError, Result};

/// Describes where a [`SchemaRegistry`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// Built from an in-memory document.
    Inline,
    /// Loaded from a single document file.
    File(PathBuf),
    /// Loaded from a directory of document files.
    Directory(PathBuf),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<RegistrySource>),
}

/// Named schemas compiled from declarative documents.
///
/// # Examples
///
/// ```
/// use wireshape_registry::SchemaRegistry;
/// use wireshape_core::Value;
/// use serde_json::json;
///
/// let registry = SchemaRegistry::from_yaml_str(r#"
/// definitions:
///   OAuthToken:
///     type: object
///     fields:
///       - name: accessToken
///         wire: access_token
///         schema: { type: string }
/// "#).unwrap();
///
/// let domain = registry
///     .validate_and_map("OAuthToken", &Value::from(json!({"access_token": "abc"})))
///     .unwrap();
/// assert_eq!(domain.get("accessToken"), Some(&Value::from("abc")));
/// ```
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
    source: RegistrySource,
}

impl SchemaRegistry {
    /// Returns a new [`RegistryBuilder`] for configuring a fallback chain.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Compiles an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnresolvedReference`] or
    /// [`RegistryError::InvalidDescriptor`] if a definition cannot be
    /// compiled.
    pub fn from_document(document: SchemaDocument) -> Result<Self> {
        Self::compile_document(document, RegistrySource::Inline)
    }

    /// Parses and compiles a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a parse error or any error of
    /// [`from_document`](Self::from_document).
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::from_document(SchemaDocument::from_yaml_str(text)?)
    }

    /// Parses and compiles a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a parse error or any error of
    /// [`from_document`](Self::from_document).
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_document(SchemaDocument::from_json_str(text)?)
    }

    /// Loads and compiles one document file (`.yaml`, `.yml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IoError`] if the file cannot be read,
    /// [`RegistryError::UnsupportedFormat`] for other extensions, a parse
    /// error, or a compile error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading schema document");
        let document = SchemaDocument::load(path)?;
        Self::compile_document(document, RegistrySource::File(path.to_path_buf()))
    }

    /// Loads every `*.yaml`, `*.yml` and `*.json` document in a directory and
    /// compiles their definitions together, so documents may reference each
    /// other's definitions.
    ///
    /// Files are read in path order; other files are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDefinition`] if two documents define
    /// the same name, [`RegistryError::IoError`] if the directory or a file
    /// cannot be read, a parse error, or a compile error.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && DocumentFormat::from_path(&file_path).is_ok() {
                files.push(file_path);
            }
        }
        files.sort();

        let mut merged = SchemaDocument::new();
        for file_path in &files {
            debug!(path = %file_path.display(), "loading schema document");
            let document = SchemaDocument::load(file_path)?;
            for (name, descriptor) in document.definitions {
                if merged.definitions.contains_key(&name) {
                    return Err(RegistryError::DuplicateDefinition(name));
                }
                merged.definitions.insert(name, descriptor);
            }
        }

        Self::compile_document(merged, RegistrySource::Directory(path.to_path_buf()))
    }

    fn compile_document(document: SchemaDocument, source: RegistrySource) -> Result<Self> {
        let definitions = Arc::new(document.definitions);
        let mut schemas = BTreeMap::new();
        for (name, descriptor) in definitions.iter() {
            debug!(definition = %name, "compiling schema definition");
            schemas.insert(name.clone(), compile(name, descriptor, &definitions)?);
        }

        info!(
            definitions = schemas.len(),
            version = %document.version,
            source = ?source,
            "loaded schema registry"
        );
        Ok(Self { schemas, source })
    }

    /// Looks up a schema by definition name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Looks up a schema, failing for unknown names.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDefinition`] if `name` is not defined.
    pub fn schema(&self, name: &str) -> Result<&Schema> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownDefinition(name.to_string()))
    }

    /// Maps a wire value with the named schema.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDefinition`] or
    /// [`RegistryError::Validation`] carrying every validation error.
    pub fn validate_and_map(&self, name: &str, wire: &Value) -> Result<Value> {
        self.schema(name)?.map(wire).map_err(RegistryError::Validation)
    }

    /// Unmaps a domain value with the named schema.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDefinition`] or
    /// [`RegistryError::Validation`] carrying every validation error.
    pub fn validate_and_unmap(&self, name: &str, domain: &Value) -> Result<Value> {
        self.schema(name)?.unmap(domain).map_err(RegistryError::Validation)
    }

    /// Draft-07 JSON Schema for the named definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDefinition`] if `name` is not defined.
    pub fn json_schema(&self, name: &str) -> Result<serde_json::Value> {
        Ok(self.schema(name)?.to_json_schema())
    }

    /// Returns `true` if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if the registry has no definitions.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns an iterator over definition names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &RegistrySource {
        &self.source
    }
}

/// Ordered list of places to look for schema documents.
///
/// `build` takes the first source that loads and compiles cleanly. Failures
/// of earlier sources are logged at debug level and otherwise ignored, which
/// suits a site-local override directory in front of a bundled file.
///
/// # Example
///
/// ```
/// use wireshape_registry::{RegistrySource, SchemaRegistry};
///
/// let dir = tempfile::tempdir().unwrap();
/// let bundled = dir.path().join("bundled.yaml");
/// std::fs::write(&bundled, "definitions:\n  Name:\n    type: string\n").unwrap();
///
/// let registry = SchemaRegistry::builder()
///     .from_dir(dir.path().join("overrides"))
///     .from_file(&bundled)
///     .build()
///     .unwrap();
/// assert!(registry.contains("Name"));
/// assert!(matches!(registry.source(), RegistrySource::Multiple(sources) if sources.len() == 2));
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    sources: Vec<RegistrySource>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a directory of documents.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(RegistrySource::Directory(path.into()));
        self
    }

    /// Queues a single document file.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(RegistrySource::File(path.into()));
        self
    }

    /// Loads the first source that succeeds and records the whole chain as
    /// its [`RegistrySource::Multiple`] source.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NoSourcesAvailable`] when every source fails or none
    /// was queued.
    pub fn build(self) -> Result<SchemaRegistry> {
        let loaded = self.sources.iter().find_map(|source| {
            let attempt = match source {
                RegistrySource::Directory(path) => SchemaRegistry::from_dir(path),
                RegistrySource::File(path) => SchemaRegistry::from_file(path),
                RegistrySource::Inline | RegistrySource::Multiple(_) => return None,
            };
            attempt
                .inspect_err(|err| debug!(source = ?source, error = %err, "schema source failed"))
                .ok()
        });

        let mut registry = loaded.ok_or(RegistryError::NoSourcesAvailable)?;
        registry.source = RegistrySource::Multiple(self.sources);
        Ok(registry)
    }
}
