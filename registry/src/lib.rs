//! Named schemas loaded from declarative YAML and JSON documents.
//!
//! This crate compiles schema documents into [`wireshape_core::Schema`]
//! values keyed by definition name. Definitions may reference each other
//! (and themselves) through `ref` descriptors, which become lazy schemas.
//!
//! # Quick start
//!
//! ```
//! use wireshape_core::Value;
//! use wireshape_registry::SchemaRegistry;
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::from_yaml_str(r#"
//! definitions:
//!   Category:
//!     type: object
//!     fields:
//!       - name: name
//!         schema: { type: string }
//!       - name: subCategories
//!         wire: sub_categories
//!         schema: { type: array, items: { type: ref, name: Category } }
//! "#).unwrap();
//!
//! let wire = Value::from(json!({
//!     "name": "root",
//!     "sub_categories": [{"name": "leaf", "sub_categories": []}]
//! }));
//! let domain = registry.validate_and_map("Category", &wire).unwrap();
//! assert_eq!(registry.validate_and_unmap("Category", &domain).unwrap(), wire);
//!
//! let json_schema = registry.json_schema("Category").unwrap();
//! assert_eq!(json_schema["type"], "object");
//! ```

mod compile;
mod document;
mod error;
mod loader;

pub use document::{
    DOCUMENT_VERSION, EnumMemberDescriptor, FieldDescriptor, SchemaDescriptor, SchemaDocument,
};
pub use error::{RegistryError, Result};
pub use loader::{RegistryBuilder, RegistrySource, SchemaRegistry};
