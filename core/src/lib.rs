//! Composable schemas that validate values and map them between a *wire*
//! representation and a *domain* representation.
//!
//! This crate defines:
//!
//! - [`Schema`]: an immutable descriptor built from primitives
//!   ([`Schema::string`], [`Schema::bigint`], ...), enumerations
//!   ([`Schema::number_enum`], [`Schema::string_enum`]) and combinators
//!   ([`Schema::optional`], [`Schema::object`], [`Schema::expando_object`],
//!   [`Schema::array`], [`Schema::one_of`], [`Schema::lazy`], ...).
//! - [`validate_and_map`] / [`validate_and_unmap`]: one traversal run in
//!   either direction that reports *every* independent failure as a
//!   path-qualified [`ValidationError`].
//! - [`Schema::to_json_schema`]: a draft-07 JSON Schema for the wire form,
//!   safe on recursive schemas.
//!
//! Schemas hold no per-call state and are `Send + Sync`, so one instance
//! can serve any number of threads.
//!
//! # Example
//!
//! ```
//! use wireshape_core::*;
//! use serde_json::json;
//!
//! let token = Schema::object(
//!     ObjectShape::new()
//!         .field("accessToken", "access_token", Schema::string())
//!         .field("expiresIn", "expires_in", Schema::optional(Schema::bigint())),
//! );
//!
//! let wire = Value::from(json!({"access_token": "abc", "expires_in": 9999999999_i64}));
//! let domain = validate_and_map(&wire, &token).unwrap();
//! assert!(domain.get("expiresIn").and_then(Value::as_bigint).is_some());
//!
//! let errors = validate_and_map(&Value::from(json!({"access_token": 123})), &token).unwrap_err();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].expected_type, "string");
//! ```

mod engine;
mod enums;
mod error;
mod json_schema;
mod object;
mod primitive;
mod schema;
mod value;

pub use engine::{validate_and_map, validate_and_unmap};
pub use error::{PathSegment, SchemaError, SchemaResult, ValidationError, type_mismatch_message};
pub use json_schema::DRAFT_07;
pub use object::{Field, ObjectShape};
pub use schema::Schema;
pub use value::{Map, Value};
