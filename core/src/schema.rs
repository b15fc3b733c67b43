//! Schema descriptors and the combinators that compose them.
//!
//! A [`Schema`] is an immutable, cheaply clonable handle to a descriptor
//! node. Composite nodes own their children, except [`Schema::lazy`] nodes,
//! which hold a resolver and look their target up on every use. That
//! indirection is what lets a schema refer to itself.

use std::fmt;
use std::sync::Arc;

use serde_json::Number;

use crate::engine::{self, Direction};
use crate::enums::EnumSchema;
use crate::error::SchemaResult;
use crate::json_schema;
use crate::object::ObjectShape;
use crate::primitive::Primitive;
use crate::value::Value;

/// What an object schema does with input keys its shape does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Drop them (closed object).
    Drop,
    /// Copy them to the output verbatim (expando object).
    Preserve,
}

/// Union flavour; both pick the first candidate that accepts the value and
/// differ only in the JSON Schema keyword they emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    /// `oneOf`.
    OneOf,
    /// `anyOf`.
    AnyOf,
}

impl UnionKind {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            UnionKind::OneOf => "oneOf",
            UnionKind::AnyOf => "anyOf",
        }
    }

    fn label_prefix(self) -> &'static str {
        match self {
            UnionKind::OneOf => "OneOf",
            UnionKind::AnyOf => "AnyOf",
        }
    }
}

/// Identity of a recursion point, used to stop JSON Schema generation from
/// unrolling a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LazyId {
    /// Address of the resolver function.
    Resolver(usize),
    /// An explicit name.
    Named(Arc<str>),
}

type Resolver = Arc<dyn Fn() -> Schema + Send + Sync>;

/// A deferred schema reference.
#[derive(Clone)]
pub struct LazySchema {
    id: LazyId,
    resolver: Resolver,
}

impl LazySchema {
    /// Identity of this recursion point.
    pub fn id(&self) -> &LazyId {
        &self.id
    }

    /// Invokes the resolver. Not memoised: every call builds or fetches the
    /// target afresh.
    pub fn resolve(&self) -> Schema {
        (self.resolver)()
    }

    fn name(&self) -> &str {
        match &self.id {
            LazyId::Named(name) => name,
            LazyId::Resolver(_) => "Lazy",
        }
    }
}

pub(crate) enum Node {
    Primitive(Primitive),
    Literal(Value),
    Enum(EnumSchema),
    Optional(Schema),
    Nullable(Schema),
    Defaults { inner: Schema, default: Value },
    Array(Schema),
    Dict(Schema),
    Object { shape: ObjectShape, unknown_keys: UnknownKeys },
    Union { kind: UnionKind, candidates: Vec<Schema> },
    Lazy(LazySchema),
}

/// A composable descriptor binding a wire representation to a domain
/// representation.
///
/// # Examples
///
/// ```
/// use wireshape_core::{ObjectShape, Schema, Value};
/// use serde_json::json;
///
/// let token = Schema::object(
///     ObjectShape::new()
///         .field("accessToken", "access_token", Schema::string())
///         .field("expiresIn", "expires_in", Schema::optional(Schema::bigint())),
/// );
///
/// let domain = token
///     .map(&Value::from(json!({"access_token": "abc", "expires_in": 3600})))
///     .unwrap();
/// assert_eq!(domain.get("accessToken"), Some(&Value::from("abc")));
///
/// let wire = token.unmap(&domain).unwrap();
/// assert_eq!(serde_json::Value::from(wire), json!({"access_token": "abc", "expires_in": 3600}));
/// ```
#[derive(Clone)]
pub struct Schema {
    node: Arc<Node>,
}

impl Schema {
    fn from_node(node: Node) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    pub(crate) fn node(&self) -> &Node {
        &self.node
    }

    /// Strings, without coercion.
    pub fn string() -> Self {
        Self::from_node(Node::Primitive(Primitive::String))
    }

    /// Booleans, without coercion.
    pub fn boolean() -> Self {
        Self::from_node(Node::Primitive(Primitive::Boolean))
    }

    /// Any JSON number.
    pub fn number() -> Self {
        Self::from_node(Node::Primitive(Primitive::Number))
    }

    /// Arbitrary-precision integers.
    ///
    /// Integral wire numbers map to [`Value::BigInt`]; numeric strings and
    /// floats are rejected.
    pub fn bigint() -> Self {
        Self::from_node(Node::Primitive(Primitive::BigInt))
    }

    /// Any present value, unchanged.
    pub fn unknown() -> Self {
        Self::from_node(Node::Primitive(Primitive::Unknown))
    }

    /// Exactly `value`.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_node(Node::Literal(value.into()))
    }

    /// Numeric enumeration from `(name, value)` members.
    ///
    /// # Examples
    ///
    /// ```
    /// use wireshape_core::{Schema, Value};
    ///
    /// let suit = Schema::number_enum(
    ///     [("Hearts", 1), ("Spades", 2), ("Clubs", 3), ("Diamonds", 4)],
    ///     false,
    /// );
    /// let errors = suit.map(&Value::from(5)).unwrap_err();
    /// assert_eq!(errors[0].expected_type, "Enum<1,2,3,4>");
    /// ```
    pub fn number_enum<N, V>(members: impl IntoIterator<Item = (N, V)>, allow_unknown: bool) -> Self
    where
        N: Into<String>,
        V: Into<Number>,
    {
        Self::from_node(Node::Enum(EnumSchema::numbers(members, allow_unknown)))
    }

    /// String enumeration from `(name, value)` members.
    pub fn string_enum<N, V>(members: impl IntoIterator<Item = (N, V)>, allow_unknown: bool) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self::from_node(Node::Enum(EnumSchema::strings(members, allow_unknown)))
    }

    /// Absent input succeeds as absent; anything else goes to `inner`.
    pub fn optional(inner: Schema) -> Self {
        Self::from_node(Node::Optional(inner))
    }

    /// `null` succeeds as `null`; anything else goes to `inner`.
    pub fn nullable(inner: Schema) -> Self {
        Self::from_node(Node::Nullable(inner))
    }

    /// Absent or `null` input yields `default`; anything else goes to
    /// `inner`.
    pub fn defaults(inner: Schema, default: impl Into<Value>) -> Self {
        Self::from_node(Node::Defaults {
            inner,
            default: default.into(),
        })
    }

    /// Ordered sequence of `item` values.
    pub fn array(item: Schema) -> Self {
        Self::from_node(Node::Array(item))
    }

    /// String-keyed map of `item` values.
    pub fn dict(item: Schema) -> Self {
        Self::from_node(Node::Dict(item))
    }

    /// Closed object: undeclared keys are dropped.
    pub fn object(shape: ObjectShape) -> Self {
        Self::from_node(Node::Object {
            shape,
            unknown_keys: UnknownKeys::Drop,
        })
    }

    /// Open object: undeclared keys are kept verbatim.
    pub fn expando_object(shape: ObjectShape) -> Self {
        Self::from_node(Node::Object {
            shape,
            unknown_keys: UnknownKeys::Preserve,
        })
    }

    /// First candidate that accepts the value wins; emitted as `oneOf`.
    pub fn one_of(candidates: impl IntoIterator<Item = Schema>) -> Self {
        Self::union(UnionKind::OneOf, candidates)
    }

    /// First candidate that accepts the value wins; emitted as `anyOf`.
    pub fn any_of(candidates: impl IntoIterator<Item = Schema>) -> Self {
        Self::union(UnionKind::AnyOf, candidates)
    }

    fn union(kind: UnionKind, candidates: impl IntoIterator<Item = Schema>) -> Self {
        Self::from_node(Node::Union {
            kind,
            candidates: candidates.into_iter().collect(),
        })
    }

    /// Deferred reference, resolved each time a traversal reaches it.
    ///
    /// The recursion point is identified by the resolver function, so every
    /// expansion of a recursive constructor meets the same identity. Capturing
    /// resolvers need an explicit identity; use [`Schema::lazy_named`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wireshape_core::{ObjectShape, Schema};
    ///
    /// fn category() -> Schema {
    ///     Schema::object(
    ///         ObjectShape::new()
    ///             .field_same("name", Schema::string())
    ///             .field_same("children", Schema::optional(Schema::array(Schema::lazy(category)))),
    ///     )
    /// }
    ///
    /// let fragment = category().to_json_schema();
    /// assert_eq!(fragment["type"], "object");
    /// ```
    pub fn lazy(resolver: fn() -> Schema) -> Self {
        Self::from_node(Node::Lazy(LazySchema {
            id: LazyId::Resolver(resolver as usize),
            resolver: Arc::new(resolver),
        }))
    }

    /// Deferred reference identified by `name`.
    ///
    /// Distinct recursion points must use distinct names; a resolver may
    /// capture its target.
    ///
    /// ```
    /// use wireshape_core::{ObjectShape, Schema};
    ///
    /// let address = Schema::object(ObjectShape::new().field_same("city", Schema::string()));
    /// let person = Schema::object(
    ///     ObjectShape::new().field_same("home", Schema::lazy_named("Address", move || address.clone())),
    /// );
    /// assert_eq!(person.to_json_schema()["properties"]["home"]["properties"]["city"]["type"], "string");
    /// ```
    pub fn lazy_named<F>(name: impl Into<Arc<str>>, resolver: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Self::from_node(Node::Lazy(LazySchema {
            id: LazyId::Named(name.into()),
            resolver: Arc::new(resolver),
        }))
    }

    /// Validates a wire value and converts it to its domain form.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError`](crate::ValidationError) found.
    pub fn map(&self, wire: &Value) -> SchemaResult<Value> {
        engine::run(self, wire, Direction::Map)
    }

    /// Validates a domain value and converts it to its wire form.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError`](crate::ValidationError) found.
    pub fn unmap(&self, domain: &Value) -> SchemaResult<Value> {
        engine::run(self, domain, Direction::Unmap)
    }

    /// Draft-07 JSON Schema describing the wire form.
    pub fn to_json_schema(&self) -> serde_json::Value {
        json_schema::generate(self)
    }

    /// Returns `true` if the schema accepts an absent value, which makes the
    /// enclosing object field non-required.
    pub fn is_optional(&self) -> bool {
        match self.node() {
            Node::Optional(_) | Node::Defaults { .. } => true,
            Node::Nullable(inner) => inner.is_optional(),
            Node::Union { candidates, .. } => candidates.iter().any(Schema::is_optional),
            Node::Lazy(lazy) => lazy.resolve().is_optional(),
            _ => false,
        }
    }

    /// Expected-type label used in diagnostics.
    pub fn label(&self) -> String {
        self.label_at(true)
    }

    /// Nested lazy nodes render by name so labels stay finite on cycles.
    fn label_at(&self, top: bool) -> String {
        match self.node() {
            Node::Primitive(primitive) => primitive.label().to_string(),
            Node::Literal(value) => format!("Literal<{value}>"),
            Node::Enum(schema) => schema.label(),
            Node::Optional(inner) | Node::Defaults { inner, .. } => inner.label_at(top),
            Node::Nullable(inner) => format!("Nullable<{}>", inner.label_at(false)),
            Node::Array(item) => format!("Array<{}>", item.label_at(false)),
            Node::Dict(item) => format!("Record<string,{}>", item.label_at(false)),
            Node::Object { shape, .. } => format!("Object<{}>", shape.key_list()),
            Node::Union { kind, candidates } => {
                let labels = candidates
                    .iter()
                    .map(|c| c.label_at(false))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}<{labels}>", kind.label_prefix())
            }
            Node::Lazy(lazy) if top => lazy.resolve().label_at(false),
            Node::Lazy(lazy) => lazy.name().to_string(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schema").field(&self.label()).finish()
    }
}
