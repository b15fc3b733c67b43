//! Validation and mapping traversal.
//!
//! One depth-first, pre-order walk serves both directions. Each node runs
//! its own check, recurses into children, and collects every child failure
//! instead of stopping at the first, so a single call reports all
//! independent problems in a payload.
//!
//! Path and branch information is attached here and nowhere else: when a
//! child fails, [`visit_child`] prefixes each of its errors with the key or
//! index that led to it and with the value of the node being visited.
//!
//! A failed traversal never returns a partial value.

use crate::error::{PathSegment, SchemaResult, ValidationError};
use crate::object::ObjectShape;
use crate::schema::{Node, Schema, UnknownKeys};
use crate::value::{Map, Value};

/// Direction of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Wire to domain.
    Map,
    /// Domain to wire.
    Unmap,
}

/// Validates `wire` against `schema` and converts it to its domain form.
///
/// # Errors
///
/// Returns every [`ValidationError`] found; the list is never empty.
///
/// # Examples
///
/// ```
/// use wireshape_core::{Schema, Value, validate_and_map};
///
/// let errors = validate_and_map(&Value::from("5"), &Schema::bigint()).unwrap_err();
/// assert_eq!(errors[0].expected_type, "bigint");
/// ```
pub fn validate_and_map(wire: &Value, schema: &Schema) -> SchemaResult<Value> {
    run(schema, wire, Direction::Map)
}

/// Validates `domain` against `schema` and converts it to its wire form.
///
/// # Errors
///
/// Returns every [`ValidationError`] found; the list is never empty.
pub fn validate_and_unmap(domain: &Value, schema: &Schema) -> SchemaResult<Value> {
    run(schema, domain, Direction::Unmap)
}

pub(crate) fn run(schema: &Schema, value: &Value, direction: Direction) -> SchemaResult<Value> {
    // A present input always produces a present output.
    visit(schema, Some(value), direction).map(Option::unwrap_or_default)
}

/// Visits one node. `None` stands for an absent value and yields `None`
/// when the schema accepts absence.
fn visit(schema: &Schema, value: Option<&Value>, direction: Direction) -> SchemaResult<Option<Value>> {
    match schema.node() {
        Node::Optional(inner) => match value {
            None => Ok(None),
            Some(_) => visit(inner, value, direction),
        },
        Node::Defaults { inner, default } => match value {
            None | Some(Value::Null) => Ok(Some(default.clone())),
            Some(_) => visit(inner, value, direction),
        },
        Node::Nullable(inner) => match value {
            Some(Value::Null) => Ok(Some(Value::Null)),
            _ => visit(inner, value, direction),
        },
        Node::Lazy(lazy) => visit(&lazy.resolve(), value, direction),
        Node::Union { candidates, .. } => visit_union(schema, candidates, value, direction),
        _ => match value {
            None => Err(vec![ValidationError::type_mismatch(schema.label(), None)]),
            Some(value) => visit_present(schema, value, direction).map(Some),
        },
    }
}

fn visit_present(schema: &Schema, value: &Value, direction: Direction) -> SchemaResult<Value> {
    match schema.node() {
        Node::Primitive(primitive) => primitive.check(value, direction).map_err(|e| vec![e]),
        Node::Enum(enumeration) => enumeration.check(value).map_err(|e| vec![e]),
        Node::Literal(expected) if expected.loosely_equals(value) => Ok(expected.clone()),
        Node::Array(item) => match value {
            Value::Array(items) => visit_array(item, value, items, direction),
            _ => Err(mismatch(schema, value)),
        },
        Node::Dict(item) => match value {
            Value::Object(entries) => visit_dict(item, value, entries, direction),
            _ => Err(mismatch(schema, value)),
        },
        Node::Object {
            shape,
            unknown_keys,
        } => match value {
            Value::Object(entries) => {
                visit_object(shape, *unknown_keys, value, entries, direction)
            }
            _ => Err(mismatch(schema, value)),
        },
        // Literal mismatch; wrapper nodes never reach this point.
        _ => Err(mismatch(schema, value)),
    }
}

fn mismatch(schema: &Schema, value: &Value) -> Vec<ValidationError> {
    vec![ValidationError::type_mismatch(schema.label(), Some(value))]
}

/// Visits a child of `parent`, re-rooting its errors at `segment`.
fn visit_child(
    schema: &Schema,
    parent: &Value,
    segment: PathSegment,
    child: Option<&Value>,
    direction: Direction,
) -> SchemaResult<Option<Value>> {
    visit(schema, child, direction).map_err(|errors| {
        errors
            .into_iter()
            .map(|error| error.nested(segment.clone(), parent))
            .collect()
    })
}

fn visit_array(
    item: &Schema,
    parent: &Value,
    items: &[Value],
    direction: Direction,
) -> SchemaResult<Value> {
    let mut output = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for (index, element) in items.iter().enumerate() {
        match visit_child(item, parent, PathSegment::Index(index), Some(element), direction) {
            Ok(mapped) => output.push(mapped.unwrap_or_default()),
            Err(found) => errors.extend(found),
        }
    }

    if errors.is_empty() {
        Ok(Value::Array(output))
    } else {
        Err(errors)
    }
}

fn visit_dict(
    item: &Schema,
    parent: &Value,
    entries: &Map,
    direction: Direction,
) -> SchemaResult<Value> {
    let mut output = Map::new();
    let mut errors = Vec::new();

    for (key, entry) in entries {
        let segment = PathSegment::Key(key.clone());
        match visit_child(item, parent, segment, Some(entry), direction) {
            Ok(Some(mapped)) => {
                output.insert(key.clone(), mapped);
            }
            Ok(None) => {}
            Err(found) => errors.extend(found),
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(output))
    } else {
        Err(errors)
    }
}

fn visit_object(
    shape: &ObjectShape,
    unknown_keys: UnknownKeys,
    parent: &Value,
    entries: &Map,
    direction: Direction,
) -> SchemaResult<Value> {
    let mut output = Map::new();
    let mut errors = Vec::new();

    for field in shape.fields() {
        let source = field.source_key(direction);
        let segment = PathSegment::Key(source.to_string());
        match visit_child(&field.schema, parent, segment, entries.get(source), direction) {
            Ok(Some(mapped)) => {
                output.insert(field.target_key(direction).to_string(), mapped);
            }
            Ok(None) => {}
            Err(found) => errors.extend(found),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    if unknown_keys == UnknownKeys::Preserve {
        for (key, entry) in entries {
            // Declared target keys win over colliding undeclared input keys.
            if !shape.declares_source(key, direction) && !output.contains_key(key) {
                output.insert(key.clone(), entry.clone());
            }
        }
    }

    Ok(Value::Object(output))
}

/// Tries candidates in order; the first success wins. On exhaustion the
/// errors of every candidate are returned together.
fn visit_union(
    schema: &Schema,
    candidates: &[Schema],
    value: Option<&Value>,
    direction: Direction,
) -> SchemaResult<Option<Value>> {
    let mut errors = Vec::new();
    for candidate in candidates {
        match visit(candidate, value, direction) {
            Ok(mapped) => return Ok(mapped),
            Err(found) => errors.extend(found),
        }
    }
    if errors.is_empty() {
        errors.push(ValidationError::type_mismatch(schema.label(), value));
    }
    Err(errors)
}
