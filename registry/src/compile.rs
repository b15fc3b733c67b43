//! Compilation of descriptors into core schemas.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Number;
use wireshape_core::{ObjectShape, Schema, Value};

use crate::document::{EnumMemberDescriptor, FieldDescriptor, SchemaDescriptor};
use crate::error::{RegistryError, Result};

/// Definitions shared by every lazy reference of one registry.
pub(crate) type Definitions = BTreeMap<String, SchemaDescriptor>;

/// Compiles `descriptor`, which belongs to `definition`.
///
/// References become named lazy schemas that recompile their target each
/// time a traversal reaches them.
pub(crate) fn compile(
    definition: &str,
    descriptor: &SchemaDescriptor,
    definitions: &Arc<Definitions>,
) -> Result<Schema> {
    let compile_child = |child: &SchemaDescriptor| compile(definition, child, definitions);

    let schema = match descriptor {
        SchemaDescriptor::String => Schema::string(),
        SchemaDescriptor::Boolean => Schema::boolean(),
        SchemaDescriptor::Number => Schema::number(),
        SchemaDescriptor::Bigint => Schema::bigint(),
        SchemaDescriptor::Unknown => Schema::unknown(),
        SchemaDescriptor::Literal { value } => Schema::literal(Value::from(value.clone())),
        SchemaDescriptor::Enum {
            members,
            allow_unknown,
        } => compile_enum(definition, members, *allow_unknown)?,
        SchemaDescriptor::Optional { schema } => Schema::optional(compile_child(schema)?),
        SchemaDescriptor::Nullable { schema } => Schema::nullable(compile_child(schema)?),
        SchemaDescriptor::Defaults { schema, value } => {
            Schema::defaults(compile_child(schema)?, Value::from(value.clone()))
        }
        SchemaDescriptor::Array { items } => Schema::array(compile_child(items)?),
        SchemaDescriptor::Dict { values } => Schema::dict(compile_child(values)?),
        SchemaDescriptor::Object { fields } => {
            Schema::object(compile_shape(definition, fields, definitions)?)
        }
        SchemaDescriptor::ExpandoObject { fields } => {
            Schema::expando_object(compile_shape(definition, fields, definitions)?)
        }
        SchemaDescriptor::OneOf { schemas } => {
            Schema::one_of(schemas.iter().map(compile_child).collect::<Result<Vec<_>>>()?)
        }
        SchemaDescriptor::AnyOf { schemas } => {
            Schema::any_of(schemas.iter().map(compile_child).collect::<Result<Vec<_>>>()?)
        }
        SchemaDescriptor::Ref { name } => {
            if !definitions.contains_key(name) {
                return Err(RegistryError::UnresolvedReference {
                    definition: definition.to_string(),
                    reference: name.clone(),
                });
            }
            let definitions = Arc::clone(definitions);
            let target = name.clone();
            Schema::lazy_named(name.as_str(), move || resolve(&definitions, &target))
        }
    };
    Ok(schema)
}

/// Compiles the definition `name` for a lazy reference.
fn resolve(definitions: &Arc<Definitions>, name: &str) -> Schema {
    // Every definition compiled once already when the registry was loaded.
    definitions
        .get(name)
        .and_then(|descriptor| compile(name, descriptor, definitions).ok())
        .unwrap_or_else(Schema::unknown)
}

fn compile_shape(
    definition: &str,
    fields: &[FieldDescriptor],
    definitions: &Arc<Definitions>,
) -> Result<ObjectShape> {
    let mut shape = ObjectShape::new();
    for field in fields {
        let schema = compile(definition, &field.schema, definitions)?;
        shape = shape
            .try_field(field.name.as_str(), field.wire_key(), schema)
            .map_err(|err| invalid(definition, err.to_string()))?;
    }
    Ok(shape)
}

fn compile_enum(
    definition: &str,
    members: &[EnumMemberDescriptor],
    allow_unknown: bool,
) -> Result<Schema> {
    if members.is_empty() {
        return Err(invalid(definition, "enum has no members"));
    }

    let numbers: Option<Vec<(String, Number)>> = members
        .iter()
        .map(|m| m.value.as_number().map(|n| (m.name.clone(), n.clone())))
        .collect();
    if let Some(numbers) = numbers {
        return Ok(Schema::number_enum(numbers, allow_unknown));
    }

    let strings: Option<Vec<(String, String)>> = members
        .iter()
        .map(|m| m.value.as_str().map(|s| (m.name.clone(), s.to_string())))
        .collect();
    match strings {
        Some(strings) => Ok(Schema::string_enum(strings, allow_unknown)),
        None => Err(invalid(
            definition,
            "enum members must be all numbers or all strings",
        )),
    }
}

fn invalid(definition: &str, reason: impl Into<String>) -> RegistryError {
    RegistryError::InvalidDescriptor {
        definition: definition.to_string(),
        reason: reason.into(),
    }
}
