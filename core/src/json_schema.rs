//! Draft-07 JSON Schema generation.
//!
//! The generator walks the same descriptor the engine walks and describes
//! the *wire* form. Recursion through lazy nodes is cut off: the identities
//! of lazy nodes being expanded are kept on a stack, and revisiting one
//! emits a reduced fragment (the target's required properties, each
//! described shallowly) instead of expanding it again.

use serde_json::{Map, Value as Json, json};

use crate::object::ObjectShape;
use crate::schema::{LazyId, Node, Schema, UnknownKeys};

/// `$schema` URI stamped on generated documents.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Generates a standalone draft-07 document for `schema`.
///
/// Callers exposing the document as an input schema must check themselves
/// that its top-level `type` is `object`.
///
/// # Examples
///
/// ```
/// use wireshape_core::{ObjectShape, Schema};
/// use serde_json::json;
///
/// let schema = Schema::object(
///     ObjectShape::new()
///         .field("accessToken", "access_token", Schema::string())
///         .field("expiresIn", "expires_in", Schema::optional(Schema::bigint())),
/// );
///
/// assert_eq!(
///     schema.to_json_schema(),
///     json!({
///         "$schema": "http://json-schema.org/draft-07/schema#",
///         "type": "object",
///         "properties": {
///             "access_token": {"type": "string"},
///             "expires_in": {"type": "integer"}
///         },
///         "required": ["access_token"],
///         "additionalProperties": false
///     })
/// );
/// ```
pub fn generate(schema: &Schema) -> Json {
    let mut generator = Generator::default();
    let fragment = generator.fragment(schema);

    let mut document = Map::new();
    document.insert("$schema".to_string(), Json::from(DRAFT_07));
    if let Json::Object(entries) = fragment {
        document.extend(entries);
    }
    Json::Object(document)
}

#[derive(Default)]
struct Generator {
    expanding: Vec<LazyId>,
}

impl Generator {
    fn fragment(&mut self, schema: &Schema) -> Json {
        match schema.node() {
            Node::Primitive(primitive) => primitive.json_schema(),
            Node::Literal(value) => json!({"const": Json::from(value.clone())}),
            Node::Enum(enumeration) => enumeration.json_schema(),
            Node::Optional(inner) => self.fragment(inner),
            Node::Nullable(inner) => {
                json!({"anyOf": [self.fragment(inner), {"type": "null"}]})
            }
            Node::Defaults { inner, default } => {
                let mut fragment = self.fragment(inner);
                if let Json::Object(entries) = &mut fragment {
                    entries.insert("default".to_string(), Json::from(default.clone()));
                }
                fragment
            }
            Node::Array(item) => json!({"type": "array", "items": self.fragment(item)}),
            Node::Dict(item) => {
                json!({"type": "object", "additionalProperties": self.fragment(item)})
            }
            Node::Object {
                shape,
                unknown_keys,
            } => self.object(shape, *unknown_keys),
            Node::Union { kind, candidates } => {
                let fragments: Vec<Json> = candidates.iter().map(|c| self.fragment(c)).collect();
                let mut fragment = Map::new();
                fragment.insert(kind.keyword().to_string(), Json::Array(fragments));
                Json::Object(fragment)
            }
            Node::Lazy(lazy) => {
                let target = lazy.resolve();
                if self.expanding.contains(lazy.id()) {
                    return reduced(&target);
                }
                self.expanding.push(lazy.id().clone());
                let fragment = self.fragment(&target);
                self.expanding.pop();
                fragment
            }
        }
    }

    fn object(&mut self, shape: &ObjectShape, unknown_keys: UnknownKeys) -> Json {
        let mut properties = Map::new();
        for field in shape.fields() {
            properties.insert(field.wire_key.clone(), self.fragment(&field.schema));
        }

        let mut fragment = Map::new();
        fragment.insert("type".to_string(), Json::from("object"));
        fragment.insert("properties".to_string(), Json::Object(properties));
        let required = shape.required_wire_keys();
        if !required.is_empty() {
            fragment.insert("required".to_string(), json!(required));
        }
        if unknown_keys == UnknownKeys::Drop {
            fragment.insert("additionalProperties".to_string(), Json::Bool(false));
        }
        Json::Object(fragment)
    }
}

/// Fragment for a recursion point that is already being expanded: only the
/// required properties, each without nested structure.
fn reduced(schema: &Schema) -> Json {
    match schema.node() {
        Node::Optional(inner) | Node::Defaults { inner, .. } => reduced(inner),
        Node::Nullable(inner) => json!({"anyOf": [reduced(inner), {"type": "null"}]}),
        Node::Object { shape, .. } => {
            let mut properties = Map::new();
            let mut required = Vec::new();
            for field in shape.fields().iter().filter(|f| !f.schema.is_optional()) {
                properties.insert(field.wire_key.clone(), shallow(&field.schema));
                required.push(field.wire_key.clone());
            }
            json!({"type": "object", "properties": properties, "required": required})
        }
        _ => shallow(schema),
    }
}

/// Describes a schema without descending into composites.
fn shallow(schema: &Schema) -> Json {
    match schema.node() {
        Node::Primitive(primitive) => primitive.json_schema(),
        Node::Literal(value) => json!({"const": Json::from(value.clone())}),
        Node::Enum(enumeration) => enumeration.json_schema(),
        Node::Optional(inner) | Node::Defaults { inner, .. } => shallow(inner),
        Node::Nullable(inner) => json!({"anyOf": [shallow(inner), {"type": "null"}]}),
        Node::Array(_) => json!({"type": "array"}),
        Node::Dict(_) | Node::Object { .. } => json!({"type": "object"}),
        Node::Union { .. } | Node::Lazy(_) => json!({}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn category() -> Schema {
        Schema::object(
            ObjectShape::new()
                .field_same("name", Schema::string())
                .field("parentId", "parent_id", Schema::optional(Schema::number()))
                .field_same("children", Schema::array(Schema::lazy(category))),
        )
    }

    #[test]
    fn test_primitives_and_wrappers() {
        assert_eq!(
            Generator::default().fragment(&Schema::nullable(Schema::boolean())),
            json!({"anyOf": [{"type": "boolean"}, {"type": "null"}]})
        );
        assert_eq!(
            Generator::default().fragment(&Schema::defaults(Schema::number(), 3)),
            json!({"type": "number", "default": 3})
        );
        assert_eq!(
            Generator::default().fragment(&Schema::literal("v1")),
            json!({"const": "v1"})
        );
        assert_eq!(
            Generator::default().fragment(&Schema::dict(Schema::string())),
            json!({"type": "object", "additionalProperties": {"type": "string"}})
        );
    }

    #[test]
    fn test_expando_object_allows_additional_properties() {
        let schema = Schema::expando_object(ObjectShape::new().field_same("id", Schema::string()));
        let fragment = Generator::default().fragment(&schema);
        assert_eq!(
            fragment,
            json!({"type": "object", "properties": {"id": {"type": "string"}}, "required": ["id"]})
        );
    }

    #[test]
    fn test_union_keywords() {
        let one = Schema::one_of([Schema::string(), Schema::number()]);
        assert_eq!(
            Generator::default().fragment(&one),
            json!({"oneOf": [{"type": "string"}, {"type": "number"}]})
        );
        let any = Schema::any_of([Schema::bigint()]);
        assert_eq!(
            Generator::default().fragment(&any),
            json!({"anyOf": [{"type": "integer"}]})
        );
    }

    #[test]
    fn test_recursive_schema_terminates_with_reduced_fragment() {
        let document = generate(&category());

        assert_eq!(document["$schema"], DRAFT_07);
        assert_eq!(document["required"], json!(["name", "children"]));
        let items = &document["properties"]["children"]["items"];
        assert_eq!(items["type"], "object");
        assert_eq!(
            items["properties"]["children"]["items"],
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "children": {"type": "array"}},
                "required": ["name", "children"]
            })
        );
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        fn left() -> Schema {
            Schema::object(ObjectShape::new().field_same("right", Schema::optional(Schema::lazy(right))))
        }
        fn right() -> Schema {
            Schema::object(ObjectShape::new().field_same("left", Schema::optional(Schema::lazy(left))))
        }
        let document = generate(&left());
        assert_eq!(
            document["properties"]["right"]["properties"]["left"]["properties"]["right"],
            json!({"type": "object", "properties": {}, "required": []})
        );
    }

    #[test]
    fn test_distinct_references_expand_fully() {
        fn reference(name: &str, target: Schema) -> Schema {
            Schema::lazy_named(name, move || target.clone())
        }

        let leaf = Schema::object(
            ObjectShape::new()
                .field_same("name", Schema::string())
                .field_same(
                    "meta",
                    Schema::object(ObjectShape::new().field_same("tag", Schema::string())),
                )
                .field_same("note", Schema::optional(Schema::string())),
        );
        let mid = Schema::object(ObjectShape::new().field_same("leaf", reference("Leaf", leaf)));
        let root = Schema::object(ObjectShape::new().field_same("mid", reference("Mid", mid)));

        let document = generate(&root);
        assert_eq!(
            document["properties"]["mid"]["properties"]["leaf"],
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "meta": {
                        "type": "object",
                        "properties": {"tag": {"type": "string"}},
                        "required": ["tag"],
                        "additionalProperties": false
                    },
                    "note": {"type": "string"}
                },
                "required": ["name", "meta"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_distinct_resolver_functions_are_not_revisits() {
        fn leaf() -> Schema {
            Schema::object(
                ObjectShape::new()
                    .field_same("tag", Schema::string())
                    .field_same("note", Schema::optional(Schema::string())),
            )
        }
        fn mid() -> Schema {
            Schema::object(ObjectShape::new().field_same("leaf", Schema::lazy(leaf)))
        }

        let document = generate(&Schema::object(
            ObjectShape::new().field_same("mid", Schema::lazy(mid)),
        ));
        let leaf_fragment = &document["properties"]["mid"]["properties"]["leaf"];
        assert_eq!(leaf_fragment["properties"]["note"], json!({"type": "string"}));
        assert_eq!(leaf_fragment["additionalProperties"], false);
    }

    #[test]
    fn test_root_document_carries_schema_uri() {
        let document = generate(&Schema::unknown());
        assert_eq!(document, json!({"$schema": DRAFT_07}));
        let literal = generate(&Schema::literal(Value::Null));
        assert_eq!(literal["const"], Json::Null);
    }
}
