#![deny(missing_docs)]

//! # Struct Flattening
//!
//! Reduces `allOf` / `anyOf` compositions to a single `ObjectSchema`.
//!
//! Logic:
//! - Every member must reduce to an object: an `Object` directly, a nested
//!   `Composed`, or a `Ref` whose target reduces.
//! - Property names must be disjoint across members.
//! - `allOf` requires the union of the members' required sets, `anyOf` requires nothing.
//! - Merged properties are renamed under the composed schema's name.

use crate::oas::names::RefString;
use crate::oas::schemas::{ComposedSchema, CompositionKind, ObjectSchema, RefIndex, Schema};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashSet};

/// Attempts to reduce a composition to an object.
///
/// Returns `None` when a member is not object-shaped, property names collide,
/// or a chain of references loops back on itself.
pub fn flatten_composed(composed: &ComposedSchema, index: &RefIndex) -> Option<ObjectSchema> {
    let mut visited = HashSet::new();
    flatten_recursive(composed, index, &mut visited)
}

fn flatten_recursive(
    composed: &ComposedSchema,
    index: &RefIndex,
    visited: &mut HashSet<RefString>,
) -> Option<ObjectSchema> {
    let mut required = BTreeSet::new();
    let mut properties: IndexMap<String, Schema> = IndexMap::new();

    for member in &composed.members {
        let object = reduce_member(member, index, visited)?;
        for (key, prop) in object.properties {
            if properties.contains_key(&key) {
                return None;
            }
            let name = composed.name.child(&key);
            properties.insert(key, prop.renamed(name));
        }
        if composed.kind == CompositionKind::AllOf {
            required.extend(object.required);
        }
    }

    Some(ObjectSchema {
        required,
        properties,
        name: composed.name.clone(),
        nullable: composed.nullable,
        type_with_format: composed.type_with_format.clone(),
    })
}

fn reduce_member(
    member: &Schema,
    index: &RefIndex,
    visited: &mut HashSet<RefString>,
) -> Option<ObjectSchema> {
    match member {
        Schema::Object(object) => Some(object.clone()),
        Schema::Composed(nested) => flatten_recursive(nested, index, visited),
        Schema::Ref(r) => {
            let key = r.target.canonical();
            if !visited.insert(key.clone()) {
                return None;
            }
            let reduced = index
                .get(&key)
                .and_then(|target| reduce_member(target, index, visited));
            visited.remove(&key);
            reduced
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::names::ComponentName;
    use crate::oas::schemas::{parse_component_schemas, ParseContext};
    use crate::oas::shims::ShimOpenApi;

    fn load(yaml: &str) -> (Vec<Schema>, RefIndex) {
        let doc = ShimOpenApi::from_yaml_str(yaml).unwrap();
        let schemas = parse_component_schemas(&doc, &ParseContext::new(doc.version()));
        let index = RefIndex::build(&schemas).unwrap();
        (schemas, index)
    }

    fn composed(schema: &Schema) -> &ComposedSchema {
        match schema {
            Schema::Composed(c) => c,
            other => panic!("Expected Composed, got {:?}", other),
        }
    }

    const MEMBERS: &str = r#"
openapi: 3.0.3
components:
  schemas:
    A:
      type: object
      required: [x]
      properties:
        x: {type: string}
    B:
      type: object
      required: [y]
      properties:
        y:
          type: object
          properties:
            z: {type: integer}
    Both:
      allOf:
        - $ref: '#/components/schemas/A'
        - $ref: '#/components/schemas/B'
    Either:
      anyOf:
        - $ref: '#/components/schemas/A'
        - $ref: '#/components/schemas/B'
"#;

    #[test]
    fn test_all_of_unions_required() {
        let (schemas, index) = load(MEMBERS);
        let obj = flatten_composed(composed(&schemas[2]), &index).unwrap();
        assert_eq!(
            obj.required,
            BTreeSet::from(["x".to_string(), "y".to_string()])
        );
        assert_eq!(obj.properties.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(obj.name, ComponentName::parse("Both"));
    }

    #[test]
    fn test_any_of_requires_nothing() {
        let (schemas, index) = load(MEMBERS);
        let obj = flatten_composed(composed(&schemas[3]), &index).unwrap();
        assert!(obj.required.is_empty());
        assert_eq!(obj.properties.len(), 2);
    }

    #[test]
    fn test_merged_properties_are_renamed() {
        let (schemas, index) = load(MEMBERS);
        let obj = flatten_composed(composed(&schemas[2]), &index).unwrap();
        let Schema::Object(y) = &obj.properties["y"] else {
            panic!("Expected Object property")
        };
        assert_eq!(y.name.to_string(), "Both.Y");
        assert_eq!(y.properties["z"].name().to_string(), "Both.Y.Z");
    }

    #[test]
    fn test_collisions_and_non_objects_do_not_reduce() {
        let (schemas, index) = load(
            r#"
openapi: 3.0.3
components:
  schemas:
    A:
      type: object
      properties:
        x: {type: string}
    Clash:
      allOf:
        - $ref: '#/components/schemas/A'
        - type: object
          properties:
            x: {type: integer}
    Scalar:
      allOf:
        - $ref: '#/components/schemas/A'
        - type: string
"#,
        );
        assert!(flatten_composed(composed(&schemas[1]), &index).is_none());
        assert!(flatten_composed(composed(&schemas[2]), &index).is_none());
    }

    #[test]
    fn test_reference_cycles_do_not_reduce() {
        let (schemas, index) = load(
            r#"
openapi: 3.0.3
components:
  schemas:
    Left:
      allOf:
        - $ref: '#/components/schemas/Right'
        - type: object
    Right:
      allOf:
        - $ref: '#/components/schemas/Left'
        - type: object
"#,
        );
        assert!(flatten_composed(composed(&schemas[0]), &index).is_none());
    }

    #[test]
    fn test_flattening_is_idempotent() {
        let (schemas, index) = load(MEMBERS);
        let once = flatten_composed(composed(&schemas[2]), &index).unwrap();
        let trivial = ComposedSchema {
            kind: CompositionKind::AllOf,
            members: vec![Schema::Object(once.clone())],
            name: once.name.clone(),
            nullable: once.nullable,
            type_with_format: once.type_with_format.clone(),
        };
        assert_eq!(flatten_composed(&trivial, &index), Some(once));
    }
}
