//! # Sealed Interfaces
//!
//! `oneOf` handling. A discriminated `oneOf` over plain references becomes a
//! `SealedInterface`; a `oneOf` with a single non-null branch unwraps to it.

use crate::oas::names::{ComponentName, RefString};
use crate::oas::schemas::parse::{is_explicit_null, parse_schema, raw_type_with_format, unknown};
use crate::oas::schemas::{ParseContext, RefSchema, Schema, SealedInterfaceSchema};
use crate::oas::shims::ShimSchema;
use indexmap::IndexMap;

/// Parses a `oneOf` node.
pub(crate) fn parse_one_of(
    raw: &ShimSchema,
    branches: &[ShimSchema],
    name: ComponentName,
    ctx: &ParseContext,
) -> Schema {
    let discriminator = match &raw.discriminator {
        Some(d) => match &d.property_name {
            Some(property_name) => Some((property_name, d.mapping.as_ref())),
            None => return unknown(raw, name, "discriminator without 'propertyName'"),
        },
        None => None,
    };

    let nullable = ctx.is_nullable(raw) || branches.iter().any(is_explicit_null);
    let non_null: Vec<&ShimSchema> = branches.iter().filter(|b| !is_explicit_null(b)).collect();

    if raw.additional_properties.is_some() {
        return unknown(raw, name, "'additionalProperties' next to 'oneOf'");
    }
    if raw.has_properties() {
        return unknown(raw, name, "own 'properties' next to 'oneOf'");
    }

    let Some((discriminator_name, mapping)) = discriminator else {
        return match non_null.as_slice() {
            [single] => parse_schema(single, name, ctx).with_nullable(|n| n || nullable),
            _ => unknown(raw, name, "undiscriminated 'oneOf' with several branches"),
        };
    };

    // target -> branch key
    let reversed = match mapping {
        Some(mapping) => {
            if mapping.len() != non_null.len() {
                return unknown(raw, name, "discriminator mapping size differs from branch count");
            }
            let mut reversed = IndexMap::new();
            for (key, value) in mapping {
                let Some(value) = value else {
                    return unknown(raw, name, "discriminator mapping without target");
                };
                reversed.insert(RefString::from_mapping_value(value).canonical(), key.clone());
            }
            Some(reversed)
        }
        None => None,
    };

    let mut schemas = IndexMap::new();
    for branch in non_null {
        let Some(reference) = &branch.reference else {
            return unknown(raw, name, "discriminated branch is not a reference");
        };
        let target = RefString::new(reference.as_str());
        let key = match &reversed {
            Some(reversed) => match reversed.get(&target.canonical()) {
                Some(key) => key.clone(),
                None => return unknown(raw, name, "branch missing from discriminator mapping"),
            },
            None => match target.schema_name().raw_class_name() {
                Some(class_name) => class_name.to_string(),
                None => return unknown(raw, name, "branch reference without a name"),
            },
        };
        let branch = Schema::Ref(RefSchema {
            target,
            name: name.child(&key),
            nullable: false,
        });
        schemas.insert(key, branch);
    }

    Schema::SealedInterface(SealedInterfaceSchema {
        discriminator_name: discriminator_name.clone(),
        schemas,
        nullable,
        type_with_format: raw_type_with_format(raw),
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::shims::SpecVersion;

    fn parse(yaml: &str) -> Schema {
        let raw: ShimSchema = serde_yaml::from_str(yaml).expect("Invalid test schema");
        parse_schema(
            &raw,
            ComponentName::parse("Pet"),
            &ParseContext::new(SpecVersion::V3_0),
        )
    }

    fn sealed(schema: Schema) -> SealedInterfaceSchema {
        match schema {
            Schema::SealedInterface(s) => s,
            other => panic!("Expected SealedInterface, got {:?}", other),
        }
    }

    #[test]
    fn test_discriminated_with_mapping() {
        let pet = sealed(parse(
            r#"
oneOf:
  - $ref: '#/components/schemas/Dog'
  - $ref: '#/components/schemas/Cat'
discriminator:
  propertyName: kind
  mapping:
    dog: '#/components/schemas/Dog'
    cat: '#/components/schemas/Cat'
"#,
        ));
        assert_eq!(pet.discriminator_name, "kind");
        assert_eq!(pet.schemas.keys().collect::<Vec<_>>(), vec!["dog", "cat"]);
        let Schema::Ref(dog) = &pet.schemas["dog"] else {
            panic!("Expected Ref branch")
        };
        assert_eq!(dog.target.as_str(), "#/components/schemas/Dog");
        assert_eq!(dog.name.to_string(), "Pet.Dog");
        assert!(!dog.nullable);
    }

    #[test]
    fn test_discriminated_without_mapping_uses_short_names() {
        let pet = sealed(parse(
            r#"
oneOf:
  - $ref: '#/components/schemas/good_dog'
  - $ref: '#/components/schemas/Cat'
  - type: 'null'
discriminator:
  propertyName: kind
"#,
        ));
        assert_eq!(pet.schemas.keys().collect::<Vec<_>>(), vec!["GoodDog", "Cat"]);
        assert!(pet.nullable);
    }

    #[test]
    fn test_bare_mapping_values() {
        let pet = sealed(parse(
            r#"
oneOf:
  - $ref: '#/components/schemas/Dog'
discriminator:
  propertyName: kind
  mapping:
    doggo: Dog
"#,
        ));
        assert_eq!(pet.branch_key_for(&RefString::new("#/components/schemas/Dog")), Some("doggo"));
    }

    #[test]
    fn test_degraded_one_of_shapes() {
        let cases = [
            // no propertyName
            "{oneOf: [{$ref: '#/components/schemas/Dog'}], discriminator: {mapping: {}}}",
            // several undiscriminated branches
            "{oneOf: [{type: string}, {type: integer}]}",
            // mapping size mismatch
            "{oneOf: [{$ref: '#/components/schemas/Dog'}, {$ref: '#/components/schemas/Cat'}], discriminator: {propertyName: k, mapping: {dog: Dog}}}",
            // inline branch
            "{oneOf: [{$ref: '#/components/schemas/Dog'}, {type: object}], discriminator: {propertyName: k}}",
            // branch missing from mapping
            "{oneOf: [{$ref: '#/components/schemas/Dog'}], discriminator: {propertyName: k, mapping: {cat: Cat}}}",
            // own properties
            "{oneOf: [{$ref: '#/components/schemas/Dog'}], discriminator: {propertyName: k}, properties: {a: {type: string}}}",
            // additionalProperties
            "{oneOf: [{$ref: '#/components/schemas/Dog'}], additionalProperties: false}",
        ];
        for case in cases {
            assert!(matches!(parse(case), Schema::Unknown(_)), "case {}", case);
        }
    }

    #[test]
    fn test_single_branch_unwraps_with_nullability() {
        let schema = parse("{oneOf: [{type: string}, {type: 'null'}]}");
        let Schema::Primitive(p) = schema else {
            panic!("Expected Primitive")
        };
        assert!(p.nullable);
        assert_eq!(p.name.to_string(), "Pet");
    }
}
