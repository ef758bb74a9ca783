#![deny(missing_docs)]

//! # Schema Model
//!
//! The closed set of schema shapes the model graph knows about, and the passes
//! over `components/schemas` that produce them.
//!
//! - **parse**: raw schema node -> `Schema`.
//! - **enums**: `oneOf` / discriminator handling (sealed interfaces).
//! - **structs**: flattening of `allOf` / `anyOf` into a single object.
//! - **refs**: the canonical ref index.

pub mod enums;
pub mod parse;
pub mod refs;
pub mod structs;

use crate::oas::names::{ComponentName, RefString, TypeWithFormat};
use indexmap::IndexMap;
use std::collections::BTreeSet;

pub use parse::{parse_component_schemas, parse_schema, ParseContext};
pub use refs::RefIndex;
pub use structs::flatten_composed;

/// Scalar kinds of `PrimitiveSchema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
}

impl PrimitiveKind {
    /// Case-insensitive lookup of a declared type name.
    pub fn from_type_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Lower-case type name as written in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Composition keyword of a `ComposedSchema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositionKind {
    /// Every member applies.
    AllOf,
    /// At least one member applies.
    AnyOf,
}

/// A string, integer, number or boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveSchema {
    /// Scalar kind.
    pub kind: PrimitiveKind,
    /// Declared format.
    pub format: Option<String>,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
}

/// A string enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    /// Literals in declaration order.
    pub values: Vec<String>,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
    /// Raw type and format.
    pub type_with_format: Option<TypeWithFormat>,
}

/// A list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySchema {
    /// Item schema.
    pub items: Box<Schema>,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
    /// Raw type and format.
    pub type_with_format: Option<TypeWithFormat>,
}

/// An open string-keyed map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSchema {
    /// Value schema.
    pub value: Box<Schema>,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
    /// Raw type and format.
    pub type_with_format: Option<TypeWithFormat>,
}

/// An object with declared properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    /// Required property names.
    pub required: BTreeSet<String>,
    /// Properties in declaration order.
    pub properties: IndexMap<String, Schema>,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
    /// Raw type and format.
    pub type_with_format: Option<TypeWithFormat>,
}

/// An `allOf` / `anyOf` that could not be reduced to an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedSchema {
    /// Composition keyword.
    pub kind: CompositionKind,
    /// Members, all parsed under `ComponentName::UNNAMED`.
    pub members: Vec<Schema>,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
    /// Raw type and format.
    pub type_with_format: Option<TypeWithFormat>,
}

/// A discriminated union over referenced schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedInterfaceSchema {
    /// Discriminator property name.
    pub discriminator_name: String,
    /// Branch key (tag value) -> branch, always a `Schema::Ref`.
    pub schemas: IndexMap<String, Schema>,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
    /// Raw type and format.
    pub type_with_format: Option<TypeWithFormat>,
}

impl SealedInterfaceSchema {
    /// Branch key under which this interface labels `target`.
    pub fn branch_key_for(&self, target: &RefString) -> Option<&str> {
        let target = target.canonical();
        self.schemas
            .iter()
            .find(|(_, branch)| match branch {
                Schema::Ref(r) => r.target.canonical() == target,
                _ => false,
            })
            .map(|(key, _)| key.as_str())
    }

    /// Targets of all branches, in declaration order.
    pub fn branch_targets(&self) -> impl Iterator<Item = (&str, &RefString)> {
        self.schemas.iter().filter_map(|(key, branch)| match branch {
            Schema::Ref(r) => Some((key.as_str(), &r.target)),
            _ => None,
        })
    }
}

/// A pointer to a named component schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSchema {
    /// Raw reference.
    pub target: RefString,
    /// Position in the document.
    pub name: ComponentName,
    /// Nullability.
    pub nullable: bool,
}

/// A construct that cannot be represented faithfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSchema {
    /// Position in the document.
    pub name: ComponentName,
    /// Raw type and format.
    pub type_with_format: Option<TypeWithFormat>,
}

static NULL_NAME: ComponentName = ComponentName::UNNAMED;

/// A parsed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Explicit `null` type.
    Null,
    /// Scalar.
    Primitive(PrimitiveSchema),
    /// String enum.
    EnumString(EnumSchema),
    /// List.
    Array(ArraySchema),
    /// Open map.
    Map(MapSchema),
    /// Object.
    Object(ObjectSchema),
    /// Irreducible composition.
    Composed(ComposedSchema),
    /// Discriminated union.
    SealedInterface(SealedInterfaceSchema),
    /// Reference.
    Ref(RefSchema),
    /// Catch-all.
    Unknown(UnknownSchema),
}

impl Schema {
    /// Position in the document.
    pub fn name(&self) -> &ComponentName {
        match self {
            Schema::Null => &NULL_NAME,
            Schema::Primitive(s) => &s.name,
            Schema::EnumString(s) => &s.name,
            Schema::Array(s) => &s.name,
            Schema::Map(s) => &s.name,
            Schema::Object(s) => &s.name,
            Schema::Composed(s) => &s.name,
            Schema::SealedInterface(s) => &s.name,
            Schema::Ref(s) => &s.name,
            Schema::Unknown(s) => &s.name,
        }
    }

    /// Whether `null` is an accepted value.
    pub fn is_nullable(&self) -> bool {
        match self {
            Schema::Null => true,
            Schema::Primitive(s) => s.nullable,
            Schema::EnumString(s) => s.nullable,
            Schema::Array(s) => s.nullable,
            Schema::Map(s) => s.nullable,
            Schema::Object(s) => s.nullable,
            Schema::Composed(s) => s.nullable,
            Schema::SealedInterface(s) => s.nullable,
            Schema::Ref(s) => s.nullable,
            Schema::Unknown(_) => false,
        }
    }

    /// Raw `(type, format)` used by type overrides.
    pub fn type_with_format(&self) -> Option<TypeWithFormat> {
        match self {
            Schema::Null | Schema::Ref(_) => None,
            Schema::Primitive(s) => Some(TypeWithFormat::new(s.kind.as_str(), s.format.clone())),
            Schema::EnumString(s) => s.type_with_format.clone(),
            Schema::Array(s) => s.type_with_format.clone(),
            Schema::Map(s) => s.type_with_format.clone(),
            Schema::Object(s) => s.type_with_format.clone(),
            Schema::Composed(s) => s.type_with_format.clone(),
            Schema::SealedInterface(s) => s.type_with_format.clone(),
            Schema::Unknown(s) => s.type_with_format.clone(),
        }
    }

    /// Returns a copy with nullability rewritten. `Null` and `Unknown` are unaffected.
    pub fn with_nullable(self, update: impl FnOnce(bool) -> bool) -> Schema {
        match self {
            Schema::Null => Schema::Null,
            Schema::Unknown(s) => Schema::Unknown(s),
            Schema::Primitive(mut s) => {
                s.nullable = update(s.nullable);
                Schema::Primitive(s)
            }
            Schema::EnumString(mut s) => {
                s.nullable = update(s.nullable);
                Schema::EnumString(s)
            }
            Schema::Array(mut s) => {
                s.nullable = update(s.nullable);
                Schema::Array(s)
            }
            Schema::Map(mut s) => {
                s.nullable = update(s.nullable);
                Schema::Map(s)
            }
            Schema::Object(mut s) => {
                s.nullable = update(s.nullable);
                Schema::Object(s)
            }
            Schema::Composed(mut s) => {
                s.nullable = update(s.nullable);
                Schema::Composed(s)
            }
            Schema::SealedInterface(mut s) => {
                s.nullable = update(s.nullable);
                Schema::SealedInterface(s)
            }
            Schema::Ref(mut s) => {
                s.nullable = update(s.nullable);
                Schema::Ref(s)
            }
        }
    }

    /// Re-derives every name in this subtree as if it had been parsed under `name`.
    ///
    /// Used when merged object properties move under a composed schema.
    pub fn renamed(self, name: ComponentName) -> Schema {
        match self {
            Schema::Null => Schema::Null,
            Schema::Primitive(mut s) => {
                s.name = name;
                Schema::Primitive(s)
            }
            Schema::EnumString(mut s) => {
                s.name = name;
                Schema::EnumString(s)
            }
            Schema::Unknown(mut s) => {
                s.name = name;
                Schema::Unknown(s)
            }
            Schema::Ref(mut s) => {
                s.name = name;
                Schema::Ref(s)
            }
            Schema::Composed(mut s) => {
                s.name = name;
                Schema::Composed(s)
            }
            Schema::Array(mut s) => {
                s.items = Box::new(s.items.renamed(name.with_last_suffix("Item")));
                s.name = name;
                Schema::Array(s)
            }
            Schema::Map(mut s) => {
                s.value = Box::new(s.value.renamed(name.child("Value")));
                s.name = name;
                Schema::Map(s)
            }
            Schema::Object(mut s) => {
                s.properties = s
                    .properties
                    .into_iter()
                    .map(|(key, prop)| {
                        let child = name.child(&key);
                        (key, prop.renamed(child))
                    })
                    .collect();
                s.name = name;
                Schema::Object(s)
            }
            Schema::SealedInterface(mut s) => {
                s.schemas = s
                    .schemas
                    .into_iter()
                    .map(|(key, branch)| {
                        let child = name.child(&key);
                        (key, branch.renamed(child))
                    })
                    .collect();
                s.name = name;
                Schema::SealedInterface(s)
            }
        }
    }

    /// This schema plus every schema nested in it, without following `$ref`
    /// targets and without entering composition members.
    pub fn flatten(&self) -> Vec<&Schema> {
        let mut out = Vec::new();
        self.collect_flat(&mut out);
        out
    }

    fn collect_flat<'a>(&'a self, out: &mut Vec<&'a Schema>) {
        out.push(self);
        match self {
            Schema::Array(s) => s.items.collect_flat(out),
            Schema::Map(s) => s.value.collect_flat(out),
            Schema::Object(s) => s.properties.values().for_each(|p| p.collect_flat(out)),
            Schema::SealedInterface(s) => s.schemas.values().for_each(|b| b.collect_flat(out)),
            Schema::Null
            | Schema::Primitive(_)
            | Schema::EnumString(_)
            | Schema::Composed(_)
            | Schema::Ref(_)
            | Schema::Unknown(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_prop(name: ComponentName) -> Schema {
        Schema::Primitive(PrimitiveSchema {
            kind: PrimitiveKind::String,
            format: None,
            name,
            nullable: false,
        })
    }

    fn tags_array(owner: &ComponentName) -> Schema {
        let name = owner.child("tags");
        Schema::Array(ArraySchema {
            items: Box::new(string_prop(name.with_last_suffix("Item"))),
            name,
            nullable: false,
            type_with_format: Some(TypeWithFormat::new("array", None)),
        })
    }

    fn user(owner: ComponentName) -> Schema {
        let mut properties = IndexMap::new();
        properties.insert("id".to_string(), string_prop(owner.child("id")));
        properties.insert("tags".to_string(), tags_array(&owner));
        Schema::Object(ObjectSchema {
            required: BTreeSet::from(["id".to_string()]),
            properties,
            name: owner,
            nullable: false,
            type_with_format: Some(TypeWithFormat::new("object", None)),
        })
    }

    #[test]
    fn test_flatten_visits_nested_nodes() {
        let schema = user(ComponentName::parse("User"));
        let names: Vec<String> = schema.flatten().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["User", "User.Id", "User.Tags", "User.TagsItem"]);
    }

    #[test]
    fn test_flatten_skips_composition_members() {
        let composed = Schema::Composed(ComposedSchema {
            kind: CompositionKind::AllOf,
            members: vec![user(ComponentName::UNNAMED)],
            name: ComponentName::parse("Both"),
            nullable: false,
            type_with_format: None,
        });
        assert_eq!(composed.flatten().len(), 1);
    }

    #[test]
    fn test_renamed_rederives_nested_names() {
        let renamed = user(ComponentName::parse("User")).renamed(ComponentName::parse("Admin"));
        let names: Vec<String> = renamed.flatten().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["Admin", "Admin.Id", "Admin.Tags", "Admin.TagsItem"]);
    }

    #[test]
    fn test_with_nullable_leaves_null_and_unknown() {
        assert_eq!(Schema::Null.with_nullable(|_| false), Schema::Null);
        let unknown = Schema::Unknown(UnknownSchema {
            name: ComponentName::parse("X"),
            type_with_format: None,
        });
        assert!(!unknown.with_nullable(|_| true).is_nullable());
        let prop = string_prop(ComponentName::parse("X")).with_nullable(|_| true);
        assert!(prop.is_nullable());
    }

    #[test]
    fn test_branch_key_lookup_uses_canonical_refs() {
        let name = ComponentName::parse("Pet");
        let mut schemas = IndexMap::new();
        schemas.insert(
            "dog".to_string(),
            Schema::Ref(RefSchema {
                target: RefString::new("#/components/schemas/dog"),
                name: name.child("dog"),
                nullable: false,
            }),
        );
        let pet = SealedInterfaceSchema {
            discriminator_name: "kind".into(),
            schemas,
            name,
            nullable: false,
            type_with_format: None,
        };
        assert_eq!(
            pet.branch_key_for(&RefString::new("#/components/schemas/Dog")),
            Some("dog")
        );
        assert_eq!(pet.branch_key_for(&RefString::new("#/components/schemas/Cat")), None);
    }
}
