#![deny(missing_docs)]

//! # Discriminator Resolution
//!
//! Computes, for every schema used as a branch of a sealed interface, the one
//! discriminator property and tag value it must carry.
//!
//! A schema may be a branch of several interfaces. They must all agree on the
//! property name and on the tag; otherwise every interface of that group loses
//! its discriminator information for every branch it owns.

use crate::oas::names::{ComponentName, RefString};
use crate::oas::schemas::{RefIndex, Schema, SealedInterfaceSchema};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;
use tracing::warn;

/// Discriminator facts for one branch schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorInfo {
    /// Property carrying the tag.
    pub discriminator_name: String,
    /// Tag value identifying the branch.
    pub branch_key: String,
    /// Interfaces the branch type must implement.
    pub interfaces: BTreeSet<ComponentName>,
}

/// Branch schema name -> discriminator facts.
pub type DiscriminatorMap = IndexMap<ComponentName, DiscriminatorInfo>;

struct Membership<'a> {
    interface: &'a SealedInterfaceSchema,
    branch_key: &'a str,
}

/// Collects sealed interfaces across all trees and builds the discriminator map.
pub fn resolve_discriminators<'a>(
    schemas: impl IntoIterator<Item = &'a Schema>,
    index: &RefIndex,
) -> DiscriminatorMap {
    let mut groups: IndexMap<RefString, Vec<Membership<'a>>> = IndexMap::new();
    for schema in schemas {
        for node in schema.flatten() {
            let Schema::SealedInterface(interface) = node else {
                continue;
            };
            for (branch_key, target) in interface.branch_targets() {
                groups
                    .entry(target.canonical())
                    .or_default()
                    .push(Membership {
                        interface,
                        branch_key,
                    });
            }
        }
    }

    let mut invalid: BTreeSet<ComponentName> = BTreeSet::new();
    for (target, members) in &groups {
        let names: IndexSet<&str> = members
            .iter()
            .map(|m| m.interface.discriminator_name.as_str())
            .collect();
        let keys: IndexSet<&str> = members.iter().map(|m| m.branch_key).collect();
        if names.len() > 1 || keys.len() > 1 {
            warn!(
                "Conflicting discriminators for '{}' (properties {:?}, tags {:?}); dropping discriminator info of {} interface(s)",
                target,
                names,
                keys,
                members.len()
            );
            invalid.extend(members.iter().map(|m| m.interface.name.clone()));
        }
    }

    let mut out = DiscriminatorMap::new();
    for (target, members) in groups {
        let interfaces: BTreeSet<ComponentName> =
            members.iter().map(|m| m.interface.name.clone()).collect();
        if !interfaces.is_disjoint(&invalid) {
            warn!("Branch '{}' has no discriminator info after demotion", target);
            continue;
        }
        let Some(first) = members.first() else {
            continue;
        };
        let name = index
            .get(&target)
            .map(|s| s.name().clone())
            .unwrap_or_else(|| target.schema_name());
        out.insert(
            name,
            DiscriminatorInfo {
                discriminator_name: first.interface.discriminator_name.clone(),
                branch_key: first.branch_key.to_string(),
                interfaces,
            },
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::schemas::{parse_component_schemas, ParseContext};
    use crate::oas::shims::ShimOpenApi;

    fn resolve(yaml: &str) -> DiscriminatorMap {
        let doc = ShimOpenApi::from_yaml_str(yaml).unwrap();
        let schemas = parse_component_schemas(&doc, &ParseContext::new(doc.version()));
        let index = RefIndex::build(&schemas).unwrap();
        resolve_discriminators(&schemas, &index)
    }

    const BRANCHES: &str = r#"
    Dog: {type: object, properties: {kind: {type: string}}}
    Cat: {type: object, properties: {kind: {type: string}}}
    Fish: {type: object, properties: {kind: {type: string}, type: {type: string}}}
"#;

    #[test]
    fn test_consistent_interfaces_merge() {
        let map = resolve(&format!(
            r#"
openapi: 3.0.3
components:
  schemas:
{BRANCHES}
    Pet:
      oneOf: [{{$ref: '#/components/schemas/Dog'}}, {{$ref: '#/components/schemas/Cat'}}]
      discriminator: {{propertyName: kind, mapping: {{dog: Dog, cat: Cat}}}}
    Mammal:
      oneOf: [{{$ref: '#/components/schemas/Dog'}}]
      discriminator: {{propertyName: kind, mapping: {{dog: '#/components/schemas/Dog'}}}}
"#
        ));
        let dog = &map[&ComponentName::parse("Dog")];
        assert_eq!(dog.discriminator_name, "kind");
        assert_eq!(dog.branch_key, "dog");
        assert_eq!(
            dog.interfaces,
            BTreeSet::from([ComponentName::parse("Pet"), ComponentName::parse("Mammal")])
        );
        assert_eq!(map[&ComponentName::parse("Cat")].branch_key, "cat");
    }

    #[test]
    fn test_conflicting_property_names_demote_every_branch() {
        let map = resolve(&format!(
            r#"
openapi: 3.0.3
components:
  schemas:
{BRANCHES}
    Pet:
      oneOf: [{{$ref: '#/components/schemas/Dog'}}, {{$ref: '#/components/schemas/Cat'}}]
      discriminator: {{propertyName: kind}}
    Swimmer:
      oneOf: [{{$ref: '#/components/schemas/Dog'}}, {{$ref: '#/components/schemas/Fish'}}]
      discriminator: {{propertyName: type}}
"#
        ));
        assert!(map.get(&ComponentName::parse("Dog")).is_none());
        // Cat only belongs to Pet, which lost its eligibility through Dog.
        assert!(map.get(&ComponentName::parse("Cat")).is_none());
        assert!(map.get(&ComponentName::parse("Fish")).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_conflicting_branch_keys_demote() {
        let map = resolve(&format!(
            r#"
openapi: 3.0.3
components:
  schemas:
{BRANCHES}
    Pet:
      oneOf: [{{$ref: '#/components/schemas/Dog'}}]
      discriminator: {{propertyName: kind, mapping: {{dog: Dog}}}}
    Mammal:
      oneOf: [{{$ref: '#/components/schemas/Dog'}}]
      discriminator: {{propertyName: kind, mapping: {{doggo: Dog}}}}
    Aquarium:
      oneOf: [{{$ref: '#/components/schemas/Fish'}}]
      discriminator: {{propertyName: kind}}
"#
        ));
        assert!(map.get(&ComponentName::parse("Dog")).is_none());
        assert_eq!(map[&ComponentName::parse("Fish")].branch_key, "Fish");
    }
}
