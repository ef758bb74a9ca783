#![deny(missing_docs)]

//! # Schema Parsing
//!
//! Converts raw `ShimSchema` nodes into the `Schema` model.
//!
//! Every node is parsed under a `ComponentName` derived from its position:
//! properties append their key, array items suffix the last segment with `Item`,
//! map values append `Value`, and composition members are `Unnamed`.
//! Shapes that cannot be represented degrade to `Schema::Unknown`.

use crate::oas::names::{ComponentName, RefString, TypeWithFormat};
use crate::oas::schemas::enums::parse_one_of;
use crate::oas::schemas::{
    ArraySchema, ComposedSchema, CompositionKind, EnumSchema, MapSchema, ObjectSchema,
    PrimitiveKind, PrimitiveSchema, RefSchema, Schema, UnknownSchema,
};
use crate::oas::shims::{ShimAdditionalProperties, ShimOpenApi, ShimSchema, SpecVersion};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Document-wide facts the parser needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    /// Decides how nullability is declared.
    pub version: SpecVersion,
}

impl ParseContext {
    /// Creates a context for the given version.
    pub fn new(version: SpecVersion) -> Self {
        Self { version }
    }

    /// Own nullability of a node: `nullable: true` in 3.0, `"null"` in the type list in 3.1.
    pub fn is_nullable(&self, raw: &ShimSchema) -> bool {
        match self.version {
            SpecVersion::V3_0 => raw.nullable.unwrap_or(false),
            SpecVersion::V3_1 => raw.type_names().contains(&"null"),
        }
    }
}

/// Parses every `components/schemas` entry in document order.
///
/// Returns a list rather than a map so that two keys normalizing to the same
/// name both survive until the ref index rejects them.
pub fn parse_component_schemas(doc: &ShimOpenApi, ctx: &ParseContext) -> Vec<Schema> {
    doc.schemas()
        .map(|(key, raw)| parse_schema(raw, ComponentName::parse(key), ctx))
        .collect()
}

/// Parses one raw schema node under `name`.
pub fn parse_schema(raw: &ShimSchema, name: ComponentName, ctx: &ParseContext) -> Schema {
    if is_explicit_null(raw) {
        return Schema::Null;
    }
    if let Some(reference) = &raw.reference {
        return Schema::Ref(RefSchema {
            target: RefString::new(reference.as_str()),
            name,
            nullable: false,
        });
    }
    if raw.not.is_some() {
        return unknown(raw, name, "'not' is not representable");
    }
    if let Some(branches) = &raw.one_of {
        return parse_one_of(raw, branches, name, ctx);
    }
    if raw.any_of.is_some() || raw.all_of.is_some() {
        return parse_composition(raw, name, ctx);
    }
    if let Some(values) = &raw.enum_values {
        return parse_enum(raw, values, name, ctx);
    }
    parse_typed(raw, name, ctx)
}

/// `type: null` or `type: [null]` without a format.
pub(crate) fn is_explicit_null(raw: &ShimSchema) -> bool {
    raw.type_names() == ["null"] && raw.format.is_none()
}

/// The single non-null declared type, if any.
fn declared_type(raw: &ShimSchema) -> Option<&str> {
    let names = raw.type_names();
    match names.as_slice() {
        [single] => Some(*single),
        _ => {
            let mut non_null = names.iter().filter(|n| **n != "null");
            match (non_null.next(), non_null.next()) {
                (Some(single), None) => Some(*single),
                _ => None,
            }
        }
    }
}

/// Raw `(type, format)` pair kept on the node for override lookups.
pub(crate) fn raw_type_with_format(raw: &ShimSchema) -> Option<TypeWithFormat> {
    let schema_type = declared_type(raw).or_else(|| raw.type_names().first().copied())?;
    Some(TypeWithFormat::new(schema_type, raw.format.clone()))
}

/// Degrades a node to `Unknown`.
pub(crate) fn unknown(raw: &ShimSchema, name: ComponentName, reason: &str) -> Schema {
    debug!("Schema '{}' degraded to Unknown: {}", name, reason);
    Schema::Unknown(UnknownSchema {
        name,
        type_with_format: raw_type_with_format(raw),
    })
}

fn parse_composition(raw: &ShimSchema, name: ComponentName, ctx: &ParseContext) -> Schema {
    let (kind, members) = match (&raw.any_of, &raw.all_of) {
        (Some(any_of), None) => (CompositionKind::AnyOf, any_of),
        (None, Some(all_of)) => (CompositionKind::AllOf, all_of),
        _ => return unknown(raw, name, "'anyOf' and 'allOf' together"),
    };
    if raw.discriminator.is_some() {
        return unknown(raw, name, "discriminator outside of 'oneOf'");
    }
    if raw.additional_properties.is_some() {
        return unknown(raw, name, "'additionalProperties' next to a composition");
    }
    if raw.has_properties() {
        return unknown(raw, name, "own 'properties' next to a composition");
    }

    let nullable = ctx.is_nullable(raw) || members.iter().any(is_explicit_null);
    let non_null: Vec<&ShimSchema> = members.iter().filter(|m| !is_explicit_null(m)).collect();

    if let [single] = non_null.as_slice() {
        return parse_schema(single, name, ctx).with_nullable(|n| n || nullable);
    }

    Schema::Composed(ComposedSchema {
        kind,
        members: non_null
            .into_iter()
            .map(|m| parse_schema(m, ComponentName::UNNAMED, ctx))
            .collect(),
        name,
        nullable,
        type_with_format: raw_type_with_format(raw),
    })
}

fn parse_enum(raw: &ShimSchema, values: &[Value], name: ComponentName, ctx: &ParseContext) -> Schema {
    let nullable = ctx.is_nullable(raw);
    let mut literals = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Null if nullable => {}
            Value::String(s) if nullable && s == "null" => {}
            Value::String(s) => literals.push(s.clone()),
            _ => return unknown(raw, name, "enum with non-string literals"),
        }
    }
    Schema::EnumString(EnumSchema {
        values: literals,
        name,
        nullable,
        type_with_format: raw_type_with_format(raw),
    })
}

fn parse_typed(raw: &ShimSchema, name: ComponentName, ctx: &ParseContext) -> Schema {
    let Some(schema_type) = declared_type(raw) else {
        return unknown(raw, name, "no single declared type");
    };
    match schema_type {
        "object" => parse_object(raw, name, ctx),
        "array" => match &raw.items {
            Some(items) => Schema::Array(ArraySchema {
                items: Box::new(parse_schema(items, name.with_last_suffix("Item"), ctx)),
                nullable: ctx.is_nullable(raw),
                type_with_format: raw_type_with_format(raw),
                name,
            }),
            None => unknown(raw, name, "array without 'items'"),
        },
        other => match PrimitiveKind::from_type_name(other) {
            Some(kind) => Schema::Primitive(PrimitiveSchema {
                kind,
                format: raw.format.clone(),
                nullable: ctx.is_nullable(raw),
                name,
            }),
            None => unknown(raw, name, "unrecognized type"),
        },
    }
}

fn parse_object(raw: &ShimSchema, name: ComponentName, ctx: &ParseContext) -> Schema {
    match &raw.additional_properties {
        Some(ShimAdditionalProperties::Schema(value)) if !raw.has_properties() => {
            return Schema::Map(MapSchema {
                value: Box::new(parse_schema(value, name.child("Value"), ctx)),
                nullable: ctx.is_nullable(raw),
                type_with_format: raw_type_with_format(raw),
                name,
            });
        }
        Some(ShimAdditionalProperties::Schema(_)) => {
            return unknown(raw, name, "typed 'additionalProperties' next to properties");
        }
        // Only a typed map without properties is representable.
        Some(ShimAdditionalProperties::Bool(_)) => {
            return unknown(raw, name, "boolean 'additionalProperties'");
        }
        None => {}
    }

    let properties = raw
        .properties
        .iter()
        .flatten()
        .map(|(key, prop)| (key.clone(), parse_schema(prop, name.child(key), ctx)))
        .collect();

    Schema::Object(ObjectSchema {
        required: raw.required.iter().flatten().cloned().collect::<BTreeSet<_>>(),
        properties,
        nullable: ctx.is_nullable(raw),
        type_with_format: raw_type_with_format(raw),
        name,
    })
}
