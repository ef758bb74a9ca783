#![deny(missing_docs)]

//! # Type Resolution
//!
//! Maps schemas to target types.
//!
//! Priority:
//! 1. Schema-name override of the node.
//! 2. For `Ref`: schema-name override of the target, then the target itself (recursively).
//! 3. `(type, format)` override, only for primitive-shaped nodes.
//! 4. Structural derivation.

use crate::config::CustomType;
use crate::error::{AppError, AppResult};
use crate::oas::graph::GenerationContext;
use crate::oas::schemas::{
    flatten_composed, EnumSchema, ObjectSchema, PrimitiveKind, PrimitiveSchema, Schema,
    SealedInterfaceSchema, UnknownSchema,
};
use crate::type_mapping::{PrimitiveType, TargetType, TypeRef};
use std::borrow::Cow;

/// Finds the user override that replaces structural derivation, if any.
pub fn custom_override<'c>(
    schema: &Schema,
    ctx: &GenerationContext<'c>,
) -> AppResult<Option<&'c CustomType>> {
    if let Some(custom) = ctx.overrides.for_schema(schema.name()) {
        return Ok(Some(custom));
    }
    let mut current = schema;
    let mut hops = 0usize;
    while let Schema::Ref(r) = current {
        if let Some(custom) = ctx.overrides.for_schema(&r.target.schema_name()) {
            return Ok(Some(custom));
        }
        if hops > ctx.index.len() {
            return Err(AppError::MissingReference(r.target.to_string()));
        }
        current = ctx.resolve(&r.target)?;
        hops += 1;
    }

    if let Some(custom) = ctx.overrides.for_schema(current.name()) {
        return Ok(Some(custom));
    }
    let primitive_shaped = matches!(current, Schema::Primitive(_) | Schema::EnumString(_));
    if primitive_shaped {
        if let Some(custom) = current
            .type_with_format()
            .and_then(|tf| ctx.overrides.for_type(&tf))
        {
            return Ok(Some(custom));
        }
    }
    Ok(None)
}

/// Target type of a schema. `streaming` turns a top-level array into a stream.
pub fn resolve_type(
    schema: &Schema,
    ctx: &GenerationContext<'_>,
    streaming: bool,
) -> AppResult<TypeRef> {
    if let Some(custom) = custom_override(schema, ctx)? {
        return Ok(TypeRef::new(TargetType::Custom(custom.clone()), schema.is_nullable()));
    }
    let ty = match schema {
        Schema::Array(array) => {
            let item = Box::new(resolve_type(&array.items, ctx, false)?);
            if streaming {
                TargetType::Stream(item)
            } else {
                TargetType::List(item)
            }
        }
        Schema::Map(map) => TargetType::Map(Box::new(resolve_type(&map.value, ctx, false)?)),
        Schema::Primitive(primitive) => TargetType::Primitive(primitive_type(primitive)),
        Schema::Null => TargetType::Primitive(PrimitiveType::JsonNull),
        Schema::Unknown(_) => TargetType::Primitive(PrimitiveType::JsonElement),
        Schema::Ref(r) => TargetType::Named(ctx.resolve(&r.target)?.name().clone()),
        Schema::Composed(_)
        | Schema::SealedInterface(_)
        | Schema::Object(_)
        | Schema::EnumString(_) => TargetType::Named(schema.name().clone()),
    };
    Ok(TypeRef::new(ty, schema.is_nullable()))
}

fn primitive_type(schema: &PrimitiveSchema) -> PrimitiveType {
    let format = schema.format.as_deref();
    match schema.kind {
        PrimitiveKind::String => match format {
            Some("uuid") => PrimitiveType::Uuid,
            _ => PrimitiveType::String,
        },
        PrimitiveKind::Integer => match format {
            Some("int64") => PrimitiveType::Long,
            _ => PrimitiveType::Int,
        },
        PrimitiveKind::Number => match format {
            Some("float") => PrimitiveType::Float,
            _ => PrimitiveType::Double,
        },
        PrimitiveKind::Boolean => PrimitiveType::Boolean,
    }
}

/// Type of an object field; non-required fields are wrapped in `Optional`.
pub fn field_type(
    schema: &Schema,
    required: bool,
    ctx: &GenerationContext<'_>,
) -> AppResult<TypeRef> {
    let inner = resolve_type(schema, ctx, false)?;
    if required {
        Ok(inner)
    } else {
        Ok(TypeRef::new(TargetType::Optional(Box::new(inner)), false))
    }
}

/// What kind of type a generator emits for a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpecKind<'a> {
    /// An enum over string literals.
    Enum(&'a EnumSchema),
    /// A sealed interface over its branches.
    SealedInterface(&'a SealedInterfaceSchema),
    /// A data class; owned when produced by flattening a composition.
    DataClass(Cow<'a, ObjectSchema>),
    /// A wrapper around a single value.
    ValueClass(Cow<'a, Schema>),
}

/// Classifies a schema. `None` for references and overridden schemas.
pub fn type_spec_kind<'a>(
    schema: &'a Schema,
    ctx: &GenerationContext<'_>,
) -> AppResult<Option<TypeSpecKind<'a>>> {
    if custom_override(schema, ctx)?.is_some() {
        return Ok(None);
    }
    let kind = match schema {
        Schema::Ref(_) => return Ok(None),
        Schema::EnumString(e) => TypeSpecKind::Enum(e),
        Schema::SealedInterface(s) => TypeSpecKind::SealedInterface(s),
        Schema::Object(o) => TypeSpecKind::DataClass(Cow::Borrowed(o)),
        Schema::Composed(c) => match flatten_composed(c, ctx.index) {
            Some(object) => TypeSpecKind::DataClass(Cow::Owned(object)),
            None => TypeSpecKind::ValueClass(Cow::Owned(Schema::Unknown(UnknownSchema {
                name: c.name.clone(),
                type_with_format: c.type_with_format.clone(),
            }))),
        },
        Schema::Null
        | Schema::Primitive(_)
        | Schema::Array(_)
        | Schema::Map(_)
        | Schema::Unknown(_) => TypeSpecKind::ValueClass(Cow::Borrowed(schema)),
    };
    Ok(Some(kind))
}

/// A data class field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec<'a> {
    /// Property key as written in the document.
    pub name: &'a str,
    /// Property schema.
    pub schema: &'a Schema,
    /// Whether the property is required.
    pub required: bool,
    /// Field type, `Optional` when not required.
    pub type_ref: TypeRef,
}

/// Fields of a data class, without the discriminator property of a union branch.
pub fn data_class_fields<'a>(
    object: &'a ObjectSchema,
    ctx: &GenerationContext<'_>,
) -> AppResult<Vec<FieldSpec<'a>>> {
    let discriminator = ctx
        .discriminator_info(&object.name)
        .map(|info| info.discriminator_name.as_str());

    let mut fields = Vec::with_capacity(object.properties.len());
    for (name, schema) in &object.properties {
        if Some(name.as_str()) == discriminator {
            continue;
        }
        let required = object.required.contains(name);
        fields.push(FieldSpec {
            name,
            schema,
            required,
            type_ref: field_type(schema, required, ctx)?,
        });
    }
    Ok(fields)
}
