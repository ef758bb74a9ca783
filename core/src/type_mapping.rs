#![deny(missing_docs)]

//! # Type Mapping
//!
//! Target-language-neutral type references produced for schemas, and the user
//! override tables that take precedence over structural derivation.

use crate::config::{CustomType, ModelConfig};
use crate::error::AppResult;
use crate::oas::names::{ComponentName, TypeWithFormat};
use indexmap::IndexMap;
use std::fmt::Display;

/// Built-in scalar and JSON types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Text.
    String,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Boolean.
    Boolean,
    /// UUID.
    Uuid,
    /// Arbitrary JSON.
    JsonElement,
    /// The JSON `null` literal.
    JsonNull,
}

/// A resolved target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// A built-in.
    Primitive(PrimitiveType),
    /// An ordered list.
    List(Box<TypeRef>),
    /// A lazily produced sequence (streamed responses).
    Stream(Box<TypeRef>),
    /// A string-keyed map.
    Map(Box<TypeRef>),
    /// Absent-vs-null wrapper for non-required fields.
    Optional(Box<TypeRef>),
    /// A generated type.
    Named(ComponentName),
    /// A user override.
    Custom(CustomType),
}

/// A target type plus nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The type.
    pub ty: TargetType,
    /// Whether `null` is accepted.
    pub nullable: bool,
}

impl TypeRef {
    /// Creates a reference.
    pub fn new(ty: TargetType, nullable: bool) -> Self {
        Self { ty, nullable }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrimitiveType::String => "String",
            PrimitiveType::Int => "Int",
            PrimitiveType::Long => "Long",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Uuid => "Uuid",
            PrimitiveType::JsonElement => "JsonElement",
            PrimitiveType::JsonNull => "JsonNull",
        };
        write!(f, "{}", name)
    }
}

impl Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::Primitive(p) => write!(f, "{}", p),
            TargetType::List(inner) => write!(f, "List<{}>", inner),
            TargetType::Stream(inner) => write!(f, "Stream<{}>", inner),
            TargetType::Map(inner) => write!(f, "Map<String, {}>", inner),
            TargetType::Optional(inner) => write!(f, "Optional<{}>", inner),
            TargetType::Named(name) => write!(f, "{}", name),
            TargetType::Custom(custom) => write!(f, "{}", custom.path),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}

/// User override tables, parsed from `ModelConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeOverrides {
    by_type: IndexMap<TypeWithFormat, CustomType>,
    by_schema: IndexMap<ComponentName, CustomType>,
}

impl TypeOverrides {
    /// Parses override keys; a malformed `type+format` key is a `Config` error.
    ///
    /// Schema keys may address nested schemas with dots, e.g. `User.Address`.
    pub fn from_config(config: &ModelConfig) -> AppResult<Self> {
        let by_type = config
            .type_mappings
            .iter()
            .map(|(key, custom)| Ok((TypeWithFormat::parse(key)?, custom.clone())))
            .collect::<AppResult<IndexMap<_, _>>>()?;
        let by_schema = config
            .schema_mappings
            .iter()
            .map(|(key, custom)| (ComponentName::from_dotted(key), custom.clone()))
            .collect();
        Ok(Self { by_type, by_schema })
    }

    /// Override registered for a schema name. Anonymous nodes never match.
    pub fn for_schema(&self, name: &ComponentName) -> Option<&CustomType> {
        if name.is_unnamed() {
            return None;
        }
        self.by_schema.get(name)
    }

    /// Override registered for an exact `(type, format)` pair.
    pub fn for_type(&self, type_with_format: &TypeWithFormat) -> Option<&CustomType> {
        self.by_type.get(type_with_format)
    }

    /// True when no override is registered.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_schema.is_empty()
    }
}
