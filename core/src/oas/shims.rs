#![deny(missing_docs)]

//! # Document Shims
//!
//! Generic structures acting as an Intermediate Deserialization Layer.
//! These structs map directly to OpenAPI YAML/JSON objects and are the read-only
//! input of the model graph. No OpenAPI validation happens here; unknown keys
//! are ignored.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Supported OpenAPI major/minor versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// OpenAPI 3.0.x (`nullable: true`).
    V3_0,
    /// OpenAPI 3.1.x (`type: [T, "null"]`).
    V3_1,
}

/// Root document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShimOpenApi {
    /// OpenAPI version string, e.g. `3.1.0`.
    #[serde(default)]
    pub openapi: Option<String>,
    /// Path items keyed by path template, in document order.
    #[serde(default)]
    pub paths: Option<IndexMap<String, ShimPathItem>>,
    /// Reusable definitions.
    #[serde(default)]
    pub components: Option<ShimComponents>,
    /// Default security requirements.
    #[serde(default)]
    pub security: Option<Vec<ShimSecurityRequirement>>,
}

impl ShimOpenApi {
    /// Parses a YAML (or JSON, which is a YAML subset) document.
    pub fn from_yaml_str(yaml_content: &str) -> AppResult<Self> {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))
    }

    /// Parses a JSON document.
    pub fn from_json_str(json_content: &str) -> AppResult<Self> {
        serde_json::from_str(json_content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))
    }

    /// Reads a document from disk; `.json` files use the JSON parser.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Version used for nullability rules. Anything not `3.1.x` is treated as 3.0.
    pub fn version(&self) -> SpecVersion {
        match self.openapi.as_deref() {
            Some(v) if v.starts_with("3.1") => SpecVersion::V3_1,
            _ => SpecVersion::V3_0,
        }
    }

    /// Component schemas in document order.
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &ShimSchema)> {
        self.components.iter().flat_map(|c| c.schemas.iter())
    }
}

/// Components object holding reusable definitions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimComponents {
    /// Schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, ShimSchema>,
    /// Parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, ShimParameter>,
    /// Request bodies.
    #[serde(default)]
    pub request_bodies: IndexMap<String, ShimRequestBody>,
    /// Responses.
    #[serde(default)]
    pub responses: IndexMap<String, ShimResponse>,
}

/// A security requirement: scheme name -> scopes.
pub type ShimSecurityRequirement = IndexMap<String, Vec<String>>;

/// `type` is a string in 3.0 and a string or list in 3.1.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ShimSchemaType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Multiple(Vec<String>),
}

impl ShimSchemaType {
    /// All declared type names.
    pub fn names(&self) -> Vec<&str> {
        match self {
            ShimSchemaType::Single(t) => vec![t.as_str()],
            ShimSchemaType::Multiple(ts) => ts.iter().map(String::as_str).collect(),
        }
    }
}

/// `additionalProperties` is either a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ShimAdditionalProperties {
    /// `additionalProperties: true|false`
    Bool(bool),
    /// `additionalProperties: { schema }`
    Schema(Box<ShimSchema>),
}

/// Discriminator object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimDiscriminator {
    /// Property carrying the tag. Required by OpenAPI; absent means unusable.
    #[serde(default)]
    pub property_name: Option<String>,
    /// Tag value -> reference (or bare schema name).
    #[serde(default)]
    pub mapping: Option<IndexMap<String, Option<String>>>,
}

/// Schema object (the subset relevant to the model).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimSchema {
    /// `$ref`
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// `type`
    #[serde(rename = "type", default)]
    pub schema_type: Option<ShimSchemaType>,
    /// `format`
    #[serde(default)]
    pub format: Option<String>,
    /// OpenAPI 3.0 nullability flag.
    #[serde(default)]
    pub nullable: Option<bool>,
    /// `not` (kept raw, it is never modelled).
    #[serde(default)]
    pub not: Option<Value>,
    /// `oneOf`
    #[serde(default)]
    pub one_of: Option<Vec<ShimSchema>>,
    /// `anyOf`
    #[serde(default)]
    pub any_of: Option<Vec<ShimSchema>>,
    /// `allOf`
    #[serde(default)]
    pub all_of: Option<Vec<ShimSchema>>,
    /// `discriminator`
    #[serde(default)]
    pub discriminator: Option<ShimDiscriminator>,
    /// `enum`
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<Value>>,
    /// `properties`, in document order.
    #[serde(default)]
    pub properties: Option<IndexMap<String, ShimSchema>>,
    /// `required`
    #[serde(default)]
    pub required: Option<Vec<String>>,
    /// `additionalProperties`
    #[serde(default)]
    pub additional_properties: Option<ShimAdditionalProperties>,
    /// `items`
    #[serde(default)]
    pub items: Option<Box<ShimSchema>>,
    /// `description`
    #[serde(default)]
    pub description: Option<String>,
}

impl ShimSchema {
    /// Declared type names (empty when `type` is absent).
    pub fn type_names(&self) -> Vec<&str> {
        self.schema_type
            .as_ref()
            .map(ShimSchemaType::names)
            .unwrap_or_default()
    }

    /// True when there is at least one declared property.
    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }
}

/// Path item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShimPathItem {
    /// Parameters shared by all operations.
    #[serde(default)]
    pub parameters: Option<Vec<ShimParameter>>,
    /// GET
    #[serde(default)]
    pub get: Option<ShimOperation>,
    /// PUT
    #[serde(default)]
    pub put: Option<ShimOperation>,
    /// POST
    #[serde(default)]
    pub post: Option<ShimOperation>,
    /// DELETE
    #[serde(default)]
    pub delete: Option<ShimOperation>,
    /// OPTIONS
    #[serde(default)]
    pub options: Option<ShimOperation>,
    /// HEAD
    #[serde(default)]
    pub head: Option<ShimOperation>,
    /// PATCH
    #[serde(default)]
    pub patch: Option<ShimOperation>,
    /// TRACE
    #[serde(default)]
    pub trace: Option<ShimOperation>,
}

impl ShimPathItem {
    /// Operations with their upper-case method names, in a fixed order.
    pub fn operations(&self) -> Vec<(&'static str, &ShimOperation)> {
        [
            ("GET", &self.get),
            ("PUT", &self.put),
            ("POST", &self.post),
            ("DELETE", &self.delete),
            ("OPTIONS", &self.options),
            ("HEAD", &self.head),
            ("PATCH", &self.patch),
            ("TRACE", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

/// Operation object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimOperation {
    /// `operationId`
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Tags; the first one groups the endpoint.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// `deprecated`
    #[serde(default)]
    pub deprecated: Option<bool>,
    /// `summary`
    #[serde(default)]
    pub summary: Option<String>,
    /// `description`
    #[serde(default)]
    pub description: Option<String>,
    /// Operation parameters.
    #[serde(default)]
    pub parameters: Option<Vec<ShimParameter>>,
    /// Request body.
    #[serde(default)]
    pub request_body: Option<ShimRequestBody>,
    /// Responses keyed by status code (`200`, `2XX`, `default`).
    #[serde(default)]
    pub responses: Option<IndexMap<String, ShimResponse>>,
    /// Operation-level security, overriding the document default.
    #[serde(default)]
    pub security: Option<Vec<ShimSecurityRequirement>>,
}

/// Parameter object (inline or `$ref`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShimParameter {
    /// `$ref`
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// Parameter name.
    #[serde(default)]
    pub name: Option<String>,
    /// Location: `path`, `query`, `header` or `cookie`.
    #[serde(rename = "in", default)]
    pub location: Option<String>,
    /// `description`
    #[serde(default)]
    pub description: Option<String>,
    /// `required`
    #[serde(default)]
    pub required: Option<bool>,
    /// Parameter schema.
    #[serde(default)]
    pub schema: Option<ShimSchema>,
}

/// Request body object (inline or `$ref`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShimRequestBody {
    /// `$ref`
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// `description`
    #[serde(default)]
    pub description: Option<String>,
    /// `required`
    #[serde(default)]
    pub required: Option<bool>,
    /// Media types keyed by content type.
    #[serde(default)]
    pub content: Option<IndexMap<String, ShimMediaType>>,
}

/// Response object (inline or `$ref`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShimResponse {
    /// `$ref`
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// `description`
    #[serde(default)]
    pub description: Option<String>,
    /// Media types keyed by content type.
    #[serde(default)]
    pub content: Option<IndexMap<String, ShimMediaType>>,
}

/// Media type object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShimMediaType {
    /// Body schema.
    #[serde(default)]
    pub schema: Option<ShimSchema>,
}
