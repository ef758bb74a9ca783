#![deny(missing_docs)]

//! # Configuration
//!
//! Plain-data configuration consumed by the model graph and the naming validator.
//!
//! ```yaml
//! model:
//!   postfix: Dto
//!   typeMappings:
//!     string+date-time: { path: java.time.OffsetDateTime }
//!   schemaMappings:
//!     Money: { path: com.acme.Money, serializer: com.acme.MoneySerializer }
//! validator:
//!   failOnWarnings: true
//!   schemaNameFormat: PascalCase
//! ```

use crate::error::{AppError, AppResult};
use crate::naming::NameConvention;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Model generation settings.
    pub model: ModelConfig,
    /// Naming validation settings.
    pub validator: ValidatorConfig,
}

impl Config {
    /// Parses configuration YAML.
    pub fn from_yaml_str(yaml_content: &str) -> AppResult<Self> {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| AppError::Parse(format!("Failed to parse config YAML: {}", e)))
    }

    /// Reads configuration from a YAML file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

/// A user-supplied type replacing structural derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct CustomType {
    /// Fully qualified target type.
    pub path: String,
    /// Serializer to use instead of the one implied by the schema.
    #[serde(default)]
    pub serializer: Option<String>,
}

impl CustomType {
    /// Creates a custom type without serializer.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            serializer: None,
        }
    }
}

/// Settings for the model graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// Appended to every generated class name.
    pub postfix: String,
    /// `type` or `type+format` -> custom type.
    pub type_mappings: IndexMap<String, CustomType>,
    /// Component schema name -> custom type.
    pub schema_mappings: IndexMap<String, CustomType>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            postfix: "Dto".to_string(),
            type_mappings: IndexMap::new(),
            schema_mappings: IndexMap::new(),
        }
    }
}

/// Per-location parameter naming policies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterFormat {
    /// Path parameters.
    pub path: NameConvention,
    /// Query parameters.
    pub query: NameConvention,
    /// Header parameters.
    pub header: NameConvention,
    /// Cookie parameters.
    pub cookie: NameConvention,
}

impl Default for ParameterFormat {
    fn default() -> Self {
        Self {
            path: NameConvention::CamelCase,
            query: NameConvention::CamelCase,
            header: NameConvention::Any,
            cookie: NameConvention::Any,
        }
    }
}

/// Naming validator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorConfig {
    /// Treat a non-empty naming report as fatal.
    pub fail_on_warnings: bool,
    /// Evaluate naming recommendations at all.
    pub recommendations: bool,
    /// Parameter names by location.
    pub parameter_format: ParameterFormat,
    /// Operation tags.
    pub tag_format: NameConvention,
    /// Operation ids.
    pub operation_id_format: NameConvention,
    /// Object property names.
    pub property_name_format: NameConvention,
    /// Component schema names.
    pub schema_name_format: NameConvention,
    /// Literal path segments.
    pub path_segment_format: NameConvention,
    /// String enum literals.
    pub string_enum_format: NameConvention,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fail_on_warnings: false,
            recommendations: true,
            parameter_format: ParameterFormat::default(),
            tag_format: NameConvention::CamelCase,
            operation_id_format: NameConvention::CamelCase,
            property_name_format: NameConvention::CamelCase,
            schema_name_format: NameConvention::PascalCase,
            path_segment_format: NameConvention::KebabCase,
            string_enum_format: NameConvention::Any,
        }
    }
}
