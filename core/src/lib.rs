#![deny(missing_docs)]

//! # OAS Graph Core
//!
//! Turns an OpenAPI 3.0/3.1 document into a normalized model graph for code
//! generators: named schemas, resolved references, flattened compositions,
//! discriminated unions, endpoints and the type overrides to apply.

/// Shared error types.
pub mod error;

/// Generator and validator configuration.
pub mod config;

/// Naming convention predicates.
pub mod naming;

/// OpenAPI (OAS) parsing and model graph.
pub mod oas;

/// Target type references and user overrides.
pub mod type_mapping;

pub use config::{Config, CustomType, ModelConfig, ValidatorConfig};
pub use error::{AppError, AppResult};
pub use naming::NameConvention;
pub use oas::{GenerationContext, ModelGraph, ShimOpenApi};
pub use type_mapping::{PrimitiveType, TargetType, TypeOverrides, TypeRef};

/// Validates naming conventions, applies the failure policy, then builds the graph.
pub fn build_model_graph(doc: &ShimOpenApi, config: &Config) -> AppResult<ModelGraph> {
    let report = oas::validate_naming(doc, &config.validator);
    oas::enforce(&report, &config.validator)?;
    ModelGraph::build(doc, &config.model)
}
