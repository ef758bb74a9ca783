#![deny(missing_docs)]

//! # Naming Validation
//!
//! Checks identifiers of a document against the configured naming conventions
//! before the model graph is built.
//!
//! The walk covers:
//! - Component schema names, their properties (recursively), array items and string enum values.
//! - Path segments (templated segments are skipped).
//! - Path-level parameter schemas.
//! - Tags, operation ids and operation parameters.
//!
//! Every violation is collected; nothing stops the walk.

use crate::config::ValidatorConfig;
use crate::error::{AppError, AppResult};
use crate::naming::NameConvention;
use crate::oas::shims::{ShimOpenApi, ShimOperation, ShimParameter, ShimSchema};
use tracing::{debug, warn};

/// Collects naming convention violations as human readable messages.
///
/// Returns an empty report when `recommendations` is disabled.
pub fn validate_naming(doc: &ShimOpenApi, config: &ValidatorConfig) -> Vec<String> {
    if !config.recommendations {
        debug!("Naming recommendations disabled");
        return Vec::new();
    }
    let mut validator = NamingValidator {
        config,
        errors: Vec::new(),
    };

    for (path, item) in doc.paths.iter().flatten() {
        validator.check_path_segments(path);
        for parameter in item.parameters.iter().flatten() {
            if let Some(schema) = &parameter.schema {
                validator.check_schema(schema, path);
            }
        }
        for (method, operation) in item.operations() {
            validator.check_operation(operation, &format!("{}:{}", path, method));
        }
    }

    for (name, schema) in doc.schemas() {
        if !config.schema_name_format.matches(name) {
            validator.errors.push(format!(
                "schema name '{}' matches not schemaName format {}",
                name, config.schema_name_format
            ));
        }
        validator.check_schema(schema, name);
    }
    validator.errors
}

/// Applies the failure policy to a report.
///
/// With `fail_on_warnings` a non-empty report is a `NamingViolations` error;
/// otherwise each message is logged.
pub fn enforce(report: &[String], config: &ValidatorConfig) -> AppResult<()> {
    if report.is_empty() {
        return Ok(());
    }
    if config.fail_on_warnings {
        return Err(AppError::NamingViolations(report.len()));
    }
    for message in report {
        warn!("{}", message);
    }
    Ok(())
}

struct NamingValidator<'a> {
    config: &'a ValidatorConfig,
    errors: Vec<String>,
}

impl NamingValidator<'_> {
    fn check_path_segments(&mut self, path: &str) {
        let format = &self.config.path_segment_format;
        for segment in path.trim_start_matches('/').split('/') {
            if segment.starts_with('{') || segment.ends_with('}') {
                continue;
            }
            if !format.matches(segment) {
                self.errors.push(format!(
                    "path segment '{}' in '{}' matches path segment format {}",
                    segment, path, format
                ));
            }
        }
    }

    fn check_operation(&mut self, operation: &ShimOperation, path: &str) {
        let config = self.config;
        for tag in operation.tags.iter().flatten() {
            if !config.tag_format.matches(tag) {
                self.errors.push(format!(
                    "tag '{}' in '{}' matches not tag format {}",
                    tag, path, config.tag_format
                ));
            }
        }
        if let Some(id) = &operation.operation_id {
            if !config.operation_id_format.matches(id) {
                self.errors.push(format!(
                    "operationId '{}' in '{}' matches not operationId format {}",
                    id, path, config.operation_id_format
                ));
            }
        }
        for parameter in operation.parameters.iter().flatten() {
            self.check_parameter(parameter, path);
        }
    }

    fn check_parameter(&mut self, parameter: &ShimParameter, path: &str) {
        let name = parameter.name.as_deref();
        if let Some(schema) = &parameter.schema {
            self.check_schema(schema, &format!("{}.{}", path, name.unwrap_or("null")));
        }
        let Some(name) = name else {
            return;
        };
        let Some(format) = self.parameter_format(parameter.location.as_deref()) else {
            debug!("Parameter '{}' in '{}' has no known location", name, path);
            return;
        };
        if !format.matches(name) {
            self.errors.push(format!(
                "parameter '{}' {} matches not parameter format {}",
                name, path, format
            ));
        }
    }

    fn parameter_format(&self, location: Option<&str>) -> Option<&NameConvention> {
        let formats = &self.config.parameter_format;
        match location? {
            "path" => Some(&formats.path),
            "query" => Some(&formats.query),
            "header" => Some(&formats.header),
            "cookie" => Some(&formats.cookie),
            _ => None,
        }
    }

    fn check_schema(&mut self, schema: &ShimSchema, path: &str) {
        let types = schema.type_names();
        if types.contains(&"array") {
            if let Some(items) = &schema.items {
                self.check_schema(items, &format!("{}[]", path));
            }
            return;
        }
        if types.contains(&"string") {
            let format = &self.config.string_enum_format;
            for value in schema.enum_values.iter().flatten() {
                let Some(value) = value.as_str() else {
                    continue;
                };
                if !format.matches(value) {
                    self.errors.push(format!(
                        "enum value '{}' in {} matches not enum format {}",
                        value, path, format
                    ));
                }
            }
            return;
        }
        if types.contains(&"object") || (types.is_empty() && schema.has_properties()) {
            let format = &self.config.property_name_format;
            for (name, property) in schema.properties.iter().flatten() {
                if !format.matches(name) {
                    self.errors.push(format!(
                        "property '{}' in {} matches not parameter format {}",
                        name, path, format
                    ));
                }
                self.check_schema(property, &format!("{}.{}", path, name));
            }
        }
    }
}
