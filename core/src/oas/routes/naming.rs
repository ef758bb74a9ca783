#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives operation names, tags, and the component keys of operation-local
//! parameters, request bodies and responses.

use crate::oas::models::{HttpCode, HttpMethod};
use crate::oas::names::{ParameterKey, RequestBodyKey, ResponseKey};
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use std::fmt;

/// lowerCamelCase name of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationName(String);

impl OperationName {
    /// From an `operationId`.
    pub fn parse(operation_id: &str) -> Self {
        Self(operation_id.to_lower_camel_case())
    }

    /// From the path and method when `operationId` is missing.
    ///
    /// e.g. `GET /users/{id}` -> `usersIdGet`
    pub fn from_path(path: &str, method: HttpMethod) -> Self {
        let clean_path = path.replace(['{', '}'], "").replace(['/', ':'], "_");
        let method = method.as_str().to_lowercase().to_upper_camel_case();
        Self(format!("{}{}", clean_path.to_lower_camel_case(), method))
    }

    /// The name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// `<Op>Request`
    pub fn request_key(&self) -> RequestBodyKey {
        RequestBodyKey::parse(&format!("{}Request", self.capitalized()))
    }

    /// `<Op>Response<code>`
    pub fn response_key(&self, code: &HttpCode) -> ResponseKey {
        ResponseKey::parse(&format!("{}Response{}", self.capitalized(), code))
    }

    /// `<Op>Param<Name>`
    pub fn parameter_key(&self, param_name: &str) -> ParameterKey {
        ParameterKey::parse(&format!(
            "{}Param{}",
            self.capitalized(),
            param_name.to_upper_camel_case()
        ))
    }

    /// `<Op>Context`
    pub fn context_name(&self) -> String {
        format!("{}Context", self.capitalized())
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UpperCamelCase grouping tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Tag used when an operation declares none.
    pub const DEFAULT: &'static str = "base";

    /// Normalizes a raw tag.
    pub fn parse(value: &str) -> Self {
        Self(value.to_upper_camel_case())
    }

    /// The tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
