#![deny(missing_docs)]

//! # Component Names
//!
//! Deterministic naming for everything the model graph hands to generators.
//!
//! - **ComponentName**: dotted path of UpperCamelCase segments for schemas.
//! - **RefString**: a raw `$ref`, with a canonical form for local schema refs.
//! - **TypeWithFormat**: the raw `(type, format)` pair used by override tables.
//! - **Component keys**: normalized keys of parameters, request bodies and responses.
//!
//! Names only ever come from the position of a node in the document. Parsing the
//! same document twice yields the same names.

use crate::error::{AppError, AppResult};
use crate::oas::ref_utils::{last_segment, local_component_name, SCHEMA_REF_PREFIX};
use heck::ToUpperCamelCase;
use std::fmt;

/// Identifies the position of a schema inside the document.
///
/// `Unnamed` marks anonymous composition members; deriving a child of it stays
/// `Unnamed`, so such nodes can never become standalone generated types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentName(Vec<String>);

impl ComponentName {
    /// The anonymous name.
    pub const UNNAMED: ComponentName = ComponentName(Vec::new());

    /// Builds a single-segment name from a raw component key; empty keys are `UNNAMED`.
    pub fn parse(value: &str) -> Self {
        let segment = value.to_upper_camel_case();
        if segment.is_empty() {
            return Self::UNNAMED;
        }
        Self(vec![segment])
    }

    /// Builds a possibly nested name from a dotted path, e.g. `User.Address`.
    pub fn from_dotted(value: &str) -> Self {
        Self(
            value
                .split('.')
                .filter(|s| !s.is_empty())
                .map(|s| s.to_upper_camel_case())
                .collect(),
        )
    }

    /// Returns true for the anonymous sentinel.
    pub fn is_unnamed(&self) -> bool {
        self.0.is_empty()
    }

    /// The casing-normalized segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Appends a segment (property key, branch key, `Value`).
    pub fn child(&self, segment: &str) -> Self {
        if self.is_unnamed() {
            return Self::UNNAMED;
        }
        let mut names = self.0.clone();
        names.push(segment.to_upper_camel_case());
        Self(names)
    }

    /// Rewrites the last segment with a suffix, e.g. `Users` -> `UsersItem`.
    pub fn with_last_suffix(&self, suffix: &str) -> Self {
        let mut names = self.0.clone();
        match names.last_mut() {
            Some(last) => last.push_str(suffix),
            None => return Self::UNNAMED,
        }
        Self(names)
    }

    /// The last segment, i.e. the class name without postfix.
    pub fn raw_class_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Nested class names with the configured postfix applied to every segment.
    pub fn class_names(&self, postfix: &str) -> Vec<String> {
        self.0.iter().map(|n| format!("{}{}", n, postfix)).collect()
    }

    /// File stem of the top-level type owning this name.
    pub fn file_name(&self, postfix: &str) -> Option<String> {
        self.0.first().map(|n| format!("{}{}", n, postfix))
    }

    /// Canonical reference string for top-level component names.
    pub fn to_ref(&self) -> Option<RefString> {
        match self.0.as_slice() {
            [single] => Some(RefString(format!("{}{}", SCHEMA_REF_PREFIX, single))),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unnamed() {
            write!(f, "Unnamed")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

/// A `$ref` string as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefString(String);

impl RefString {
    /// Wraps a raw reference.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Interprets a discriminator mapping value.
    ///
    /// Mapping values are either references or bare schema names (`Dog`).
    pub fn from_mapping_value(value: &str) -> Self {
        if value.contains('/') || value.contains('#') || value.contains('.') {
            Self::new(value)
        } else {
            Self(format!("{}{}", SCHEMA_REF_PREFIX, value))
        }
    }

    /// The raw reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Schema name derived from the last segment.
    pub fn schema_name(&self) -> ComponentName {
        ComponentName::parse(&last_segment(&self.0))
    }

    /// The reference under which the ref index stores the target.
    ///
    /// Local schema references are re-keyed through `ComponentName` so that
    /// `#/components/schemas/user_name` and the index key for `UserName` agree.
    /// Anything else stays raw and never resolves.
    pub fn canonical(&self) -> RefString {
        match local_component_name(&self.0, "schemas") {
            Some(name) => Self(format!(
                "{}{}",
                SCHEMA_REF_PREFIX,
                name.to_upper_camel_case()
            )),
            None => self.clone(),
        }
    }

    /// Decoded component key of a local reference into `section`.
    pub fn local_name(&self, section: &str) -> Option<String> {
        local_component_name(&self.0, section)
    }
}

impl fmt::Display for RefString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw schema `type` and `format`, the key of type overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeWithFormat {
    /// Declared type, e.g. `string`.
    pub schema_type: String,
    /// Declared format, e.g. `date-time`.
    pub format: Option<String>,
}

impl TypeWithFormat {
    /// Creates a pair.
    pub fn new(schema_type: impl Into<String>, format: Option<String>) -> Self {
        Self {
            schema_type: schema_type.into(),
            format,
        }
    }

    /// Parses `type` or `type+format`.
    pub fn parse(value: &str) -> AppResult<Self> {
        let parts: Vec<&str> = value.split('+').collect();
        match parts.as_slice() {
            [ty] if !ty.is_empty() => Ok(Self::new(*ty, None)),
            [ty, format] if !ty.is_empty() && !format.is_empty() => {
                Ok(Self::new(*ty, Some(format.to_string())))
            }
            _ => Err(AppError::Config(format!(
                "unknown type format '{}' expected formats <type> or <type>+<format>",
                value
            ))),
        }
    }
}

impl fmt::Display for TypeWithFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.format {
            Some(format) => write!(f, "{}+{}", self.schema_type, format),
            None => write!(f, "{}", self.schema_type),
        }
    }
}

macro_rules! component_key {
    ($(#[$meta:meta])* $name:ident, $schema_suffix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Normalizes a raw key to UpperCamelCase.
            pub fn parse(value: &str) -> Self {
                Self(value.to_upper_camel_case())
            }

            /// The normalized key.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Name of the schema carried by this component.
            pub fn schema_name(&self) -> ComponentName {
                ComponentName::parse(&format!("{}{}", self.0, $schema_suffix))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

component_key!(
    /// Key of a parameter component or an operation-derived parameter.
    ParameterKey,
    ""
);
component_key!(
    /// Key of a request body component or an operation-derived request body.
    RequestBodyKey,
    "Body"
);
component_key!(
    /// Key of a response component or an operation-derived response.
    ResponseKey,
    "Body"
);
