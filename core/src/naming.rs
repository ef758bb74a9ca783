#![deny(missing_docs)]

//! # Naming Conventions
//!
//! Predicates over identifiers used by the naming validator.
//!
//! Conventions deserialize from plain strings: `any`, `camelCase`, `PascalCase`,
//! `kebab-case`, or any other string as a regular expression that must match
//! the whole value.

use crate::error::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A naming policy.
#[derive(Clone)]
pub enum NameConvention {
    /// Accepts everything.
    Any,
    /// `camelCase`
    CamelCase,
    /// `PascalCase`
    PascalCase,
    /// `kebab-case`
    KebabCase,
    /// Full-match regular expression; keeps the pattern as written.
    Regex(String, Regex),
    /// Caller-supplied predicate.
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl NameConvention {
    /// Parses the configuration form of a convention.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "any" => Ok(Self::Any),
            "camelCase" => Ok(Self::CamelCase),
            "PascalCase" => Ok(Self::PascalCase),
            "kebab-case" => Ok(Self::KebabCase),
            pattern => Self::regex(pattern),
        }
    }

    /// Compiles a full-match regular expression convention.
    pub fn regex(pattern: &str) -> AppResult<Self> {
        let anchored = format!("^(?:{})$", pattern);
        Regex::new(&anchored)
            .map(|re| Self::Regex(pattern.to_string(), re))
            .map_err(|e| AppError::Config(format!("Invalid naming pattern '{}': {}", pattern, e)))
    }

    /// Wraps an arbitrary predicate.
    pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    /// Evaluates the convention.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::CamelCase => camel_case_re().is_match(value),
            Self::PascalCase => pascal_case_re().is_match(value),
            Self::KebabCase => kebab_case_re().is_match(value),
            Self::Regex(_, re) => re.is_match(value),
            Self::Custom(predicate) => predicate(value),
        }
    }
}

fn camel_case_re() -> &'static Regex {
    static CAMEL_RE: OnceLock<Regex> = OnceLock::new();
    CAMEL_RE.get_or_init(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").expect("Invalid regex"))
}

fn pascal_case_re() -> &'static Regex {
    static PASCAL_RE: OnceLock<Regex> = OnceLock::new();
    PASCAL_RE.get_or_init(|| {
        Regex::new(r"^[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]+)*$").expect("Invalid regex")
    })
}

fn kebab_case_re() -> &'static Regex {
    static KEBAB_RE: OnceLock<Regex> = OnceLock::new();
    KEBAB_RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid regex"))
}

impl fmt::Display for NameConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::CamelCase => write!(f, "camelCase"),
            Self::PascalCase => write!(f, "PascalCase"),
            Self::KebabCase => write!(f, "kebab-case"),
            Self::Regex(pattern, _) => write!(f, "{}", pattern),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}

impl fmt::Debug for NameConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameConvention({})", self)
    }
}

impl<'de> Deserialize<'de> for NameConvention {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        NameConvention::parse(&value).map_err(serde::de::Error::custom)
    }
}
