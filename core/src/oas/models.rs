#![deny(missing_docs)]

//! # Endpoint Models
//!
//! Intermediate Representation (IR) of operations, their parameters, request
//! bodies and responses.
//!
//! Components referenced with `$ref` stay references here; the resolved views
//! (`RequestBodyResolved`, `ResponseResolved`, `ParameterContent`) are computed
//! once by the model graph.

use crate::error::{AppError, AppResult};
use crate::oas::names::{ParameterKey, RefString, RequestBodyKey, ResponseKey};
use crate::oas::routes::naming::{OperationName, Tag};
use crate::oas::schemas::Schema;
use crate::type_mapping::TypeRef;
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Parses an upper-case method name.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "HEAD" => Ok(Self::Head),
            "PATCH" => Ok(Self::Patch),
            "TRACE" => Ok(Self::Trace),
            other => Err(AppError::Parse(format!("Unknown HTTP method '{}'", other))),
        }
    }

    /// Upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response status key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpCode {
    /// `1XX`
    Information,
    /// `2XX`
    Success,
    /// `3XX`
    Redirection,
    /// `4XX`
    ClientError,
    /// `5XX`
    ServerError,
    /// `default`
    Default,
    /// A concrete status code.
    Explicit(u16),
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl HttpCode {
    /// Parses a `responses` key.
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "1XX" => Self::Information,
            "2XX" => Self::Success,
            "3XX" => Self::Redirection,
            "4XX" => Self::ClientError,
            "5XX" => Self::ServerError,
            other => match other.parse::<u16>() {
                Ok(code) => Self::Explicit(code),
                Err(_) => Self::Unknown(other.to_string()),
            },
        }
    }

    /// Whether a response under this key counts as a success.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Success | Self::Information => true,
            Self::Explicit(code) => (200..=299).contains(code),
            Self::Redirection
            | Self::ClientError
            | Self::ServerError
            | Self::Default
            | Self::Unknown(_) => false,
        }
    }

    /// Status to emit when this key is the only one.
    pub fn default_code(&self) -> u16 {
        match self {
            Self::Information => 100,
            Self::Success => 200,
            Self::Redirection => 300,
            Self::ClientError => 400,
            Self::ServerError => 500,
            Self::Default | Self::Unknown(_) => 200,
            Self::Explicit(code) => *code,
        }
    }
}

impl fmt::Display for HttpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Information => write!(f, "1XX"),
            Self::Success => write!(f, "2XX"),
            Self::Redirection => write!(f, "3XX"),
            Self::ClientError => write!(f, "4XX"),
            Self::ServerError => write!(f, "5XX"),
            Self::Default => write!(f, "default"),
            Self::Explicit(code) => write!(f, "{}", code),
            Self::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// A set of media types, classified as JSON or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    /// Only JSON-compatible media types.
    Json(IndexSet<String>),
    /// At least one non-JSON media type.
    Unknown(IndexSet<String>),
}

impl ContentType {
    /// Classifies one media type (lower-cased).
    pub fn parse(value: &str) -> Self {
        let value = value.to_ascii_lowercase();
        let is_json = matches!(
            value.as_str(),
            "application/json" | "application/ndjson" | "application/x-ndjson"
        ) || is_structured_json(&value);
        let values = IndexSet::from([value]);
        if is_json {
            Self::Json(values)
        } else {
            Self::Unknown(values)
        }
    }

    /// All media types.
    pub fn values(&self) -> &IndexSet<String> {
        match self {
            Self::Json(v) | Self::Unknown(v) => v,
        }
    }

    /// The media type to send or accept.
    pub fn preferred_type(&self) -> Option<&str> {
        match self {
            Self::Json(values) => values
                .get("application/json")
                .or_else(|| values.iter().find(|v| is_structured_json(v)))
                .or_else(|| values.first())
                .map(String::as_str),
            Self::Unknown(values) => values.first().map(String::as_str),
        }
    }

    /// True when any member is a newline-delimited JSON stream.
    pub fn is_streaming(&self) -> bool {
        self.values()
            .iter()
            .any(|v| v == "application/ndjson" || v == "application/x-ndjson")
    }

    /// Union of two sets; JSON only if both are.
    pub fn combine(&self, other: &ContentType) -> ContentType {
        let mut values = self.values().clone();
        values.extend(other.values().iter().cloned());
        match (self, other) {
            (Self::Json(_), Self::Json(_)) => Self::Json(values),
            _ => Self::Unknown(values),
        }
    }
}

fn is_structured_json(value: &str) -> bool {
    value.starts_with("application/") && value.ends_with("+json")
}

/// One entry of a `content` map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMediaType {
    /// Media type(s).
    pub content_type: ContentType,
    /// Body schema, if declared.
    pub schema: Option<Schema>,
}

impl ContentMediaType {
    /// Merges alternatives: content types are summed, and the schema survives
    /// only when every alternative carries the same one.
    pub fn combine(items: &[ContentMediaType]) -> Option<ContentMediaType> {
        let (first, rest) = items.split_first()?;
        let content_type = rest
            .iter()
            .fold(first.content_type.clone(), |acc, item| acc.combine(&item.content_type));

        let mut schemas: Vec<&Option<Schema>> = Vec::new();
        for item in items {
            if !schemas.contains(&&item.schema) {
                schemas.push(&item.schema);
            }
        }
        let schema = match schemas.as_slice() {
            [single] => (*single).clone(),
            _ => None,
        };
        Some(ContentMediaType {
            content_type,
            schema,
        })
    }
}

/// Alternative requirement sets; each set lists security scheme names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Security(pub Vec<Vec<String>>);

impl Security {
    /// True when some alternative needs credentials.
    pub fn any_security(&self) -> bool {
        self.0.iter().any(|set| !set.is_empty())
    }

    /// True when no alternative needs credentials.
    pub fn no_security(&self) -> bool {
        self.0.iter().all(Vec::is_empty)
    }
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// `?name=`
    Query,
    /// `/{name}`
    Path,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParameterLocation {
    /// Parses the `in` field (case-insensitive).
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            _ => Err(AppError::Parse(format!(
                "Parameter location '{}' is invalid",
                value
            ))),
        }
    }
}

/// An inline parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterContent {
    /// Wire name.
    pub name: String,
    /// Component key (or operation-derived key).
    pub key: ParameterKey,
    /// Location.
    pub location: ParameterLocation,
    /// `description`
    pub description: Option<String>,
    /// Always true for path parameters.
    pub required: bool,
    /// Parsed schema (`Unknown` when absent).
    pub schema: Schema,
}

/// A parameter as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// `$ref` into `components/parameters`.
    Ref(RefString),
    /// Inline definition.
    Content(ParameterContent),
}

/// An inline request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyContent {
    /// Component key (or `<Op>Request`).
    pub key: RequestBodyKey,
    /// `required`
    pub required: bool,
    /// `description`
    pub description: Option<String>,
    /// Media types in document order.
    pub content: Vec<ContentMediaType>,
}

/// A request body as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `$ref` into `components/requestBodies`.
    Ref(RefString),
    /// No body (or no content).
    Empty,
    /// Inline definition.
    Content(RequestBodyContent),
}

/// An inline response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseContent {
    /// Component key (or `<Op>Response<code>`).
    pub key: ResponseKey,
    /// `description`
    pub description: Option<String>,
    /// Media types in document order.
    pub content: Vec<ContentMediaType>,
}

/// A response as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `$ref` into `components/responses`.
    Ref(RefString),
    /// No content.
    Empty,
    /// Inline definition.
    Content(ResponseContent),
}

/// The request body as generators consume it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyResolved {
    /// Whether the body is mandatory.
    pub required: bool,
    /// `description`
    pub description: Option<String>,
    /// Combined media type.
    pub media_type: Option<ContentMediaType>,
    /// Target type of the combined schema.
    pub type_ref: Option<TypeRef>,
}

impl RequestBodyResolved {
    /// Preferred media type of the body.
    pub fn content_type(&self) -> Option<&str> {
        self.media_type
            .as_ref()
            .and_then(|m| m.content_type.preferred_type())
    }
}

/// The responses as generators consume them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseResolved {
    /// Responses with content, after following references.
    pub data: IndexMap<HttpCode, ResponseContent>,
    /// Combined media type over every success response.
    pub success_media_type: Option<ContentMediaType>,
    /// Status code emitted on success.
    pub default_success_status: u16,
    /// Target type of the success body; streams for NDJSON.
    pub success_type: Option<TypeRef>,
}

/// One operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template.
    pub path: String,
    /// Grouping tag.
    pub tag: Tag,
    /// Derived operation name.
    pub operation_name: OperationName,
    /// `deprecated`
    pub deprecated: bool,
    /// Effective security.
    pub security: Security,
    /// `summary`
    pub summary: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// Path-level then operation-level parameters.
    pub parameters: Vec<Parameter>,
    /// Request body.
    pub request_body: RequestBody,
    /// Responses keyed by status.
    pub responses: IndexMap<HttpCode, Response>,
}

/// An endpoint with its precomputed views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// The endpoint as declared.
    pub endpoint: Endpoint,
    /// Parameters after following references.
    pub parameters: Vec<ParameterContent>,
    /// The request body, if the operation has one.
    pub request_body: Option<RequestBodyResolved>,
    /// The responses.
    pub responses: ResponseResolved,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::names::ComponentName;
    use crate::oas::schemas::{PrimitiveKind, PrimitiveSchema};

    #[test]
    fn test_http_code_parse_and_success() {
        assert_eq!(HttpCode::parse("200"), HttpCode::Explicit(200));
        assert_eq!(HttpCode::parse("2XX"), HttpCode::Success);
        assert_eq!(HttpCode::parse("default"), HttpCode::Default);
        assert_eq!(HttpCode::parse("2xx"), HttpCode::Unknown("2xx".into()));

        assert!(HttpCode::Explicit(204).is_success());
        assert!(!HttpCode::Explicit(404).is_success());
        assert!(HttpCode::Information.is_success());
        assert!(!HttpCode::Default.is_success());

        assert_eq!(HttpCode::ClientError.default_code(), 400);
        assert_eq!(HttpCode::Default.default_code(), 200);
        assert_eq!(HttpCode::Explicit(201).to_string(), "201");
    }

    #[test]
    fn test_content_type_classification() {
        assert!(matches!(ContentType::parse("application/json"), ContentType::Json(_)));
        assert!(matches!(ContentType::parse("Application/Problem+JSON"), ContentType::Json(_)));
        assert!(matches!(ContentType::parse("application/x-ndjson"), ContentType::Json(_)));
        assert!(matches!(ContentType::parse("text/plain"), ContentType::Unknown(_)));
    }

    #[test]
    fn test_preferred_type() {
        let problem = ContentType::parse("application/problem+json");
        let combined = problem
            .combine(&ContentType::parse("application/ndjson"))
            .combine(&ContentType::parse("application/json"));
        assert_eq!(combined.preferred_type(), Some("application/json"));

        let no_plain = problem.combine(&ContentType::parse("application/ndjson"));
        assert_eq!(no_plain.preferred_type(), Some("application/problem+json"));

        let mixed = ContentType::parse("text/csv").combine(&ContentType::parse("application/json"));
        assert!(matches!(mixed, ContentType::Unknown(_)));
        assert_eq!(mixed.preferred_type(), Some("text/csv"));
    }

    fn media(content_type: &str, schema: Option<Schema>) -> ContentMediaType {
        ContentMediaType {
            content_type: ContentType::parse(content_type),
            schema,
        }
    }

    fn string_schema(name: &str) -> Schema {
        Schema::Primitive(PrimitiveSchema {
            kind: PrimitiveKind::String,
            format: None,
            name: ComponentName::parse(name),
            nullable: false,
        })
    }

    #[test]
    fn test_combine_keeps_shared_schema_only() {
        assert!(ContentMediaType::combine(&[]).is_none());

        let same = ContentMediaType::combine(&[
            media("application/json", Some(string_schema("Body"))),
            media("application/xml", Some(string_schema("Body"))),
        ])
        .unwrap();
        assert_eq!(same.schema, Some(string_schema("Body")));
        assert_eq!(same.content_type.values().len(), 2);
        assert!(matches!(same.content_type, ContentType::Unknown(_)));

        let different = ContentMediaType::combine(&[
            media("application/json", Some(string_schema("Body"))),
            media("application/json", Some(string_schema("Other"))),
        ])
        .unwrap();
        assert_eq!(different.schema, None);
        assert_eq!(different.content_type.values().len(), 1);
    }

    #[test]
    fn test_security_flags() {
        assert!(Security::default().no_security());
        let optional = Security(vec![vec![], vec!["bearer".into()]]);
        assert!(optional.any_security());
        assert!(!optional.no_security());
    }

    #[test]
    fn test_parameter_location() {
        assert_eq!(ParameterLocation::parse("Query").unwrap(), ParameterLocation::Query);
        assert!(matches!(
            ParameterLocation::parse("body"),
            Err(AppError::Parse(_))
        ));
    }
}
