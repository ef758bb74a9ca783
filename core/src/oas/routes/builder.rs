#![deny(missing_docs)]

//! # Route Builder
//!
//! Logic that transforms `Shim` structs into `Endpoint` IR models.

use crate::error::{AppError, AppResult};
use crate::oas::graph::reduce_compositions;
use crate::oas::models::{
    ContentMediaType, ContentType, Endpoint, HttpCode, HttpMethod, Parameter, ParameterContent,
    ParameterLocation, RequestBody, RequestBodyContent, Response, ResponseContent,
};
use crate::oas::names::{ComponentName, ParameterKey, RefString, RequestBodyKey, ResponseKey};
use crate::oas::routes::naming::{OperationName, Tag};
use crate::oas::routes::{parse_security, RouteContext};
use crate::oas::schemas::{parse_schema, Schema, UnknownSchema};
use crate::oas::shims::{
    ShimMediaType, ShimOperation, ShimParameter, ShimPathItem, ShimRequestBody, ShimResponse,
    ShimSchema,
};
use indexmap::IndexMap;
use tracing::debug;

/// Extracts every operation of a path item as an `Endpoint`.
pub fn parse_path_item(
    path: &str,
    item: &ShimPathItem,
    ctx: &RouteContext<'_>,
) -> AppResult<Vec<Endpoint>> {
    let mut endpoints = Vec::new();
    for (method, op) in item.operations() {
        let method = HttpMethod::parse(method)?;
        endpoints.push(parse_operation(path, method, item, op, ctx)?);
    }
    Ok(endpoints)
}

fn parse_operation(
    path: &str,
    method: HttpMethod,
    item: &ShimPathItem,
    op: &ShimOperation,
    ctx: &RouteContext<'_>,
) -> AppResult<Endpoint> {
    let operation_name = match op.operation_id.as_deref() {
        Some(id) if !id.trim().is_empty() => OperationName::parse(id),
        _ => OperationName::from_path(path, method),
    };
    debug!("Parsing operation {} {} as '{}'", method, path, operation_name);

    // Path-level parameters come first.
    let mut parameters = Vec::new();
    for raw in item.parameters.iter().flatten().chain(op.parameters.iter().flatten()) {
        let key = operation_name.parameter_key(raw.name.as_deref().unwrap_or_default());
        parameters.push(parse_parameter(raw, key, ctx)?);
    }

    let request_body =
        parse_request_body(op.request_body.as_ref(), operation_name.request_key(), ctx)?;

    let mut responses = IndexMap::new();
    for (code, raw) in op.responses.iter().flatten() {
        let code = HttpCode::parse(code);
        let key = operation_name.response_key(&code);
        responses.insert(code, parse_response(raw, key, ctx)?);
    }

    let tag = op
        .tags
        .as_ref()
        .and_then(|tags| tags.first())
        .map(|t| Tag::parse(t))
        .unwrap_or_else(|| Tag::parse(Tag::DEFAULT));
    let security = match &op.security {
        Some(requirements) => parse_security(Some(requirements.as_slice())),
        None => ctx.default_security.clone(),
    };

    Ok(Endpoint {
        method,
        path: path.to_string(),
        tag,
        operation_name,
        deprecated: op.deprecated.unwrap_or(false),
        security,
        summary: op.summary.clone(),
        description: op.description.clone(),
        parameters,
        request_body,
        responses,
    })
}

/// Parses one parameter. Path parameters are always required.
pub fn parse_parameter(
    raw: &ShimParameter,
    key: ParameterKey,
    ctx: &RouteContext<'_>,
) -> AppResult<Parameter> {
    if let Some(reference) = &raw.reference {
        return Ok(Parameter::Ref(RefString::new(reference)));
    }
    let name = raw
        .name
        .clone()
        .ok_or_else(|| AppError::Parse(format!("Parameter '{}' has no name", key)))?;
    let location = raw
        .location
        .as_deref()
        .ok_or_else(|| AppError::Parse(format!("Parameter '{}' has no location", name)))
        .and_then(ParameterLocation::parse)?;
    let schema = match &raw.schema {
        Some(schema) => parse_route_schema(schema, key.schema_name(), ctx)?,
        None => Schema::Unknown(UnknownSchema {
            name: key.schema_name(),
            type_with_format: None,
        }),
    };
    Ok(Parameter::Content(ParameterContent {
        name,
        required: location == ParameterLocation::Path || raw.required.unwrap_or(false),
        key,
        location,
        description: raw.description.clone(),
        schema,
    }))
}

/// Parses a request body; absent bodies or bodies without content are `Empty`.
pub fn parse_request_body(
    raw: Option<&ShimRequestBody>,
    key: RequestBodyKey,
    ctx: &RouteContext<'_>,
) -> AppResult<RequestBody> {
    let Some(raw) = raw else {
        return Ok(RequestBody::Empty);
    };
    if let Some(reference) = &raw.reference {
        return Ok(RequestBody::Ref(RefString::new(reference)));
    }
    let Some(content) = &raw.content else {
        return Ok(RequestBody::Empty);
    };
    let content = parse_content(content, key.schema_name(), ctx)?;
    Ok(RequestBody::Content(RequestBodyContent {
        key,
        required: raw.required.unwrap_or(false),
        description: raw.description.clone(),
        content,
    }))
}

/// Parses a response; responses without content are `Empty`.
pub fn parse_response(
    raw: &ShimResponse,
    key: ResponseKey,
    ctx: &RouteContext<'_>,
) -> AppResult<Response> {
    if let Some(reference) = &raw.reference {
        return Ok(Response::Ref(RefString::new(reference)));
    }
    let Some(content) = &raw.content else {
        return Ok(Response::Empty);
    };
    let content = parse_content(content, key.schema_name(), ctx)?;
    Ok(Response::Content(ResponseContent {
        key,
        description: raw.description.clone(),
        content,
    }))
}

fn parse_content(
    content: &IndexMap<String, ShimMediaType>,
    schema_name: ComponentName,
    ctx: &RouteContext<'_>,
) -> AppResult<Vec<ContentMediaType>> {
    content
        .iter()
        .map(|(media_type, raw)| {
            let schema = raw
                .schema
                .as_ref()
                .map(|s| parse_route_schema(s, schema_name.clone(), ctx))
                .transpose()?;
            Ok(ContentMediaType {
                content_type: ContentType::parse(media_type),
                schema,
            })
        })
        .collect()
}

/// Inline schemas go through the same reduction and reference checks as components.
fn parse_route_schema(
    raw: &ShimSchema,
    name: ComponentName,
    ctx: &RouteContext<'_>,
) -> AppResult<Schema> {
    let schema = reduce_compositions(parse_schema(raw, name, &ctx.parse), ctx.index);
    ctx.index.check_references([&schema])?;
    Ok(schema)
}
