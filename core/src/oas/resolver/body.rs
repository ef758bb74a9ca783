#![deny(missing_docs)]

//! # Body Resolution
//!
//! Resolves the request body of an operation into a single combined media type
//! and its target type.

use crate::error::AppResult;
use crate::oas::graph::GenerationContext;
use crate::oas::models::{ContentMediaType, RequestBody, RequestBodyContent, RequestBodyResolved};
use crate::oas::names::RequestBodyKey;
use crate::oas::resolver::follow_refs;
use crate::oas::resolver::types::resolve_type;

/// Resolves a request body. `Empty` bodies (also behind a reference) yield `None`.
pub fn resolve_request_body(
    body: &RequestBody,
    ctx: &GenerationContext<'_>,
) -> AppResult<Option<RequestBodyResolved>> {
    let content: Option<&RequestBodyContent> = follow_refs(
        body,
        |b| match b {
            RequestBody::Ref(r) => Err(r),
            RequestBody::Empty => Ok(None),
            RequestBody::Content(content) => Ok(Some(content)),
        },
        |r| {
            let key = RequestBodyKey::parse(&r.local_name("requestBodies")?);
            ctx.components.request_bodies.get(&key)
        },
    )?;
    let Some(content) = content else {
        return Ok(None);
    };

    let media_type = ContentMediaType::combine(&content.content);
    let type_ref = media_type
        .as_ref()
        .and_then(|m| m.schema.as_ref())
        .map(|schema| resolve_type(schema, ctx, false))
        .transpose()?;
    Ok(Some(RequestBodyResolved {
        required: content.required,
        description: content.description.clone(),
        media_type,
        type_ref,
    }))
}
