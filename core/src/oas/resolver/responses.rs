#![deny(missing_docs)]

//! # Response Resolution
//!
//! Follows response references, combines the success content and picks the
//! status code a server emits by default.

use crate::error::AppResult;
use crate::oas::graph::GenerationContext;
use crate::oas::models::{ContentMediaType, HttpCode, Response, ResponseContent, ResponseResolved};
use crate::oas::names::ResponseKey;
use crate::oas::resolver::follow_refs;
use crate::oas::resolver::types::resolve_type;
use indexmap::IndexMap;

/// Status emitted on success.
///
/// - no responses: `200`
/// - one response: that key's default code
/// - otherwise the smallest explicit 2xx, else the first explicit code, else the
///   first key's default code
pub fn default_success_status(codes: &[HttpCode]) -> u16 {
    match codes {
        [] => 200,
        [single] => single.default_code(),
        [first, ..] => {
            let explicit: Vec<u16> = codes
                .iter()
                .filter_map(|code| match code {
                    HttpCode::Explicit(status) => Some(*status),
                    _ => None,
                })
                .collect();
            explicit
                .iter()
                .copied()
                .filter(|status| (200..=299).contains(status))
                .min()
                .or_else(|| explicit.first().copied())
                .unwrap_or_else(|| first.default_code())
        }
    }
}

/// Resolves the responses of an operation.
pub fn resolve_responses(
    responses: &IndexMap<HttpCode, Response>,
    ctx: &GenerationContext<'_>,
) -> AppResult<ResponseResolved> {
    let mut data = IndexMap::new();
    for (code, response) in responses {
        if let Some(content) = resolve_response(response, ctx)? {
            data.insert(code.clone(), content.clone());
        }
    }

    let success_content: Vec<ContentMediaType> = data
        .iter()
        .filter(|(code, _)| code.is_success())
        .flat_map(|(_, response)| response.content.iter().cloned())
        .collect();
    let success_media_type = ContentMediaType::combine(&success_content);
    let success_type = success_media_type
        .as_ref()
        .and_then(|m| {
            m.schema
                .as_ref()
                .map(|schema| resolve_type(schema, ctx, m.content_type.is_streaming()))
        })
        .transpose()?;

    let codes: Vec<HttpCode> = responses.keys().cloned().collect();
    Ok(ResponseResolved {
        data,
        success_media_type,
        default_success_status: default_success_status(&codes),
        success_type,
    })
}

fn resolve_response<'a>(
    response: &'a Response,
    ctx: &GenerationContext<'a>,
) -> AppResult<Option<&'a ResponseContent>> {
    follow_refs(
        response,
        |r| match r {
            Response::Ref(reference) => Err(reference),
            Response::Empty => Ok(None),
            Response::Content(content) => Ok(Some(content)),
        },
        |reference| {
            let key = ResponseKey::parse(&reference.local_name("responses")?);
            ctx.components.responses.get(&key)
        },
    )
}
