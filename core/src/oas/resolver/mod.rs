#![deny(missing_docs)]

//! # Resolver Module
//!
//! Computes the views generators consume from the declared endpoint model.
//!
//! Handles:
//! - Type mapping with user overrides (`types`).
//! - Parameter resolution (Inline and Reference).
//! - Request body and response resolution, including content combination and
//!   default success status selection.

pub mod body;
pub mod params;
pub mod responses;
pub mod types;

use crate::error::{AppError, AppResult};
use crate::oas::graph::GenerationContext;
use crate::oas::models::{Endpoint, ResolvedEndpoint};
use crate::oas::names::RefString;

pub use body::resolve_request_body;
pub use params::{resolve_parameter, resolve_parameters};
pub use responses::{default_success_status, resolve_responses};
pub use types::{
    data_class_fields, field_type, resolve_type, type_spec_kind, FieldSpec, TypeSpecKind,
};

const MAX_REF_HOPS: usize = 32;

/// Precomputes the resolved views of an endpoint.
pub fn resolve_endpoint(
    endpoint: Endpoint,
    ctx: &GenerationContext<'_>,
) -> AppResult<ResolvedEndpoint> {
    let parameters = resolve_parameters(&endpoint.parameters, ctx)?;
    let request_body = resolve_request_body(&endpoint.request_body, ctx)?;
    let responses = resolve_responses(&endpoint.responses, ctx)?;
    Ok(ResolvedEndpoint {
        endpoint,
        parameters,
        request_body,
        responses,
    })
}

/// Follows component references until `step` yields a value.
///
/// `step` either produces the result for an item or hands back its reference,
/// which `lookup` maps to the next item.
pub(crate) fn follow_refs<'a, T, O>(
    start: &'a T,
    step: impl Fn(&'a T) -> Result<O, &'a RefString>,
    lookup: impl Fn(&RefString) -> Option<&'a T>,
) -> AppResult<O> {
    let mut current = start;
    for _ in 0..MAX_REF_HOPS {
        match step(current) {
            Ok(value) => return Ok(value),
            Err(reference) => {
                current = lookup(reference)
                    .ok_or_else(|| AppError::MissingReference(reference.to_string()))?;
            }
        }
    }
    Err(AppError::General(format!(
        "Reference chain longer than {} hops",
        MAX_REF_HOPS
    )))
}
