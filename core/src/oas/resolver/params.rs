#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Turns declared parameters into inline `ParameterContent`, following
//! references into `components/parameters`.

use crate::error::AppResult;
use crate::oas::graph::GenerationContext;
use crate::oas::models::{Parameter, ParameterContent};
use crate::oas::names::ParameterKey;
use crate::oas::resolver::follow_refs;

/// Resolves one parameter. Unknown component references are `MissingReference`.
pub fn resolve_parameter(
    parameter: &Parameter,
    ctx: &GenerationContext<'_>,
) -> AppResult<ParameterContent> {
    follow_refs(
        parameter,
        |p| match p {
            Parameter::Ref(r) => Err(r),
            Parameter::Content(content) => Ok(content.clone()),
        },
        |r| {
            let key = ParameterKey::parse(&r.local_name("parameters")?);
            ctx.components.parameters.get(&key)
        },
    )
}

/// Resolves all parameters, keeping their order.
pub fn resolve_parameters(
    parameters: &[Parameter],
    ctx: &GenerationContext<'_>,
) -> AppResult<Vec<ParameterContent>> {
    parameters.iter().map(|p| resolve_parameter(p, ctx)).collect()
}
