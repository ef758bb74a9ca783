#![deny(missing_docs)]

//! # OpenAPI Model Module
//!
//! - **shims**: Raw deserialization of the document.
//! - **names**: Component names, reference strings and component keys.
//! - **schemas**: Parsing, composition flattening and the ref index.
//! - **discriminator**: Global discriminator resolution.
//! - **models**: Intermediate Representation of endpoints.
//! - **routes**: Parsing logic for API paths and reusable components.
//! - **resolver**: Type mapping and resolved endpoint views.
//! - **graph**: The assembled model graph.
//! - **validation**: Naming convention checks.

pub mod discriminator;
pub mod graph;
pub mod models;
pub mod names;
pub(crate) mod ref_utils;
pub mod resolver;
pub mod routes;
pub mod schemas;
pub mod shims;
pub mod validation;

// Re-export public API
pub use discriminator::{resolve_discriminators, DiscriminatorInfo, DiscriminatorMap};
pub use graph::{GenerationContext, ModelGraph};
pub use models::{Endpoint, HttpCode, HttpMethod, ResolvedEndpoint, Security};
pub use names::{ComponentName, RefString, TypeWithFormat};
pub use resolver::{resolve_type, type_spec_kind, TypeSpecKind};
pub use schemas::{RefIndex, Schema};
pub use shims::{ShimOpenApi, SpecVersion};
pub use validation::{enforce, validate_naming};
