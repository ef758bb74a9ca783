#![deny(missing_docs)]

//! # Model Graph
//!
//! The single product handed to generator backends.
//!
//! Build order:
//! 1. Parse `components/schemas`.
//! 2. Index the parsed trees (duplicates are fatal).
//! 3. Reduce every reducible `allOf` / `anyOf` to an object, then re-index.
//! 4. Check that every reference resolves.
//! 5. Resolve discriminators across all sealed interfaces.
//! 6. Parse components and endpoints, then precompute their resolved views.
//!
//! The graph is immutable once built.

use crate::config::ModelConfig;
use crate::error::AppResult;
use crate::oas::discriminator::{resolve_discriminators, DiscriminatorInfo, DiscriminatorMap};
use crate::oas::models::{ResolvedEndpoint, Security};
use crate::oas::names::{ComponentName, RefString};
use crate::oas::resolver::resolve_endpoint;
use crate::oas::routes::{
    parse_components, parse_endpoints, parse_security, Components, RouteContext,
};
use crate::oas::schemas::{
    flatten_composed, parse_component_schemas, ParseContext, RefIndex, Schema,
};
use crate::oas::shims::{ShimOpenApi, SpecVersion};
use crate::type_mapping::TypeOverrides;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use tracing::debug;

/// Resolved model of one OpenAPI document.
#[derive(Debug, Clone)]
pub struct ModelGraph {
    version: SpecVersion,
    schemas: IndexMap<ComponentName, Schema>,
    index: RefIndex,
    discriminators: DiscriminatorMap,
    enum_schemas: BTreeSet<ComponentName>,
    components: Components,
    endpoints: Vec<ResolvedEndpoint>,
    security: Security,
    overrides: TypeOverrides,
    postfix: String,
}

/// Everything derivation functions need, passed explicitly by reference.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Canonical reference -> schema.
    pub index: &'a RefIndex,
    /// Branch schema -> discriminator facts.
    pub discriminators: &'a DiscriminatorMap,
    /// User overrides.
    pub overrides: &'a TypeOverrides,
    /// Reusable parameters, request bodies and responses.
    pub components: &'a Components,
    /// Class name postfix.
    pub postfix: &'a str,
}

impl<'a> GenerationContext<'a> {
    /// Discriminator facts of a branch schema.
    pub fn discriminator_info(&self, name: &ComponentName) -> Option<&'a DiscriminatorInfo> {
        self.discriminators.get(name)
    }

    /// Looks up a schema reference.
    pub fn resolve(&self, target: &RefString) -> AppResult<&'a Schema> {
        self.index.resolve(target)
    }
}

impl ModelGraph {
    /// Builds the graph. Only missing references, duplicate schema names,
    /// malformed override keys and invalid parameter locations are fatal.
    pub fn build(doc: &ShimOpenApi, config: &ModelConfig) -> AppResult<Self> {
        let version = doc.version();
        let ctx = ParseContext::new(version);
        let overrides = TypeOverrides::from_config(config)?;

        let parsed = parse_component_schemas(doc, &ctx);
        let parsed_index = RefIndex::build(&parsed)?;
        let reduced: Vec<Schema> = parsed
            .into_iter()
            .map(|s| reduce_compositions(s, &parsed_index))
            .collect();
        let index = RefIndex::build(&reduced)?;
        index.check_references(&reduced)?;
        debug!("Indexed {} schemas", index.len());

        let discriminators = resolve_discriminators(&reduced, &index);
        let enum_schemas = reduced
            .iter()
            .flat_map(Schema::flatten)
            .filter(|s| matches!(s, Schema::EnumString(_)))
            .map(|s| s.name().clone())
            .filter(|name| !name.is_unnamed())
            .collect();
        let schemas: IndexMap<ComponentName, Schema> = reduced
            .into_iter()
            .map(|s| (s.name().clone(), s))
            .collect();

        let security = parse_security(doc.security.as_deref());
        let route_ctx = RouteContext {
            parse: ctx,
            index: &index,
            default_security: &security,
        };
        let components = parse_components(doc, &route_ctx)?;
        let endpoints = parse_endpoints(doc, &route_ctx)?;
        debug!("Parsed {} endpoints", endpoints.len());

        let mut graph = ModelGraph {
            version,
            schemas,
            index,
            discriminators,
            enum_schemas,
            components,
            endpoints: Vec::new(),
            security,
            overrides,
            postfix: config.postfix.clone(),
        };
        let resolved = endpoints
            .into_iter()
            .map(|e| resolve_endpoint(e, &graph.context()))
            .collect::<AppResult<Vec<_>>>()?;
        graph.endpoints = resolved;
        Ok(graph)
    }

    /// The explicit context handed to derivation functions.
    pub fn context(&self) -> GenerationContext<'_> {
        GenerationContext {
            index: &self.index,
            discriminators: &self.discriminators,
            overrides: &self.overrides,
            components: &self.components,
            postfix: &self.postfix,
        }
    }

    /// Document version.
    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// Component schemas in document order, after composition reduction.
    pub fn schemas(&self) -> &IndexMap<ComponentName, Schema> {
        &self.schemas
    }

    /// Component schema by name.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(&ComponentName::parse(name))
    }

    /// The ref index.
    pub fn index(&self) -> &RefIndex {
        &self.index
    }

    /// Discriminator map.
    pub fn discriminators(&self) -> &DiscriminatorMap {
        &self.discriminators
    }

    /// Names of every string enum (top-level and nested).
    pub fn enum_schemas(&self) -> &BTreeSet<ComponentName> {
        &self.enum_schemas
    }

    /// Reusable parameters, request bodies and responses.
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Endpoints in document order, with resolved views.
    pub fn endpoints(&self) -> &[ResolvedEndpoint] {
        &self.endpoints
    }

    /// Document-level security.
    pub fn security(&self) -> &Security {
        &self.security
    }
}

/// Replaces every reducible composition in the tree with its merged object.
pub(crate) fn reduce_compositions(schema: Schema, index: &RefIndex) -> Schema {
    match schema {
        Schema::Composed(composed) => match flatten_composed(&composed, index) {
            Some(object) => reduce_compositions(Schema::Object(object), index),
            None => {
                debug!("Composition '{}' kept as is", composed.name);
                Schema::Composed(composed)
            }
        },
        Schema::Object(mut object) => {
            object.properties = object
                .properties
                .into_iter()
                .map(|(key, prop)| (key, reduce_compositions(prop, index)))
                .collect();
            Schema::Object(object)
        }
        Schema::Array(mut array) => {
            array.items = Box::new(reduce_compositions(*array.items, index));
            Schema::Array(array)
        }
        Schema::Map(mut map) => {
            map.value = Box::new(reduce_compositions(*map.value, index));
            Schema::Map(map)
        }
        other => other,
    }
}
