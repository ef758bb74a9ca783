#![deny(missing_docs)]

//! # Routes Module
//!
//! Entry point for parsing OpenAPI `paths` and the reusable
//! `parameters`, `requestBodies` and `responses` components.
//! Orchestrates the Parsing of Shims -> Builder -> IR Models.

pub mod builder;
pub mod naming;

use crate::error::AppResult;
use crate::oas::models::{Endpoint, Parameter, RequestBody, Response, Security};
use crate::oas::names::{ParameterKey, RequestBodyKey, ResponseKey};
use crate::oas::routes::builder::{
    parse_parameter, parse_path_item, parse_request_body, parse_response,
};
use crate::oas::schemas::{ParseContext, RefIndex};
use crate::oas::shims::{ShimOpenApi, ShimSecurityRequirement};
use indexmap::IndexMap;

pub use naming::{OperationName, Tag};

/// Inputs shared by every route parsing function.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    /// Schema parsing rules.
    pub parse: ParseContext,
    /// Index used to reduce compositions and check references.
    pub index: &'a RefIndex,
    /// Security applied when an operation declares none.
    pub default_security: &'a Security,
}

/// Reusable non-schema components, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Components {
    /// `components/parameters`
    pub parameters: IndexMap<ParameterKey, Parameter>,
    /// `components/requestBodies`
    pub request_bodies: IndexMap<RequestBodyKey, RequestBody>,
    /// `components/responses`
    pub responses: IndexMap<ResponseKey, Response>,
}

/// Parses `components/parameters`, `components/requestBodies` and `components/responses`.
pub fn parse_components(doc: &ShimOpenApi, ctx: &RouteContext<'_>) -> AppResult<Components> {
    let mut components = Components::default();
    let Some(raw) = &doc.components else {
        return Ok(components);
    };

    for (name, parameter) in &raw.parameters {
        let key = ParameterKey::parse(name);
        let parsed = parse_parameter(parameter, key.clone(), ctx)?;
        components.parameters.insert(key, parsed);
    }
    for (name, body) in &raw.request_bodies {
        let key = RequestBodyKey::parse(name);
        let parsed = parse_request_body(Some(body), key.clone(), ctx)?;
        components.request_bodies.insert(key, parsed);
    }
    for (name, response) in &raw.responses {
        let key = ResponseKey::parse(name);
        let parsed = parse_response(response, key.clone(), ctx)?;
        components.responses.insert(key, parsed);
    }
    Ok(components)
}

/// Parses every operation of every path, in document order.
pub fn parse_endpoints(doc: &ShimOpenApi, ctx: &RouteContext<'_>) -> AppResult<Vec<Endpoint>> {
    let mut endpoints = Vec::new();
    for (path, item) in doc.paths.iter().flatten() {
        endpoints.extend(parse_path_item(path, item, ctx)?);
    }
    Ok(endpoints)
}

/// Alternative requirement sets, each listing the scheme names it needs.
pub fn parse_security(requirements: Option<&[ShimSecurityRequirement]>) -> Security {
    Security(
        requirements
            .unwrap_or_default()
            .iter()
            .map(|req| req.keys().cloned().collect())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{HttpCode, HttpMethod, ParameterLocation};

    const DOC: &str = r#"
openapi: 3.0.3
security:
  - apiKey: []
paths:
  /users/{id}:
    parameters:
      - name: id
        in: path
        schema: {type: string}
    get:
      operationId: getUser
      tags: [user-admin, other]
      parameters:
        - $ref: '#/components/parameters/Limit'
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: {$ref: '#/components/schemas/User'}
        '404':
          $ref: '#/components/responses/NotFound'
    delete:
      security: []
      responses:
        '204': {description: gone}
components:
  schemas:
    User: {type: object, properties: {id: {type: string}}}
  parameters:
    Limit:
      name: limit
      in: query
      schema: {type: integer}
  responses:
    NotFound:
      description: missing
      content:
        application/problem+json:
          schema: {type: object, properties: {detail: {type: string}}}
  requestBodies:
    user_body:
      required: true
      content:
        application/json:
          schema: {$ref: '#/components/schemas/User'}
"#;

    fn parse_all() -> (Components, Vec<Endpoint>) {
        let doc = ShimOpenApi::from_yaml_str(DOC).unwrap();
        let parse = ParseContext::new(doc.version());
        let schemas = crate::oas::schemas::parse_component_schemas(&doc, &parse);
        let index = RefIndex::build(&schemas).unwrap();
        let security = parse_security(doc.security.as_deref());
        let ctx = RouteContext {
            parse,
            index: &index,
            default_security: &security,
        };
        (
            parse_components(&doc, &ctx).unwrap(),
            parse_endpoints(&doc, &ctx).unwrap(),
        )
    }

    #[test]
    fn test_components() {
        let (components, _) = parse_all();
        let limit = &components.parameters[&ParameterKey::parse("Limit")];
        let Parameter::Content(limit) = limit else {
            panic!("Expected inline parameter")
        };
        assert_eq!(limit.name, "limit");
        assert_eq!(limit.location, ParameterLocation::Query);
        assert!(!limit.required);
        assert_eq!(limit.schema.name().to_string(), "Limit");

        assert!(components
            .request_bodies
            .contains_key(&RequestBodyKey::parse("UserBody")));
        let Response::Content(not_found) = &components.responses[&ResponseKey::parse("NotFound")]
        else {
            panic!("Expected inline response")
        };
        assert_eq!(
            not_found.content[0].schema.as_ref().map(|s| s.name().to_string()),
            Some("NotFoundBody".to_string())
        );
    }

    #[test]
    fn test_endpoints() {
        let (_, endpoints) = parse_all();
        assert_eq!(endpoints.len(), 2);

        let get = &endpoints[0];
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.operation_name.as_str(), "getUser");
        assert_eq!(get.tag.as_str(), "UserAdmin");
        assert_eq!(get.security, Security(vec![vec!["apiKey".to_string()]]));
        assert_eq!(get.parameters.len(), 2);
        let Parameter::Content(id) = &get.parameters[0] else {
            panic!("Expected inline path parameter")
        };
        assert!(id.required);
        assert_eq!(id.key.as_str(), "GetUserParamId");
        assert!(matches!(get.parameters[1], Parameter::Ref(_)));
        assert_eq!(
            get.responses.keys().cloned().collect::<Vec<_>>(),
            vec![HttpCode::Explicit(200), HttpCode::Explicit(404)]
        );

        let delete = &endpoints[1];
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.operation_name.as_str(), "usersIdDelete");
        assert_eq!(delete.tag.as_str(), "Base");
        assert!(delete.security.no_security());
        assert_eq!(delete.request_body, RequestBody::Empty);
    }
}
