use oas_graph_core::oas::models::{ContentType, HttpCode, Parameter, ParameterLocation};
use oas_graph_core::oas::names::{ComponentName, RefString};
use oas_graph_core::oas::schemas::{
    flatten_composed, ComposedSchema, CompositionKind, ObjectSchema, RefSchema, Schema,
};
use oas_graph_core::{
    build_model_graph, AppError, Config, CustomType, ModelConfig, ModelGraph, ShimOpenApi,
    TargetType,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const PETSTORE: &str = r#"
openapi: 3.0.3
info: {title: Petstore, version: 1.0.0}
security:
  - bearer: []
paths:
  /pets:
    get:
      operationId: listPets
      tags: [pets]
      parameters:
        - $ref: '#/components/parameters/limit'
      responses:
        '200':
          description: all pets
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Pet'}
        default:
          description: problem
          content:
            application/problem+json:
              schema: {$ref: '#/components/schemas/Problem'}
    post:
      operationId: createPet
      tags: [pets]
      security: []
      requestBody:
        $ref: '#/components/requestBodies/NewPet'
      responses:
        '201':
          description: created
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Pet'}
        '202':
          description: queued
  /pets/{petId}/vet-visits:
    parameters:
      - name: petId
        in: path
        schema: {type: string, format: uuid}
    get:
      responses:
        '200':
          description: visits
          content:
            application/x-ndjson:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Visit'}
components:
  parameters:
    limit:
      name: limit
      in: query
      schema: {type: integer, format: int32}
  requestBodies:
    NewPet:
      required: true
      content:
        application/json:
          schema: {$ref: '#/components/schemas/Pet'}
  schemas:
    Timestamp: {type: string, format: date-time}
    Born: {$ref: '#/components/schemas/Timestamp'}
    Named:
      type: object
      required: [name]
      properties:
        name: {type: string}
    Tagged:
      type: object
      required: [tags]
      properties:
        tags: {type: array, items: {type: string}}
    Dog:
      allOf:
        - $ref: '#/components/schemas/Named'
        - $ref: '#/components/schemas/Tagged'
        - type: object
          required: [kind]
          properties:
            kind: {type: string}
            born: {$ref: '#/components/schemas/Born'}
    Cat:
      type: object
      required: [kind]
      properties:
        kind: {type: string}
        indoor: {type: boolean}
    Pet:
      oneOf:
        - $ref: '#/components/schemas/Dog'
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: kind
        mapping:
          dog: '#/components/schemas/Dog'
          cat: '#/components/schemas/Cat'
    Sighting:
      anyOf:
        - $ref: '#/components/schemas/Named'
        - $ref: '#/components/schemas/Tagged'
    Visit:
      type: object
      properties:
        at: {$ref: '#/components/schemas/Timestamp'}
    Attributes:
      type: object
      additionalProperties: {type: string}
    Problem:
      type: object
      properties:
        title: {type: string}
"#;

fn graph_with(config: &ModelConfig) -> ModelGraph {
    let doc = ShimOpenApi::from_yaml_str(PETSTORE).unwrap();
    ModelGraph::build(&doc, config).unwrap()
}

fn graph() -> ModelGraph {
    graph_with(&ModelConfig::default())
}

fn object<'a>(graph: &'a ModelGraph, name: &str) -> &'a ObjectSchema {
    match graph.schema(name) {
        Some(Schema::Object(object)) => object,
        other => panic!("Expected object '{}', got {:?}", name, other),
    }
}

fn required(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_resolving_a_ref_twice_is_consistent() {
    let graph = graph();
    let target = RefString::new("#/components/schemas/Timestamp");
    let first = graph.index().resolve(&target).unwrap().clone();
    let second = graph.index().resolve(&target).unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(graph.schema("Timestamp"), Some(&first));
}

#[test]
fn test_discriminated_one_of_becomes_sealed_interface() {
    let graph = graph();
    let Some(Schema::SealedInterface(pet)) = graph.schema("Pet") else {
        panic!("Expected Pet to be a sealed interface")
    };
    assert_eq!(pet.discriminator_name, "kind");
    assert_eq!(
        pet.schemas.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["dog", "cat"]
    );
    assert_eq!(
        pet.schemas["dog"],
        Schema::Ref(RefSchema {
            target: RefString::new("#/components/schemas/Dog"),
            name: ComponentName::parse("Pet").child("dog"),
            nullable: false,
        })
    );

    let dog = &graph.discriminators()[&ComponentName::parse("Dog")];
    assert_eq!(dog.discriminator_name, "kind");
    assert_eq!(dog.branch_key, "dog");
    assert_eq!(
        dog.interfaces,
        BTreeSet::from([ComponentName::parse("Pet")])
    );
}

#[test]
fn test_all_of_unions_required_and_properties() {
    let graph = graph();
    let dog = object(&graph, "Dog");
    assert_eq!(dog.required, required(&["kind", "name", "tags"]));
    assert_eq!(
        dog.properties.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["name", "tags", "kind", "born"]
    );
    assert_eq!(dog.properties["name"].name().to_string(), "Dog.Name");
}

#[test]
fn test_any_of_requires_nothing() {
    let graph = graph();
    let sighting = object(&graph, "Sighting");
    assert!(sighting.required.is_empty());
    assert_eq!(sighting.properties.len(), 2);
}

#[test]
fn test_flattening_is_idempotent() {
    let graph = graph();
    let dog = object(&graph, "Dog").clone();
    let trivial = ComposedSchema {
        kind: CompositionKind::AllOf,
        members: vec![Schema::Object(dog.clone())],
        name: dog.name.clone(),
        nullable: dog.nullable,
        type_with_format: dog.type_with_format.clone(),
    };
    assert_eq!(flatten_composed(&trivial, graph.index()), Some(dog));
}

#[test]
fn test_conflicting_discriminators_are_dropped() {
    let doc = ShimOpenApi::from_yaml_str(
        r#"
openapi: 3.1.0
components:
  schemas:
    Dog: {type: object, properties: {kind: {type: string}, type: {type: string}}}
    Cat: {type: object, properties: {kind: {type: string}}}
    Pet:
      oneOf: [{$ref: '#/components/schemas/Dog'}, {$ref: '#/components/schemas/Cat'}]
      discriminator: {propertyName: kind}
    Animal:
      oneOf: [{$ref: '#/components/schemas/Dog'}]
      discriminator: {propertyName: type}
"#,
    )
    .unwrap();
    let graph = ModelGraph::build(&doc, &ModelConfig::default()).unwrap();
    assert!(graph.discriminators().is_empty());
}

#[test]
fn test_type_override_reaches_through_refs() {
    let mut config = ModelConfig::default();
    config
        .type_mappings
        .insert("string+date-time".into(), CustomType::new("CustomDate"));
    let graph = graph_with(&config);
    let ctx = graph.context();

    let custom = TargetType::Custom(CustomType::new("CustomDate"));
    for name in ["Timestamp", "Born"] {
        let schema = graph.schema(name).unwrap();
        let resolved = oas_graph_core::oas::resolve_type(schema, &ctx, false).unwrap();
        assert_eq!(resolved.ty, custom, "schema {}", name);
    }
    let born = &object(&graph, "Dog").properties["born"];
    assert_eq!(
        oas_graph_core::oas::resolve_type(born, &ctx, false).unwrap().ty,
        custom
    );
}

#[test]
fn test_typed_additional_properties_is_a_map() {
    let graph = graph();
    assert!(matches!(graph.schema("Attributes"), Some(Schema::Map(_))));
}

#[test]
fn test_endpoints_are_resolved() {
    let graph = graph();
    let endpoints = graph.endpoints();
    assert_eq!(endpoints.len(), 3);

    let list = &endpoints[0];
    assert_eq!(list.endpoint.operation_name.as_str(), "listPets");
    assert_eq!(list.endpoint.tag.as_str(), "Pets");
    assert!(list.endpoint.security.any_security());
    assert_eq!(list.parameters.len(), 1);
    assert_eq!(list.parameters[0].name, "limit");
    assert_eq!(list.parameters[0].location, ParameterLocation::Query);
    assert!(matches!(list.endpoint.parameters[0], Parameter::Ref(_)));
    assert_eq!(list.responses.default_success_status, 200);
    assert_eq!(
        list.responses.success_type.as_ref().map(|t| t.to_string()).as_deref(),
        Some("List<Pet>")
    );
    assert_eq!(
        list.responses.data.keys().cloned().collect::<Vec<_>>(),
        vec![HttpCode::Explicit(200), HttpCode::Default]
    );

    let create = &endpoints[1];
    assert!(create.endpoint.security.no_security());
    let body = create.request_body.as_ref().unwrap();
    assert!(body.required);
    assert_eq!(body.content_type(), Some("application/json"));
    assert_eq!(body.type_ref.as_ref().map(|t| t.to_string()).as_deref(), Some("Pet"));
    assert_eq!(create.responses.default_success_status, 201);
    assert_eq!(create.responses.data.len(), 1);

    let visits = &endpoints[2];
    assert_eq!(visits.endpoint.operation_name.as_str(), "petsPetIdVetVisitsGet");
    assert_eq!(visits.endpoint.tag.as_str(), "Base");
    assert!(visits.parameters[0].required);
    assert!(matches!(
        visits
            .responses
            .success_media_type
            .as_ref()
            .map(|m| &m.content_type),
        Some(ContentType::Json(_))
    ));
    assert_eq!(
        visits.responses.success_type.as_ref().map(|t| t.to_string()).as_deref(),
        Some("Stream<Visit>")
    );
}

#[test]
fn test_enum_and_schema_order() {
    let graph = graph();
    let names: Vec<String> = graph.schemas().keys().map(|n| n.to_string()).collect();
    assert_eq!(
        names,
        vec![
            "Timestamp",
            "Born",
            "Named",
            "Tagged",
            "Dog",
            "Cat",
            "Pet",
            "Sighting",
            "Visit",
            "Attributes",
            "Problem"
        ]
    );
    assert!(graph.enum_schemas().is_empty());
}

#[test]
fn test_naming_policy_gates_the_build() {
    let doc = ShimOpenApi::from_yaml_str(PETSTORE).unwrap();
    let config = Config::from_yaml_str(
        r#"
validator:
  failOnWarnings: true
  tagFormat: PascalCase
"#,
    )
    .unwrap();
    let err = build_model_graph(&doc, &config).unwrap_err();
    assert!(matches!(err, AppError::NamingViolations(2)));

    let relaxed = Config::from_yaml_str(
        r#"
model:
  postfix: Model
validator:
  failOnWarnings: true
"#,
    )
    .unwrap();
    let graph = build_model_graph(&doc, &relaxed).unwrap();
    assert_eq!(
        ComponentName::parse("Pet").class_names(&relaxed.model.postfix),
        vec!["PetModel"]
    );
    assert_eq!(graph.endpoints().len(), 3);
}
