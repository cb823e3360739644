use crate::dto_rules::DtoRuleSet;
use crate::extractor::{ApiModel, Dto, Parameter as RouteParameter, Route};
use crate::schema_generator::{dto_schemas, map_type, Schema};
use log::debug;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const JSON_MEDIA_TYPE: &str = "application/json";

/// OpenAPI document builder
pub struct OpenApiBuilder {
    /// OpenAPI info section
    info: Info,
    /// Paths collection (URL path -> lower-cased method -> Operation)
    paths: BTreeMap<String, PathItem>,
    /// Request-body inference rules
    rules: DtoRuleSet,
}

/// All operations for a single path, keyed by lower-cased method
pub type PathItem = BTreeMap<String, Operation>;

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    /// Parameters (query, path, header)
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, Response>,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Parameter location (query, path, header)
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub schema: Schema,
    pub description: String,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub required: bool,
    /// Content types and their schemas
    pub content: BTreeMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    pub content: BTreeMap<String, MediaType>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    pub schemas: IndexMap<String, Schema>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub paths: BTreeMap<String, PathItem>,
    pub components: Components,
}

fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    let mut content = BTreeMap::new();
    content.insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
    content
}

impl OpenApiBuilder {
    /// Create a new OpenApiBuilder with default info and the built-in rule table
    pub fn new() -> Self {
        debug!("Initializing OpenApiBuilder");
        Self {
            info: Info {
                title: "API Documentation".to_string(),
                description: "Auto-generated API documentation".to_string(),
                version: "1.0.0".to_string(),
            },
            paths: BTreeMap::new(),
            rules: DtoRuleSet::default(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, title: &str, description: &str, version: &str) -> Self {
        self.info = Info {
            title: title.to_string(),
            description: description.to_string(),
            version: version.to_string(),
        };
        self
    }

    /// Replace the request-body inference rules
    pub fn with_rules(mut self, rules: DtoRuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Add a route to the document. A later route with the same path and method replaces the
    /// earlier operation.
    pub fn add_route(&mut self, route: &Route, dtos: &IndexMap<String, Dto>) {
        debug!("Adding route: {} {}", route.method, route.path);

        let controller = route.controller_or_default();
        let mut parameters = Vec::new();
        let mut request_body = None;

        if let Some(bundle) = &route.parameters {
            if route.method.accepts_body() {
                request_body = Some(self.request_body(route, dtos));
            }

            parameters.extend(bundle.query.iter().map(|p| Self::parameter(p, "query")));
            parameters.extend(bundle.params.iter().map(|p| Self::parameter(p, "path")));
            parameters.extend(bundle.headers.iter().map(|p| Self::parameter(p, "header")));
        }

        let mut responses = BTreeMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: "Successful operation".to_string(),
                content: json_content(Schema::object("Response data")),
            },
        );

        let operation = Operation {
            tags: vec![controller.to_string()],
            summary: format!("{} {}", route.method, route.path),
            description: format!(
                "Endpoint from {}",
                route.controller.as_deref().unwrap_or("unknown controller")
            ),
            parameters,
            request_body,
            responses,
        };

        self.paths
            .entry(route.path.clone())
            .or_default()
            .insert(route.method.as_str().to_lowercase(), operation);
    }

    /// Add every route of a model.
    pub fn add_model(&mut self, model: &ApiModel) {
        for route in &model.routes {
            self.add_route(route, &model.dtos);
        }
    }

    fn request_body(&self, route: &Route, dtos: &IndexMap<String, Dto>) -> RequestBody {
        let schema = match self.rules.resolve(route, dtos) {
            Some(dto_name) => {
                debug!("{} {} takes body {}", route.method, route.path, dto_name);
                Schema::reference(dto_name)
            }
            None => Schema::object("Request body"),
        };

        RequestBody {
            required: true,
            content: json_content(schema),
        }
    }

    fn parameter(param: &RouteParameter, location: &str) -> Parameter {
        let name = param.display_name().to_string();
        Parameter {
            description: format!("{} {} parameter", name, location),
            name,
            location: location.to_string(),
            required: param.required,
            schema: Schema::primitive(map_type(&param.type_name)),
        }
    }

    /// Build the final OpenAPI document, registering every DTO as a component schema
    pub fn build(self, dtos: &IndexMap<String, Dto>) -> OpenApiDocument {
        debug!("Building final OpenAPI document");

        OpenApiDocument {
            openapi: "3.0.0".to_string(),
            info: self.info,
            paths: self.paths,
            components: Components {
                schemas: dto_schemas(dtos),
            },
        }
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
