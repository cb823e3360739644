//! Route and DTO extraction from raw source text.
//!
//! This module defines the model shared by every extraction strategy and the
//! [`RouteExtractor`] trait that the strategies implement.
//!
//! # Strategies
//!
//! - **Generic**: See [`generic::GenericExtractor`]. Applies the [`patterns`] table to every
//!   source file and yields minimal routes (method, path, file).
//! - **Annotation-aware**: See [`annotated::AnnotationExtractor`]. Reads controller-like and
//!   DTO-like files and yields routes with classified parameters plus DTO descriptors.
//!
//! Extractors never own the results. They append to a [`ScanSession`] that the caller creates
//! for one scan and turns into an [`ApiModel`] afterwards.
//!
//! # Example
//!
//! ```no_run
//! use apidoc_from_source::extractor::{RouteExtractor, ScanSession, generic::GenericExtractor};
//! use apidoc_from_source::source::SourceReader;
//! use std::path::Path;
//!
//! let root = Path::new("./my-api");
//! let file = SourceReader::read_file(&root.join("src/app.js"), root).unwrap();
//! let extractor = GenericExtractor::new("express");
//! let mut session = ScanSession::new();
//! extractor.extract(&[file], &mut session);
//! let model = session.into_model(extractor.dedup_key());
//! println!("Found {} routes", model.routes.len());
//! ```

pub mod annotated;
pub mod dedup;
pub mod generic;
pub mod patterns;

use crate::source::SourceFile;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use dedup::{dedup_routes, DedupKey};

/// Trait for extracting routes (and possibly DTOs) from loaded source files.
pub trait RouteExtractor {
    /// Short strategy name used in reports and logs.
    fn name(&self) -> &'static str;

    /// Key this strategy deduplicates its routes by.
    fn dedup_key(&self) -> DedupKey;

    /// Appends every route and DTO found in `files` to the session.
    fn extract(&self, files: &[SourceFile], session: &mut ScanSession);
}

/// HTTP methods recognized by the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    /// Matches every method (`@All`)
    All,
}

impl HttpMethod {
    /// Every method, in annotation scan order.
    pub const ALL_METHODS: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::All,
    ];

    /// Parse a method name case-insensitively (`get`, `Get`, `GET`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "all" => Some(HttpMethod::All),
            _ => None,
        }
    }

    /// Upper-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::All => "ALL",
        }
    }

    /// Annotation spelling used by decorator-based controllers (`Get`, `Post`, ...)
    pub fn annotation_name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Get",
            HttpMethod::Post => "Post",
            HttpMethod::Put => "Put",
            HttpMethod::Delete => "Delete",
            HttpMethod::Patch => "Patch",
            HttpMethod::Options => "Options",
            HttpMethod::Head => "Head",
            HttpMethod::All => "All",
        }
    }

    /// Whether operations with this method carry a request body.
    pub fn accepts_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One argument binding of a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Wire-level name (query key, path segment, header name). `None` for body parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name of the bound variable in the handler signature
    #[serde(rename = "paramName")]
    pub param_name: String,
    /// Normalized type string
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub optional: bool,
}

impl Parameter {
    /// A parameter bound from a named request location (query, path, header).
    pub fn named(name: &str, param_name: &str, type_name: String, required: bool) -> Self {
        Self {
            name: Some(name.to_string()),
            param_name: param_name.to_string(),
            type_name,
            required,
            optional: false,
        }
    }

    /// A parameter bound from the request body.
    pub fn body(param_name: &str, type_name: String) -> Self {
        Self {
            name: None,
            param_name: param_name.to_string(),
            type_name,
            required: true,
            optional: false,
        }
    }

    /// Name shown in documentation: the wire name, or the variable for body bindings.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.param_name)
    }
}

/// Classified parameter bundle of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Parameter>,
    pub query: Vec<Parameter>,
    pub params: Vec<Parameter>,
    pub headers: Vec<Parameter>,
}

impl RouteParameters {
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.query.is_empty() && self.params.is_empty() && self.headers.is_empty()
    }
}

/// One observed HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub method: HttpMethod,
    /// Path template with `/` separators, e.g. `/users/:id`
    pub path: String,
    /// Owning controller, `None` for ungrouped routes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    /// Origin file relative to the project root
    pub file: String,
    #[serde(rename = "methodName", skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    /// Classified parameters; absent for routes from the generic extractor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<RouteParameters>,
    /// Framework label sniffed from the file content (generic extractor only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

impl Route {
    /// Create a route with only the mandatory fields set
    pub fn new(method: HttpMethod, path: String, file: String) -> Self {
        Self {
            method,
            path,
            controller: None,
            file,
            method_name: None,
            parameters: None,
            framework: None,
        }
    }

    /// Controller name or the `default` group
    pub fn controller_or_default(&self) -> &str {
        self.controller.as_deref().unwrap_or("default")
    }
}

/// One property of a DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub optional: bool,
    /// Name of the annotation that preceded the property
    #[serde(rename = "sourceAnnotation")]
    pub source_annotation: String,
}

/// A named data-shape descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dto {
    pub name: String,
    pub file: String,
    pub properties: Vec<DtoProperty>,
}

/// Normalized result of a scan: routes plus DTOs keyed by name in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiModel {
    pub routes: Vec<Route>,
    pub dtos: IndexMap<String, Dto>,
}

/// Accumulator for a single scan.
///
/// Extractors push into the session; nothing is shared between sessions, so one extractor
/// value can serve any number of scans.
#[derive(Debug, Default)]
pub struct ScanSession {
    routes: Vec<Route>,
    dtos: IndexMap<String, Dto>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn extend_routes(&mut self, routes: impl IntoIterator<Item = Route>) {
        self.routes.extend(routes);
    }

    /// Register a DTO. A later DTO with the same name replaces the earlier one in place.
    pub fn insert_dto(&mut self, dto: Dto) {
        if let Some(previous) = self.dtos.insert(dto.name.clone(), dto) {
            log::debug!("DTO {} from {} replaced by a later declaration", previous.name, previous.file);
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn dtos(&self) -> &IndexMap<String, Dto> {
        &self.dtos
    }

    /// Deduplicate the collected routes and hand over the model.
    pub fn into_model(self, key: DedupKey) -> ApiModel {
        ApiModel {
            routes: dedup_routes(self.routes, key),
            dtos: self.dtos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_from_name_is_case_insensitive() {
        assert_eq!(HttpMethod::from_name("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_name("Delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::from_name("ALL"), Some(HttpMethod::All));
        assert_eq!(HttpMethod::from_name("trace"), None);
    }

    #[test]
    fn test_http_method_serializes_upper_case() {
        let json = serde_json::to_string(&HttpMethod::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
    }

    #[test]
    fn test_accepts_body() {
        assert!(HttpMethod::Post.accepts_body());
        assert!(HttpMethod::Put.accepts_body());
        assert!(HttpMethod::Patch.accepts_body());
        assert!(!HttpMethod::Get.accepts_body());
        assert!(!HttpMethod::All.accepts_body());
    }

    #[test]
    fn test_session_dto_last_writer_wins() {
        let mut session = ScanSession::new();
        session.insert_dto(Dto {
            name: "UserDTO".to_string(),
            file: "a.dto.ts".to_string(),
            properties: vec![],
        });
        session.insert_dto(Dto {
            name: "UserDTO".to_string(),
            file: "b.dto.ts".to_string(),
            properties: vec![],
        });

        assert_eq!(session.dtos().len(), 1);
        assert_eq!(session.dtos()["UserDTO"].file, "b.dto.ts");
    }

    #[test]
    fn test_session_dtos_keep_first_seen_order() {
        let mut session = ScanSession::new();
        for (name, file) in [("ZoneDTO", "a.dto.ts"), ("AddressDTO", "b.dto.ts"), ("ZoneDTO", "c.dto.ts")] {
            session.insert_dto(Dto {
                name: name.to_string(),
                file: file.to_string(),
                properties: vec![],
            });
        }

        let model = session.into_model(DedupKey::MethodPath);

        let names: Vec<&str> = model.dtos.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["ZoneDTO", "AddressDTO"]);
        assert_eq!(model.dtos["ZoneDTO"].file, "c.dto.ts");
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.find("ZoneDTO").unwrap() < json.find("AddressDTO").unwrap());
    }

    #[test]
    fn test_route_serialization_skips_absent_fields() {
        let route = Route::new(HttpMethod::Get, "/health".to_string(), "src/app.js".to_string());
        let value = serde_json::to_value(&route).unwrap();

        assert_eq!(value["method"], "GET");
        assert_eq!(value["path"], "/health");
        assert!(value.get("controller").is_none());
        assert!(value.get("parameters").is_none());
        assert!(value.get("methodName").is_none());
    }
}
