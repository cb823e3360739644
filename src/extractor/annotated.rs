//! Annotation-aware extraction for decorator-based controllers and DTO classes.
//!
//! Only two kinds of files are read:
//!
//! - controller files (`*.controller.ts`): a class-level `@Controller('base')` annotation plus
//!   per-method verb annotations such as `@Get(':id')`
//! - DTO files (`*.dto.ts`): exported classes whose properties carry validation or schema
//!   annotations
//!
//! # Known boundaries
//!
//! Association between a verb annotation and its handler is positional: the nearest
//! function-like declaration after the annotation wins. Files with one annotation per method in
//! source order are handled correctly; unpaired annotations can be attached to a later handler.
//!
//! DTO properties are scanned across the whole file, so every class declared in the same file
//! receives the same property list.
//!
//! Joined route paths always start with `/`, so `@Controller('users')` and
//! `@Controller('/users')` produce the same path and collapse into one route under
//! `(method, path)` deduplication.

use super::{
    DedupKey, Dto, DtoProperty, HttpMethod, Parameter, Route, RouteExtractor, RouteParameters,
    ScanSession,
};
use crate::source::SourceFile;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

pub const CONTROLLER_SUFFIX: &str = ".controller.ts";
pub const DTO_SUFFIX: &str = ".dto.ts";

/// Annotations marking a property as mandatory.
pub const REQUIRED_ANNOTATIONS: &[&str] = &[
    "MandatoryString",
    "MandatoryNumber",
    "MandatoryBoolean",
    "MandatoryDate",
    "MandatoryArray",
    "MandatoryObject",
    "MandatoryNested",
    "MandatoryEnum",
    "ApiProperty",
    "IsString",
    "IsNumber",
    "IsBoolean",
    "IsDate",
    "IsArray",
    "IsObject",
];

/// Annotations marking a property as optional.
pub const OPTIONAL_ANNOTATIONS: &[&str] = &[
    "OptionalString",
    "OptionalNumber",
    "OptionalBoolean",
    "OptionalDate",
    "OptionalArray",
    "OptionalObject",
    "OptionalNested",
    "OptionalEnum",
    "ApiPropertyOptional",
    "IsOptional",
];

const IDENT: &str = r"[a-zA-Z_$][a-zA-Z0-9_$]*";
const PARAM_TYPE: &str = r"[a-zA-Z_$][a-zA-Z0-9_$<>\[\],\s]*";
// One level of nested parentheses, so decorated parameters like `@Param('id')` stay inside.
const PARAM_LIST: &str = r"\(((?:[^()]|\([^()]*\))*)\)";

static CONTROLLER_BASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@Controller\(['"`]([^'"`]*)['"`]\)"#).unwrap());

static VERB_ANNOTATIONS: Lazy<Vec<(HttpMethod, Regex)>> = Lazy::new(|| {
    HttpMethod::ALL_METHODS
        .iter()
        .map(|method| {
            let source = format!(r#"@{}\(['"]([^'"]*)['"]\)"#, method.annotation_name());
            (*method, Regex::new(&source).unwrap())
        })
        .collect()
});

static ASYNC_RESULT_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:async\s+)?({IDENT})\s*{PARAM_LIST}\s*:\s*Promise<[^>]*>"
    ))
    .unwrap()
});

static TYPED_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:async\s+)?({IDENT})\s*{PARAM_LIST}\s*:\s*([^{{]+)")).unwrap()
});

static BODY_PARAMETER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"@Body\(\)\s+({IDENT})\s*:\s*({PARAM_TYPE})")).unwrap()
});

static QUERY_PARAMETER: Lazy<Regex> = Lazy::new(|| keyed_parameter("Query"));
static PATH_PARAMETER: Lazy<Regex> = Lazy::new(|| keyed_parameter("Param"));
static HEADER_PARAMETER: Lazy<Regex> = Lazy::new(|| keyed_parameter("Headers"));

static EXPORTED_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"export\s+class\s+({IDENT})")).unwrap());

static ANNOTATED_PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"@({IDENT})\s*\([^)]*\)\s*\n\s*({IDENT})\s*:\s*([^;]+)"
    ))
    .unwrap()
});

static ASYNC_RESULT_WRAPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Promise<([^>]*)>").unwrap());

static GENERIC_ARGUMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// `@<annotation>('<key>') name: Type`
fn keyed_parameter(annotation: &str) -> Regex {
    Regex::new(&format!(
        r#"@{annotation}\(['"`]([^'"`]*)['"`]\s*\)\s+({IDENT})\s*:\s*({PARAM_TYPE})"#
    ))
    .unwrap()
}

/// Extractor for decorator-annotated controllers and DTOs.
pub struct AnnotationExtractor;

/// A function-like declaration found after a verb annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// Raw text between the declaration's parentheses
    pub parameter_text: String,
}

impl RouteExtractor for AnnotationExtractor {
    fn name(&self) -> &'static str {
        "AnnotationScanner"
    }

    fn dedup_key(&self) -> DedupKey {
        DedupKey::MethodPath
    }

    fn extract(&self, files: &[SourceFile], session: &mut ScanSession) {
        let controllers: Vec<&SourceFile> = files.iter().filter(|f| is_controller_file(f)).collect();
        let dto_files: Vec<&SourceFile> = files.iter().filter(|f| is_dto_file(f)).collect();

        debug!(
            "Annotation extraction: {} controller files, {} DTO files",
            controllers.len(),
            dto_files.len()
        );

        for file in controllers {
            let routes = extract_controller_routes(file);
            debug!("{}: {} routes", file.relative_path, routes.len());
            for route in routes {
                session.push_route(route);
            }
        }

        for file in dto_files {
            for dto in extract_dtos(file) {
                session.insert_dto(dto);
            }
        }
    }
}

pub fn is_controller_file(file: &SourceFile) -> bool {
    file.file_name().ends_with(CONTROLLER_SUFFIX)
}

pub fn is_dto_file(file: &SourceFile) -> bool {
    file.file_name().ends_with(DTO_SUFFIX)
}

/// Controller name derived from the file name (`users.controller.ts` -> `users`).
pub fn controller_name(file: &SourceFile) -> String {
    let name = file.file_name();
    name.strip_suffix(CONTROLLER_SUFFIX).unwrap_or(name).to_string()
}

/// Base path from the class-level `@Controller('...')` annotation, empty if absent.
pub fn controller_base_path(content: &str) -> String {
    CONTROLLER_BASE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// All routes declared in one controller file.
///
/// Verb annotations are visited verb by verb in [`HttpMethod::ALL_METHODS`] order, and by
/// position within each verb.
pub fn extract_controller_routes(file: &SourceFile) -> Vec<Route> {
    let controller = controller_name(file);
    let base_path = controller_base_path(&file.content);
    let mut routes = Vec::new();

    for (method, annotation) in VERB_ANNOTATIONS.iter() {
        for caps in annotation.captures_iter(&file.content) {
            let (Some(whole), Some(sub_path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let remainder = &file.content[whole.end()..];
            let Some(declaration) = find_declaration(remainder) else {
                debug!(
                    "{}: @{}('{}') has no following declaration",
                    file.relative_path,
                    method.annotation_name(),
                    sub_path.as_str()
                );
                continue;
            };

            let mut route = Route::new(
                *method,
                join_route_path(&base_path, sub_path.as_str()),
                file.relative_path.clone(),
            );
            route.controller = Some(controller.clone());
            route.parameters = Some(classify_parameters(&declaration.parameter_text));
            route.method_name = Some(declaration.name);
            routes.push(route);
        }
    }

    routes
}

/// Find the next function-like declaration in `text`.
///
/// A declaration returning `Promise<...>` anywhere in the text takes precedence over a nearer
/// declaration with any other return type annotation.
pub fn find_declaration(text: &str) -> Option<Declaration> {
    [&*ASYNC_RESULT_DECLARATION, &*TYPED_DECLARATION]
        .iter()
        .find_map(|grammar| grammar.captures(text))
        .and_then(|caps| {
            Some(Declaration {
                name: caps.get(1)?.as_str().to_string(),
                parameter_text: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            })
        })
}

/// Classify a declaration's parameter text into body, query, path and header bindings.
///
/// The four scans are independent; one declaration may feed all of them.
pub fn classify_parameters(parameter_text: &str) -> RouteParameters {
    let body = BODY_PARAMETER.captures(parameter_text).and_then(|caps| {
        Some(Parameter::body(
            caps.get(1)?.as_str(),
            clean_parameter_type(caps.get(2)?.as_str()),
        ))
    });

    RouteParameters {
        body,
        query: keyed_parameters(&QUERY_PARAMETER, parameter_text, false),
        params: keyed_parameters(&PATH_PARAMETER, parameter_text, true),
        headers: keyed_parameters(&HEADER_PARAMETER, parameter_text, false),
    }
}

fn keyed_parameters(regex: &Regex, text: &str, required: bool) -> Vec<Parameter> {
    regex
        .captures_iter(text)
        .filter_map(|caps| {
            Some(Parameter::named(
                caps.get(1)?.as_str(),
                caps.get(2)?.as_str(),
                clean_parameter_type(caps.get(3)?.as_str()),
                required,
            ))
        })
        .collect()
}

/// Normalize a parameter type: unwrap `Promise<T>`, stop at the next parameter, drop generics.
pub fn clean_parameter_type(raw: &str) -> String {
    let unwrapped = ASYNC_RESULT_WRAPPER.replace_all(raw, "$1");

    let mut depth = 0usize;
    let mut end = unwrapped.len();
    for (idx, ch) in unwrapped.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                end = idx;
                break;
            }
            _ => {}
        }
    }

    GENERIC_ARGUMENTS
        .replace_all(&unwrapped[..end], "")
        .trim()
        .to_string()
}

/// Every DTO declared in one DTO file.
///
/// Each exported class receives the property list of the entire file.
pub fn extract_dtos(file: &SourceFile) -> Vec<Dto> {
    let class_names: Vec<String> = EXPORTED_CLASS
        .captures_iter(&file.content)
        .map(|caps| caps[1].to_string())
        .collect();

    if class_names.is_empty() {
        return Vec::new();
    }

    let properties = extract_properties(&file.content);
    if class_names.len() > 1 {
        warn!(
            "{} declares {} classes; each receives all {} properties found in the file",
            file.relative_path,
            class_names.len(),
            properties.len()
        );
    }

    class_names
        .into_iter()
        .map(|name| {
            debug!("DTO {} from {}: {} properties", name, file.relative_path, properties.len());
            Dto {
                name,
                file: file.relative_path.clone(),
                properties: properties.clone(),
            }
        })
        .collect()
}

/// Annotated properties (`@Annotation(args)` then `name: Type` on the next line).
pub fn extract_properties(content: &str) -> Vec<DtoProperty> {
    ANNOTATED_PROPERTY
        .captures_iter(content)
        .map(|caps| {
            let annotation = caps[1].to_string();
            DtoProperty {
                name: caps[2].to_string(),
                type_name: clean_property_type(&caps[3]),
                required: is_required_annotation(&annotation),
                optional: is_optional_annotation(&annotation),
                source_annotation: annotation,
            }
        })
        .collect()
}

pub fn is_required_annotation(annotation: &str) -> bool {
    REQUIRED_ANNOTATIONS.contains(&annotation)
}

pub fn is_optional_annotation(annotation: &str) -> bool {
    OPTIONAL_ANNOTATIONS.contains(&annotation)
}

/// Normalize a property type: space out `|`, drop generic arguments, trim.
pub fn clean_property_type(raw: &str) -> String {
    let spaced = raw.replace('|', " | ");
    GENERIC_ARGUMENTS.replace_all(&spaced, "").trim().to_string()
}

/// Join a controller base path and a handler sub-path into one absolute path.
///
/// Backslashes count as separators, empty and `.` segments are dropped, and two empty parts
/// give `/`.
pub fn join_route_path(base: &str, sub_path: &str) -> String {
    let is_separator = |c: char| c == '/' || c == '\\';
    let mut segments: Vec<&str> = Vec::new();

    for segment in base.split(is_separator).chain(sub_path.split(is_separator)) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}
