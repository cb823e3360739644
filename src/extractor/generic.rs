use super::patterns::pattern_table;
use super::{DedupKey, HttpMethod, Route, RouteExtractor, ScanSession};
use crate::source::SourceFile;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static PATH_PARAMETER: Lazy<Regex> = Lazy::new(|| Regex::new(r":([^/]+)").unwrap());

/// Pattern-table route extractor for frameworks without a richer model.
///
/// Every match of every table pattern anywhere in a file becomes one route; there is no notion
/// of scopes or nesting, so calls inside comments or dead code are reported too.
pub struct GenericExtractor {
    /// Framework label reported by detection; informational only
    framework_hint: String,
}

impl GenericExtractor {
    pub fn new(framework_hint: &str) -> Self {
        Self {
            framework_hint: framework_hint.to_string(),
        }
    }

    /// Extract routes from one file's text.
    pub fn parse_routes(content: &str, file: &str) -> Vec<Route> {
        let framework = detect_framework_from_content(content);
        let mut routes = Vec::new();

        for pattern in pattern_table() {
            for caps in pattern.regex.captures_iter(content) {
                let method = caps
                    .get(1)
                    .and_then(|m| HttpMethod::from_name(m.as_str()))
                    .unwrap_or(HttpMethod::Get);
                let path = caps
                    .get(2)
                    .map(|m| m.as_str())
                    .filter(|p| !p.is_empty())
                    .unwrap_or("/");

                debug!(
                    "{}: {} {} via {} pattern {}",
                    file,
                    method,
                    path,
                    pattern.dialect.label(),
                    pattern.shape
                );

                let mut route = Route::new(method, path.to_string(), file.to_string());
                route.framework = Some(framework.to_string());
                routes.push(route);
            }
        }

        routes
    }
}

impl RouteExtractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "UniversalScanner"
    }

    fn dedup_key(&self) -> DedupKey {
        DedupKey::MethodPathFile
    }

    fn extract(&self, files: &[SourceFile], session: &mut ScanSession) {
        debug!(
            "Generic extraction over {} files (framework hint: {})",
            files.len(),
            self.framework_hint
        );

        for file in files {
            let routes = Self::parse_routes(&file.content, &file.relative_path);
            debug!("{}: {} route matches", file.relative_path, routes.len());
            session.extend_routes(routes);
        }
    }
}

/// Guess the framework from file content alone.
pub fn detect_framework_from_content(content: &str) -> &'static str {
    if content.contains("@Controller") || content.contains("@Get") || content.contains("@Post") {
        return "nestjs";
    }
    if content.contains("express") || content.contains("app.get") || content.contains("app.post") {
        return "express";
    }
    if content.contains("fastify") {
        return "fastify";
    }
    if content.contains("koa") || content.contains("router.get") || content.contains("router.post") {
        return "koa";
    }
    "unknown"
}

/// Names of the `:name` placeholders in a path template, in order.
pub fn path_parameters(path: &str) -> Vec<String> {
    PATH_PARAMETER
        .captures_iter(path)
        .map(|caps| caps[1].to_string())
        .collect()
}
