//! Serialization and output writing.
//!
//! This module turns the synthesized artifacts into files: the OpenAPI document as
//! `swagger.json` / `openapi.json`, the Markdown rendering as `api-documentation.md` and the raw
//! model as `api-data.json`.

use crate::config::OutputFormat;
use crate::error::{Error, Result};
use crate::extractor::ApiModel;
use crate::markdown::render_markdown;
use crate::openapi_builder::OpenApiDocument;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SWAGGER_FILE: &str = "swagger.json";
pub const MARKDOWN_FILE: &str = "api-documentation.md";
pub const OPENAPI_FILE: &str = "openapi.json";
pub const DATA_FILE: &str = "api-data.json";

/// Serializes a value to pretty-printed JSON.
///
/// Used for the OpenAPI document as well as the raw model dump.
pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    debug!("Serializing to JSON");
    Ok(serde_json::to_string_pretty(value)?)
}

/// Creates the output directory if it is missing; an existing directory is left alone.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes string content to a file, creating or overwriting it.
///
/// Parent directories are not created here; see [`ensure_output_dir`].
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    fs::write(path, content).map_err(|source| Error::WriteError {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Writes every artifact the format selects into `out_dir`.
///
/// Returns a map of format name to written path. The Markdown rendering takes its title and
/// description from the document's info block.
pub fn write_outputs(
    out_dir: &Path,
    format: OutputFormat,
    model: &ApiModel,
    document: &OpenApiDocument,
) -> Result<BTreeMap<String, PathBuf>> {
    ensure_output_dir(out_dir)?;

    let mut written = BTreeMap::new();

    if format.includes(OutputFormat::Swagger) {
        let path = out_dir.join(SWAGGER_FILE);
        write_to_file(&serialize_json(document)?, &path)?;
        written.insert(OutputFormat::Swagger.to_string(), path);
    }

    if format.includes(OutputFormat::Markdown) {
        let path = out_dir.join(MARKDOWN_FILE);
        let markdown = render_markdown(model, &document.info.title, &document.info.description);
        write_to_file(&markdown, &path)?;
        written.insert(OutputFormat::Markdown.to_string(), path);
    }

    if format.includes(OutputFormat::Openapi) {
        let path = out_dir.join(OPENAPI_FILE);
        write_to_file(&serialize_json(document)?, &path)?;
        written.insert(OutputFormat::Openapi.to_string(), path);
    }

    if format.includes(OutputFormat::Json) {
        let path = out_dir.join(DATA_FILE);
        write_to_file(&serialize_json(model)?, &path)?;
        written.insert(OutputFormat::Json.to_string(), path);
    }

    info!("Wrote {} file(s) to {}", written.len(), out_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{HttpMethod, Route};
    use crate::openapi_builder::OpenApiBuilder;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_model() -> ApiModel {
        let mut route = Route::new(HttpMethod::Get, "/users".to_string(), "src/app.js".to_string());
        route.framework = Some("express".to_string());
        ApiModel {
            routes: vec![route],
            dtos: Default::default(),
        }
    }

    fn create_test_document(model: &ApiModel) -> OpenApiDocument {
        let mut builder = OpenApiBuilder::new().with_info("Test API", "A test API", "2.0.0");
        builder.add_model(model);
        builder.build(&model.dtos)
    }

    #[test]
    fn test_serialize_json() {
        let model = create_test_model();
        let json = serialize_json(&create_test_document(&model)).unwrap();

        assert!(json.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["openapi"], "3.0.0");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert!(parsed["paths"]["/users"]["get"].is_object());
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.json");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("missing").join("test.json");

        let result = write_to_file("content", &file_path);

        assert!(matches!(result, Err(Error::WriteError { .. })));
    }

    #[test]
    fn test_ensure_output_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("docs").join("api");

        ensure_output_dir(&out).unwrap();
        ensure_output_dir(&out).unwrap();

        assert!(out.is_dir());
    }

    #[test]
    fn test_ensure_output_dir_over_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = ensure_output_dir(&blocker.join("out"));

        assert!(matches!(result, Err(Error::OutputDirectory { .. })));
    }

    #[test]
    fn test_write_all_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let model = create_test_model();
        let document = create_test_document(&model);

        let written = write_outputs(temp_dir.path(), OutputFormat::All, &model, &document).unwrap();

        let keys: Vec<&str> = written.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["json", "markdown", "openapi", "swagger"]);
        for path in written.values() {
            assert!(path.exists(), "{} should exist", path.display());
        }

        let swagger = fs::read_to_string(temp_dir.path().join(SWAGGER_FILE)).unwrap();
        let openapi = fs::read_to_string(temp_dir.path().join(OPENAPI_FILE)).unwrap();
        assert_eq!(swagger, openapi);

        let markdown = fs::read_to_string(temp_dir.path().join(MARKDOWN_FILE)).unwrap();
        assert!(markdown.starts_with("# Test API\n\nA test API\n\n"));

        let data: ApiModel =
            serde_json::from_str(&fs::read_to_string(temp_dir.path().join(DATA_FILE)).unwrap()).unwrap();
        assert_eq!(data, model);
    }

    #[test]
    fn test_write_single_format() {
        let temp_dir = TempDir::new().unwrap();
        let model = create_test_model();
        let document = create_test_document(&model);

        let written = write_outputs(temp_dir.path(), OutputFormat::Markdown, &model, &document).unwrap();

        assert_eq!(written.len(), 1);
        assert!(temp_dir.path().join(MARKDOWN_FILE).exists());
        assert!(!temp_dir.path().join(SWAGGER_FILE).exists());
    }
}
