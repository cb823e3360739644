//! Top-level documentation generation.
//!
//! [`DocGenerator::generate`] runs scan, synthesis and output writing for one project and
//! reports the result as a [`GenerationOutcome`] instead of an error, so callers always get a
//! serializable answer.

use crate::config::{GenerateOptions, OutputFormat, ScannerKind};
use crate::detector::{Framework, FrameworkDetector};
use crate::openapi_builder::OpenApiBuilder;
use crate::orchestrator::{list_scanners, ScanOrchestrator, ScanReport, ScannerInfo};
use crate::serializer::write_outputs;
use anyhow::{Context, Result};
use log::{debug, error, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Counts reported after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub framework: Framework,
    pub scanner: ScannerKind,
    pub routes_found: usize,
    pub dtos_found: usize,
    pub files_generated: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationSuccess {
    pub success: bool,
    pub scan: ScanReport,
    /// Format name -> written file
    pub output: BTreeMap<String, PathBuf>,
    pub summary: GenerationSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationFailure {
    pub success: bool,
    pub error: String,
    /// Cause chain, only when debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Result of [`DocGenerator::generate`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GenerationOutcome {
    Success(GenerationSuccess),
    Failure(GenerationFailure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    pub fn summary(&self) -> Option<&GenerationSummary> {
        match self {
            GenerationOutcome::Success(success) => Some(&success.summary),
            GenerationOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Success(_) => None,
            GenerationOutcome::Failure(failure) => Some(&failure.error),
        }
    }
}

/// Supported output formats with a short description.
pub fn list_formats() -> Vec<(OutputFormat, &'static str)> {
    OutputFormat::ALL_FORMATS
        .into_iter()
        .map(|format| {
            let description = match format {
                OutputFormat::All => "Every format below",
                OutputFormat::Swagger => "OpenAPI 3.0 document as swagger.json",
                OutputFormat::Markdown => "Human-readable api-documentation.md",
                OutputFormat::Openapi => "OpenAPI 3.0 document as openapi.json",
                OutputFormat::Json => "Raw scan model as api-data.json",
            };
            (format, description)
        })
        .collect()
}

pub struct DocGenerator;

impl DocGenerator {
    /// Scan the project and write the selected documentation.
    ///
    /// Extraction problems are logged and tolerated; a failure to create the output directory
    /// or write an artifact turns the outcome into [`GenerationOutcome::Failure`].
    pub fn generate(options: &GenerateOptions) -> GenerationOutcome {
        match Self::try_generate(options) {
            Ok(success) => GenerationOutcome::Success(success),
            Err(e) => {
                error!("Documentation generation failed: {:#}", e);
                GenerationOutcome::Failure(GenerationFailure {
                    success: false,
                    error: format!("{:#}", e),
                    stack: options.debug.then(|| format!("{:?}", e)),
                })
            }
        }
    }

    fn try_generate(options: &GenerateOptions) -> Result<GenerationSuccess> {
        info!("Generating documentation for {}", options.project_path.display());

        let scan = ScanOrchestrator::new(&options.project_path)
            .scan(options.framework.clone(), options.scanner);

        let mut builder = OpenApiBuilder::new()
            .with_info(&options.title, &options.description, &options.version)
            .with_rules(options.dto_rules.clone());
        builder.add_model(&scan.results);
        let document = builder.build(&scan.results.dtos);
        debug!("Document has {} paths", document.paths.len());

        let output = write_outputs(&options.out, options.format, &scan.results, &document)
            .context("Failed to write documentation")?;

        let summary = GenerationSummary {
            framework: scan.framework.clone(),
            scanner: scan.scanner,
            routes_found: scan.results.routes.len(),
            dtos_found: scan.results.dtos.len(),
            files_generated: output.len(),
        };

        Ok(GenerationSuccess {
            success: true,
            scan,
            output,
            summary,
        })
    }

    /// Swagger output only, default options otherwise.
    pub fn quick_scan(project_path: &Path) -> GenerationOutcome {
        Self::generate(&GenerateOptions {
            format: OutputFormat::Swagger,
            ..GenerateOptions::for_project(project_path)
        })
    }

    /// Every output format, default options otherwise.
    pub fn full_scan(project_path: &Path) -> GenerationOutcome {
        Self::generate(&GenerateOptions {
            format: OutputFormat::All,
            ..GenerateOptions::for_project(project_path)
        })
    }

    pub fn list_formats() -> Vec<(OutputFormat, &'static str)> {
        list_formats()
    }

    pub fn list_scanners() -> Vec<ScannerInfo> {
        list_scanners()
    }

    pub fn detect_framework(project_path: &Path) -> Framework {
        FrameworkDetector::detect(project_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn express_project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), r#"{"dependencies": {"express": "^4"}}"#).unwrap();
        fs::write(
            root.join("app.js"),
            "app.get('/health', ok);\napp.post('/orders/booking', book);\n",
        )
        .unwrap();
        temp_dir
    }

    #[test]
    fn test_generate_success() {
        let project = express_project();
        let out = TempDir::new().unwrap();
        let options = GenerateOptions {
            out: out.path().join("docs"),
            ..GenerateOptions::for_project(project.path())
        };

        let outcome = DocGenerator::generate(&options);

        assert!(outcome.is_success());
        assert_eq!(
            outcome.summary().unwrap(),
            &GenerationSummary {
                framework: Framework::Express,
                scanner: ScannerKind::Universal,
                routes_found: 2,
                dtos_found: 0,
                files_generated: 4,
            }
        );

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["summary"]["routesFound"], 2);
        assert_eq!(value["summary"]["filesGenerated"], 4);
        assert_eq!(value["scan"]["framework"], "express");
        assert!(out.path().join("docs/swagger.json").exists());
    }

    #[test]
    fn test_generate_output_failure() {
        let project = express_project();
        let blocker = project.path().join("blocker");
        fs::write(&blocker, "file in the way").unwrap();

        let options = GenerateOptions {
            out: blocker.join("docs"),
            debug: true,
            ..GenerateOptions::for_project(project.path())
        };

        let outcome = DocGenerator::generate(&options);

        assert!(!outcome.is_success());
        assert!(outcome.error().unwrap().contains("Failed to write documentation"));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["stack"].is_string());
    }

    #[test]
    fn test_failure_without_debug_has_no_stack() {
        let project = express_project();
        let blocker = project.path().join("blocker");
        fs::write(&blocker, "file in the way").unwrap();

        let options = GenerateOptions {
            out: blocker.join("docs"),
            ..GenerateOptions::for_project(project.path())
        };
        let value = serde_json::to_value(DocGenerator::generate(&options)).unwrap();

        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("Failed to write documentation"));
        assert!(value.get("stack").is_none());
    }

    #[test]
    fn test_missing_project_generates_empty_docs() {
        let temp_dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let options = GenerateOptions {
            out: out.path().to_path_buf(),
            ..GenerateOptions::for_project(temp_dir.path().join("missing"))
        };

        let outcome = DocGenerator::generate(&options);

        let summary = outcome.summary().expect("missing project should still succeed");
        assert_eq!(summary.framework, Framework::Generic);
        assert_eq!(summary.routes_found, 0);
        assert_eq!(summary.files_generated, 4);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], true);
        assert!(value["scan"]["warnings"][0].as_str().unwrap().contains("not a directory"));
    }

    #[test]
    fn test_list_formats() {
        let formats: Vec<&str> = DocGenerator::list_formats().iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(formats, vec!["all", "swagger", "markdown", "openapi", "json"]);
    }
}
