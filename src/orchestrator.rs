//! Strategy selection and scan execution.
//!
//! The orchestrator decides which extractor runs for a project, collects and reads its files,
//! and hands back a normalized [`ScanReport`].

use crate::config::ScannerKind;
use crate::detector::{framework_info, Framework, FrameworkDetector};
use crate::extractor::annotated::AnnotationExtractor;
use crate::extractor::generic::GenericExtractor;
use crate::extractor::{ApiModel, RouteExtractor, ScanSession};
use crate::scanner::{FileScanner, ANNOTATED_SOURCE_DIRS, GENERIC_SOURCE_DIRS};
use crate::source::SourceReader;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub framework: Framework,
    pub scanner: ScannerKind,
    pub files_scanned: usize,
    pub results: ApiModel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// A registered extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannerInfo {
    pub kind: ScannerKind,
    pub name: &'static str,
    pub description: &'static str,
}

/// Registered strategies.
pub fn list_scanners() -> Vec<ScannerInfo> {
    vec![
        ScannerInfo {
            kind: ScannerKind::Universal,
            name: GenericExtractor::new("").name(),
            description: "Pattern table over call-style routers (Express, Fastify, Koa and similar)",
        },
        ScannerInfo {
            kind: ScannerKind::Annotated,
            name: AnnotationExtractor.name(),
            description: "Controller and DTO annotations with parameter classification (NestJS)",
        },
    ]
}

/// Explicit override wins; otherwise NestJS projects get the annotation-aware strategy.
pub fn select_scanner(framework: &Framework, requested: Option<ScannerKind>) -> ScannerKind {
    match requested {
        Some(kind) => kind,
        None if *framework == Framework::NestJs => ScannerKind::Annotated,
        None => ScannerKind::Universal,
    }
}

pub struct ScanOrchestrator {
    project_root: PathBuf,
}

impl ScanOrchestrator {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Scan the project.
    ///
    /// The framework is detected from the manifest unless given. Nothing here fails: a project
    /// root that is not a directory and unreadable files are reported as warnings, and the
    /// report holds whatever could be extracted.
    pub fn scan(&self, framework: Option<Framework>, scanner: Option<ScannerKind>) -> ScanReport {
        let framework = framework.unwrap_or_else(|| FrameworkDetector::detect(&self.project_root));
        let kind = select_scanner(&framework, scanner);
        let details = framework_info(&framework);
        info!(
            "Framework: {} ({}: {}), scanner: {}",
            framework, details.name, details.description, kind
        );

        let file_scanner = FileScanner::new(self.project_root.clone());
        let (paths, warnings) = match kind {
            _ if !self.project_root.is_dir() => {
                let message =
                    format!("Project path is not a directory: {}", self.project_root.display());
                warn!("{}", message);
                (Vec::new(), vec![message])
            }
            ScannerKind::Universal => {
                let result = file_scanner.scan_sources(GENERIC_SOURCE_DIRS);
                (result.files, result.warnings)
            }
            ScannerKind::Annotated => {
                let result = file_scanner.scan_annotated(ANNOTATED_SOURCE_DIRS);
                let mut paths = result.controllers;
                paths.extend(result.dtos);
                (paths, result.warnings)
            }
        };

        if paths.is_empty() {
            warn!("No source files found in {}", self.project_root.display());
        }

        let files = SourceReader::read_readable(&paths, &self.project_root);
        let extractor: Box<dyn RouteExtractor> = match kind {
            ScannerKind::Universal => Box::new(GenericExtractor::new(framework.label())),
            ScannerKind::Annotated => Box::new(AnnotationExtractor),
        };

        let mut session = ScanSession::new();
        extractor.extract(&files, &mut session);
        debug!(
            "{} collected {} routes and {} DTOs before deduplication",
            extractor.name(),
            session.routes().len(),
            session.dtos().len()
        );

        let results = session.into_model(extractor.dedup_key());
        info!("Found {} routes and {} DTOs", results.routes.len(), results.dtos.len());

        ScanReport {
            framework,
            scanner: kind,
            files_scanned: files.len(),
            results,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::HttpMethod;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_select_scanner() {
        assert_eq!(select_scanner(&Framework::NestJs, None), ScannerKind::Annotated);
        assert_eq!(select_scanner(&Framework::Express, None), ScannerKind::Universal);
        assert_eq!(select_scanner(&Framework::Generic, None), ScannerKind::Universal);
        assert_eq!(
            select_scanner(&Framework::NestJs, Some(ScannerKind::Universal)),
            ScannerKind::Universal
        );
    }

    #[test]
    fn test_list_scanners() {
        let names: Vec<&str> = list_scanners().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["UniversalScanner", "AnnotationScanner"]);
    }

    #[test]
    fn test_scan_express_project() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), r#"{"dependencies": {"express": "^4"}}"#).unwrap();
        fs::create_dir(root.join("routes")).unwrap();
        fs::write(
            root.join("routes/users.js"),
            "const app = require('express')();\napp.get('/users', list);\napp.post('/users', create);\n",
        )
        .unwrap();

        let report = ScanOrchestrator::new(root).scan(None, None);

        assert_eq!(report.framework, Framework::Express);
        assert_eq!(report.scanner, ScannerKind::Universal);
        assert_eq!(report.files_scanned, 1);
        let routes: Vec<(HttpMethod, &str)> = report
            .results
            .routes
            .iter()
            .map(|r| (r.method, r.path.as_str()))
            .collect();
        assert_eq!(routes, vec![(HttpMethod::Get, "/users"), (HttpMethod::Post, "/users")]);
        assert_eq!(report.results.routes[0].file, "routes/users.js");
    }

    #[test]
    fn test_scan_nestjs_project() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), r#"{"dependencies": {"@nestjs/core": "^10"}}"#).unwrap();
        fs::create_dir_all(root.join("src/pets")).unwrap();
        fs::write(
            root.join("src/pets/pets.controller.ts"),
            "@Controller('pets')\nexport class PetsController {\n  @Get(':id')\n  async findOne(@Param('id') id: string): Promise<Pet> {\n    return this.pets.find(id);\n  }\n}\n",
        )
        .unwrap();
        fs::write(
            root.join("src/pets/create-pet.dto.ts"),
            "export class CreatePetDTO {\n  @IsString()\n  name: string;\n}\n",
        )
        .unwrap();

        let report = ScanOrchestrator::new(root).scan(None, None);

        assert_eq!(report.framework, Framework::NestJs);
        assert_eq!(report.scanner, ScannerKind::Annotated);
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.results.routes.len(), 1);
        assert_eq!(report.results.routes[0].path, "/pets/:id");
        assert!(report.results.dtos.contains_key("CreatePetDTO"));
    }

    #[test]
    fn test_scan_missing_project_yields_empty_report() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let report = ScanOrchestrator::new(&missing).scan(None, None);

        assert_eq!(report.framework, Framework::Generic);
        assert_eq!(report.scanner, ScannerKind::Universal);
        assert_eq!(report.files_scanned, 0);
        assert!(report.results.routes.is_empty());
        assert!(report.results.dtos.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("not a directory"));
    }

    #[test]
    fn test_scan_file_as_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("app.js");
        fs::write(&file, "app.get('/users', list);\n").unwrap();

        let report = ScanOrchestrator::new(&file).scan(None, Some(ScannerKind::Annotated));

        assert_eq!(report.scanner, ScannerKind::Annotated);
        assert!(report.results.routes.is_empty());
        assert!(!report.warnings.is_empty());
    }
}
