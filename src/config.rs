use crate::detector::Framework;
use crate::dto_rules::DtoRuleSet;
use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which artifacts a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    All,
    Swagger,
    Markdown,
    Openapi,
    Json,
}

impl OutputFormat {
    pub const ALL_FORMATS: [OutputFormat; 5] = [
        OutputFormat::All,
        OutputFormat::Swagger,
        OutputFormat::Markdown,
        OutputFormat::Openapi,
        OutputFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::All => "all",
            OutputFormat::Swagger => "swagger",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Openapi => "openapi",
            OutputFormat::Json => "json",
        }
    }

    /// Whether this selection produces the `target` artifact.
    pub fn includes(&self, target: OutputFormat) -> bool {
        *self == OutputFormat::All || *self == target
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL_FORMATS
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown format '{}', expected one of: all, swagger, markdown, openapi, json",
                    s
                ))
            })
    }
}

/// Extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    /// Pattern-table extractor for call-style routers
    Universal,
    /// Annotation-aware extractor for controller and DTO files
    Annotated,
}

impl ScannerKind {
    pub const ALL_SCANNERS: [ScannerKind; 2] = [ScannerKind::Universal, ScannerKind::Annotated];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScannerKind::Universal => "universal",
            ScannerKind::Annotated => "annotated",
        }
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScannerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScannerKind::ALL_SCANNERS
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown scanner '{}', expected universal or annotated",
                    s
                ))
            })
    }
}

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub project_path: PathBuf,
    /// Framework override; detected from the manifest when `None`
    pub framework: Option<Framework>,
    /// Scanner override; chosen from the framework when `None`
    pub scanner: Option<ScannerKind>,
    pub format: OutputFormat,
    pub out: PathBuf,
    pub title: String,
    pub description: String,
    pub version: String,
    pub debug: bool,
    pub dto_rules: DtoRuleSet,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            project_path: PathBuf::from("."),
            framework: None,
            scanner: None,
            format: OutputFormat::All,
            out: PathBuf::from("./api-docs"),
            title: "API Documentation".to_string(),
            description: "Auto-generated API documentation".to_string(),
            version: "1.0.0".to_string(),
            debug: false,
            dto_rules: DtoRuleSet::default(),
        }
    }
}

impl GenerateOptions {
    pub fn for_project(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            ..Default::default()
        }
    }
}
