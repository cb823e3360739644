use crate::config::{GenerateOptions, OutputFormat, ScannerKind};
use crate::detector::Framework;
use crate::dto_rules::DtoRuleSet;
use crate::generator::{list_formats, DocGenerator, GenerationOutcome};
use crate::orchestrator::list_scanners;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// API documentation generator - Scan a backend project and write OpenAPI and Markdown docs
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-source")]
#[command(author, about, long_about = None)]
pub struct CliArgs {
    /// Path to the project directory
    #[arg(value_name = "PROJECT_PATH", default_value = ".")]
    pub project_path: PathBuf,

    /// Framework label (if not specified, detect from package.json)
    #[arg(short = 'w', long = "framework", value_name = "LABEL")]
    pub framework: Option<Framework>,

    /// Extraction strategy (if not specified, chosen from the framework)
    #[arg(short = 's', long = "scanner", value_enum, ignore_case = true)]
    pub scanner: Option<ScannerKind>,

    /// Documentation to generate
    #[arg(short = 'f', long = "format", value_enum, ignore_case = true, default_value = "all")]
    pub format: OutputFormat,

    /// Output directory
    #[arg(short = 'o', long = "out", value_name = "DIR", default_value = "./api-docs")]
    pub out: PathBuf,

    /// Document title
    #[arg(long = "title", default_value = "API Documentation")]
    pub title: String,

    /// Document description
    #[arg(long = "description", default_value = "Auto-generated API documentation")]
    pub description: String,

    /// Document version
    #[arg(long = "version", default_value = "1.0.0")]
    pub version: String,

    /// YAML or JSON file with request-body inference rules (replaces the built-in table)
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Enable debug output
    #[arg(short = 'v', long = "debug", visible_alias = "verbose")]
    pub debug: bool,

    /// List the available scanners and exit
    #[arg(long = "list-scanners")]
    pub list_scanners: bool,

    /// List the available output formats and exit
    #[arg(long = "list-formats")]
    pub list_formats: bool,
}

impl CliArgs {
    fn is_listing(&self) -> bool {
        self.list_scanners || self.list_formats
    }

    /// Generation options for these arguments, loading the rules file if one was given.
    pub fn to_options(&self) -> Result<GenerateOptions> {
        let dto_rules = match &self.rules {
            Some(path) => DtoRuleSet::load(path)
                .with_context(|| format!("Failed to load DTO rules from {}", path.display()))?,
            None => DtoRuleSet::default(),
        };

        Ok(GenerateOptions {
            project_path: self.project_path.clone(),
            framework: self.framework.clone(),
            scanner: self.scanner,
            format: self.format,
            out: self.out.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            debug: self.debug,
            dto_rules,
        })
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.is_listing() {
        return Ok(args);
    }

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {}", args.format);
    info!("Output directory: {}", args.out.display());
    match &args.framework {
        Some(framework) => info!("Framework: {}", framework),
        None => info!("Framework: auto-detect"),
    }
    match &args.scanner {
        Some(scanner) => info!("Scanner: {}", scanner),
        None => info!("Scanner: auto"),
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    if args.list_scanners {
        println!("Available scanners:");
        for scanner in list_scanners() {
            println!("  {:<10} {} - {}", scanner.kind.as_str(), scanner.name, scanner.description);
        }
    }

    if args.list_formats {
        println!("Available formats:");
        for (format, description) in list_formats() {
            println!("  {:<10} {}", format.as_str(), description);
        }
    }

    if args.is_listing() {
        return Ok(());
    }

    let options = args.to_options()?;
    let outcome = DocGenerator::generate(&options);

    match &outcome {
        GenerationOutcome::Success(success) => {
            let summary = &success.summary;
            println!("Documentation generated");
            println!("  Framework:  {}", summary.framework);
            println!("  Scanner:    {}", summary.scanner);
            println!("  Routes:     {}", summary.routes_found);
            println!("  DTOs:       {}", summary.dtos_found);
            println!("  Files:      {}", summary.files_generated);
            for (format, path) in &success.output {
                println!("    {:<9} {}", format, path.display());
            }
            for warning in &success.scan.warnings {
                log::warn!("{}", warning);
            }
            Ok(())
        }
        GenerationOutcome::Failure(failure) => {
            if let Some(stack) = &failure.stack {
                debug!("{}", stack);
            }
            anyhow::bail!("{}", failure.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["apidoc-from-source"]).unwrap();

        assert_eq!(args.project_path, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::All);
        assert_eq!(args.out, PathBuf::from("./api-docs"));
        assert_eq!(args.version, "1.0.0");
        assert!(args.framework.is_none());
        assert!(args.scanner.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::try_parse_from([
            "apidoc-from-source",
            "./api",
            "-w",
            "nestjs",
            "-s",
            "Universal",
            "-f",
            "MARKDOWN",
            "-o",
            "docs",
            "--title",
            "Shop API",
            "--version",
            "2.1.0",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(args.project_path, PathBuf::from("./api"));
        assert_eq!(args.framework, Some(Framework::NestJs));
        assert_eq!(args.scanner, Some(ScannerKind::Universal));
        assert_eq!(args.format, OutputFormat::Markdown);
        assert_eq!(args.out, PathBuf::from("docs"));
        assert_eq!(args.title, "Shop API");
        assert_eq!(args.version, "2.1.0");
        assert!(args.debug);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(CliArgs::try_parse_from(["apidoc-from-source", "-f", "yaml"]).is_err());
    }

    #[test]
    fn test_validation_rejects_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let args = CliArgs::try_parse_from(["apidoc-from-source", missing.to_str().unwrap()]).unwrap();

        let err = parse_args_from_parsed(args).unwrap_err();

        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_listing_skips_path_validation() {
        let args =
            CliArgs::try_parse_from(["apidoc-from-source", "/no/such/dir", "--list-formats"]).unwrap();

        assert!(parse_args_from_parsed(args).is_ok());
    }

    #[test]
    fn test_to_options_loads_rules() {
        let temp_dir = TempDir::new().unwrap();
        let rules = temp_dir.path().join("rules.yaml");
        std::fs::write(&rules, "rules:\n  - path_contains: cart\n    dto: CartDTO\n").unwrap();

        let args = CliArgs::try_parse_from([
            "apidoc-from-source",
            "--rules",
            rules.to_str().unwrap(),
        ])
        .unwrap();
        let options = args.to_options().unwrap();

        assert_eq!(options.dto_rules.rules.len(), 1);
        assert_eq!(options.dto_rules.rules[0].dto, "CartDTO");
    }
}
