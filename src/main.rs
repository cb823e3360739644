//! API documentation generator - Command-line tool for documenting backend projects.
//!
//! Scans a Node.js/TypeScript backend for routes and DTOs and writes an OpenAPI document, a
//! Markdown reference and a raw JSON dump of what was found.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-source [OPTIONS] [PROJECT_PATH]
//! ```
//!
//! # Examples
//!
//! Generate every format into `./api-docs`:
//! ```bash
//! apidoc-from-source ./my-api
//! ```
//!
//! Only the Markdown reference, forcing the annotation-aware scanner:
//! ```bash
//! apidoc-from-source ./my-api -f markdown -s annotated -o docs
//! ```
//!
//! Enable debug logging:
//! ```bash
//! apidoc-from-source ./my-api -v
//! ```

use anyhow::Result;
use apidoc_from_source::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once so the debug flag can configure the logger before validation logs anything
    let parsed = cli::CliArgs::parse();

    let log_level = if parsed.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API documentation generator starting...");

    let args = cli::parse_args_from_parsed(parsed)?;
    cli::run(args)?;

    Ok(())
}
