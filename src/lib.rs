//! API documentation from backend source - OpenAPI and Markdown docs without running the app.
//!
//! This library scans the source tree of a Node.js/TypeScript backend, recognizes HTTP routes
//! and request DTOs through textual patterns, and synthesizes an OpenAPI 3.0 document, a
//! Markdown reference and a raw JSON dump of the scanned model.
//!
//! # Extraction strategies
//!
//! - **Universal**: a pattern table of `<receiver>.<verb>('<path>')` call shapes for Express,
//!   Fastify and Koa style routers.
//! - **Annotated**: `@Controller` / `@Get` style annotations in `*.controller.ts` files plus
//!   annotated properties in `*.dto.ts` files (NestJS).
//!
//! # Architecture
//!
//! 1. [`detector`] - Identifies the framework from `package.json`
//! 2. [`scanner`] - Finds the source directory and the files a strategy reads
//! 3. [`source`] - Loads files into memory
//! 4. [`extractor`] - Turns file text into routes and DTOs, then deduplicates
//! 5. [`orchestrator`] - Picks the strategy and runs the scan
//! 6. [`schema_generator`] / [`dto_rules`] / [`openapi_builder`] - Build the OpenAPI document
//! 7. [`markdown`] - Renders the Markdown reference
//! 8. [`serializer`] - Writes the artifacts
//! 9. [`generator`] - Runs everything and reports a [`generator::GenerationOutcome`]
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_source::config::{GenerateOptions, OutputFormat};
//! use apidoc_from_source::generator::DocGenerator;
//!
//! let options = GenerateOptions {
//!     format: OutputFormat::Swagger,
//!     ..GenerateOptions::for_project("./my-api")
//! };
//! let outcome = DocGenerator::generate(&options);
//! if let Some(summary) = outcome.summary() {
//!     println!("{} routes, {} DTOs", summary.routes_found, summary.dtos_found);
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod detector;
pub mod dto_rules;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod markdown;
pub mod openapi_builder;
pub mod orchestrator;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod source;
