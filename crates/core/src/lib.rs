//! MTA Rust ExportDocs Core Library
//!
//! This library turns the exported declarations of TypeScript/JavaScript
//! sources into Markdown reference pages, one page per source file, with deep
//! links back to the hosted repository.
//!
//! # Features
//!
//! - Line-oriented extraction of `export type` blocks and `export function`
//!   headers together with the `/** */` comment preceding them
//! - Titles derived from the first signature line
//! - Markdown fragments with fenced signatures and `[View source]` links
//! - Project discovery from `tsconfig.json` (`include`) and `package.json`
//!   (`homepage`)
//! - Parallel per-file generation with per-file error isolation
//! - Run reports in JSON, YAML or summary form
//!
//! # Example
//!
//! ```no_run
//! use mta_rust_exportdocs_core::{format_output, DocGenerator, DocsConfig, OutputFormat};
//! use std::path::PathBuf;
//!
//! let config = DocsConfig::new(PathBuf::from("."));
//! let generator = DocGenerator::new(config).unwrap();
//! let report = generator.generate().unwrap();
//!
//! println!("{}", format_output(&report, OutputFormat::Summary).unwrap());
//! ```
//!
//! Single sources can be documented without touching the file system:
//!
//! ```
//! use mta_rust_exportdocs_core::{document_source, RepositoryContext};
//!
//! let repo = RepositoryContext::new("https://github.com/acme/widgets");
//! let md = document_source(&repo, "src/id.ts", "export type Id = string;\n");
//! assert!(md.starts_with("## type Id"));
//! ```

pub mod config;
pub mod extractor;
pub mod generator;
pub mod models;
pub mod output;
pub mod renderer;
pub mod title;

// Re-exports for convenience
pub use config::{ConfigError, DocsConfig};
pub use extractor::{extract, Extractor};
pub use generator::{output_path_for, DocGenerator, FileError, GenerateError, SourceFile};
pub use models::*;
pub use output::{format_output, format_summary, FormatError, OutputFormat};
pub use renderer::{document_source, render, render_all};
pub use title::title;
