//! # Sonar Properties Library
//!
//! This library turns the per-project analysis records written by a
//! multi-project build into one `sonar-project.properties` file describing
//! what to analyse and how. It is used by the `sonar-props` command-line tool
//! but can be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use sonar_props::config;
//! use sonar_props::filesystem::{FileSystem, MemoryFs};
//! use sonar_props::phases::{phase1, phase2};
//! use std::path::Path;
//!
//! let mut fs = MemoryFs::new();
//! fs.add_file("/src/App/Program.cs", "class Program {}");
//! fs.add_file(
//!     "/out/0/ProjectInfo.json",
//!     r#"{
//!         "projectGuid": "8c5ad0d1-7a6b-4b0e-9d3f-0a4f3b2c1d00",
//!         "projectName": "App",
//!         "fullPath": "/src/App/App.csproj",
//!         "files": ["/src/App/Program.cs"]
//!     }"#,
//! );
//!
//! let records = phase1::execute(&fs, Path::new("/out")).unwrap();
//! let classified = phase2::execute(&fs, &records);
//! assert!(classified[0].is_valid());
//!
//! let run = config::parse("project_key: acme").unwrap();
//! assert_eq!(run.name(), "acme");
//! assert!(fs.is_file(Path::new("/src/App/Program.cs")));
//! ```
//!
//! ## Core Concepts
//!
//! - **Records (`record`)**: The `ProjectInfo.json` metadata the build writes
//!   for each project.
//! - **Run configuration (`config`)**: Analysis identity and run-wide
//!   settings.
//! - **Settings (`settings`)**: Reserved keys, key validity and the single
//!   case-insensitive key comparison.
//! - **Properties (`properties`)**: Value escaping and the sealed output
//!   buffer.
//! - **Phases (`phases`)**: The pipeline itself.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::execute`:
//!
//! 1.  **Load**: Read one record per project directory.
//! 2.  **Classify**: Reject excluded projects, bad or duplicate identifiers,
//!     and projects without analysable files.
//! 3.  **Aggregate**: Reconcile settings declared in several places.
//! 4.  **Pre-flight**: Stop if a properties file already exists.
//! 5.  **Render**: Write the consolidated properties file.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod phases;
pub mod properties;
pub mod record;
pub mod settings;

#[cfg(test)]
mod escape_proptest;
