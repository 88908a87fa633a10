//! # Error Handling
//!
//! This module defines the error type for the `sonar-props` pipeline. It uses
//! the `thiserror` library to describe every condition that aborts a run.
//!
//! Only fatal conditions are represented here:
//!
//! - The projects root directory cannot be enumerated.
//! - The run configuration cannot be read or parsed.
//! - No project records were found, or none of them is usable.
//! - A pre-flight conflict was detected in an output directory.
//!
//! Problems scoped to a single project or a single setting are never turned
//! into an `Error`; they are logged and the offending item is left out of the
//! generated artifact.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sonar-props operations
#[derive(Error, Debug)]
pub enum Error {
    /// The directory holding one sub-directory per project could not be read.
    #[error("Cannot read projects directory '{}': {message}", path.display())]
    RootUnreadable { path: PathBuf, message: String },

    /// The run configuration is malformed.
    ///
    /// Includes an optional hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The run configuration could not be opened, even after retrying.
    #[error("Cannot read configuration '{}' after {attempts} attempt(s): {message}", path.display())]
    ConfigRead {
        path: PathBuf,
        attempts: u32,
        message: String,
    },

    /// The projects directory did not contain a single project record.
    #[error("No analysable projects were found under '{}'", path.display())]
    NoProjects { path: PathBuf },

    /// Records were found but every one of them was rejected.
    #[error("No valid projects to analyse: every project was excluded or invalid")]
    NoValidProjects,

    /// One or more output directories already contain the artifact.
    #[error("A properties file already exists in: {}. Remove it and run again", join_dirs(dirs))]
    PreflightConflict { dirs: Vec<PathBuf> },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
