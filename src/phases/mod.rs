//! Implementation of the phases of the properties generation pipeline.
//!
//! ## Overview
//!
//! 1. Load - Read one project record per sub-directory of the projects root
//! 2. Classify - Decide which records are usable and which files they analyse
//! 3. Aggregate - Resolve run-wide and per-project settings
//! 4. Pre-flight - Refuse to run if a properties file already exists
//! 5. Render - Write the consolidated properties text
//!
//! Phases run sequentially on one thread. Each phase depends only on the
//! output of earlier phases and the foundation modules.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::record::ProjectRecord;

// Phase modules
pub mod aggregate;
pub mod classify;
pub mod load;
pub mod orchestrator;
pub mod preflight;
pub mod render;

// Re-export phase modules by position in the pipeline
pub use aggregate as phase3;
pub use classify as phase2;
pub use load as phase1;
pub use preflight as phase4;
pub use render as phase5;

/// Outcome of classifying one project record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    ExcludedByFlag,
    InvalidIdentifier,
    DuplicateIdentifier,
    NoAnalyzableFiles,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::ExcludedByFlag => "excluded",
            ValidationStatus::InvalidIdentifier => "invalid identifier",
            ValidationStatus::DuplicateIdentifier => "duplicate identifier",
            ValidationStatus::NoAnalyzableFiles => "no analysable files",
        };
        f.write_str(text)
    }
}

/// A record together with its classification
#[derive(Debug, Clone)]
pub struct ClassifiedProject<'a> {
    pub record: &'a ProjectRecord,
    pub status: ValidationStatus,
    /// Analysable files; empty unless `status` is `Valid`
    pub files: Vec<PathBuf>,
}

impl ClassifiedProject<'_> {
    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}
