//! # Project Records
//!
//! A project record is the metadata an external build step writes for every
//! project it built. Records are read once by the loader and never mutated.
//!
//! Records are stored as `ProjectInfo.json`:
//!
//! ```json
//! {
//!   "projectGuid": "8c5ad0d1-7a6b-4b0e-9d3f-0a4f3b2c1d00",
//!   "projectName": "Core",
//!   "fullPath": "/src/Core/Core.csproj",
//!   "projectType": "Product",
//!   "isExcluded": false,
//!   "files": ["/src/Core/Program.cs"],
//!   "analysisResults": [{ "id": "RoslynReport", "location": "/out/0/roslyn.json" }],
//!   "localSettings": [{ "key": "sonar.exclusions", "value": "**/Generated/**" }],
//!   "globalSettings": []
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Whether a project holds product code or test code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectKind {
    #[default]
    Product,
    Test,
}

/// A free-form `key=value` analysis setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

impl Setting {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Reference to a report produced by an external tool for this project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Result-type tag, e.g. `RoslynReport`
    pub id: String,
    /// Absolute path of the report file
    pub location: PathBuf,
}

/// Per-project metadata produced by the build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Expected to be a GUID; compared as an opaque, case-sensitive token
    #[serde(rename = "projectGuid", default)]
    pub identifier: String,
    #[serde(rename = "projectName", default)]
    pub name: String,
    /// Absolute path of the project file; its parent is the project root
    pub full_path: PathBuf,
    #[serde(rename = "projectType", default)]
    pub kind: ProjectKind,
    #[serde(rename = "isExcluded", default)]
    pub excluded: bool,
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub analysis_results: Vec<AnalysisResult>,
    #[serde(default)]
    pub local_settings: Vec<Setting>,
    #[serde(default)]
    pub global_settings: Vec<Setting>,
}

impl ProjectRecord {
    /// Parse a record from its JSON representation
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Base directory of the project
    pub fn root_path(&self) -> &Path {
        self.full_path.parent().unwrap_or(&self.full_path)
    }

    /// Whether the identifier is a GUID in hyphenated, braced or simple form
    ///
    /// The `urn:uuid:` form is rejected: the identifier is used verbatim as a
    /// key prefix and `:` separates keys from values in the output.
    pub fn has_valid_identifier(&self) -> bool {
        let id = self.identifier.as_str();
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_hexdigit() || matches!(c, '-' | '{' | '}'))
            && Uuid::try_parse(id).is_ok()
    }

    /// Look up a result reference by its tag
    pub fn analysis_result(&self, id: &str) -> Option<&AnalysisResult> {
        self.analysis_results.iter().find(|r| r.id == id)
    }
}
