//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_config(configs::MINIMAL)
//!         .with_project("0", ids::APP, "App", "Product", &["Program.cs"]);
//!     fixture.generate().assert().success();
//! }
//! ```

use assert_cmd::Command;
use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::ids;
    pub use super::TestFixture;
}

/// Common run configuration snippets.
#[allow(dead_code)]
pub mod configs {
    /// Minimal valid configuration.
    pub const MINIMAL: &str = "project_key: acme\n";

    /// Configuration with identity and run-wide settings.
    pub const WITH_SETTINGS: &str = r#"
project_key: acme
project_name: Acme Suite
project_version: "3.2"
settings:
  - key: sonar.host.url
    value: http://localhost:9000
  - key: sonar.projectName
    value: Not Allowed
"#;
}

/// Well-formed project identifiers.
#[allow(dead_code)]
pub mod ids {
    pub const APP: &str = "11111111-1111-1111-1111-111111111111";
    pub const TESTS: &str = "22222222-2222-2222-2222-222222222222";
    pub const LIB: &str = "33333333-3333-3333-3333-333333333333";
}

/// A temporary workspace with a projects directory (`out/`), sources
/// (`src/`) and a working directory (`work/`).
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new fixture with empty `out/`, `src/` and `work/` directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        for dir in ["out", "src", "work"] {
            temp_dir
                .child(dir)
                .create_dir_all()
                .expect("Failed to create fixture directory");
        }
        Self { temp_dir }
    }

    /// Write the run configuration.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("sonar-props.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a project record in `out/<slot>` and create its source files.
    pub fn with_project(
        self,
        slot: &str,
        id: &str,
        name: &str,
        kind: &str,
        files: &[&str],
    ) -> Self {
        self.with_record(slot, id, name, kind, files, serde_json::json!([]))
    }

    /// Add a project record with local settings given as `(key, value)` pairs.
    pub fn with_project_settings(
        self,
        slot: &str,
        id: &str,
        name: &str,
        files: &[&str],
        local: &[(&str, &str)],
    ) -> Self {
        let settings: Vec<_> = local
            .iter()
            .map(|(key, value)| serde_json::json!({ "key": key, "value": value }))
            .collect();
        self.with_record(slot, id, name, "Product", files, serde_json::json!(settings))
    }

    fn with_record(
        self,
        slot: &str,
        id: &str,
        name: &str,
        kind: &str,
        files: &[&str],
        local: serde_json::Value,
    ) -> Self {
        let project_dir = self.src_dir().join(name);
        let files: Vec<PathBuf> = files.iter().map(|f| project_dir.join(f)).collect();
        for file in &files {
            self.temp_dir
                .child(file.strip_prefix(self.path()).expect("file under fixture"))
                .write_str("class C {}")
                .expect("Failed to write source file");
        }
        let record = serde_json::json!({
            "projectGuid": id,
            "projectName": name,
            "fullPath": project_dir.join(format!("{}.csproj", name)),
            "projectType": kind,
            "files": files,
            "localSettings": local,
        });
        self.temp_dir
            .child(format!("out/{}/ProjectInfo.json", slot))
            .write_str(&record.to_string())
            .expect("Failed to write project record");
        self
    }

    /// Add a file relative to the fixture root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn out_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    pub fn src_dir(&self) -> PathBuf {
        self.path().join("src")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.path().join("work")
    }

    /// Path of the generated properties file.
    pub fn artifact(&self) -> PathBuf {
        self.work_dir().join("sonar-project.properties")
    }

    /// Read the generated properties file.
    pub fn read_artifact(&self) -> String {
        std::fs::read_to_string(self.artifact()).expect("Failed to read properties file")
    }

    /// A `generate` command wired to this fixture's directories.
    pub fn generate(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sonar-props");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .arg("generate")
            .arg("--projects-dir")
            .arg(self.out_dir())
            .arg("--config")
            .arg(self.path().join("sonar-props.yaml"))
            .arg("--output")
            .arg(self.work_dir());
        cmd
    }

    /// A `check` command wired to this fixture's directories.
    pub fn check(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sonar-props");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .arg("check")
            .arg("--projects-dir")
            .arg(self.out_dir())
            .arg("--output")
            .arg(self.work_dir());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
