//! Phase 4: Pre-flight Check
//!
//! Before anything is written, make sure no directory that takes part in
//! the analysis already holds a `sonar-project.properties`. A user-authored
//! file there would either be overwritten or conflict with the generated
//! one.
//!
//! The check and the later write are not atomic. Another process creating
//! the file in between is not detected.

use log::error;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filesystem::FileSystem;

/// Name of the generated artifact
pub const ARTIFACT_FILE_NAME: &str = "sonar-project.properties";

/// Directories among `working_dir` and `project_roots` that already contain
/// the artifact, in the order given and without repeats
pub fn conflicts(
    fs: &dyn FileSystem,
    working_dir: &Path,
    project_roots: &[&Path],
) -> Vec<PathBuf> {
    let mut checked: Vec<&Path> = Vec::new();
    let mut found = Vec::new();
    for dir in std::iter::once(working_dir).chain(project_roots.iter().copied()) {
        if checked.contains(&dir) {
            continue;
        }
        checked.push(dir);
        if fs.is_file(&dir.join(ARTIFACT_FILE_NAME)) {
            found.push(dir.to_path_buf());
        }
    }
    found
}

/// Execute Phase 4: Fail if any target directory already has the artifact
pub fn execute(fs: &dyn FileSystem, working_dir: &Path, project_roots: &[&Path]) -> Result<()> {
    let dirs = conflicts(fs, working_dir, project_roots);
    if dirs.is_empty() {
        return Ok(());
    }
    for dir in &dirs {
        error!(
            "'{}' already contains a {} file",
            dir.display(),
            ARTIFACT_FILE_NAME
        );
    }
    Err(Error::PreflightConflict { dirs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFs;

    #[test]
    fn test_phase4_no_conflicts() {
        let mut fs = MemoryFs::new();
        fs.add_file("/src/A/a.cs", "");
        assert!(execute(&fs, Path::new("/work"), &[Path::new("/src/A")]).is_ok());
    }

    #[test]
    fn test_phase4_reports_every_conflict() {
        let mut fs = MemoryFs::new();
        fs.add_file("/work/sonar-project.properties", "");
        fs.add_file("/src/B/sonar-project.properties", "");

        let err = execute(
            &fs,
            Path::new("/work"),
            &[Path::new("/src/A"), Path::new("/src/B")],
        )
        .unwrap_err();

        match err {
            Error::PreflightConflict { dirs } => assert_eq!(
                dirs,
                vec![PathBuf::from("/work"), PathBuf::from("/src/B")]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_phase4_same_dir_reported_once() {
        let mut fs = MemoryFs::new();
        fs.add_file("/src/A/sonar-project.properties", "");

        let found = conflicts(
            &fs,
            Path::new("/src/A"),
            &[Path::new("/src/A"), Path::new("/src/A")],
        );
        assert_eq!(found, vec![PathBuf::from("/src/A")]);
    }

    #[test]
    fn test_phase4_other_file_names_ignored() {
        let mut fs = MemoryFs::new();
        fs.add_file("/work/sonar-project.properties.bak", "");
        assert!(conflicts(&fs, Path::new("/work"), &[]).is_empty());
    }
}
