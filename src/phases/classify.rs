//! Phase 2: Classifying Projects
//!
//! Each record gets exactly one `ValidationStatus`, decided against the whole
//! record set. The checks apply in order and the first match wins:
//!
//! 1. The build marked the project as excluded.
//! 2. The identifier is missing or is not a GUID.
//! 3. Another non-excluded record has the same identifier. Every record
//!    sharing that identifier is rejected, not just the later ones.
//! 4. None of the project's files is analysable.
//!
//! Anything left is `Valid`.
//!
//! A file is analysable when it still exists and its directory is the
//! project root or lies below it. The comparison is done on lexically
//! normalized paths, ignoring case, and only matches at a path separator
//! boundary so that `/src/App2` is not treated as being under `/src/App`.

use log::{info, warn};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use super::{ClassifiedProject, ValidationStatus};
use crate::filesystem::FileSystem;
use crate::record::ProjectRecord;

/// Execute Phase 2: Classify every record
///
/// The result has one entry per record, in input order.
pub fn execute<'a>(
    fs: &dyn FileSystem,
    records: &'a [ProjectRecord],
) -> Vec<ClassifiedProject<'a>> {
    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if !record.excluded && record.has_valid_identifier() {
            *id_counts.entry(record.identifier.as_str()).or_default() += 1;
        }
    }

    records
        .iter()
        .map(|record| {
            let (status, files) = if record.excluded {
                (ValidationStatus::ExcludedByFlag, Vec::new())
            } else if !record.has_valid_identifier() {
                (ValidationStatus::InvalidIdentifier, Vec::new())
            } else if id_counts.get(record.identifier.as_str()).copied().unwrap_or(0) > 1 {
                (ValidationStatus::DuplicateIdentifier, Vec::new())
            } else {
                let files = analyzable_files(fs, record);
                if files.is_empty() {
                    (ValidationStatus::NoAnalyzableFiles, files)
                } else {
                    (ValidationStatus::Valid, files)
                }
            };
            report(record, status);
            ClassifiedProject {
                record,
                status,
                files,
            }
        })
        .collect()
}

fn report(record: &ProjectRecord, status: ValidationStatus) {
    let path = record.full_path.display();
    match status {
        ValidationStatus::Valid => {}
        ValidationStatus::ExcludedByFlag => {
            info!("The project '{}' is excluded from analysis", path)
        }
        ValidationStatus::InvalidIdentifier => warn!(
            "The project '{}' does not have a valid project identifier ('{}') and will not be analysed",
            path, record.identifier
        ),
        ValidationStatus::DuplicateIdentifier => warn!(
            "The project '{}' shares its identifier '{}' with another project and will not be analysed",
            path, record.identifier
        ),
        ValidationStatus::NoAnalyzableFiles => {
            info!("The project '{}' has no files to analyse and will be skipped", path)
        }
    }
}

/// Files of `record` that exist and live under the project root, in order
///
/// Every dropped file is reported with a warning.
pub fn analyzable_files(fs: &dyn FileSystem, record: &ProjectRecord) -> Vec<PathBuf> {
    let root = record.root_path();
    let mut kept = Vec::new();
    for file in &record.files {
        if !fs.is_file(file) {
            warn!(
                "The file '{}' of project '{}' no longer exists and will not be analysed",
                file.display(),
                record.full_path.display()
            );
        } else if !is_under_root(file, root) {
            warn!(
                "The file '{}' is outside the root of project '{}' and will not be analysed",
                file.display(),
                record.full_path.display()
            );
        } else {
            kept.push(file.clone());
        }
    }
    kept
}

/// Whether the directory containing `file` is `root` or below it
pub fn is_under_root(file: &Path, root: &Path) -> bool {
    let Some(dir) = file.parent() else {
        return false;
    };
    let dir = normalize(dir);
    let root = normalize(root);
    let root = root.trim_end_matches('/');
    dir == root || dir.starts_with(&format!("{}/", root))
}

/// Lexically normalized, lower-cased path with `/` separators
fn normalize(path: &Path) -> String {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }
    let joined: PathBuf = parts.iter().collect();
    joined.to_string_lossy().replace('\\', "/").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFs;
    use crate::record::test_support::record;
    use log::Level;

    const ID_A: &str = "11111111-1111-1111-1111-111111111111";
    const ID_B: &str = "22222222-2222-2222-2222-222222222222";

    fn fs_with(files: &[&str]) -> MemoryFs {
        let mut fs = MemoryFs::new();
        for f in files {
            fs.add_file(f, "");
        }
        fs
    }

    fn statuses(classified: &[ClassifiedProject<'_>]) -> Vec<ValidationStatus> {
        classified.iter().map(|c| c.status).collect()
    }

    #[test]
    fn test_phase2_valid_project() {
        let fs = fs_with(&["/src/A/a.cs"]);
        let records = vec![record(ID_A, "/src/A", &["/src/A/a.cs"])];

        let classified = execute(&fs, &records);
        assert_eq!(statuses(&classified), vec![ValidationStatus::Valid]);
        assert_eq!(classified[0].files, vec![PathBuf::from("/src/A/a.cs")]);
        assert!(classified[0].is_valid());
    }

    #[test]
    fn test_phase2_excluded_takes_precedence() {
        let fs = MemoryFs::new();
        let mut excluded = record("", "/src/A", &[]);
        excluded.excluded = true;

        assert_eq!(
            statuses(&execute(&fs, &[excluded])),
            vec![ValidationStatus::ExcludedByFlag]
        );
    }

    #[test]
    fn test_phase2_invalid_identifier() {
        let fs = fs_with(&["/src/A/a.cs"]);
        let records = vec![
            record("", "/src/A", &["/src/A/a.cs"]),
            record("not-a-guid", "/src/A", &["/src/A/a.cs"]),
        ];

        assert_eq!(
            statuses(&execute(&fs, &records)),
            vec![
                ValidationStatus::InvalidIdentifier,
                ValidationStatus::InvalidIdentifier
            ]
        );
    }

    #[test]
    fn test_phase2_urn_identifier_is_invalid() {
        let fs = fs_with(&["/src/A/a.cs"]);
        let records = vec![record(
            "urn:uuid:11111111-1111-1111-1111-111111111111",
            "/src/A",
            &["/src/A/a.cs"],
        )];

        assert_eq!(
            statuses(&execute(&fs, &records)),
            vec![ValidationStatus::InvalidIdentifier]
        );
    }

    #[test]
    fn test_phase2_duplicates_are_symmetric() {
        let fs = fs_with(&["/src/A/a.cs", "/src/B/b.cs", "/src/C/c.cs"]);
        let records = vec![
            record(ID_A, "/src/A", &["/src/A/a.cs"]),
            record(ID_B, "/src/B", &["/src/B/b.cs"]),
            record(ID_A, "/src/C", &["/src/C/c.cs"]),
        ];

        assert_eq!(
            statuses(&execute(&fs, &records)),
            vec![
                ValidationStatus::DuplicateIdentifier,
                ValidationStatus::Valid,
                ValidationStatus::DuplicateIdentifier
            ]
        );
    }

    #[test]
    fn test_phase2_excluded_record_does_not_cause_duplicate() {
        let fs = fs_with(&["/src/A/a.cs"]);
        let mut excluded = record(ID_A, "/src/Old", &[]);
        excluded.excluded = true;
        let records = vec![record(ID_A, "/src/A", &["/src/A/a.cs"]), excluded];

        assert_eq!(
            statuses(&execute(&fs, &records)),
            vec![ValidationStatus::Valid, ValidationStatus::ExcludedByFlag]
        );
    }

    #[test]
    fn test_phase2_identifier_is_case_sensitive() {
        let fs = fs_with(&["/src/A/a.cs", "/src/B/b.cs"]);
        let upper = "AAAAAAAA-1111-1111-1111-111111111111";
        let lower = "aaaaaaaa-1111-1111-1111-111111111111";
        let records = vec![
            record(upper, "/src/A", &["/src/A/a.cs"]),
            record(lower, "/src/B", &["/src/B/b.cs"]),
        ];

        assert_eq!(
            statuses(&execute(&fs, &records)),
            vec![ValidationStatus::Valid, ValidationStatus::Valid]
        );
    }

    #[test]
    fn test_phase2_missing_file_means_no_analyzable_files() {
        let fs = MemoryFs::new();
        let records = vec![record(ID_A, "/src/A", &["/src/A/gone.cs"])];

        assert_eq!(
            statuses(&execute(&fs, &records)),
            vec![ValidationStatus::NoAnalyzableFiles]
        );
    }

    #[test]
    fn test_phase2_keeps_existing_subset() {
        let fs = fs_with(&["/src/A/a.cs", "/elsewhere/x.cs"]);
        let records = vec![record(
            ID_A,
            "/src/A",
            &["/src/A/a.cs", "/src/A/gone.cs", "/elsewhere/x.cs"],
        )];

        let classified = execute(&fs, &records);
        assert_eq!(classified[0].status, ValidationStatus::Valid);
        assert_eq!(classified[0].files, vec![PathBuf::from("/src/A/a.cs")]);
    }

    #[test]
    fn test_phase2_diagnostics_levels() {
        testing_logger::setup();
        let fs = MemoryFs::new();
        let mut excluded = record(ID_B, "/src/B", &[]);
        excluded.excluded = true;
        let records = vec![record("bad", "/src/A", &[]), excluded];

        execute(&fs, &records);

        testing_logger::validate(|logs| {
            assert_eq!(logs.len(), 2);
            assert_eq!(logs[0].level, Level::Warn);
            assert!(logs[0].body.contains("/src/A/A.csproj"));
            assert_eq!(logs[1].level, Level::Info);
            assert!(logs[1].body.contains("excluded"));
        });
    }

    #[test]
    fn test_is_under_root() {
        let root = Path::new("/src/App");
        assert!(is_under_root(Path::new("/src/App/a.cs"), root));
        assert!(is_under_root(Path::new("/src/App/sub/a.cs"), root));
        assert!(is_under_root(Path::new("/SRC/app/a.cs"), root));
        assert!(is_under_root(Path::new("/src/App/sub/../a.cs"), root));
        assert!(is_under_root(Path::new("/src/App/a.cs"), Path::new("/src/App/")));
        assert!(!is_under_root(Path::new("/src/App2/a.cs"), root));
        assert!(!is_under_root(Path::new("/src/a.cs"), root));
        assert!(!is_under_root(Path::new("/src/App/../Other/a.cs"), root));
    }
}
