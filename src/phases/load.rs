//! Phase 1: Loading Project Records
//!
//! Every immediate sub-directory of the projects root may hold one
//! `ProjectInfo.json` written by the build. Sub-directories without one did
//! not produce analysable output and are skipped.
//!
//! Records are returned in sorted directory order so that repeated runs over
//! the same input produce the same output. A record that cannot be read or
//! parsed only costs its own project: it is reported and skipped.

use log::{debug, warn};
use std::path::Path;

use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::record::ProjectRecord;

/// Name of the record file inside each project directory
pub const RECORD_FILE_NAME: &str = "ProjectInfo.json";

/// Execute Phase 1: Load every project record under `root`
///
/// Fails only when `root` cannot be enumerated.
pub fn execute(fs: &dyn FileSystem, root: &Path) -> Result<Vec<ProjectRecord>> {
    let dirs = fs.sub_dirs(root).map_err(|e| Error::RootUnreadable {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut records = Vec::new();
    for dir in dirs {
        let record_path = dir.join(RECORD_FILE_NAME);
        if !fs.is_file(&record_path) {
            debug!("No project record in '{}', skipping", dir.display());
            continue;
        }

        let parsed = fs
            .read_to_string(&record_path)
            .map_err(|e| e.to_string())
            .and_then(|text| ProjectRecord::from_json(&text).map_err(|e| e.to_string()));
        let record = match parsed {
            Ok(record) => record,
            Err(message) => {
                warn!(
                    "The project record '{}' is invalid and will be skipped: {}",
                    record_path.display(),
                    message
                );
                continue;
            }
        };

        debug!(
            "Loaded project '{}' from '{}'",
            record.name,
            record_path.display()
        );
        records.push(record);
    }

    Ok(records)
}
