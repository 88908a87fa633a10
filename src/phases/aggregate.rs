//! Phase 3: Aggregating Settings
//!
//! Settings reach the properties file from three places: the run
//! configuration, the global settings of every valid project, and each
//! project's own local settings. This phase reconciles them.
//!
//! ## Rules
//!
//! - Reserved keys and keys with invalid characters are rejected with a
//!   warning naming the source.
//! - Declarations of one key at the same level are grouped. Identical values
//!   collapse into one entry, with an informational message for each
//!   redundant declaration. Differing values make the key ambiguous: it is
//!   dropped with one warning listing every source. No value is picked.
//! - When the run configuration and the projects both declare a run-wide
//!   key, the project value replaces the run configuration value.
//! - Server connection keys declared as local settings are treated as
//!   project-declared global settings.
//!
//! Report references from the build are turned into per-project settings
//! here. Every report of one tag lands in a single comma-separated value, so
//! a project with several reports of the same kind keeps all of them.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::filesystem::FileSystem;
use crate::record::{ProjectRecord, Setting};
use crate::settings::{
    check_key, is_server_key, normalize_key, ConsolidatedSetting, KeyRejection, SettingSource,
};

/// Setting names for the report tags the build knows about
const REPORT_SETTINGS: [(&str, &str); 4] = [
    ("RoslynReport", "sonar.cs.roslyn.reportFilePaths"),
    ("VisualStudioCodeCoverage", "sonar.cs.vscoveragexml.reportsPaths"),
    ("TestResults", "sonar.cs.vstest.reportsPaths"),
    ("ExternalIssues", "sonar.externalIssuesReportPaths"),
];

/// Output of Phase 3
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Run-wide settings in output order
    pub global: Vec<ConsolidatedSetting>,
    /// Per-project settings, keyed by project identifier
    pub per_project: HashMap<String, Vec<ConsolidatedSetting>>,
}

impl Aggregation {
    pub fn project_settings(&self, identifier: &str) -> &[ConsolidatedSetting] {
        self.per_project
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

struct Declaration<'a> {
    key: &'a str,
    value: &'a str,
    source: SettingSource,
}

#[derive(Default)]
struct Resolved {
    settings: Vec<ConsolidatedSetting>,
    /// Normalized keys dropped as ambiguous
    ambiguous: HashSet<String>,
}

impl Resolved {
    fn position(&self, normalized: &str) -> Option<usize> {
        self.settings
            .iter()
            .position(|s| normalize_key(&s.key) == normalized)
    }
}

/// Execute Phase 3: Resolve the settings of the run and of `projects`
///
/// `projects` must only contain valid records, so identifiers are unique.
pub fn execute(
    fs: &dyn FileSystem,
    run_settings: &[Setting],
    projects: &[&ProjectRecord],
) -> Aggregation {
    let run_declarations = accepted(run_settings, &SettingSource::RunConfig);

    let mut project_declarations = Vec::new();
    let mut local_declarations = Vec::new();
    for record in projects {
        let source = SettingSource::Project(record.full_path.clone());
        project_declarations.extend(accepted(&record.global_settings, &source));

        let (server, local): (Vec<_>, Vec<_>) = accepted(&record.local_settings, &source)
            .into_iter()
            .partition(|d| is_server_key(d.key));
        for declaration in &server {
            debug!(
                "Setting '{}' from {} applies to the whole run",
                declaration.key, declaration.source
            );
        }
        project_declarations.extend(server);
        local_declarations.push((*record, local));
    }

    let global = merge_levels(resolve(run_declarations), resolve(project_declarations));

    let mut per_project = HashMap::new();
    for (record, local) in local_declarations {
        let source = SettingSource::Project(record.full_path.clone());
        let reports = report_settings(fs, record);
        let mut declarations = accepted(&reports, &source);
        declarations.extend(local);
        per_project.insert(record.identifier.clone(), resolve(declarations).settings);
    }

    Aggregation {
        global,
        per_project,
    }
}

/// Declarations of `settings` that pass the key checks
fn accepted<'a>(settings: &'a [Setting], source: &SettingSource) -> Vec<Declaration<'a>> {
    settings
        .iter()
        .filter(|setting| match check_key(&setting.key) {
            Ok(()) => true,
            Err(KeyRejection::Reserved(reserved)) => {
                warn!(
                    "Setting '{}' from {} is ignored: '{}' can only be set through its dedicated configuration field",
                    setting.key, source, reserved
                );
                false
            }
            Err(KeyRejection::InvalidCharacters) => {
                warn!(
                    "Setting '{}' from {} is ignored: keys may only contain letters, digits, '.', '-' and '_'",
                    setting.key, source
                );
                false
            }
        })
        .map(|setting| Declaration {
            key: &setting.key,
            value: &setting.value,
            source: source.clone(),
        })
        .collect()
}

/// Collapse same-level declarations of each key
fn resolve(declarations: Vec<Declaration<'_>>) -> Resolved {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Declaration<'_>>> = HashMap::new();
    for declaration in declarations {
        let normalized = normalize_key(declaration.key);
        if !groups.contains_key(&normalized) {
            order.push(normalized.clone());
        }
        groups.entry(normalized).or_default().push(declaration);
    }

    let mut resolved = Resolved::default();
    for normalized in order {
        let Some(group) = groups.remove(&normalized) else {
            continue;
        };
        let first = &group[0];

        if group.iter().all(|d| d.value == first.value) {
            for redundant in &group[1..] {
                info!(
                    "Setting '{}' is declared redundantly by {}; {} already declares the same value",
                    first.key, redundant.source, first.source
                );
            }
            resolved.settings.push(ConsolidatedSetting {
                key: first.key.to_string(),
                value: first.value.to_string(),
                source: first.source.clone(),
            });
        } else {
            let mut sources: Vec<String> = Vec::new();
            for declaration in &group {
                let source = declaration.source.to_string();
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
            let sources = sources.join(", ");
            warn!(
                "Setting '{}' is ambiguous: it is declared with different values by {}. The setting is ignored",
                first.key, sources
            );
            resolved.ambiguous.insert(normalized);
        }
    }
    resolved
}

/// Combine run configuration settings with project-declared global settings
fn merge_levels(run: Resolved, mut projects: Resolved) -> Vec<ConsolidatedSetting> {
    let mut merged = Vec::new();
    for setting in run.settings {
        let normalized = normalize_key(&setting.key);
        if let Some(index) = projects.position(&normalized) {
            let winner = projects.settings.remove(index);
            info!(
                "Setting '{}' is declared by {} and by {}; the value from {} is used",
                setting.key, setting.source, winner.source, winner.source
            );
            merged.push(winner);
        } else if projects.ambiguous.contains(&normalized) {
            warn!(
                "Setting '{}' from {} is ignored because projects declare it with conflicting values",
                setting.key, setting.source
            );
        } else {
            merged.push(setting);
        }
    }
    merged.extend(projects.settings);
    merged
}

/// Settings derived from the report references of `record`
///
/// One setting per mapped tag, in order of first appearance.
fn report_settings(fs: &dyn FileSystem, record: &ProjectRecord) -> Vec<Setting> {
    let mut grouped: Vec<(&str, Vec<String>)> = Vec::new();
    for result in &record.analysis_results {
        let Some((_, key)) = REPORT_SETTINGS.iter().find(|(id, _)| *id == result.id) else {
            debug!(
                "Ignoring unknown analysis result '{}' of project '{}'",
                result.id,
                record.full_path.display()
            );
            continue;
        };
        if !fs.is_file(&result.location) {
            warn!(
                "The report '{}' of project '{}' does not exist and will not be imported",
                result.location.display(),
                record.full_path.display()
            );
            continue;
        }
        let location = path_value(&result.location);
        match grouped.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, locations)) => {
                if !locations.contains(&location) {
                    locations.push(location);
                }
            }
            None => grouped.push((*key, vec![location])),
        }
    }
    grouped
        .into_iter()
        .map(|(key, locations)| Setting::new(key, locations.join(",")))
        .collect()
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
