//! Orchestrator for the complete generation run
//!
//! Runs the phases in order and turns their outputs into a
//! [`PipelineResult`]: the status of every loaded project plus the path of
//! the generated properties file.
//!
//! Only an unreadable projects root or a failed write is returned as `Err`. The other fatal conditions (no projects, no valid
//! projects, a pre-flight conflict) still produce a result so that callers
//! can report per-project statuses; `failure` is set and `artifact` is
//! `None`.

use log::{error, info};
use serde::{Serialize, Serializer};
use std::path::{Component, Path, PathBuf};

use super::{phase1, phase2, phase3, phase4, phase5, ClassifiedProject, ValidationStatus};
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::record::ProjectRecord;

/// Final status of one loaded project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOutcome {
    pub identifier: String,
    pub name: String,
    pub path: PathBuf,
    pub status: ValidationStatus,
}

/// Result of a pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub projects: Vec<ProjectOutcome>,
    /// Absolute path of the written properties file
    pub artifact: Option<PathBuf>,
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<Error>,
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Projects that made it into the properties file
    pub fn valid_projects(&self) -> impl Iterator<Item = &ProjectOutcome> {
        self.projects
            .iter()
            .filter(|p| p.status == ValidationStatus::Valid)
    }

    /// Convert into a plain `Result` carrying the artifact path
    pub fn into_result(self) -> Result<Option<PathBuf>> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.artifact),
        }
    }
}

fn serialize_failure<S: Serializer>(
    failure: &Option<Error>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match failure {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Execute the complete run and write the properties file to `output_dir`
///
/// `output_dir` is both the working directory checked during pre-flight and
/// the directory that receives the artifact. A relative `output_dir` is
/// resolved against the current directory, so the reported artifact path is
/// always absolute. The artifact is written through `fs`.
pub fn execute(
    fs: &dyn FileSystem,
    config: &RunConfig,
    projects_dir: &Path,
    output_dir: &Path,
) -> Result<PipelineResult> {
    run(fs, config, projects_dir, output_dir, true)
}

/// Run loading, classification and pre-flight without writing anything
pub fn check(
    fs: &dyn FileSystem,
    projects_dir: &Path,
    output_dir: &Path,
) -> Result<PipelineResult> {
    // Settings and identity are not needed before rendering
    let config = RunConfig::new("check");
    run(fs, &config, projects_dir, output_dir, false)
}

fn run(
    fs: &dyn FileSystem,
    config: &RunConfig,
    projects_dir: &Path,
    output_dir: &Path,
    write: bool,
) -> Result<PipelineResult> {
    let output_dir = std::path::absolute(output_dir)?;
    let output_dir = output_dir.as_path();

    // Phase 1: Load
    let records = phase1::execute(fs, projects_dir)?;
    if records.is_empty() {
        return Ok(failed(
            Vec::new(),
            Error::NoProjects {
                path: projects_dir.to_path_buf(),
            },
        ));
    }

    // Phase 2: Classify
    let classified = phase2::execute(fs, &records);
    let outcomes: Vec<ProjectOutcome> = classified.iter().map(outcome).collect();
    let valid: Vec<&ClassifiedProject<'_>> = classified.iter().filter(|c| c.is_valid()).collect();
    if valid.is_empty() {
        return Ok(failed(outcomes, Error::NoValidProjects));
    }
    info!(
        "{} of {} project(s) will be analysed",
        valid.len(),
        records.len()
    );

    // Phase 4 runs before rendering so that a conflict stops the run early
    let roots: Vec<&Path> = valid.iter().map(|c| c.record.root_path()).collect();
    if let Err(conflict) = phase4::execute(fs, output_dir, &roots) {
        return Ok(failed(outcomes, conflict));
    }

    if !write {
        return Ok(PipelineResult {
            projects: outcomes,
            artifact: None,
            failure: None,
        });
    }

    // Phase 3: Aggregate
    let valid_records: Vec<&ProjectRecord> = valid.iter().map(|c| c.record).collect();
    let aggregation = phase3::execute(fs, &config.settings, &valid_records);

    // Phase 5: Render
    let base_dir = config
        .base_dir
        .clone()
        .or_else(|| common_root(&roots))
        .unwrap_or_else(|| output_dir.to_path_buf());
    let render_projects: Vec<phase5::RenderProject<'_>> = valid
        .iter()
        .map(|c| phase5::RenderProject {
            record: c.record,
            files: &c.files,
            settings: aggregation.project_settings(&c.record.identifier),
        })
        .collect();
    let properties = phase5::execute(
        config,
        &base_dir,
        output_dir,
        &aggregation.global,
        &render_projects,
    );

    let artifact = output_dir.join(phase4::ARTIFACT_FILE_NAME);
    properties.write_to(fs, &artifact)?;
    info!("Generated analysis properties: {}", artifact.display());

    Ok(PipelineResult {
        projects: outcomes,
        artifact: Some(artifact),
        failure: None,
    })
}

fn outcome(classified: &ClassifiedProject<'_>) -> ProjectOutcome {
    ProjectOutcome {
        identifier: classified.record.identifier.clone(),
        name: classified.record.name.clone(),
        path: classified.record.full_path.clone(),
        status: classified.status,
    }
}

fn failed(projects: Vec<ProjectOutcome>, failure: Error) -> PipelineResult {
    error!("{}", failure);
    PipelineResult {
        projects,
        artifact: None,
        failure: Some(failure),
    }
}

/// Deepest directory containing every path in `dirs`
///
/// Returns `None` when the only shared ancestor is the filesystem root.
fn common_root(dirs: &[&Path]) -> Option<PathBuf> {
    let (first, rest) = dirs.split_first()?;
    let mut shared: Vec<Component<'_>> = first.components().collect();
    for dir in rest {
        let matching = shared
            .iter()
            .zip(dir.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        shared.truncate(matching);
    }
    if !shared.iter().any(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(shared.iter().collect())
}
