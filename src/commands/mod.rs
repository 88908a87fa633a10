//! # CLI Command Implementations
//!
//! Each subcommand of the `sonar-props` tool lives in its own file, with an
//! `Args` struct derived using `clap` and an `execute` function that calls
//! into the `sonar_props` library.

pub mod check;
pub mod generate;

use sonar_props::phases::orchestrator::{PipelineResult, ProjectOutcome};

/// Print one line per project with its final status
pub(crate) fn print_statuses(result: &PipelineResult) {
    for project in &result.projects {
        println!("{}", status_line(project));
    }
}

fn status_line(project: &ProjectOutcome) -> String {
    format!(
        "  {:<22} {}",
        project.status.to_string(),
        project.path.display()
    )
}

/// Print the result as pretty JSON
pub(crate) fn print_json(result: &PipelineResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
