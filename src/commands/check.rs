//! Check command implementation
//!
//! Loads and classifies the project records and runs the pre-flight check,
//! without reading the run configuration or writing anything. Useful to see
//! which projects would be analysed.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use sonar_props::filesystem::HostFs;
use sonar_props::phases::orchestrator;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory holding one sub-directory per project record
    #[arg(short, long, value_name = "PATH", env = "SONAR_PROPS_PROJECTS_DIR")]
    pub projects_dir: PathBuf,

    /// Output directory that would receive the properties file
    #[arg(short, long, value_name = "PATH", env = "SONAR_PROPS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let output_dir = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let result = orchestrator::check(&HostFs, &args.projects_dir, &output_dir)?;

    if args.json {
        super::print_json(&result)?;
    } else {
        super::print_statuses(&result);
        if result.is_success() {
            println!(
                "{} project(s) ready for analysis",
                result.valid_projects().count()
            );
        }
    }

    result.into_result()?;
    Ok(())
}
