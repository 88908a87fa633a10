//! Generate command implementation
//!
//! Runs the whole pipeline:
//! 1. Load the project records
//! 2. Classify them
//! 3. Aggregate settings
//! 4. Check for an existing properties file
//! 5. Render and write `sonar-project.properties`

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use sonar_props::config;
use sonar_props::filesystem::HostFs;
use sonar_props::phases::orchestrator;

/// Default name of the run configuration file
pub const DEFAULT_CONFIG: &str = "sonar-props.yaml";

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory holding one sub-directory per project record
    #[arg(short, long, value_name = "PATH", env = "SONAR_PROPS_PROJECTS_DIR")]
    pub projects_dir: PathBuf,

    /// Path to the run configuration
    #[arg(short, long, value_name = "PATH", env = "SONAR_PROPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory (defaults to current directory)
    #[arg(short, long, value_name = "PATH", env = "SONAR_PROPS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs) -> Result<()> {
    let config_path = args.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let run_config = config::from_file(&config_path)?;

    let output_dir = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let result = orchestrator::execute(&HostFs, &run_config, &args.projects_dir, &output_dir)?;

    if args.json {
        super::print_json(&result)?;
    } else if !args.quiet {
        super::print_statuses(&result);
        if let Some(artifact) = &result.artifact {
            println!("Generated {}", artifact.display());
        }
    }

    result.into_result()?;
    Ok(())
}
