//! # Run Configuration
//!
//! The run configuration carries the identity of the analysis (project key,
//! name, version and base directory) and an ordered list of run-wide
//! settings. It is a YAML document:
//!
//! ```yaml
//! project_key: my-org:my-app
//! project_name: My App
//! project_version: "2.1"
//! settings:
//!   - key: sonar.host.url
//!     value: http://localhost:9000
//! ```
//!
//! The file may be briefly locked by the process that wrote it, so
//! [`from_file`] retries opening it a bounded number of times with a fixed
//! pause between attempts.

use crate::error::{Error, Result};
use crate::record::Setting;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Version used when the configuration does not name one
pub const DEFAULT_VERSION: &str = "1.0";

/// Run-wide analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub project_key: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_version: Option<String>,
    /// Explicit analysis base directory
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Run-wide settings, in declaration order
    #[serde(default)]
    pub settings: Vec<Setting>,
}

impl RunConfig {
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            project_name: None,
            project_version: None,
            base_dir: None,
            settings: Vec::new(),
        }
    }

    /// Display name, falling back to the project key
    pub fn name(&self) -> &str {
        self.project_name.as_deref().unwrap_or(&self.project_key)
    }

    pub fn version(&self) -> &str {
        self.project_version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    fn validate(&self) -> Result<()> {
        if self.project_key.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "project_key must not be empty".to_string(),
                hint: Some("Add 'project_key: <key>' to the configuration".to_string()),
            });
        }
        Ok(())
    }
}

/// How often and how patiently to retry opening the configuration
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            pause: Duration::from_millis(500),
        }
    }
}

/// Parse a configuration from YAML text
pub fn parse(yaml: &str) -> Result<RunConfig> {
    let config: RunConfig = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })?;
    config.validate()?;
    Ok(config)
}

/// Read and parse a configuration file with the default retry policy
pub fn from_file(path: &Path) -> Result<RunConfig> {
    from_file_with_retry(path, RetryPolicy::default())
}

/// Read and parse a configuration file
///
/// A missing file fails immediately. Any other open failure is retried up to
/// `policy.attempts` times in total.
pub fn from_file_with_retry(path: &Path, policy: RetryPolicy) -> Result<RunConfig> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    let text = loop {
        match fs::read_to_string(path) {
            Ok(text) => break text,
            Err(e) if e.kind() == ErrorKind::NotFound || attempt >= attempts => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    attempts: attempt,
                    message: e.to_string(),
                });
            }
            Err(e) => {
                debug!(
                    "Could not read configuration '{}' (attempt {}/{}): {}",
                    path.display(),
                    attempt,
                    attempts,
                    e
                );
                thread::sleep(policy.pause);
                attempt += 1;
            }
        }
    };
    parse(&text)
}
