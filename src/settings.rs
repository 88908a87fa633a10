//! Setting keys: reserved keys, key validity and key equality
//!
//! Keys are compared case-insensitively everywhere. `normalize_key` is the
//! one place that defines that comparison; the reserved-key check and the
//! duplicate grouping in the aggregator both go through it.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

static VALID_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").expect("valid key pattern"));

/// Canonical form of a key used for every key comparison
pub fn normalize_key(key: &str) -> String {
    key.to_ascii_lowercase()
}

/// Case-insensitive key equality
pub fn keys_equal(a: &str, b: &str) -> bool {
    normalize_key(a) == normalize_key(b)
}

/// Keys that may only be set through dedicated configuration fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKey {
    ProjectKey,
    ProjectName,
    ProjectVersion,
    ProjectBaseDir,
}

impl ReservedKey {
    pub const ALL: [ReservedKey; 4] = [
        ReservedKey::ProjectKey,
        ReservedKey::ProjectName,
        ReservedKey::ProjectVersion,
        ReservedKey::ProjectBaseDir,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReservedKey::ProjectKey => "sonar.projectKey",
            ReservedKey::ProjectName => "sonar.projectName",
            ReservedKey::ProjectVersion => "sonar.projectVersion",
            ReservedKey::ProjectBaseDir => "sonar.projectBaseDir",
        }
    }

    /// The reserved key `key` names, if any
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| keys_equal(r.as_str(), key))
    }
}

impl fmt::Display for ReservedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server connection keys. These apply to the whole run even when a project
/// declares them as local settings.
const SERVER_KEYS: [&str; 8] = [
    "sonar.host.url",
    "sonar.jdbc.url",
    "sonar.jdbc.username",
    "sonar.jdbc.password",
    "sonar.login",
    "sonar.password",
    "sonar.token",
    "sonar.organization",
];

pub fn is_server_key(key: &str) -> bool {
    SERVER_KEYS.iter().any(|k| keys_equal(k, key))
}

/// Why a free-form setting was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRejection {
    Reserved(ReservedKey),
    InvalidCharacters,
}

/// Check a free-form key before it takes part in aggregation
pub fn check_key(key: &str) -> Result<(), KeyRejection> {
    if let Some(reserved) = ReservedKey::from_key(key) {
        return Err(KeyRejection::Reserved(reserved));
    }
    if !VALID_KEY.is_match(key) {
        return Err(KeyRejection::InvalidCharacters);
    }
    Ok(())
}

/// Where a setting was declared
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "path", rename_all = "snake_case")]
pub enum SettingSource {
    RunConfig,
    Project(PathBuf),
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingSource::RunConfig => f.write_str("the run configuration"),
            SettingSource::Project(path) => write!(f, "project '{}'", path.display()),
        }
    }
}

/// A setting that survived conflict resolution
///
/// `source` is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedSetting {
    pub key: String,
    pub value: String,
    pub source: SettingSource,
}
