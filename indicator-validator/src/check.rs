//! Per-(company, group) result file checks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, ValidatorError};
use crate::groups::{file_matcher, IndicatorGroup};

/// What to do when more than one file matches a (company, group) pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousPolicy {
    /// Report the pair as ambiguous without reading any of the files
    #[default]
    Reject,
    /// Inspect the first match in file name order
    FirstMatch,
}

impl FromStr for AmbiguousPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "reject" => Ok(Self::Reject),
            "first_match" => Ok(Self::FirstMatch),
            other => Err(format!("unknown ambiguous policy: {other}")),
        }
    }
}

/// Outcome of checking one (company, group) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// File found, parsed, and holds the group key
    Pass { path: PathBuf, matches: usize },
    /// No file matched the pattern
    NoFile,
    /// Matching file could not be read or is not valid JSON
    Unreadable { path: PathBuf, error: String },
    /// Matching file parsed but has no top-level key for the group
    MissingKey { path: PathBuf },
    /// Several files matched and none was inspected
    Ambiguous { paths: Vec<PathBuf> },
}

impl GroupOutcome {
    /// Whether the pair passed.
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }

    /// Short machine-friendly label for the outcome.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass { .. } => "pass",
            Self::NoFile => "no_file",
            Self::Unreadable { .. } => "unreadable",
            Self::MissingKey { .. } => "missing_key",
            Self::Ambiguous { .. } => "ambiguous",
        }
    }
}

/// Snapshot of the `*.json` files in the results directory.
///
/// The directory is listed once; every lookup filters the sorted list.
#[derive(Debug, Clone)]
pub struct ResultsDir {
    files: Vec<ResultFile>,
}

#[derive(Debug, Clone)]
struct ResultFile {
    /// Name used for pattern matching
    name: String,
    path: PathBuf,
}

impl ResultsDir {
    /// List the results directory.
    ///
    /// Names that are not valid UTF-8 are matched in their lossy form and
    /// still read through their real path.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(ValidatorError::ResultsDirMissing(root.to_path_buf()));
        }

        let entries = fs::read_dir(root).map_err(|source| ValidatorError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ValidatorError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let os_name = entry.file_name();
            let name = match os_name.to_str() {
                Some(name) => name.to_string(),
                None => {
                    let lossy = os_name.to_string_lossy().into_owned();
                    tracing::warn!(name = %lossy, "Result file name is not valid UTF-8");
                    lossy
                }
            };
            if name.ends_with(".json") {
                files.push(ResultFile {
                    name,
                    path: entry.path(),
                });
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(root = %root.display(), files = files.len(), "Scanned results directory");
        Ok(Self { files })
    }

    /// Number of JSON files found.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Files matching the (company, group) pattern, in name order.
    pub fn matches(&self, ts_code: &str, group: &IndicatorGroup) -> Result<Vec<PathBuf>> {
        let matcher = file_matcher(ts_code, group)?;
        Ok(self
            .files
            .iter()
            .filter(|file| matcher.is_match(file.name.as_str()))
            .map(|file| file.path.clone())
            .collect())
    }
}

/// Check one (company, group) pair.
pub fn check_group(
    dir: &ResultsDir,
    ts_code: &str,
    group: &IndicatorGroup,
    policy: AmbiguousPolicy,
) -> Result<GroupOutcome> {
    let mut matches = dir.matches(ts_code, group)?;
    let count = matches.len();

    let path = match (count, policy) {
        (0, _) => return Ok(GroupOutcome::NoFile),
        (1, _) | (_, AmbiguousPolicy::FirstMatch) => matches.swap_remove(0),
        (_, AmbiguousPolicy::Reject) => {
            return Ok(GroupOutcome::Ambiguous { paths: matches });
        }
    };

    Ok(inspect_file(path, group, count))
}

/// Parse a result file.
///
/// Files written by Python's `json.dump` may carry `NaN`, `Infinity` and
/// `-Infinity`. Strict JSON rejects them, so such content is parsed again
/// as JSON5, where non-finite numbers become `null`. The strict parser's
/// error is the one reported.
fn parse_result(content: &str) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str(content)
        .or_else(|strict| json5::from_str::<Value>(content).map_err(|_| strict))
}

/// Read and classify one result file.
fn inspect_file(path: PathBuf, group: &IndicatorGroup, matches: usize) -> GroupOutcome {
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            return GroupOutcome::Unreadable {
                path,
                error: e.to_string(),
            }
        }
    };

    let value = match parse_result(&content) {
        Ok(value) => value,
        Err(e) => {
            return GroupOutcome::Unreadable {
                path,
                error: e.to_string(),
            }
        }
    };

    let has_key = value
        .as_object()
        .is_some_and(|obj| obj.contains_key(group.as_str()));

    if has_key {
        GroupOutcome::Pass { path, matches }
    } else {
        GroupOutcome::MissingKey { path }
    }
}
