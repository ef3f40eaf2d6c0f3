//! Indicator group identifiers and result file naming.

use globset::{GlobBuilder, GlobMatcher};
use indicator_common::config::DEFAULT_INDICATOR_GROUPS;
use indicator_common::validation::is_group_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ValidatorError};

/// An indicator group identifier in `major.minor` form, e.g. `7.11`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorGroup(String);

impl IndicatorGroup {
    /// Parse and validate a group identifier.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if is_group_identifier(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidatorError::InvalidGroup(s.to_string()))
        }
    }

    /// The identifier as written in result files, e.g. `7.11`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as written in file names, e.g. `7_11`.
    pub fn file_stem(&self) -> String {
        self.0.replace('.', "_")
    }

    /// The 19 groups every company is expected to cover.
    pub fn default_catalogue() -> Vec<Self> {
        DEFAULT_INDICATOR_GROUPS
            .iter()
            .map(|g| Self((*g).to_string()))
            .collect()
    }

    /// Parse a list of configured identifiers.
    pub fn parse_all<S: AsRef<str>>(groups: &[S]) -> Result<Vec<Self>> {
        groups.iter().map(|g| Self::parse(g.as_ref())).collect()
    }
}

impl fmt::Display for IndicatorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File name pattern for one (company, group) pair:
/// `{ts_code}_indicators_{group_stem}*.json`.
///
/// Glob metacharacters in `ts_code` are escaped so they match literally.
pub fn file_pattern(ts_code: &str, group: &IndicatorGroup) -> String {
    format!(
        "{}_indicators_{}*.json",
        globset::escape(ts_code),
        group.file_stem()
    )
}

/// Compile the file name matcher for one (company, group) pair.
pub fn file_matcher(ts_code: &str, group: &IndicatorGroup) -> Result<GlobMatcher> {
    let pattern = file_pattern(ts_code, group);
    GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ValidatorError::Pattern { pattern, source })
}
