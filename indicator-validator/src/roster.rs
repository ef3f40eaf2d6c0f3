//! Company roster loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, ValidatorError};

/// A company under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Exchange ticker code, e.g. `000001.SZ`
    pub ts_code: String,
    /// Display name
    pub name: String,
}

/// Load the roster: a JSON array of `{ts_code, name}` objects.
pub fn load_roster(path: &Path) -> Result<Vec<Company>> {
    if !path.exists() {
        return Err(ValidatorError::RosterMissing(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ValidatorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let companies: Vec<Company> =
        serde_json::from_str(&content).map_err(|source| ValidatorError::RosterParse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(count = companies.len(), path = %path.display(), "Loaded roster");
    Ok(companies)
}
