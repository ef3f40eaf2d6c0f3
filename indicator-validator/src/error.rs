//! Errors that stop a validation run before any file is checked.
//!
//! Per-file problems are not errors; they are recorded as
//! [`GroupOutcome`](crate::check::GroupOutcome) values.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the validator.
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Fatal validator errors.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Results directory does not exist
    #[error("数据目录不存在: {}", .0.display())]
    ResultsDirMissing(PathBuf),

    /// Roster file does not exist
    #[error("公司列表文件不存在: {}", .0.display())]
    RosterMissing(PathBuf),

    /// Roster exists but is not a JSON array of company records
    #[error("公司列表文件格式错误 {}: {source}", .path.display())]
    RosterParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configured indicator group is malformed
    #[error("无效的指标组标识: {0}")]
    InvalidGroup(String),

    /// File name pattern failed to compile
    #[error("无效的文件匹配模式 {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// File system failure outside the per-file checks
    #[error("读取 {} 失败: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] indicator_common::Error),
}

impl ValidatorError {
    /// Whether this error is a missing prerequisite (roster or results dir).
    pub const fn is_missing_prerequisite(&self) -> bool {
        matches!(self, Self::ResultsDirMissing(_) | Self::RosterMissing(_))
    }
}
