//! Launcher errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing or running a local site server.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Entry page is not in the site directory
    #[error("找不到主文件: {}", .0.display())]
    EntryMissing(PathBuf),

    /// Menu input was not one of the offered choices
    #[error("无效选择: {0:?}")]
    InvalidChoice(String),

    /// A `--version` check failed
    #[error("{program} 不可用: {reason}")]
    VersionCheckFailed { program: String, reason: String },

    /// Child process could not be started
    #[error("无法启动 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Listening socket could not be bound
    #[error("无法绑定 {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Server loop or child wait failed
    #[error("服务器运行失败: {0}")]
    Serve(#[source] std::io::Error),

    /// Default browser could not be launched
    #[error("无法打开浏览器 {url}: {reason}")]
    Browser { url: String, reason: String },

    /// Launcher settings are unusable
    #[error(transparent)]
    Config(#[from] indicator_common::Error),

    /// Piped menu input could not be read
    #[error("读取输入失败: {0}")]
    ReadInput(#[source] std::io::Error),

    /// Interactive prompt failed
    #[error("交互输入失败: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl LaunchError {
    /// Version check failures trigger the built-in fallback instead of aborting.
    pub const fn is_version_check_failure(&self) -> bool {
        matches!(self, Self::VersionCheckFailed { .. })
    }
}
