//! External JavaScript toolchain detection.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::LaunchError;

/// JavaScript runtime binary.
pub const NODE: &str = "node";
/// Package runner used to start `http-server`.
pub const NPX: &str = "npx";

/// Resolve a program name for the current platform.
///
/// On Windows `npx`/`npm` are `.cmd` shims that `CreateProcess` does not find
/// by bare name.
pub fn program_name(program: &str) -> String {
    if cfg!(windows) && matches!(program, "npx" | "npm") {
        format!("{program}.cmd")
    } else {
        program.to_string()
    }
}

/// Something that can report the version of an installed program.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Run `<program> --version` and return the trimmed output.
    async fn version(&self, program: &str) -> Result<String, LaunchError>;
}

/// Runs programs found on the real `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolchain;

#[async_trait]
impl Toolchain for SystemToolchain {
    async fn version(&self, program: &str) -> Result<String, LaunchError> {
        let output = Command::new(program_name(program))
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LaunchError::VersionCheckFailed {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(LaunchError::VersionCheckFailed {
                program: program.to_string(),
                reason: format!("exited with {}", output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Versions of the detected Node.js toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRuntime {
    pub node_version: String,
    pub npx_version: String,
}

/// Check `node` then `npx`, stopping at the first failure.
pub async fn detect_node_runtime(toolchain: &dyn Toolchain) -> Result<NodeRuntime, LaunchError> {
    let node_version = match toolchain.version(NODE).await {
        Ok(version) => {
            println!("✅ Node.js已安装: {version}");
            version
        }
        Err(e) => {
            println!("❌ Node.js未安装");
            println!("请安装Node.js: https://nodejs.org/");
            tracing::debug!(error = %e, "node version check failed");
            return Err(e);
        }
    };

    let npx_version = match toolchain.version(NPX).await {
        Ok(version) => {
            println!("✅ npx可用");
            version
        }
        Err(e) => {
            println!("❌ npx不可用");
            tracing::debug!(error = %e, "npx version check failed");
            return Err(e);
        }
    };

    Ok(NodeRuntime {
        node_version,
        npx_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name() {
        assert_eq!(program_name("node"), "node");
        if cfg!(windows) {
            assert_eq!(program_name("npx"), "npx.cmd");
        } else {
            assert_eq!(program_name("npx"), "npx");
        }
    }

    #[tokio::test]
    async fn test_missing_program_fails_version_check() {
        let err = SystemToolchain
            .version("definitely-not-an-installed-program-4c1f")
            .await
            .unwrap_err();
        assert!(err.is_version_check_failure());
    }
}
