//! Opening the site in the default browser.

use std::process::{Command, Stdio};

use crate::error::LaunchError;

/// Opens a URL for the user.
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), LaunchError>;
}

/// Launches the platform's default browser. The opener process is detached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        Self::command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| LaunchError::Browser {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Browser opener that never opens anything (`--no-browser`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBrowser;

impl BrowserOpener for NoBrowser {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        tracing::debug!(url, "Browser launch disabled");
        Ok(())
    }
}

/// Open `url`, reporting failure on the console instead of aborting.
pub(crate) fn open_or_report(browser: &dyn BrowserOpener, url: &str) {
    if let Err(e) = browser.open(url) {
        tracing::warn!(error = %e, "Failed to open browser");
        println!("⚠️  {e}");
        println!("请手动打开: {url}");
    }
}
