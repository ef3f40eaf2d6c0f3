//! Serving through `npx http-server`.

use indicator_common::config::LauncherConfig;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::browser::{open_or_report, BrowserOpener};
use crate::error::LaunchError;
use crate::network::print_urls;
use crate::shutdown::ServeExit;
use crate::toolchain::{program_name, NPX};

/// Arguments passed to `npx`. The child runs inside the site directory.
pub fn http_server_args(config: &LauncherConfig) -> Vec<String> {
    let mut args = vec![
        "http-server".to_string(),
        ".".to_string(),
        "-p".to_string(),
        config.port.to_string(),
        "-a".to_string(),
        config.bind.clone(),
    ];
    if config.cors {
        args.push("--cors".to_string());
    }
    args
}

/// Program and arguments of the external server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ServerCommand {
    /// `npx http-server` for the given launcher settings.
    pub fn http_server(config: &LauncherConfig) -> Self {
        Self {
            program: program_name(NPX),
            args: http_server_args(config),
        }
    }
}

/// Spawn the server command in the site directory, open the browser after
/// the startup delay, and wait for the child to exit or for `shutdown` to
/// resolve.
///
/// There is no readiness check: the browser may open before the server
/// accepts connections. A child that exits during the delay never opens it.
pub async fn run_http_server(
    command: &ServerCommand,
    config: &LauncherConfig,
    urls: &[String],
    browser: &dyn BrowserOpener,
    shutdown: impl Future<Output = ()>,
) -> Result<ServeExit, LaunchError> {
    println!("\n🚀 启动http-server...");
    print_urls(urls);
    println!("\n按Ctrl+C停止服务器\n");

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&config.site_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    tracing::info!(
        pid = child.id().unwrap_or_default(),
        program = %command.program,
        port = config.port,
        "Started http-server"
    );

    tokio::pin!(shutdown);

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(LaunchError::Serve)?;
            return Ok(ServeExit::ChildExited(status.code()));
        }
        () = tokio::time::sleep(Duration::from_millis(config.startup_delay_ms)) => {}
        () = &mut shutdown => {
            stop_child(&mut child).await;
            return Ok(ServeExit::Interrupted);
        }
    }

    if let Some(url) = urls.first() {
        open_or_report(browser, url);
    }

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(LaunchError::Serve)?;
            tracing::info!(%status, "http-server exited");
            Ok(ServeExit::ChildExited(status.code()))
        }
        () = &mut shutdown => {
            stop_child(&mut child).await;
            Ok(ServeExit::Interrupted)
        }
    }
}

async fn stop_child(child: &mut tokio::process::Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "Failed to stop http-server");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_server_args() {
        let config = LauncherConfig::default();
        assert_eq!(
            http_server_args(&config),
            vec!["http-server", ".", "-p", "8080", "-a", "0.0.0.0", "--cors"]
        );
    }

    #[test]
    fn test_http_server_args_without_cors() {
        let config = LauncherConfig {
            port: 9001,
            bind: "127.0.0.1".into(),
            cors: false,
            ..LauncherConfig::default()
        };
        let args = http_server_args(&config);
        assert!(!args.contains(&"--cors".to_string()));
        assert_eq!(args[3], "9001");
        assert_eq!(args[5], "127.0.0.1");
    }

    #[test]
    fn test_http_server_command_uses_npx() {
        let command = ServerCommand::http_server(&LauncherConfig::default());
        assert_eq!(command.program, program_name(NPX));
        assert_eq!(command.args[0], "http-server");
    }
}

#[cfg(all(test, unix))]
mod process_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingBrowser {
        opened: AtomicUsize,
    }

    impl BrowserOpener for CountingBrowser {
        fn open(&self, _url: &str) -> Result<(), LaunchError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn shell(script: &str) -> ServerCommand {
        ServerCommand {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
        }
    }

    fn config(dir: &TempDir, startup_delay_ms: u64) -> LauncherConfig {
        LauncherConfig {
            site_dir: dir.path().to_path_buf(),
            startup_delay_ms,
            ..LauncherConfig::default()
        }
    }

    fn urls() -> Vec<String> {
        vec!["http://localhost:8080/index_fallback.html".into()]
    }

    #[tokio::test]
    async fn test_child_exit_before_delay_skips_browser() {
        let dir = TempDir::new().unwrap();
        let browser = CountingBrowser::default();

        let exit = run_http_server(
            &shell("exit 3"),
            &config(&dir, 30_000),
            &urls(),
            &browser,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        assert_eq!(exit, ServeExit::ChildExited(Some(3)));
        assert_eq!(browser.opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_child_exit_after_delay_opens_browser_once() {
        let dir = TempDir::new().unwrap();
        let browser = CountingBrowser::default();

        let exit = run_http_server(
            &shell("sleep 0.5; exit 0"),
            &config(&dir, 50),
            &urls(),
            &browser,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        assert_eq!(exit, ServeExit::ChildExited(Some(0)));
        assert_eq!(browser.opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_child() {
        let dir = TempDir::new().unwrap();
        let browser = CountingBrowser::default();
        let started = std::time::Instant::now();

        let exit = run_http_server(
            &shell("sleep 30"),
            &config(&dir, 50),
            &urls(),
            &browser,
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await
        .unwrap();

        assert_eq!(exit, ServeExit::Interrupted);
        assert_eq!(browser.opened.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_shutdown_during_delay_skips_browser() {
        let dir = TempDir::new().unwrap();
        let browser = CountingBrowser::default();

        let exit = run_http_server(
            &shell("sleep 30"),
            &config(&dir, 30_000),
            &urls(),
            &browser,
            tokio::time::sleep(Duration::from_millis(100)),
        )
        .await
        .unwrap();

        assert_eq!(exit, ServeExit::Interrupted);
        assert_eq!(browser.opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_child_runs_in_site_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index_fallback.html"), "").unwrap();
        let browser = CountingBrowser::default();

        let exit = run_http_server(
            &shell("test -f index_fallback.html"),
            &config(&dir, 30_000),
            &urls(),
            &browser,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        assert_eq!(exit, ServeExit::ChildExited(Some(0)));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let command = ServerCommand {
            program: "indicator-no-such-server".into(),
            args: Vec::new(),
        };

        let result = run_http_server(
            &command,
            &config(&dir, 50),
            &urls(),
            &CountingBrowser::default(),
            std::future::pending::<()>(),
        )
        .await;

        match result {
            Err(LaunchError::Spawn { program, .. }) => {
                assert_eq!(program, "indicator-no-such-server");
            }
            other => panic!("expected Spawn error, got {other:?}"),
        }
    }
}
