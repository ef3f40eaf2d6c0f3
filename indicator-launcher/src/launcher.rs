//! Launch orchestration: preflight, toolchain probing with fallback, serving.

use indicator_common::config::LauncherConfig;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::browser::BrowserOpener;
use crate::builtin::serve_builtin;
use crate::error::LaunchError;
use crate::external::{run_http_server, ServerCommand};
use crate::menu::LaunchChoice;
use crate::network::{advertised_urls, lan_address_for};
use crate::shutdown::ServeExit;
use crate::toolchain::{detect_node_runtime, NodeRuntime, Toolchain};

/// What the launcher decided to do for a menu choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Entry page missing; nothing else happens
    MissingEntry(PathBuf),
    /// Serve through `npx http-server`
    External(NodeRuntime),
    /// Serve in-process. `fell_back` is set when the Node.js path was chosen
    /// but a version check failed.
    BuiltIn { fell_back: bool },
    /// User chose to exit
    Exit,
}

/// Result of executing a plan.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// Entry page missing, nothing was started
    NotStarted,
    /// User chose to exit
    Exited,
    /// A server ran and stopped
    Served(ServeExit),
    /// Server could not be started or crashed
    Failed(LaunchError),
}

/// Serves the static site according to the user's choice.
pub struct Launcher {
    config: LauncherConfig,
    toolchain: Arc<dyn Toolchain>,
    browser: Arc<dyn BrowserOpener>,
}

impl Launcher {
    pub fn new(
        config: LauncherConfig,
        toolchain: Arc<dyn Toolchain>,
        browser: Arc<dyn BrowserOpener>,
    ) -> Self {
        Self {
            config,
            toolchain,
            browser,
        }
    }

    /// Check that the entry page exists in the site directory.
    pub fn preflight(&self) -> Result<PathBuf, LaunchError> {
        let entry = self.config.entry_path();
        if entry.is_file() {
            Ok(entry)
        } else {
            Err(LaunchError::EntryMissing(entry))
        }
    }

    /// Decide how to serve. Version checks run only for the Node.js choice and only
    /// after the preflight passed.
    pub async fn plan(&self, choice: LaunchChoice) -> LaunchPlan {
        if let Err(LaunchError::EntryMissing(path)) = self.preflight() {
            return LaunchPlan::MissingEntry(path);
        }

        match choice {
            LaunchChoice::Exit => LaunchPlan::Exit,
            LaunchChoice::BuiltIn => LaunchPlan::BuiltIn { fell_back: false },
            LaunchChoice::ExternalRuntime => {
                match detect_node_runtime(self.toolchain.as_ref()).await {
                    Ok(runtime) => LaunchPlan::External(runtime),
                    Err(e) => {
                        tracing::info!(error = %e, "Falling back to built-in server");
                        LaunchPlan::BuiltIn { fell_back: true }
                    }
                }
            }
        }
    }

    /// Run a plan until the server stops or `shutdown` resolves.
    ///
    /// Startup and serve failures are reported on the console and returned as
    /// [`LaunchOutcome::Failed`]; they never propagate.
    pub async fn execute<F>(&self, plan: LaunchPlan, shutdown: F) -> LaunchOutcome
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let result = match plan {
            LaunchPlan::MissingEntry(path) => {
                println!("❌ 找不到主文件: {}", path.display());
                return LaunchOutcome::NotStarted;
            }
            LaunchPlan::Exit => {
                println!("退出");
                return LaunchOutcome::Exited;
            }
            LaunchPlan::External(runtime) => {
                tracing::debug!(node = %runtime.node_version, npx = %runtime.npx_version, "Using Node.js toolchain");
                self.run_external(shutdown).await
            }
            LaunchPlan::BuiltIn { fell_back } => {
                if fell_back {
                    println!("\n⚠️  Node.js/http-server不可用，尝试使用内置服务器...");
                }
                serve_builtin(&self.config, self.browser.as_ref(), shutdown).await
            }
        };

        match result {
            Ok(exit) => {
                match exit {
                    ServeExit::Interrupted => println!("\n\n🛑 服务器已停止"),
                    ServeExit::ChildExited(code) => {
                        tracing::info!(?code, "Server process exited");
                        println!("\n🛑 http-server已退出");
                    }
                }
                LaunchOutcome::Served(exit)
            }
            Err(e) => {
                tracing::error!(error = %e, "Server failed");
                println!("❌ 启动服务器失败: {e}");
                LaunchOutcome::Failed(e)
            }
        }
    }

    /// Plan and execute in one step.
    pub async fn run<F>(&self, choice: LaunchChoice, shutdown: F) -> LaunchOutcome
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let plan = self.plan(choice).await;
        self.execute(plan, shutdown).await
    }

    async fn run_external<F>(&self, shutdown: F) -> Result<ServeExit, LaunchError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bind = self.config.bind_addr()?;
        let urls = advertised_urls(
            bind.ip(),
            bind.port(),
            &self.config.entry_file,
            lan_address_for(bind.ip()),
        );
        let command = ServerCommand::http_server(&self.config);
        run_http_server(
            &command,
            &self.config,
            &urls,
            self.browser.as_ref(),
            shutdown,
        )
        .await
    }
}
