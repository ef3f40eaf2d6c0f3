//! Indicator Launcher - serves the indicator site locally.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicator_common::config::ToolsConfig;
use indicator_common::logging::init_logging;
use indicator_common::validation::Validate;
use indicator_launcher::{
    prompt_choice, shutdown_signal, BrowserOpener, LaunchChoice, Launcher, NoBrowser,
    SystemBrowser, SystemToolchain,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Serve the indicator site and open it in the browser.
#[derive(Parser, Debug)]
#[command(name = "indicator-launcher")]
#[command(version)]
#[command(about = "Serve the indicator site locally", long_about = None)]
struct Cli {
    /// Directory to serve (must contain the entry page)
    #[arg(long)]
    site_dir: Option<PathBuf>,

    /// Listening port
    #[arg(long, short)]
    port: Option<u16>,

    /// Bind address
    #[arg(long)]
    bind: Option<String>,

    /// Launch mode, skipping the menu: 1|2|3 or node|builtin|exit
    #[arg(long)]
    choice: Option<String>,

    /// Do not open the browser
    #[arg(long)]
    no_browser: bool,

    /// Configuration file (default: ~/.indicator-site/config.json if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ToolsConfig::load_with_env(cli.config.as_deref())
        .context("Failed to load configuration")?;
    apply_cli(&cli, &mut config);

    config
        .launcher
        .validate()
        .context("Invalid launcher configuration")?;
    config
        .observability
        .validate()
        .context("Invalid observability configuration")?;

    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    print_banner();
    let site_dir = std::fs::canonicalize(&config.launcher.site_dir)
        .unwrap_or_else(|_| config.launcher.site_dir.clone());
    println!("📁 工作目录: {}", site_dir.display());

    let browser: Arc<dyn BrowserOpener> = if config.launcher.open_browser {
        Arc::new(SystemBrowser)
    } else {
        Arc::new(NoBrowser)
    };
    let launcher = Launcher::new(config.launcher, Arc::new(SystemToolchain), browser);

    match launcher.preflight() {
        Ok(_) => println!("✅ 主文件存在"),
        Err(e) => {
            println!("❌ {e}");
            return Ok(());
        }
    }

    let input = match cli.choice {
        Some(choice) => choice,
        None => match prompt_choice() {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read menu choice");
                println!("❌ {e}");
                return Ok(());
            }
        },
    };
    let Ok(choice) = input.parse::<LaunchChoice>() else {
        println!("无效选择");
        return Ok(());
    };

    launcher.run(choice, shutdown_signal()).await;
    Ok(())
}

fn apply_cli(cli: &Cli, config: &mut ToolsConfig) {
    if let Some(dir) = &cli.site_dir {
        config.launcher.site_dir.clone_from(dir);
    }
    if let Some(port) = cli.port {
        config.launcher.port = port;
    }
    if let Some(bind) = &cli.bind {
        config.launcher.bind.clone_from(bind);
    }
    if cli.no_browser {
        config.launcher.open_browser = false;
    }
}

fn print_banner() {
    let rule = "=".repeat(50);
    println!("{rule}");
    println!("{}", style("指标网站本地服务器").bold().cyan());
    println!("{rule}");
}
