//! Built-in static file server.
//!
//! Used when the Node.js toolchain is unavailable or when the user asks for it
//! directly. Serves the site directory as-is.

use axum::Router;
use indicator_common::config::LauncherConfig;
use std::future::Future;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::browser::{open_or_report, BrowserOpener};
use crate::error::LaunchError;
use crate::network::{advertised_urls, lan_address_for, print_urls};
use crate::shutdown::ServeExit;

/// Router serving every file below `site_dir`.
pub fn site_router(site_dir: &Path, cors: bool) -> Router {
    let router = Router::new()
        .fallback_service(ServeDir::new(site_dir))
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Bind the configured address, open the browser, and serve until `shutdown`
/// resolves.
pub async fn serve_builtin(
    config: &LauncherConfig,
    browser: &dyn BrowserOpener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<ServeExit, LaunchError> {
    let requested = config.bind_addr()?;
    let bind = requested.ip();

    let listener = TcpListener::bind(requested)
        .await
        .map_err(|source| LaunchError::Bind {
            addr: requested.to_string(),
            source,
        })?;
    let local = listener.local_addr().map_err(LaunchError::Serve)?;

    let urls = advertised_urls(bind, local.port(), &config.entry_file, lan_address_for(bind));

    println!("\n🚀 启动内置HTTP服务器...");
    print_urls(&urls);
    println!("\n按Ctrl+C停止服务器\n");
    tracing::info!(addr = %local, site_dir = %config.site_dir.display(), "Built-in server listening");

    if let Some(url) = urls.first() {
        open_or_report(browser, url);
    }

    axum::serve(listener, site_router(&config.site_dir, config.cors))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(LaunchError::Serve)?;

    Ok(ServeExit::Interrupted)
}
