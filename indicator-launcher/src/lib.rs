//! Indicator Launcher Library
//!
//! Serves the static indicator site from a local directory and opens its
//! entry page in the default browser.
//!
//! Two serving paths are offered:
//! - **Node.js**: `npx http-server` as a child process, used when both
//!   `node --version` and `npx --version` succeed
//! - **Built-in**: an in-process `axum` server backed by `tower-http`'s
//!   `ServeDir`, used on request or as the fallback
//!
//! Nothing is checked, spawned or bound when the entry page is missing.

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod browser;
pub mod builtin;
pub mod error;
pub mod external;
pub mod launcher;
pub mod menu;
pub mod network;
pub mod shutdown;
pub mod toolchain;

pub use browser::{BrowserOpener, NoBrowser, SystemBrowser};
pub use builtin::{serve_builtin, site_router};
pub use error::LaunchError;
pub use external::ServerCommand;
pub use launcher::{LaunchOutcome, LaunchPlan, Launcher};
pub use menu::{prompt_choice, LaunchChoice};
pub use shutdown::{shutdown_signal, ServeExit};
pub use toolchain::{NodeRuntime, SystemToolchain, Toolchain};
