//! `landacq-shell`: the role-scoped application shell.
//!
//! Ties the session store, route guards, sidebar menus, breadcrumbs and live
//! badge counts together into one composed view per navigation.

pub mod badge;
pub mod config;
pub mod render;
pub mod shell;

pub use badge::{BadgeCounts, BadgePoller, BadgePollerHandle, DEFAULT_POLL_INTERVAL};
pub use config::{Cli, Command};
pub use render::{breadcrumb_line, render_outcome, render_view};
pub use shell::{MenuEntry, PageRequest, Shell, ShellOutcome, ShellView};
