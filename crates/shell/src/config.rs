//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use landacq_client::ClientConfig;
use landacq_core::ProjectId;
use landacq_navigation::NavigationContext;

#[derive(Parser, Debug)]
#[command(name = "landacq-shell")]
#[command(version, about = "Role-scoped navigation shell for the land acquisition system")]
pub struct Cli {
    /// Backend origin.
    #[arg(long, env = "LANDACQ_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Token store file. Defaults to the user data directory.
    #[arg(long = "storage", env = "LANDACQ_STORAGE_PATH", value_name = "PATH")]
    pub storage: Option<PathBuf>,

    #[arg(long, env = "LANDACQ_POLL_INTERVAL_SECS", default_value_t = 30)]
    pub poll_interval_secs: u64,

    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Render the shell for a path with the stored session.
    Render {
        path: String,
        #[arg(long)]
        project_id: Option<ProjectId>,
        #[arg(long)]
        project_name: Option<String>,
        #[arg(long)]
        plan_name: Option<String>,
        #[arg(long)]
        lot_name: Option<String>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Sign in and store the session.
    Login { email: String, password: String },
    /// Clear the stored session.
    Logout,
    /// Show the stored session.
    Whoami,
    /// Print badge counts as they change until interrupted.
    WatchBadges,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url).with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    /// Zero falls back to one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Command {
    /// Navigation hints given on the command line.
    pub fn navigation_context(&self) -> NavigationContext {
        match self {
            Command::Render {
                project_id,
                project_name,
                plan_name,
                lot_name,
                ..
            } => NavigationContext {
                project_id: project_id.clone(),
                project_name: project_name.clone(),
                plan_name: plan_name.clone(),
                lot_name: lot_name.clone(),
            },
            _ => NavigationContext::default(),
        }
    }
}
