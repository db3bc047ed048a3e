use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use landacq_auth::{FileStore, SessionStore, display_name, validate_claims};
use landacq_client::BackendClient;
use landacq_navigation::{Access, access_for};
use landacq_shell::{BadgePoller, Cli, Command, Shell, render_outcome};

/// How often `watch-badges` re-reads the store file for logins made by
/// other processes.
const STORE_RELOAD_INTERVAL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    landacq_observability::init();

    let cli = Cli::parse();

    let path = match &cli.storage {
        Some(path) => path.clone(),
        None => FileStore::default_path().context("no data directory available; pass --storage")?,
    };
    let store = Arc::new(
        FileStore::open(&path).with_context(|| format!("failed to open token store {}", path.display()))?,
    );
    tracing::debug!(path = %store.path().display(), "token store opened");
    let sessions = SessionStore::new(store.clone());
    let client = BackendClient::new(cli.client_config()).context("failed to build HTTP client")?;

    match &cli.command {
        Command::Render { path, json, .. } => {
            // One-shot poll so the rendered sidebar shows current badges.
            let poller = BadgePoller::new(sessions.clone(), client);
            poller.poll_once().await;
            let shell = Shell::with_badges(sessions, poller.subscribe());

            let context = cli.command.navigation_context();
            let outcome = shell.render(path, &context, |page| format!("(content of {})", page.path));

            if *json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", render_outcome(&outcome));
            }
        }
        Command::Login { email, password } => {
            let grant = match client.login(email, password).await {
                Ok(grant) => grant,
                Err(e) if e.status() == Some(401) => anyhow::bail!("invalid email or password"),
                Err(e) => return Err(e.into()),
            };
            sessions.establish(&grant)?;
            let home = sessions
                .current()
                .and_then(|s| s.role())
                .map(|r| r.home_path())
                .unwrap_or("/dashboard");
            println!("signed in as {} -> {home}", display_name(grant.user.as_ref()));
        }
        Command::Logout => {
            sessions.logout()?;
            println!("signed out");
        }
        Command::Whoami => match sessions.current() {
            Some(session) => {
                let now = Utc::now();
                println!("user:    {}", display_name(sessions.profile().as_ref()));
                println!(
                    "role:    {}",
                    session.claims.raw_role.as_deref().unwrap_or("<none>")
                );
                println!("admin:   {}", sessions.is_admin());
                println!(
                    "expires: {}{}",
                    session.claims.expires_at.to_rfc3339(),
                    if validate_claims(&session.claims, now).is_err() { " (expired)" } else { "" }
                );
                let home = session.role().map(|r| r.home_path()).unwrap_or("/dashboard");
                if let Access::Guarded(guard) = access_for(home) {
                    println!("home:    {home} ({})", guard.explain(Some(&session), now).reason);
                }
            }
            None => println!("Guest (not signed in)"),
        },
        Command::WatchBadges => {
            let handle = BadgePoller::new(sessions, client)
                .with_interval(cli.poll_interval())
                .start();
            let mut counts = handle.counts();

            let reloader = tokio::spawn({
                let store = store.clone();
                async move {
                    let mut ticker = tokio::time::interval(STORE_RELOAD_INTERVAL);
                    loop {
                        ticker.tick().await;
                        if let Err(e) = store.reload() {
                            tracing::warn!(error = %e, "failed to reload token store");
                        }
                    }
                }
            });

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = counts.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let c = *counts.borrow_and_update();
                        println!(
                            "messages={} pending_users={} pending_projects={} notifications={}",
                            c.unread_messages, c.pending_users, c.pending_projects, c.notifications
                        );
                    }
                }
            }

            reloader.abort();
            handle.shutdown().await;
        }
    }

    Ok(())
}
