//! Background refresh of sidebar badge counts.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

use landacq_auth::{KeyValueStore, SessionStore};
use landacq_client::UnreadCountSource;
use landacq_navigation::{BadgeKind, menu_for};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Latest known badge values. Zero means "nothing to show".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BadgeCounts {
    pub unread_messages: u32,
    pub pending_users: u32,
    pub pending_projects: u32,
    pub notifications: u32,
}

impl BadgeCounts {
    pub fn get(&self, kind: BadgeKind) -> u32 {
        match kind {
            BadgeKind::UnreadMessages => self.unread_messages,
            BadgeKind::PendingUsers => self.pending_users,
            BadgeKind::PendingProjects => self.pending_projects,
            BadgeKind::Notifications => self.notifications,
        }
    }

    pub fn set(&mut self, kind: BadgeKind, value: u32) {
        match kind {
            BadgeKind::UnreadMessages => self.unread_messages = value,
            BadgeKind::PendingUsers => self.pending_users = value,
            BadgeKind::PendingProjects => self.pending_projects = value,
            BadgeKind::Notifications => self.notifications = value,
        }
    }
}

/// Polls the count endpoints the current role's menu needs, plus the
/// top-bar notification count every session gets.
///
/// A refresh happens on every interval tick (missed ticks are skipped), on
/// every token-store change, and on [`BadgePollerHandle::refresh`]. Failures
/// never escape: a failed count is logged and shown as zero.
pub struct BadgePoller<S, C> {
    sessions: SessionStore<S>,
    source: C,
    interval: Duration,
    counts: watch::Sender<BadgeCounts>,
}

/// Control handle for a running poller.
pub struct BadgePollerHandle {
    shutdown: Arc<Notify>,
    refresh: Arc<Notify>,
    counts: watch::Receiver<BadgeCounts>,
    task: JoinHandle<()>,
}

impl<S, C> BadgePoller<S, C>
where
    S: KeyValueStore + 'static,
    C: UnreadCountSource + 'static,
{
    pub fn new(sessions: SessionStore<S>, source: C) -> Self {
        Self {
            sessions,
            source,
            interval: DEFAULT_POLL_INTERVAL,
            counts: watch::Sender::new(BadgeCounts::default()),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<BadgeCounts> {
        self.counts.subscribe()
    }

    /// Fetch every badge once and publish the result.
    pub async fn poll_once(&self) -> BadgeCounts {
        let mut counts = BadgeCounts::default();

        let Some(token) = self.sessions.token() else {
            tracing::debug!("no session token; badges cleared");
            self.counts.send_replace(counts);
            return counts;
        };

        let role = self.sessions.current().and_then(|s| s.role());
        let mut kinds = menu_for(role).badge_kinds();
        kinds.push(BadgeKind::Notifications);
        for kind in kinds {
            match self.source.fetch_count(kind, &token).await {
                Ok(value) => counts.set(kind, value),
                Err(error) => {
                    tracing::warn!(?kind, %error, "badge count fetch failed; showing zero");
                    counts.set(kind, 0);
                }
            }
        }

        self.counts.send_replace(counts);
        counts
    }

    /// Spawn the polling loop. The first poll runs immediately.
    pub fn start(self) -> BadgePollerHandle {
        let shutdown = Arc::new(Notify::new());
        let refresh = Arc::new(Notify::new());
        let counts = self.subscribe();

        let task = tokio::spawn({
            let shutdown = shutdown.clone();
            let refresh = refresh.clone();
            async move {
                tracing::info!(interval_secs = self.interval.as_secs(), "badge poller started");

                let mut ticker = tokio::time::interval(self.interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                let mut store_changes = self.sessions.changes();
                let mut feed_open = true;

                loop {
                    tokio::select! {
                        biased;
                        _ = shutdown.notified() => {
                            tracing::info!("badge poller received shutdown signal");
                            break;
                        }
                        _ = ticker.tick() => {}
                        changed = store_changes.changed(), if feed_open => {
                            if changed.is_err() {
                                feed_open = false;
                                continue;
                            }
                            tracing::debug!("token store changed; refreshing badges");
                        }
                        _ = refresh.notified() => {
                            tracing::debug!("manual badge refresh");
                        }
                    }

                    self.poll_once().await;
                }
            }
        });

        BadgePollerHandle {
            shutdown,
            refresh,
            counts,
            task,
        }
    }
}

impl BadgePollerHandle {
    /// Request an immediate refresh.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn counts(&self) -> watch::Receiver<BadgeCounts> {
        self.counts.clone()
    }

    pub fn latest(&self) -> BadgeCounts {
        *self.counts.borrow()
    }

    /// Stop the loop and wait for it to exit. An in-flight poll completes
    /// first.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "badge poller task ended abnormally");
        }
    }
}
