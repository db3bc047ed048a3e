//! Composition of a guarded page: access check, sidebar, breadcrumbs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use landacq_auth::{GuardDecision, KeyValueStore, Role, Session, SessionStore, display_name};
use landacq_navigation::{
    Access, BadgeKind, BreadcrumbItem, Icon, NavigationContext, RouteParams, access_for, derive, is_active,
    menu_for,
};

use crate::BadgeCounts;

/// What a page loader gets to see.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub path: &'a str,
    pub params: RouteParams,
    /// `None` on public pages visited while signed out.
    pub session: Option<&'a Session>,
}

/// One rendered sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub path: &'static str,
    pub label: &'static str,
    pub icon: Icon,
    /// Badge value; zero counts are hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    pub active: bool,
    /// Pinned below the main list.
    pub pinned: bool,
}

/// A fully composed protected page.
#[derive(Debug, Clone, Serialize)]
pub struct ShellView<T> {
    pub role: Option<Role>,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub footer: &'static str,
    pub user: String,
    /// Unread notifications for the top bar.
    pub notifications: u32,
    pub menu: Vec<MenuEntry>,
    pub breadcrumbs: Vec<BreadcrumbItem>,
    pub content: T,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShellOutcome<T> {
    /// Navigation was refused; nothing was loaded.
    Redirect { target: &'static str },
    /// Public page, rendered without the sidebar.
    Public { content: T },
    Page(ShellView<T>),
}

impl<T> ShellOutcome<T> {
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            ShellOutcome::Redirect { target } => Some(*target),
            _ => None,
        }
    }
}

/// Role-scoped application shell.
pub struct Shell<S> {
    sessions: SessionStore<S>,
    badges: watch::Receiver<BadgeCounts>,
}

impl<S: KeyValueStore> Shell<S> {
    /// Shell without live badges (every badge reads zero).
    pub fn new(sessions: SessionStore<S>) -> Self {
        let (_, badges) = watch::channel(BadgeCounts::default());
        Self { sessions, badges }
    }

    /// Shell reading badge values from a poller.
    pub fn with_badges(sessions: SessionStore<S>, badges: watch::Receiver<BadgeCounts>) -> Self {
        Self { sessions, badges }
    }

    pub fn render<T>(
        &self,
        path: &str,
        context: &NavigationContext,
        content: impl FnOnce(&PageRequest<'_>) -> T,
    ) -> ShellOutcome<T> {
        self.render_at(path, context, Utc::now(), content)
    }

    /// Render `path` as of `now`.
    ///
    /// The content loader only runs once access is granted.
    pub fn render_at<T>(
        &self,
        path: &str,
        context: &NavigationContext,
        now: DateTime<Utc>,
        content: impl FnOnce(&PageRequest<'_>) -> T,
    ) -> ShellOutcome<T> {
        let session = self.sessions.current();
        let params = RouteParams::from_path(path);

        let guard = match access_for(path) {
            Access::Public => {
                let request = PageRequest {
                    path,
                    params,
                    session: session.as_ref(),
                };
                return ShellOutcome::Public {
                    content: content(&request),
                };
            }
            Access::Guarded(guard) => guard,
        };

        let claims = match guard.evaluate(session.as_ref(), now) {
            GuardDecision::Allow(claims) => claims,
            denied => {
                let target = denied.redirect_target().unwrap_or(landacq_auth::LOGIN_PATH);
                tracing::info!(path, target, "navigation redirected");
                return ShellOutcome::Redirect { target };
            }
        };

        let menu = menu_for(claims.role);
        let badges = *self.badges.borrow();
        let entries = menu
            .items
            .iter()
            .map(|item| (item, false))
            .chain(menu.bottom_items.iter().map(|item| (item, true)))
            .map(|(item, pinned)| MenuEntry {
                path: item.path,
                label: item.label,
                icon: item.icon,
                badge: item.badge.map(|kind| badges.get(kind)).filter(|n| *n > 0),
                active: is_active(item, path),
                pinned,
            })
            .collect();

        let breadcrumbs = derive(path, &params, context);
        let request = PageRequest {
            path,
            params,
            session: session.as_ref(),
        };
        let content = content(&request);

        ShellOutcome::Page(ShellView {
            role: claims.role,
            title: menu.title,
            subtitle: menu.subtitle,
            footer: menu.footer,
            user: display_name(self.sessions.profile().as_ref()),
            notifications: badges.get(BadgeKind::Notifications),
            menu: entries,
            breadcrumbs,
            content,
        })
    }
}
