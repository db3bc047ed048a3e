use std::sync::Arc;

use async_trait::async_trait;

use landacq_navigation::BadgeKind;

use crate::{BackendClient, ClientError};

/// Anything that can report a badge count for a session token.
#[async_trait]
pub trait UnreadCountSource: Send + Sync {
    async fn fetch_count(&self, kind: BadgeKind, token: &str) -> Result<u32, ClientError>;
}

#[async_trait]
impl<S> UnreadCountSource for Arc<S>
where
    S: UnreadCountSource + ?Sized,
{
    async fn fetch_count(&self, kind: BadgeKind, token: &str) -> Result<u32, ClientError> {
        (**self).fetch_count(kind, token).await
    }
}

#[async_trait]
impl UnreadCountSource for BackendClient {
    async fn fetch_count(&self, kind: BadgeKind, token: &str) -> Result<u32, ClientError> {
        match kind {
            BadgeKind::UnreadMessages => self.unread_messages(token).await,
            BadgeKind::PendingUsers => self.pending_users(token).await,
            BadgeKind::PendingProjects => self.pending_projects(token).await,
            BadgeKind::Notifications => self.unread_notifications(token).await,
        }
    }
}
