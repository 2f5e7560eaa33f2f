//! Notifications and the notification panel state.

use serde::{Deserialize, Serialize};

use crate::api::Backend;
use crate::error::EventlyResult;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    /// The event this notification is about (an invitation, an update)
    #[serde(default)]
    pub event_id: Option<String>,
}

/// Badge count plus notification list for the signed-in user.
///
/// The list only changes after a successful refetch; failed actions are
/// logged and leave it untouched.
#[derive(Debug, Default)]
pub struct NotificationPanel {
    notifications: Vec<Notification>,
    unread_count: u64,
}

impl NotificationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| !n.read)
    }

    /// Fetch the list and the unread count. Both must succeed before either is applied.
    pub async fn refresh<B: Backend>(
        &mut self,
        backend: &B,
        session: &Session,
    ) -> EventlyResult<()> {
        let fetched = async {
            let notifications = backend.notifications(session).await?;
            let unread_count = backend.unread_count(session).await?;
            Ok::<_, crate::error::EventlyError>((notifications, unread_count))
        }
        .await;

        match fetched {
            Ok((notifications, unread_count)) => {
                self.notifications = notifications;
                self.unread_count = unread_count;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to fetch notifications: {e}");
                Err(e)
            }
        }
    }

    /// Mark one notification as read, then refetch.
    pub async fn acknowledge<B: Backend>(
        &mut self,
        backend: &B,
        session: &Session,
        notification_id: &str,
    ) -> EventlyResult<()> {
        if let Err(e) = backend.mark_read(session, notification_id).await {
            tracing::warn!(notification_id, "failed to mark notification as read: {e}");
            return Err(e);
        }
        self.refresh(backend, session).await
    }

    /// Remove the signed-in user from the event's participants, then refetch.
    ///
    /// Whether the backend also deletes or resolves the notification is up
    /// to the backend; the refreshed list reflects whatever it did.
    pub async fn decline<B: Backend>(
        &mut self,
        backend: &B,
        session: &Session,
        event_id: &str,
    ) -> EventlyResult<()> {
        if let Err(e) = backend.decline(session, event_id).await {
            tracing::warn!(event_id, "failed to decline participation: {e}");
            return Err(e);
        }
        self.refresh(backend, session).await
    }
}
