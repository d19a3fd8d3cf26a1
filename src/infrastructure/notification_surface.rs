// Notification surface that logs and fans out to subscribers
use crate::application::notification_queue::NotificationSurface;
use crate::domain::notification::{Notification, NotificationKind};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct BroadcastSurface {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastSurface {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl NotificationSurface for BroadcastSurface {
    fn show(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(target: "notifications", "{}", notification.message),
            NotificationKind::Error => tracing::warn!(target: "notifications", "{}", notification.message),
        }
        // No subscribers is fine
        let _ = self.sender.send(notification.clone());
    }
}
