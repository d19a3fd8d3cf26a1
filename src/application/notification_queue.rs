// Notification queue - Deferred, order-preserving delivery of status messages
use crate::domain::notification::{Notification, NotificationKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};

/// Where notifications end up (toast area, log, subscriber stream).
/// Fire-and-forget: implementations must not panic.
pub trait NotificationSurface: Send + Sync {
    fn show(&self, notification: &Notification);
}

#[derive(Clone)]
pub struct NotificationQueue {
    state: Arc<QueueState>,
}

struct QueueState {
    pending: Mutex<Vec<Notification>>,
    draining: AtomicBool,
    alive: AtomicBool,
    surface: Arc<dyn NotificationSurface>,
    delay: Duration,
}

impl NotificationQueue {
    /// Delivery needs a current-thread tokio runtime. On any other runtime,
    /// or outside one, messages stay pending until an enqueue happens on a
    /// current-thread runtime.
    pub fn new(surface: Arc<dyn NotificationSurface>, delay: Duration) -> Self {
        Self {
            state: Arc::new(QueueState {
                pending: Mutex::new(Vec::new()),
                draining: AtomicBool::new(false),
                alive: AtomicBool::new(true),
                surface,
                delay,
            }),
        }
    }

    pub fn enqueue(&self, message: impl Into<String>, kind: NotificationKind) {
        if !self.is_alive() {
            return;
        }

        self.state
            .pending
            .lock()
            .push(Notification::new(message, kind));
        self.schedule_drain();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.enqueue(message, NotificationKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.enqueue(message, NotificationKind::Error);
    }

    /// Tear the queue down: pending messages are dropped, later enqueues are
    /// ignored and an in-flight drain stops before its next delivery.
    pub fn dispose(&self) {
        self.state.alive.store(false, Ordering::Release);
        self.state.pending.lock().clear();
    }

    pub fn is_alive(&self) -> bool {
        self.state.alive.load(Ordering::Acquire)
    }

    pub fn pending_len(&self) -> usize {
        self.state.pending.lock().len()
    }

    /// Spawn the drain task unless one is already running. On a
    /// current-thread runtime the task cannot start until the enqueuing
    /// caller yields, so delivery never lands inside the caller's work.
    fn schedule_drain(&self) {
        if self.state.draining.swap(true, Ordering::AcqRel) {
            return;
        }

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::CurrentThread => {
                handle.spawn(drain(self.state.clone()));
            }
            Ok(_) => {
                tracing::warn!("Notification queued on a multi-thread runtime, delivery held");
                self.state.draining.store(false, Ordering::Release);
            }
            Err(_) => {
                tracing::warn!("Notification queued outside of a runtime, delivery held");
                self.state.draining.store(false, Ordering::Release);
            }
        }
    }
}

async fn drain(state: Arc<QueueState>) {
    tokio::task::yield_now().await;
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    loop {
        if !state.alive.load(Ordering::Acquire) {
            state.draining.store(false, Ordering::Release);
            return;
        }

        let batch = std::mem::take(&mut *state.pending.lock());
        if batch.is_empty() {
            state.draining.store(false, Ordering::Release);
            // Something may have landed between the take and the flag reset.
            if state.pending.lock().is_empty() || state.draining.swap(true, Ordering::AcqRel) {
                return;
            }
            continue;
        }

        tracing::debug!("Delivering {} notification(s)", batch.len());
        for notification in &batch {
            if !state.alive.load(Ordering::Acquire) {
                state.draining.store(false, Ordering::Release);
                return;
            }
            state.surface.show(notification);
        }
    }
}

/// Surface that records every delivery, for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSurface {
    delivered: Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingSurface {
    pub(crate) fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.delivered
            .lock()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

#[cfg(test)]
impl NotificationSurface for RecordingSurface {
    fn show(&self, notification: &Notification) {
        self.delivered.lock().push(notification.clone());
    }
}
