// Store scope - Explicit owner of the one live store, injected into consumers
use crate::application::dashboard_store::DashboardStore;
use crate::application::error::StoreError;
use std::sync::Arc;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

/// Shared slot holding the installed store.
///
/// Consumers get a handle to the slot, not to the store itself, so reaching
/// for the store before `install` or after `teardown` is reported as an error
/// instead of quietly acting on a missing document.
#[derive(Clone, Default)]
pub struct StoreScope {
    slot: Arc<Mutex<Option<DashboardStore>>>,
}

impl StoreScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn install(&self, store: DashboardStore) {
        if let Some(previous) = self.slot.lock().await.replace(store) {
            previous.dispose();
        }
    }

    pub async fn lock(&self) -> Result<MappedMutexGuard<'_, DashboardStore>, StoreError> {
        let guard = self.slot.lock().await;
        MutexGuard::try_map(guard, |slot| slot.as_mut())
            .map_err(|_| StoreError::OutsideScope("no dashboard store is installed"))
    }

    pub async fn is_active(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Remove the store and silence its notification queue.
    pub async fn teardown(&self) {
        if let Some(store) = self.slot.lock().await.take() {
            store.dispose();
            tracing::debug!("Dashboard store torn down");
        }
    }
}
