// Auto-save - Periodic background save while a user session exists
use crate::application::project_repository::SessionRepository;
use crate::application::store_scope::StoreScope;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the auto-save timer. The task ends once the store leaves its scope.
pub fn spawn_auto_save(
    scope: StoreScope,
    sessions: Arc<dyn SessionRepository>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match sessions.current_user().await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::trace!("No user session, skipping auto-save");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Could not read user session: {}", e);
                    continue;
                }
            }

            let mut store = match scope.lock().await {
                Ok(store) => store,
                Err(e) => {
                    tracing::debug!("Stopping auto-save: {}", e);
                    break;
                }
            };

            tracing::debug!("Auto-saving project {}", store.config().id);
            if let Err(e) = store.auto_save().await {
                tracing::warn!("Auto-save failed: {}", e);
            }
        }
    })
}
