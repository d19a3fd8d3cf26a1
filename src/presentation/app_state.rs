// Application state for HTTP handlers
use crate::application::project_repository::SessionRepository;
use crate::application::store_scope::StoreScope;
use crate::infrastructure::notification_surface::BroadcastSurface;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub scope: StoreScope,
    pub notifications: BroadcastSurface,
    pub sessions: Arc<dyn SessionRepository>,
}
