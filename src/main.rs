// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    Router,
    routing::{get, patch, post, put},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::auto_save::spawn_auto_save;
use crate::application::dashboard_store::DashboardStore;
use crate::application::notification_queue::NotificationQueue;
use crate::application::store_scope::StoreScope;
use crate::domain::dashboard::DashboardConfig;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::local_storage::LocalStorage;
use crate::infrastructure::notification_surface::BroadcastSurface;
use crate::infrastructure::project_store::LocalProjectRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers;

const NOTIFICATION_SUBSCRIBER_BUFFER: usize = 64;

// One event loop: store mutations and notification drains never run in parallel.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_app_config()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .init();

    // Storage and repositories (infrastructure layer)
    let storage = match &config.storage.path {
        Some(path) => LocalStorage::open(path).await?,
        None => LocalStorage::in_memory(),
    };
    let repository = Arc::new(LocalProjectRepository::new(
        Arc::new(storage),
        config.storage.save_latency(),
        config.storage.load_latency(),
    ));

    // Store, history and notifications (application layer)
    let surface = BroadcastSurface::new(NOTIFICATION_SUBSCRIBER_BUFFER);
    let notifications =
        NotificationQueue::new(Arc::new(surface.clone()), config.notifications.drain_delay());
    let store = DashboardStore::new(
        DashboardConfig::new_default(),
        config.history.capacity,
        notifications,
        repository.clone(),
    );
    let scope = StoreScope::new();
    scope.install(store).await;

    let auto_save = config.auto_save.enabled.then(|| {
        spawn_auto_save(scope.clone(), repository.clone(), config.auto_save.interval())
    });

    // Create application state
    let state = Arc::new(AppState {
        scope: scope.clone(),
        notifications: surface,
        sessions: repository,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(handlers::health_check))
        .route(
            "/dashboard",
            get(handlers::get_dashboard).patch(handlers::update_config),
        )
        .route("/dashboard/layout", put(handlers::update_layout))
        .route("/dashboard/export", get(handlers::export_dashboard))
        .route("/components", post(handlers::add_component))
        .route(
            "/components/:id",
            patch(handlers::update_component).delete(handlers::remove_component),
        )
        .route("/components/:id/duplicate", post(handlers::duplicate_component))
        .route("/components/:id/move", post(handlers::move_component))
        .route("/sections/:id", patch(handlers::update_section))
        .route("/sections/:id/toggle", post(handlers::toggle_section))
        .route("/history", get(handlers::list_history))
        .route("/history/undo", post(handlers::undo))
        .route("/history/redo", post(handlers::redo))
        .route("/editor", patch(handlers::update_editor))
        .route("/projects", get(handlers::list_projects))
        .route("/projects/save", post(handlers::save_project))
        .route("/projects/new", post(handlers::new_project))
        .route("/projects/:id/load", post(handlers::load_project))
        .route(
            "/session",
            put(handlers::put_session).delete(handlers::delete_session),
        )
        .route("/notifications", get(handlers::stream_notifications))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting dashboard-studio on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some(handle) = auto_save {
        handle.abort();
    }
    scope.teardown().await;
    tracing::info!("Shut down");

    Ok(())
}
