// HTTP request handlers
use crate::application::dashboard_store::{DashboardStore, EditorState, ProjectSummary};
use crate::application::error::StoreError;
use crate::application::history::HistoryItem;
use crate::domain::component::{ComponentPatch, DashboardComponent, GridPosition};
use crate::domain::dashboard::{Breakpoint, ConfigPatch, DashboardConfig, Layout, SectionPatch};
use crate::domain::session::UserSession;
use crate::infrastructure::chunked_json;
use crate::infrastructure::http_response::{accepts_brotli, attachment_response, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type HandlerResult = Result<Response, StoreError>;

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Document plus the editor state consumers re-render from
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView<'a> {
    pub config: &'a DashboardConfig,
    pub editor: &'a EditorState,
    pub can_undo: bool,
    pub can_redo: bool,
    pub history_length: usize,
    pub history_cursor: Option<usize>,
}

impl<'a> From<&'a DashboardStore> for DocumentView<'a> {
    fn from(store: &'a DashboardStore) -> Self {
        Self {
            config: store.config(),
            editor: store.editor(),
            can_undo: store.can_undo(),
            can_redo: store.can_redo(),
            history_length: store.history().len(),
            history_cursor: store.history().cursor(),
        }
    }
}

fn document(store: &DashboardStore) -> Response {
    Json(DocumentView::from(store)).into_response()
}

#[derive(Deserialize)]
pub struct SectionQuery {
    pub section: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorUpdate {
    #[serde(default, deserialize_with = "crate::domain::component::nullable")]
    pub selected_component: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::domain::component::nullable")]
    pub selected_section: Option<Option<String>>,
    pub preview_mode: Option<bool>,
    pub current_breakpoint: Option<Breakpoint>,
    pub show_grid: Option<bool>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current document, Brotli-compressed when the client allows it
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> HandlerResult {
    let store = state.scope.lock().await?;
    let view = DocumentView::from(&*store);
    Ok(match json_response(&view, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}

/// Download the document as a JSON artifact; never mutates it
pub async fn export_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> HandlerResult {
    let store = state.scope.lock().await?;
    let filename = export_filename(&store.config().name);
    Ok(
        match attachment_response(store.config(), &filename, accepts_brotli(&headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
    )
}

pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ConfigPatch>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.update_config(patch);
    Ok(document(&store))
}

pub async fn update_layout(
    State(state): State<Arc<AppState>>,
    Json(layout): Json<Layout>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.update_layout(layout);
    Ok(document(&store))
}

pub async fn add_component(
    Query(query): Query<SectionQuery>,
    State(state): State<Arc<AppState>>,
    Json(component): Json<DashboardComponent>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.add_component(component, query.section.as_deref());
    Ok(document(&store))
}

pub async fn update_component(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ComponentPatch>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.update_component(&id, patch);
    Ok(document(&store))
}

pub async fn remove_component(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.remove_component(&id);
    Ok(document(&store))
}

pub async fn duplicate_component(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.duplicate_component(&id);
    Ok(document(&store))
}

pub async fn move_component(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(position): Json<GridPosition>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.move_component(&id, position);
    Ok(document(&store))
}

pub async fn update_section(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SectionPatch>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.update_layout_section(&id, patch);
    Ok(document(&store))
}

pub async fn toggle_section(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.toggle_section_visibility(&id);
    Ok(document(&store))
}

pub async fn undo(State(state): State<Arc<AppState>>) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.undo();
    Ok(document(&store))
}

pub async fn redo(State(state): State<Arc<AppState>>) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.redo();
    Ok(document(&store))
}

pub async fn list_history(State(state): State<Arc<AppState>>) -> Result<Json<Vec<HistoryItem>>, StoreError> {
    let store = state.scope.lock().await?;
    Ok(Json(store.history().items()))
}

pub async fn update_editor(
    State(state): State<Arc<AppState>>,
    Json(update): Json<EditorUpdate>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    if let Some(selected) = update.selected_component {
        store.select_component(selected);
    }
    if let Some(selected) = update.selected_section {
        store.select_section(selected);
    }
    if let Some(preview) = update.preview_mode {
        store.set_preview_mode(preview);
    }
    if let Some(breakpoint) = update.current_breakpoint {
        store.set_current_breakpoint(breakpoint);
    }
    if let Some(show) = update.show_grid {
        store.set_show_grid(show);
    }
    Ok(document(&store))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectSummary>>, StoreError> {
    let store = state.scope.lock().await?;
    Ok(Json(store.list_projects().await))
}

pub async fn save_project(State(state): State<Arc<AppState>>) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.save_project().await;
    Ok(document(&store))
}

pub async fn load_project(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.load_project(&id).await;
    Ok(document(&store))
}

pub async fn new_project(State(state): State<Arc<AppState>>) -> HandlerResult {
    let mut store = state.scope.lock().await?;
    store.create_new_project();
    Ok(document(&store))
}

/// Store the mock session record that gates auto-save
pub async fn put_session(
    State(state): State<Arc<AppState>>,
    Json(user): Json<UserSession>,
) -> Response {
    match state.sessions.set_current_user(Some(&user)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Error storing session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn delete_session(State(state): State<Arc<AppState>>) -> Response {
    match state.sessions.set_current_user(None).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Error clearing session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Live notification feed
pub async fn stream_notifications(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.notifications.subscribe();
    chunked_json::stream_notifications(rx, accepts_brotli(&headers))
}

/// File name for an exported document: lowercase, non-alphanumerics as dashes
fn export_filename(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    if slug.is_empty() {
        "dashboard-project.json".to_string()
    } else {
        format!("{}.json", slug)
    }
}
