// Project and session repository over local storage
use crate::application::project_repository::{ProjectRepository, SessionRepository};
use crate::domain::dashboard::DashboardConfig;
use crate::domain::session::UserSession;
use crate::infrastructure::local_storage::LocalStorage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const PROJECTS_KEY: &str = "dashboard-projects";
pub const USER_KEY: &str = "dashboard-user";

/// Projects live as one JSON array under `PROJECTS_KEY`; the signed-in user
/// under `USER_KEY`. Saves and loads wait for the configured latency first,
/// standing in for a remote round trip.
#[derive(Debug, Clone)]
pub struct LocalProjectRepository {
    storage: Arc<LocalStorage>,
    save_latency: Duration,
    load_latency: Duration,
}

impl LocalProjectRepository {
    pub fn new(storage: Arc<LocalStorage>, save_latency: Duration, load_latency: Duration) -> Self {
        Self {
            storage,
            save_latency,
            load_latency,
        }
    }

    async fn read_projects(&self) -> Result<Vec<DashboardConfig>> {
        match self.storage.get_item(PROJECTS_KEY).await {
            Some(text) => serde_json::from_str(&text).context("Failed to parse saved projects"),
            None => Ok(Vec::new()),
        }
    }

    async fn write_projects(&self, projects: &[DashboardConfig]) -> Result<()> {
        let text = serde_json::to_string(projects).context("Failed to encode projects")?;
        self.storage.set_item(PROJECTS_KEY, text).await
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl ProjectRepository for LocalProjectRepository {
    async fn list(&self) -> Result<Vec<DashboardConfig>> {
        self.read_projects().await
    }

    async fn save(&self, config: &DashboardConfig) -> Result<()> {
        simulate_latency(self.save_latency).await;

        let mut projects = self.read_projects().await?;
        match projects.iter_mut().find(|p| p.id == config.id) {
            Some(existing) => *existing = config.clone(),
            None => projects.push(config.clone()),
        }

        tracing::debug!("Writing {} project(s) to storage", projects.len());
        self.write_projects(&projects).await
    }

    async fn load(&self, id: &str) -> Result<Option<DashboardConfig>> {
        simulate_latency(self.load_latency).await;

        let projects = self.read_projects().await?;
        Ok(projects.into_iter().find(|p| p.id == id))
    }
}

#[async_trait]
impl SessionRepository for LocalProjectRepository {
    async fn current_user(&self) -> Result<Option<UserSession>> {
        match self.storage.get_item(USER_KEY).await {
            Some(text) => {
                let user = serde_json::from_str(&text).context("Failed to parse user session")?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn set_current_user(&self, user: Option<&UserSession>) -> Result<()> {
        match user {
            Some(user) => {
                let text = serde_json::to_string(user).context("Failed to encode user session")?;
                self.storage.set_item(USER_KEY, text).await
            }
            None => self.storage.remove_item(USER_KEY).await,
        }
    }
}
