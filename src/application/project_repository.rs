// Repository traits for project and session persistence
use crate::domain::dashboard::DashboardConfig;
use crate::domain::session::UserSession;
use async_trait::async_trait;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All saved projects in storage order
    async fn list(&self) -> anyhow::Result<Vec<DashboardConfig>>;

    /// Insert or replace the project with the same id
    async fn save(&self, config: &DashboardConfig) -> anyhow::Result<()>;

    /// Fetch one project by id
    async fn load(&self, id: &str) -> anyhow::Result<Option<DashboardConfig>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn current_user(&self) -> anyhow::Result<Option<UserSession>>;

    async fn set_current_user(&self, user: Option<&UserSession>) -> anyhow::Result<()>;
}
