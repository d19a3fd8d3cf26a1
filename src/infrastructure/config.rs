use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub log: LogSettings,
    pub history: HistorySettings,
    pub notifications: NotificationSettings,
    pub storage: StorageSettings,
    pub auto_save: AutoSaveSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub drain_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Backing file for the key-value store; in-memory when unset
    #[serde(default)]
    pub path: Option<String>,
    pub save_latency_ms: u64,
    pub load_latency_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AutoSaveSettings {
    pub enabled: bool,
    pub interval_secs: u64,
}

impl NotificationSettings {
    pub fn drain_delay(&self) -> Duration {
        Duration::from_millis(self.drain_delay_ms)
    }
}

impl StorageSettings {
    pub fn save_latency(&self) -> Duration {
        Duration::from_millis(self.save_latency_ms)
    }

    pub fn load_latency(&self) -> Duration {
        Duration::from_millis(self.load_latency_ms)
    }
}

impl AutoSaveSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("log.level", "info")?
        .set_default("history.capacity", 50)?
        .set_default("notifications.drain_delay_ms", 50)?
        .set_default("storage.save_latency_ms", 1000)?
        .set_default("storage.load_latency_ms", 500)?
        .set_default("auto_save.enabled", true)?
        .set_default("auto_save.interval_secs", 30)
}

/// Defaults, then `config/app.*` if present, then `DASHBOARD__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
