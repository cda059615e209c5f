use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub timing: TimingSettings,
    #[serde(default)]
    pub login: Option<LoginSettings>,
    #[serde(default)]
    pub workflow: WorkflowSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    /// Session file. Without one the session lives only as long as the process.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimingSettings {
    pub notification_ttl_ms: u64,
    pub metrics_interval_ms: u64,
}

impl TimingSettings {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginSettings {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorkflowSettings {
    pub dataset: Option<PathBuf>,
    pub algorithm: Option<String>,
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("timing.notification_ttl_ms", 3000)?
        .set_default("timing.metrics_interval_ms", 5000)?)
}

/// Defaults, then `config/client.*` if present, then `MODELSPHERE__*` variables.
pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/client").required(false))
        .add_source(config::Environment::with_prefix("MODELSPHERE").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> ClientConfig {
        builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timing.notification_ttl(), Duration::from_millis(3000));
        assert_eq!(config.timing.metrics_interval(), Duration::from_millis(5000));
        assert!(config.storage.path.is_none());
        assert!(config.login.is_none());
        assert!(config.workflow.dataset.is_none());
    }

    #[test]
    fn test_file_overrides() {
        let config = from_toml(
            r#"
            [api]
            base_url = "https://models.example.com/api"
            timeout_secs = 30

            [storage]
            path = "state/session.json"

            [login]
            email = "admin@modelsphere.ai"
            password = "secret1"

            [workflow]
            dataset = "data.csv"
            algorithm = "Random Forest"
            "#,
        );
        assert_eq!(config.api.base_url, "https://models.example.com/api");
        assert_eq!(config.api.timeout_secs, Some(30));
        assert_eq!(config.storage.path, Some(PathBuf::from("state/session.json")));
        assert_eq!(config.login.unwrap().email, "admin@modelsphere.ai");
        assert_eq!(config.workflow.algorithm.as_deref(), Some("Random Forest"));
    }
}
