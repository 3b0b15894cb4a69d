use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub navigation: NavigationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted token file
    pub storage_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub verify_redirect_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .set_default("api.base_url", "http://localhost:8000")?
            .set_default("session.storage_dir", "./.conversight")?
            .set_default("navigation.verify_redirect_delay_ms", 3000)?
            .set_default("logging.level", "info")?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Settings pointing at an arbitrary backend, with no redirect delay.
    /// Used by tests and embedders that do not read configuration files.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            session: SessionConfig {
                storage_dir: PathBuf::from("./.conversight"),
            },
            navigation: NavigationConfig {
                verify_redirect_delay_ms: 0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    pub fn verify_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.navigation.verify_redirect_delay_ms)
    }
}
