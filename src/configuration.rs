use serde;
use std::time::Duration;

/// Missing keys fall back to [`Settings::default`]. `HOST` and `PORT` are
/// accepted for `APP_HOST` and `APP_PORT`; setting both spellings is an error.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    #[serde(alias = "host")]
    pub app_host: String,
    #[serde(alias = "port")]
    pub app_port: u16,
    pub debug: bool,
    pub log_level: String,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    /// Seconds; shared by every probe unless overridden below.
    pub health_check_timeout: f64,
    pub database_timeout: Option<f64>,
    pub redis_timeout: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Health Check Service".to_string(),
            app_host: "0.0.0.0".to_string(),
            app_port: 8000,
            debug: false,
            log_level: "info".to_string(),
            database_url: None,
            redis_url: None,
            health_check_timeout: 5.0,
            database_timeout: None,
            redis_timeout: None,
        }
    }
}

/// Connection string and probe timeout for one dependency.
/// `url == None` means the dependency is not configured.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencySettings {
    pub url: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthCheckSettings {
    pub database: DependencySettings,
    pub redis: DependencySettings,
}

impl Settings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }

    pub fn health_checks(&self) -> Result<HealthCheckSettings, config::ConfigError> {
        Ok(HealthCheckSettings {
            database: DependencySettings {
                url: configured(&self.database_url),
                timeout: timeout_from_secs(
                    "database_timeout",
                    self.database_timeout.unwrap_or(self.health_check_timeout),
                )?,
            },
            redis: DependencySettings {
                url: configured(&self.redis_url),
                timeout: timeout_from_secs(
                    "redis_timeout",
                    self.redis_timeout.unwrap_or(self.health_check_timeout),
                )?,
            },
        })
    }
}

// An empty connection string counts as "not configured".
fn configured(url: &Option<String>) -> Option<String> {
    url.as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

fn timeout_from_secs(key: &str, secs: f64) -> Result<Duration, config::ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(config::ConfigError::Message(format!(
            "{} must be a positive number of seconds, got {}",
            key, secs
        )));
    }

    Duration::try_from_secs_f64(secs)
        .map_err(|err| config::ConfigError::Message(format!("{}: {}", key, err)))
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    load(config::Environment::default())
}

/// An optional `configuration` file (.yaml, .toml, .json), then the
/// environment, over the defaults.
pub fn load(environment: config::Environment) -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(environment.try_parsing(true))
        .build()?
        .try_deserialize()
}
