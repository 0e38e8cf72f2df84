use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MIDDLEWARE_URL is not a valid URL: {0}")]
    InvalidMiddlewareUrl(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub middleware: MiddlewareConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
}

/// Where change events are pushed after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub source: String,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl MiddlewareConfig {
    pub fn sync_url(&self) -> String {
        format!("{}/sync", self.base_url.trim_end_matches('/'))
    }

    pub fn online_url(&self) -> String {
        format!("{}/notify-online", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup);

        url::Url::parse(&config.middleware.base_url)
            .map_err(|e| ConfigError::InvalidMiddlewareUrl(format!("{}: {}", config.middleware.base_url, e)))?;

        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database
        if let Some(v) = lookup("DB_HOST").filter(|v| !v.is_empty()) {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = lookup("DB_USER").filter(|v| !v.is_empty()) {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_NAME").filter(|v| !v.is_empty()) {
            self.database.name = v;
        }
        if let Some(v) = lookup("DB_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DB_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Server
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("STATIC_DIR").filter(|v| !v.is_empty()) {
            self.server.static_dir = PathBuf::from(v);
        }

        // Middleware
        if let Some(v) = lookup("MIDDLEWARE_URL").filter(|v| !v.is_empty()) {
            self.middleware.base_url = v;
        }
        if let Some(v) = lookup("MIDDLEWARE_TIMEOUT_SECS") {
            self.middleware.timeout_secs = v.parse().unwrap_or(self.middleware.timeout_secs);
        }
        if let Some(v) = lookup("NOTIFY_SOURCE").filter(|v| !v.is_empty()) {
            self.middleware.source = v;
        }

        self
    }

    fn base(max_connections: u32, connect_timeout_secs: u64) -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 3306,
                user: "root".to_string(),
                password: String::new(),
                name: "estudiantes".to_string(),
                max_connections,
                connect_timeout_secs,
            },
            server: ServerConfig {
                port: 8080,
                static_dir: PathBuf::from("./frontend"),
            },
            middleware: MiddlewareConfig {
                base_url: "http://localhost:3001".to_string(),
                timeout_secs: 10,
                source: "estudiantes".to_string(),
            },
        }
    }

    fn development() -> Self {
        Self::base(10, 30)
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            ..Self::base(20, 10)
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            ..Self::base(50, 5)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_development_config() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.middleware.sync_url(), "http://localhost:3001/sync");
        assert_eq!(config.server.static_dir, PathBuf::from("./frontend"));
    }

    #[test]
    fn test_default_production_config() {
        let config = from_pairs(&[("APP_ENV", "production")]).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.database.connect_timeout_secs, 5);
    }

    #[test]
    fn env_overrides_apply() {
        let config = from_pairs(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "academico"),
            ("PORT", "9090"),
            ("MIDDLEWARE_URL", "http://sync.internal:4000/"),
        ])
        .unwrap();
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user, "app");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.name, "academico");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.middleware.sync_url(), "http://sync.internal:4000/sync");
        assert_eq!(config.middleware.online_url(), "http://sync.internal:4000/notify-online");
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = from_pairs(&[("PORT", "not-a-port"), ("DB_PORT", "-1")]).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn invalid_middleware_url_is_rejected() {
        let err = from_pairs(&[("MIDDLEWARE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMiddlewareUrl(_)));
    }

    #[test]
    fn password_is_not_serialized() {
        let config = from_pairs(&[("DB_PASSWORD", "hunter2")]).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
