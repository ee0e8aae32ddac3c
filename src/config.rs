use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Preferred environment variable for the database connection string.
pub const PRIMARY_DATABASE_URL_VAR: &str = "MYSQL_DATABASE_URL";

/// Consulted when the primary variable is unset or empty.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

pub const SESSION_SECRET_VAR: &str = "SESSION_SECRET";

pub const PORT_VAR: &str = "PORT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string. Overridden by `MYSQL_DATABASE_URL`, then `DATABASE_URL`.
    pub url: String,

    /// Maximum database connections (default: 5)
    pub max_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_connections: u32,

    /// Recycle pooled connections after this many seconds (default: 300)
    pub max_lifetime_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/employees.db?mode=rwc".to_string(),
            max_connections: 5,
            min_connections: 1,
            max_lifetime_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Signs the session cookie. Overridden by `SESSION_SECRET`.
    #[serde(skip_serializing)]
    pub session_secret: String,

    /// Whether to set the Secure flag on session cookies.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
            session_secret: "dev-secret-key".to_string(),
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `.env` and process
    /// environment overrides on top.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;

        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from: {}", path.display());
        }

        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Applies environment overrides through `lookup`. Empty values count as unset.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(PRIMARY_DATABASE_URL_VAR).or_else(|| var(FALLBACK_DATABASE_URL_VAR))
        {
            self.database.url = url;
        }

        if let Some(secret) = var(SESSION_SECRET_VAR) {
            self.server.session_secret = secret;
        }

        if let Some(port) = var(PORT_VAR).and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("employee-api").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".employee-api").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0
            || self.database.min_connections > self.database.max_connections
        {
            anyhow::bail!(
                "Invalid pool size: min {} / max {}",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.server.session_secret.is_empty() {
            anyhow::bail!("Session secret cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.url, "sqlite:data/employees.db?mode=rwc");
        assert_eq!(config.server.session_secret, "dev-secret-key");
        assert_eq!(config.server.port, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_primary_database_var_wins() {
        let mut config = Config::default();
        config.apply_env_with(env(&[
            ("MYSQL_DATABASE_URL", "mysql://root:pw@db/employees"),
            ("DATABASE_URL", "postgres://localhost/employees"),
        ]));
        assert_eq!(config.database.url, "mysql://root:pw@db/employees");
    }

    #[test]
    fn test_fallback_database_var() {
        let mut config = Config::default();
        config.apply_env_with(env(&[
            ("MYSQL_DATABASE_URL", ""),
            ("DATABASE_URL", "postgres://localhost/employees"),
        ]));
        assert_eq!(config.database.url, "postgres://localhost/employees");
    }

    #[test]
    fn test_no_env_keeps_file_value() {
        let mut config = Config::default();
        config.database.url = "sqlite:custom.db".to_string();
        config.apply_env_with(env(&[]));
        assert_eq!(config.database.url, "sqlite:custom.db");
    }

    #[test]
    fn test_session_secret_and_port_overrides() {
        let mut config = Config::default();
        config.apply_env_with(env(&[("SESSION_SECRET", "s3cret"), ("PORT", "8081")]));
        assert_eq!(config.server.session_secret, "s3cret");
        assert_eq!(config.server.port, 8081);

        config.apply_env_with(env(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [database]
            url = "sqlite::memory:"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_session_secret_is_not_written_out() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(!toml_str.contains("session_secret"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.database.url = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.min_connections = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.session_secret = String::new();
        assert!(config.validate().is_err());
    }
}
