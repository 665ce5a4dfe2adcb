use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub notion: NotionConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration token. Treated as an opaque string.
    pub api_key: Option<String>,
    /// Database holding the account pages. Every account operation fails without it.
    pub database_id: Option<String>,
    pub api_base: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    /// Empty means any origin
    pub cors_origins: Vec<String>,
}

pub const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com/v1/";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

impl NotionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides(|key| env::var(key).ok())
    }

    fn with_env_overrides<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = var("TOKTRACK_PORT").or_else(|| var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = var("TOKTRACK_STATIC_DIR") {
            self.server.static_dir = v;
        }

        // Notion overrides
        if let Some(v) = var("NOTION_API_KEY") {
            self.notion.api_key = non_empty(v);
        }
        if let Some(v) = var("NOTION_DATABASE_ID") {
            self.notion.database_id = non_empty(v);
        }
        if let Some(v) = var("NOTION_API_BASE") {
            self.notion.api_base = v;
        }
        if let Some(v) = var("NOTION_VERSION") {
            self.notion.api_version = v;
        }
        if let Some(v) = var("NOTION_TIMEOUT_SECS") {
            // Zero would fail every store call at once
            self.notion.timeout_secs = v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .unwrap_or(self.notion.timeout_secs);
        }

        // Security overrides
        if let Some(v) = var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn base(environment: Environment, timeout_secs: u64) -> Self {
        Self {
            environment,
            server: ServerConfig {
                port: 3000,
                static_dir: "public".to_string(),
            },
            notion: NotionConfig {
                api_key: None,
                database_id: None,
                api_base: DEFAULT_NOTION_API_BASE.to_string(),
                api_version: DEFAULT_NOTION_VERSION.to_string(),
                timeout_secs,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: Vec::new(),
            },
        }
    }

    fn development() -> Self {
        Self::base(Environment::Development, 30)
    }

    fn staging() -> Self {
        Self::base(Environment::Staging, 15)
    }

    fn production() -> Self {
        Self::base(Environment::Production, 10)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::development().with_env_overrides(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, "public");
        assert!(config.notion.database_id.is_none());
        assert_eq!(config.notion.api_base, DEFAULT_NOTION_API_BASE);
        assert_eq!(config.notion.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(matches!(config.environment, Environment::Production));
        assert_eq!(config.notion.timeout_secs, 10);
        assert!(config.security.enable_cors);
    }

    #[test]
    fn test_notion_overrides() {
        let config = overrides(&[
            ("NOTION_API_KEY", "secret_abc"),
            ("NOTION_DATABASE_ID", " db123 "),
            ("NOTION_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.notion.api_key.as_deref(), Some("secret_abc"));
        assert_eq!(config.notion.database_id.as_deref(), Some("db123"));
        assert_eq!(config.notion.timeout_secs, 5);
    }

    #[test]
    fn test_empty_database_id_counts_as_missing() {
        let config = overrides(&[("NOTION_DATABASE_ID", "   ")]);
        assert!(config.notion.database_id.is_none());
    }

    #[test]
    fn test_port_precedence_and_bad_values() {
        let config = overrides(&[("PORT", "8080"), ("TOKTRACK_PORT", "9090")]);
        assert_eq!(config.server.port, 9090);

        let config = overrides(&[("PORT", "not-a-port"), ("NOTION_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.notion.timeout_secs, 30);
    }

    #[test]
    fn test_zero_timeout_keeps_preset() {
        let config = overrides(&[("NOTION_TIMEOUT_SECS", "0")]);
        assert_eq!(config.notion.timeout_secs, 30);
        assert_eq!(config.notion.timeout(), Duration::from_secs(30));

        let config = AppConfig::production().with_env_overrides(|key| {
            (key == "NOTION_TIMEOUT_SECS").then(|| "0".to_string())
        });
        assert_eq!(config.notion.timeout_secs, 10);
    }

    #[test]
    fn test_cors_origins_split() {
        let config = overrides(&[("SECURITY_CORS_ORIGINS", "http://a.test, ,http://b.test")]);
        assert_eq!(config.security.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
