//! User service configuration.

use std::env;
use std::path::PathBuf;

use common::{DatabaseConfig, ServiceConfig, DEFAULT_DATABASE_URL};

pub const DEFAULT_PROJECT_NAME: &str = "User Service";
pub const DEFAULT_PROJECT_DESCRIPTION: &str = "Users CRUD microservice";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8000,http://localhost:3000";
pub const ENV_FILE: &str = ".env";

/// User service configuration.
#[derive(Clone)]
pub struct UserServiceConfig {
    pub project_name: String,
    pub project_description: String,
    pub version: String,
    pub database: DatabaseConfig,
    pub service: ServiceConfig,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Env file read at startup and reported by `/system/config`
    pub env_file: PathBuf,
}

impl std::fmt::Debug for UserServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceConfig")
            .field("project_name", &self.project_name)
            .field("version", &self.version)
            .field("database", &self.database)
            .field("service", &self.service)
            .field("cors_origins", &self.cors_origins)
            .field("env_file", &self.env_file)
            .finish()
    }
}

impl UserServiceConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        let env_file = PathBuf::from(ENV_FILE);
        dotenvy::from_path(&env_file).ok();

        let defaults = Self::default();
        let project_name = env::var("PROJECT_NAME").unwrap_or(defaults.project_name);

        Self {
            project_description: env::var("PROJECT_DESCRIPTION")
                .unwrap_or(defaults.project_description),
            version: env::var("VERSION").unwrap_or(defaults.version),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(defaults.database.min_connections),
            },
            service: ServiceConfig {
                service_name: project_name.clone(),
                host: env::var("SERVICE_HOST").unwrap_or(defaults.service.host),
                port: parse_var("SERVICE_PORT").unwrap_or(defaults.service.port),
                log_level: env::var("LOG_LEVEL").unwrap_or(defaults.service.log_level),
            },
            cors_origins: env::var("BACKEND_CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.cors_origins),
            project_name,
            env_file,
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            project_description: DEFAULT_PROJECT_DESCRIPTION.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: DatabaseConfig::default(),
            service: ServiceConfig {
                service_name: DEFAULT_PROJECT_NAME.to_string(),
                ..ServiceConfig::default()
            },
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            env_file: PathBuf::from(ENV_FILE),
        }
    }
}

/// Split a comma separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn defaults() {
        let config = UserServiceConfig::default();

        assert_eq!(config.project_name, "User Service");
        assert_eq!(config.service.port, 8000);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn debug_redacts_database_url() {
        let mut config = UserServiceConfig::default();
        config.database.url = "postgres://admin:hunter2@db/users".to_string();

        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
