//! API configuration

use serde::Deserialize;

/// Profile that seeds the development dataset at startup
pub const LOCAL_PROFILE: &str = "local";

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Deployment profile; `local` seeds the database on startup
    pub profile: String,
    /// Upper bound on pooled database connections
    pub max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/policy_terms".to_string(),
            log_level: "info".to_string(),
            profile: "default".to_string(),
            max_connections: 10,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    ///
    /// Unset variables keep their defaults. When `API_DATABASE_URL` is unset,
    /// a plain `DATABASE_URL` is honoured.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| defaults.database_url.clone());

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("profile", defaults.profile)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the local development profile is active
    pub fn is_local(&self) -> bool {
        self.profile.trim().eq_ignore_ascii_case(LOCAL_PROFILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_local() {
        let config = ApiConfig::default();
        assert!(!config.is_local());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_local_profile_ignores_case() {
        let config = ApiConfig {
            profile: " Local ".to_string(),
            ..Default::default()
        };
        assert!(config.is_local());
    }
}
