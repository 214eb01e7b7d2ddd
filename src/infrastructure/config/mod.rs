use std::env;

use crate::domain::task::PaginationSettings;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the service on the in-memory store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub page_size: u64,
    pub max_page_size: u64,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let config = Config {
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_var(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&var, "PORT", 8080)?,
            environment: match var("ENVIRONMENT").as_deref() {
                Some("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            page_size: parse_var(&var, "PAGE_SIZE", 10)?,
            max_page_size: parse_var(&var, "MAX_PAGE_SIZE", 100)?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };

        if config.page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "PAGE_SIZE",
                value: "0".to_string(),
            });
        }
        if config.max_page_size < config.page_size {
            return Err(ConfigError::Invalid {
                name: "MAX_PAGE_SIZE",
                value: config.max_page_size.to_string(),
            });
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn pagination(&self) -> PaginationSettings {
        PaginationSettings {
            default_page_size: self.page_size,
            max_page_size: self.max_page_size,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    var: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
