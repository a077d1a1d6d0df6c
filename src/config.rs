use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use thiserror::Error;

/// Errors raised while reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value `{value}` for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings of the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Prefix the product routes are mounted under, e.g. `/api/v1`.
    pub api_url: String,
    /// Directory receiving uploaded images, served under `/public/uploads`.
    pub upload_dir: PathBuf,
    /// Session signing secret; a random key is generated when absent.
    pub secret: Option<String>,
    pub auth_service_url: String,
    /// Cookie domain for the session middleware.
    pub domain: String,
}

impl ServerConfig {
    /// Load the configuration from the process environment and an optional `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = get("PORT", "8080");
        let port = port.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port.clone(),
        })?;

        let api_url = normalize_prefix(&get("API_URL", "/api/v1"));

        let auth_service_url = lookup("AUTH_SERVICE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?;

        Ok(Self {
            database_url: get("DATABASE_URL", "app.db"),
            address: get("ADDRESS", "127.0.0.1"),
            port,
            api_url,
            upload_dir: PathBuf::from(get("UPLOAD_DIR", "public/uploads")),
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            auth_service_url,
            domain: get("DOMAIN", "localhost"),
        })
    }
}

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
