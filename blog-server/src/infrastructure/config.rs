use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:8000,http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub http_host: String,
    pub http_port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// File storage root for comments and likes; in-memory when unset.
    pub data_dir: Option<PathBuf>,
    /// Seed file to load instead of the bundled content.
    pub content_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let http_port = match var("HTTP_PORT") {
            Some(port) => port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "HTTP_PORT",
                value: port,
            })?,
            None => DEFAULT_HTTP_PORT,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            jwt_secret,
            http_host: var("HTTP_HOST").unwrap_or_else(|| DEFAULT_HTTP_HOST.to_string()),
            http_port,
            cors_allowed_origins,
            data_dir: var("DATA_DIR").map(PathBuf::from),
            content_path: var("CONTENT_PATH").map(PathBuf::from),
        })
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
