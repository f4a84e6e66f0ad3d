//! Application configuration module
//!
//! Provides configuration types for the server and provisioning binaries.
//! Values come from the process environment (after `.env` has been loaded by
//! the binary) and are validated once at startup.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Default HTTP port for the API server
pub const DEFAULT_API_PORT: u16 = 4000;

/// Default request timeout for backend calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEV_JWT_SECRET: &str = "pbchat-dev-secret-change-me";

/// Which record store backs the auth routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthBackend {
    /// Remote PocketBase instance
    #[default]
    PocketBase,
    /// In-process dummy store (wiped on restart)
    Memory,
}

impl std::str::FromStr for AuthBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pocketbase" | "pb" => Ok(Self::PocketBase),
            "memory" | "dummy" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Privileged identity and secret used for elevated sessions
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    /// Superuser email
    pub email: String,
    /// Superuser password
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// CORS origin allow-list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsOrigins {
    /// `*` or unset
    #[default]
    Any,
    /// Explicit origins
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated list; any `*` entry allows every origin
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }

    /// Whether a request origin passes the allow-list
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.iter().any(|o| o == origin),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Selected record store
    pub backend: AuthBackend,
    /// PocketBase base URL (required for the PocketBase backend)
    pub pocketbase_url: Option<Url>,
    /// Elevated credentials, if configured
    pub admin: Option<AdminCredentials>,
    /// HTTP listen port
    pub api_port: u16,
    /// CORS allow-list
    pub cors_origins: CorsOrigins,
    /// Signing secret for the memory store's tokens
    pub jwt_secret: String,
    /// Timeout applied to every backend HTTP request
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(backend) = var("AUTH_BACKEND") {
            builder = builder.backend(backend.parse()?);
        }
        if let Some(url) = var("POCKETBASE_URL") {
            builder = builder.pocketbase_url(url);
        }
        if let (Some(email), Some(password)) = (
            var("POCKETBASE_ADMIN_EMAIL"),
            var("POCKETBASE_ADMIN_PASSWORD"),
        ) {
            builder = builder.admin(email, password);
        }
        if let Some(port) = var("API_PORT") {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            builder = builder.api_port(port);
        }
        if let Some(origins) = var("CORS_ORIGIN") {
            builder = builder.cors_origins(CorsOrigins::parse(&origins));
        }
        if let Some(secret) = var("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Some(secs) = var("POCKETBASE_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok()) {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Whether elevated credentials are present
    pub fn has_admin(&self) -> bool {
        self.admin.is_some()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == AuthBackend::PocketBase && self.pocketbase_url.is_none() {
            return Err(ConfigError::MissingValue("POCKETBASE_URL"));
        }
        if self.api_port == 0 {
            return Err(ConfigError::InvalidPort("0".to_string()));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    backend: AuthBackend,
    pocketbase_url: Option<String>,
    admin: Option<AdminCredentials>,
    api_port: Option<u16>,
    cors_origins: CorsOrigins,
    jwt_secret: Option<String>,
    request_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Select the record store
    pub fn backend(mut self, backend: AuthBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the PocketBase URL
    pub fn pocketbase_url(mut self, url: impl Into<String>) -> Self {
        self.pocketbase_url = Some(url.into());
        self
    }

    /// Set the elevated credentials
    pub fn admin(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin = Some(AdminCredentials {
            email: email.into(),
            password: password.into(),
        });
        self
    }

    /// Set the HTTP port
    pub fn api_port(mut self, port: u16) -> Self {
        self.api_port = Some(port);
        self
    }

    /// Set the CORS allow-list
    pub fn cors_origins(mut self, origins: CorsOrigins) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Set the memory store signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    /// Set the backend request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let pocketbase_url = self
            .pocketbase_url
            .map(|raw| Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl(raw)))
            .transpose()?;

        let jwt_secret = self.jwt_secret.unwrap_or_else(|| {
            if self.backend == AuthBackend::Memory {
                tracing::warn!("JWT_SECRET not set, using the development secret");
            }
            DEV_JWT_SECRET.to_string()
        });

        let config = AppConfig {
            backend: self.backend,
            pocketbase_url,
            admin: self.admin,
            api_port: self.api_port.unwrap_or(DEFAULT_API_PORT),
            cors_origins: self.cors_origins,
            jwt_secret,
            request_timeout: self
                .request_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid port: {0}")]
    InvalidPort(String),
    #[error("unknown auth backend: {0} (expected `pocketbase` or `memory`)")]
    UnknownBackend(String),
}
