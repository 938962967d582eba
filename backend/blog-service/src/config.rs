/// Configuration management for Blog Service
///
/// Loads configuration from environment variables (after `.env`, if any).
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Listing configuration
    pub pagination: PaginationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of HTTP workers
    pub workers: usize,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// RS256 public key used to verify access tokens
    pub jwt_public_key_pem: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_max_page_limit")]
    pub max_limit: i64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_page_limit() -> i64 {
    100
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app = AppConfig {
            env: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
            host: var("BLOG_SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "BLOG_SERVICE_PORT", 8080)?,
            workers: parse_or(&var, "BLOG_SERVICE_WORKERS", 4)?,
        };
        let production = app.is_production();

        let cors = {
            let allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
                Some(value) => value,
                None if production => bail!("CORS_ALLOWED_ORIGINS must be set in production"),
                None => "http://localhost:3000".to_string(),
            };
            if production && allowed_origins.trim() == "*" {
                bail!("CORS_ALLOWED_ORIGINS cannot be '*' in production");
            }
            CorsConfig { allowed_origins }
        };

        let database = DatabaseConfig {
            url: match var("DATABASE_URL") {
                Some(url) => url,
                None if production => bail!("DATABASE_URL environment variable not set"),
                None => "postgresql://localhost/blog".to_string(),
            },
            max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", default_max_connections())?,
            min_connections: parse_or(&var, "DATABASE_MIN_CONNECTIONS", default_min_connections())?,
        };

        let auth = AuthConfig {
            jwt_public_key_pem: var("JWT_PUBLIC_KEY_PEM").filter(|k| !k.trim().is_empty()),
        };
        if production && auth.jwt_public_key_pem.is_none() {
            bail!("JWT_PUBLIC_KEY_PEM must be set in production");
        }

        let pagination = PaginationConfig {
            max_limit: parse_or(&var, "PAGINATION_MAX_LIMIT", default_max_page_limit())?,
        };
        if pagination.max_limit < 1 {
            bail!("PAGINATION_MAX_LIMIT must be at least 1");
        }

        Ok(Config {
            app,
            cors,
            database,
            auth,
            pagination,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
