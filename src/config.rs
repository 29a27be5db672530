//! Configuration management

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Minimum signing secret length accepted in production.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, String),

    #[error("JWT_SECRET must be at least 32 bytes in production")]
    WeakSecret,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub upstream: UpstreamConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.env == "development"
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
}

/// How the session token travels between client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Cookie,
    Bearer,
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw {
            "cookie" => Ok(TransportMode::Cookie),
            "bearer" => Ok(TransportMode::Bearer),
            other => Err(format!("unknown session transport '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub transport: TransportMode,
    pub cookie_secure: bool,
    pub same_site_strict: bool,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_limit_default: u32,
    pub page_limit_max: u32,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// When unset the gateway falls back to the in-memory demo store.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            host: env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("APP_PORT", 3000)?,
            cors_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
        };

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_BYTES {
            if app.is_production() {
                return Err(ConfigError::WeakSecret);
            }
            tracing::warn!(
                "JWT_SECRET is shorter than {} bytes; acceptable locally, rejected in production",
                MIN_SECRET_BYTES
            );
        }

        let auth = AuthConfig {
            jwt_secret,
            token_ttl_secs: parse_or("TOKEN_TTL_SECS", 24 * 60 * 60)?,
            bcrypt_cost: parse_or("BCRYPT_COST", 10)?,
        };

        // Cookie hardening is forced outside local development.
        let local = app.is_development();
        let session = SessionConfig {
            transport: parse_or("SESSION_TRANSPORT", TransportMode::Cookie)?,
            cookie_secure: if local {
                parse_or("COOKIE_SECURE", false)?
            } else {
                true
            },
            same_site_strict: !local,
        };

        let upstream = UpstreamConfig {
            base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "https://pokeapi.co/api/v2".into()),
            timeout_secs: parse_or("UPSTREAM_TIMEOUT_SECS", 10)?,
            page_limit_default: parse_or("PAGE_LIMIT_DEFAULT", 20)?,
            page_limit_max: parse_or("PAGE_LIMIT_MAX", 100)?,
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").ok(),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
        };

        Ok(Config {
            app,
            auth,
            session,
            upstream,
            database,
        })
    }
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string())),
        Err(_) => Ok(default),
    }
}
