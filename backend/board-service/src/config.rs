//! Configuration management for Board Service
//!
//! Loads configuration from environment variables (after `.env`, if any).
use anyhow::{bail, Context, Result};
use chrono::Duration;
use crypto_core::{
    jwt::{DEFAULT_ACCESS_TOKEN_TTL_MINUTES, MAX_ACCESS_TOKEN_TTL_MINUTES},
    TokenService,
};
use db_pool::{DbConfig, DbConfigError};
use std::fmt;
use tracing::warn;

pub const SERVICE_NAME: &str = "board-service";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    /// `None` runs the service on the in-memory store
    pub database: Option<DbConfig>,
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list in `CORS_ALLOWED_ORIGINS`; `*` allows any origin
    pub allowed_origins: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens; a random per-process secret when unset
    pub jwt_secret: Option<String>,
    pub access_token_ttl_minutes: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "jwt_secret",
                &self.jwt_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .finish()
    }
}

impl AuthConfig {
    pub fn token_service(&self) -> Result<TokenService> {
        let ttl = Duration::try_minutes(self.access_token_ttl_minutes)
            .filter(|_| self.access_token_ttl_minutes <= MAX_ACCESS_TOKEN_TTL_MINUTES)
            .context("ACCESS_TOKEN_EXPIRE_MINUTES is out of range")?;
        match &self.jwt_secret {
            Some(secret) => TokenService::new(secret.as_bytes(), ttl)
                .context("JWT_SECRET cannot be used as a signing key"),
            None => {
                warn!("JWT_SECRET not set; using a random secret, tokens will not survive a restart");
                Ok(TokenService::ephemeral(ttl))
            }
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production") || self.env.eq_ignore_ascii_case("prod")
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.trim() == "*"
    }

    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("BOARD_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("BOARD_SERVICE_PORT") {
                Ok(raw) => raw
                    .parse()
                    .with_context(|| format!("BOARD_SERVICE_PORT is not a valid port: {raw}"))?,
                Err(_) => 8000,
            },
        };

        let cors = CorsConfig {
            allowed_origins: match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(origins) => origins,
                Err(_) if app.is_production() => {
                    bail!("CORS_ALLOWED_ORIGINS must be set in production")
                }
                Err(_) => "*".to_string(),
            },
        };

        let database = match DbConfig::from_env(SERVICE_NAME) {
            Ok(config) => Some(config),
            Err(DbConfigError::MissingUrl) => None,
            Err(e) => return Err(e).context("invalid database configuration"),
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .ok()
                .filter(|secret| !secret.is_empty()),
            access_token_ttl_minutes: match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
                Ok(raw) => raw.parse().with_context(|| {
                    format!("ACCESS_TOKEN_EXPIRE_MINUTES is not an integer: {raw}")
                })?,
                Err(_) => DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
            },
        };

        let config = Config {
            app,
            cors,
            database,
            auth,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.auth.access_token_ttl_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }
        if self.auth.access_token_ttl_minutes > MAX_ACCESS_TOKEN_TTL_MINUTES {
            bail!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be at most {}",
                MAX_ACCESS_TOKEN_TTL_MINUTES
            );
        }

        if self.app.is_production() {
            if self.cors.allows_any_origin() {
                bail!("CORS_ALLOWED_ORIGINS cannot be '*' in production");
            }
            if self.database.is_none() {
                bail!("DATABASE_URL must be set in production");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "APP_ENV",
        "BOARD_SERVICE_HOST",
        "BOARD_SERVICE_PORT",
        "CORS_ALLOWED_ORIGINS",
        "DATABASE_URL",
        "JWT_SECRET",
        "ACCESS_TOKEN_EXPIRE_MINUTES",
        "DB_MAX_CONNECTIONS",
    ];

    fn clear_env() {
        for key in VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_development_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 8000);
        assert!(config.cors.allows_any_origin());
        assert!(config.database.is_none());
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.auth.access_token_ttl_minutes, 30);
    }

    #[test]
    #[serial]
    fn test_database_and_overrides() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/board");
        std::env::set_var("BOARD_SERVICE_PORT", "9001");
        std::env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "5");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9001);
        assert_eq!(config.auth.access_token_ttl_minutes, 5);
        assert_eq!(
            config.database.unwrap().database_url,
            "postgres://localhost/board"
        );
        assert_eq!(
            config.cors.origins().collect::<Vec<_>>(),
            vec!["https://a.example", "https://b.example"]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_database_and_explicit_origins() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        std::env::set_var("DATABASE_URL", "postgres://localhost/board");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://board.example");
        assert!(Config::from_env().is_ok());

        std::env::remove_var("DATABASE_URL");
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numbers_are_rejected() {
        clear_env();
        std::env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "0");
        assert!(Config::from_env().is_err());

        std::env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "soon");
        assert!(Config::from_env().is_err());

        std::env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "200000000000");
        assert!(Config::from_env().is_err());
        std::env::remove_var("ACCESS_TOKEN_EXPIRE_MINUTES");

        std::env::set_var("DATABASE_URL", "postgres://localhost/board");
        std::env::set_var("DB_MAX_CONNECTIONS", "many");
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_out_of_range_ttl_fails_without_panicking() {
        for minutes in [i64::MAX, MAX_ACCESS_TOKEN_TTL_MINUTES + 1, 0] {
            let auth = AuthConfig {
                jwt_secret: Some("config-test-secret-0123456789abcdef".into()),
                access_token_ttl_minutes: minutes,
            };
            assert!(auth.token_service().is_err(), "minutes = {}", minutes);
        }
    }

    #[test]
    #[serial]
    fn test_short_jwt_secret_is_rejected() {
        clear_env();
        std::env::set_var("JWT_SECRET", "short");

        let config = Config::from_env().unwrap();
        assert!(config.auth.token_service().is_err());
        assert!(!format!("{:?}", config.auth).contains("short"));

        clear_env();
    }
}
