//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - Session token signing secret (min 16 chars)
//!
//! ## Optional
//! - `APP_HOST` - Bind address (default: 127.0.0.1)
//! - `APP_PORT` - Listen port (default: 8080)
//! - `TOKEN_TTL_SECS` - Session lifetime in seconds, 1 to 31536000 (default: 3600)
//! - `DELIVERY_FEE` - Flat delivery fee added at checkout (default: 2)
//! - `OAUTH_BRIDGE_SECRET` - Shared secret the OAuth callback bridge presents
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Administrator account seeded at startup
//! - `CORS_ORIGIN` - Allowed browser origin (permissive when unset)

use rust_decimal::Decimal;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 16;
const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub delivery_fee: Decimal,
    pub oauth_bridge_secret: Option<String>,
    pub admin: Option<AdminSeed>,
    pub cors_origin: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("delivery_fee", &self.delivery_fee)
            .field(
                "oauth_bridge_secret",
                &self.oauth_bridge_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("admin", &self.admin.as_ref().map(|a| a.email.as_str()))
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl AppConfig {
    /// Loads a `.env` file if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or_default(&lookup, "APP_HOST", "127.0.0.1")?;
        let port = parse_or_default(&lookup, "APP_PORT", "8080")?;
        let token_ttl_secs: u64 = parse_or_default(&lookup, "TOKEN_TTL_SECS", "3600")?;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
            return Err(ConfigError::InvalidEnvVar(
                "TOKEN_TTL_SECS".to_string(),
                format!("must be between 1 and {MAX_TOKEN_TTL_SECS}"),
            ));
        }
        let delivery_fee: Decimal = parse_or_default(&lookup, "DELIVERY_FEE", "2")?;
        if delivery_fee.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "DELIVERY_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let jwt_secret = non_empty(&lookup, "JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::InvalidEnvVar(
                "JWT_SECRET".to_string(),
                format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
            ));
        }

        let admin = match (
            non_empty(&lookup, "ADMIN_EMAIL"),
            non_empty(&lookup, "ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("ADMIN_PASSWORD".to_string())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("ADMIN_EMAIL".to_string())),
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_secs,
            delivery_fee,
            oauth_bridge_secret: non_empty(&lookup, "OAUTH_BRIDGE_SECRET"),
            admin,
            cors_origin: non_empty(&lookup, "CORS_ORIGIN"),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = non_empty(lookup, key).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_secret() {
        let config =
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "0123456789abcdef-long")])).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.delivery_fee, Decimal::TWO);
        assert!(config.admin.is_none());
        assert!(config.oauth_bridge_secret.is_none());
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "short")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "JWT_SECRET"));
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "0123456789abcdef-long"),
            ("APP_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "APP_PORT"));
    }

    #[test]
    fn test_token_ttl_is_bounded() {
        for raw in ["0", "18446744073709551615", "31536001"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("JWT_SECRET", "0123456789abcdef-long"),
                ("TOKEN_TTL_SECS", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TOKEN_TTL_SECS"));
        }

        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "0123456789abcdef-long"),
            ("TOKEN_TTL_SECS", "31536000"),
        ]))
        .unwrap();
        assert_eq!(config.token_ttl_secs, 31_536_000);
    }

    #[test]
    fn test_admin_seed_requires_both_values() {
        let err = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "0123456789abcdef-long"),
            ("ADMIN_EMAIL", "admin@example.com"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("ADMIN_PASSWORD".to_string()));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "super-secret-signing-key"),
            ("OAUTH_BRIDGE_SECRET", "bridge-secret-value"),
        ]))
        .unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("super-secret-signing-key"));
        assert!(!debug_output.contains("bridge-secret-value"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
