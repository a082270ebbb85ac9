use std::net::IpAddr;

use crate::audit::diff::DEFAULT_MAX_VALUE_LENGTH;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Longest rendered old/new value kept in an audit entry, in characters.
    pub max_value_length: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("RECORDKEEPER_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid RECORDKEEPER_HOST: {e}"))?;

        let port: u16 = env_or("RECORDKEEPER_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid RECORDKEEPER_PORT: {e}"))?;

        let log_level = env_or("RECORDKEEPER_LOG_LEVEL", "info");

        let max_value_length: usize = env_or(
            "RECORDKEEPER_AUDIT_MAX_VALUE_LENGTH",
            &DEFAULT_MAX_VALUE_LENGTH.to_string(),
        )
        .parse()
        .map_err(|e| format!("Invalid RECORDKEEPER_AUDIT_MAX_VALUE_LENGTH: {e}"))?;

        if max_value_length == 0 || max_value_length > DEFAULT_MAX_VALUE_LENGTH {
            return Err(format!(
                "RECORDKEEPER_AUDIT_MAX_VALUE_LENGTH must be between 1 and {DEFAULT_MAX_VALUE_LENGTH}"
            ));
        }

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            log_level,
            audit: AuditConfig { max_value_length },
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
