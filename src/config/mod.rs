//! Configuration management for the portal core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Bearer token verification
    pub auth: AuthConfig,
    /// Identity lifecycle hooks
    pub hooks: HookConfig,
    /// Logging and metrics
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 secret shared with the hosted identity provider
    pub jwt_secret: String,
    /// Expected `aud` claim; not checked when unset
    pub jwt_audience: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HookConfig {
    /// HMAC-SHA256 key for `x-webhook-signature`; hook deliveries are refused when unset
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            http_host: get("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            http_port: get("HTTP_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: get("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: get("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS")?,
                min_connections: get("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|| "2".to_string())
                    .parse()
                    .context("Invalid DATABASE_MIN_CONNECTIONS")?,
            },
            auth: AuthConfig {
                jwt_secret: get("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET is required")?,
                jwt_audience: get("AUTH_JWT_AUDIENCE").filter(|s| !s.is_empty()),
            },
            hooks: HookConfig {
                webhook_secret: get("HOOK_WEBHOOK_SECRET").filter(|s| !s.is_empty()),
            },
            telemetry: TelemetryConfig {
                log_format: match get("LOG_FORMAT").as_deref() {
                    Some("json") => LogFormat::Json,
                    _ => LogFormat::Pretty,
                },
                metrics_enabled: get("METRICS_ENABLED")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
