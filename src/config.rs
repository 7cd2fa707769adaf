// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`ClientConfig`] loaded from
//! them.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SWIFTPAY_API_BASE_URL` | Base URL of the SwiftPay API | `https://swiftpaymfb.com/api` |
//! | `SWIFTPAY_API_TOKEN` | Bearer token seeded into the token store | unset |
//! | `SWIFTPAY_HTTP_TIMEOUT_SECS` | Per-request timeout in seconds | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::time::Duration;

use url::Url;

/// Environment variable name for the API base URL.
pub const API_BASE_URL_ENV: &str = "SWIFTPAY_API_BASE_URL";

/// Environment variable name for the bearer token.
pub const API_TOKEN_ENV: &str = "SWIFTPAY_API_TOKEN";

/// Environment variable name for the HTTP timeout, in whole seconds.
pub const HTTP_TIMEOUT_ENV: &str = "SWIFTPAY_HTTP_TIMEOUT_SECS";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_API_BASE_URL: &str = "https://swiftpaymfb.com/api";

/// A stalled request settles as a timeout error after this long, leaving
/// its snapshot slice at the previous value.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{name} must be a positive number of seconds, got `{value}`")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} must be `json` or `pretty`, got `{value}`")]
    InvalidLogFormat { name: &'static str, value: String },
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Settings for [`crate::providers::SwiftpayClient`] and the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            log_format: LogFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with every other setting at its default.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: validate_base_url(API_BASE_URL_ENV, base_url)?,
            ..Self::default()
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = match read(API_BASE_URL_ENV) {
            Some(raw) => validate_base_url(API_BASE_URL_ENV, &raw)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let http_timeout = match read(HTTP_TIMEOUT_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: HTTP_TIMEOUT_ENV,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT,
        };

        let log_format = match read(LOG_FORMAT_ENV) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|_| ConfigError::InvalidLogFormat {
                    name: LOG_FORMAT_ENV,
                    value: raw,
                })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_base_url,
            api_token: read(API_TOKEN_ENV),
            http_timeout,
            log_format,
        })
    }
}

fn validate_base_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }

    Ok(raw.trim().trim_end_matches('/').to_string())
}
