//! Connection settings for the HTTP directory service

use std::env;
use std::time::Duration;

use crate::error::{DriveError, Result};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub access_token: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `DRIVETREE_ACCESS_TOKEN`, `DRIVETREE_API_BASE` and `DRIVETREE_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        let access_token = env::var("DRIVETREE_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DriveError::Config("missing DRIVETREE_ACCESS_TOKEN".into()))?;

        let api_base = env::var("DRIVETREE_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE.into());

        let timeout = match env::var("DRIVETREE_TIMEOUT") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            access_token,
            api_base,
            timeout,
        })
    }
}

/// Parse a duration such as `30s` or `2m`.
pub fn parse_timeout(raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw.trim())
        .map_err(|err| DriveError::Config(format!("invalid DRIVETREE_TIMEOUT '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_timeout(" 2m ").unwrap(), Duration::from_secs(120));
        assert!(matches!(parse_timeout("soon"), Err(DriveError::Config(_))));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new("token");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
