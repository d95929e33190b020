//! Client configuration
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file by the binary). Only the API key is mandatory.

use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{BunqError, Result};

/// Environment variable holding the bunq API key
pub const API_KEY_VAR: &str = "BUNQ_API_KEY";
/// Environment variable selecting production or sandbox
pub const ENVIRONMENT_VAR: &str = "BUNQ_ENVIRONMENT";
/// Misspelled selector still found in older `.env` files
pub const LEGACY_ENVIRONMENT_VAR: &str = "BUNQ_ENVIROMENT";
/// Optional base URL override
pub const API_URL_VAR: &str = "BUNQ_API_URL";

const PRODUCTION_URL: &str = "https://api.bunq.com/v1/";
const SANDBOX_URL: &str = "https://public-api.sandbox.bunq.com/v1/";

/// Device description registered with bunq
pub const DEFAULT_DEVICE_DESCRIPTION: &str = "bunq MCP Server";

/// bunq API environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiEnvironment {
    Production,
    #[default]
    Sandbox,
}

impl ApiEnvironment {
    /// Map a selector value to an environment.
    ///
    /// Only the exact literal `PRODUCTION` selects production; anything else,
    /// including a missing value, selects the sandbox.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("PRODUCTION") => Self::Production,
            _ => Self::Sandbox,
        }
    }

    /// Base URL of the public API for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_URL,
            Self::Sandbox => SANDBOX_URL,
        }
    }
}

impl std::fmt::Display for ApiEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "PRODUCTION"),
            Self::Sandbox => write!(f, "SANDBOX"),
        }
    }
}

/// bunq API key - automatically zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Wrap a raw API key
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Configuration needed to open a bunq API context
#[derive(Debug, Clone)]
pub struct BunqConfig {
    pub api_key: ApiKey,
    pub environment: ApiEnvironment,
    /// Replaces the environment URL when set (proxies, tests)
    pub base_url_override: Option<String>,
    pub device_description: String,
}

impl BunqConfig {
    /// Create a configuration for the given key and environment
    pub fn new(api_key: impl Into<String>, environment: ApiEnvironment) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            environment,
            base_url_override: None,
            device_description: DEFAULT_DEVICE_DESCRIPTION.to_string(),
        }
    }

    /// Point the client at a different base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BunqError::Config(format!("{} is not set", API_KEY_VAR)))?;

        let selector = lookup(ENVIRONMENT_VAR).or_else(|| lookup(LEGACY_ENVIRONMENT_VAR));
        let environment = ApiEnvironment::from_selector(selector.as_deref());

        let mut config = Self::new(api_key, environment);
        config.base_url_override = lookup(API_URL_VAR).filter(|url| !url.trim().is_empty());
        Ok(config)
    }

    /// Base URL requests are resolved against, always ending in `/`
    pub fn effective_base_url(&self) -> Result<Url> {
        let raw = self
            .base_url_override
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url());

        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{}/", raw)
        };

        Ok(Url::parse(&normalized)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_only_exact_production_selects_production() {
        assert_eq!(
            ApiEnvironment::from_selector(Some("PRODUCTION")),
            ApiEnvironment::Production
        );

        for other in ["SANDBOX", "production", "Production", "", " PRODUCTION", "PROD"] {
            assert_eq!(
                ApiEnvironment::from_selector(Some(other)),
                ApiEnvironment::Sandbox,
                "selector {:?} should map to sandbox",
                other
            );
        }

        assert_eq!(ApiEnvironment::from_selector(None), ApiEnvironment::Sandbox);
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(ApiEnvironment::Production.base_url(), "https://api.bunq.com/v1/");
        assert_eq!(
            ApiEnvironment::Sandbox.base_url(),
            "https://public-api.sandbox.bunq.com/v1/"
        );
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let err = BunqConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, BunqError::Config(_)));

        let err = BunqConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, BunqError::Config(_)));
    }

    #[test]
    fn test_from_lookup_reads_environment() {
        let config = BunqConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "sandbox_key"),
            (ENVIRONMENT_VAR, "PRODUCTION"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.expose(), "sandbox_key");
        assert_eq!(config.environment, ApiEnvironment::Production);
        assert_eq!(config.device_description, DEFAULT_DEVICE_DESCRIPTION);
    }

    #[test]
    fn test_from_lookup_accepts_legacy_selector() {
        let config = BunqConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "key"),
            (LEGACY_ENVIRONMENT_VAR, "PRODUCTION"),
        ]))
        .unwrap();
        assert_eq!(config.environment, ApiEnvironment::Production);

        let config = BunqConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "key"),
            (ENVIRONMENT_VAR, "SANDBOX"),
            (LEGACY_ENVIRONMENT_VAR, "PRODUCTION"),
        ]))
        .unwrap();
        assert_eq!(config.environment, ApiEnvironment::Sandbox);
    }

    #[test]
    fn test_effective_base_url() {
        let config = BunqConfig::new("key", ApiEnvironment::Sandbox);
        assert_eq!(
            config.effective_base_url().unwrap().as_str(),
            "https://public-api.sandbox.bunq.com/v1/"
        );

        let config = config.with_base_url("http://127.0.0.1:8080/v1");
        assert_eq!(
            config.effective_base_url().unwrap().as_str(),
            "http://127.0.0.1:8080/v1/"
        );
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
