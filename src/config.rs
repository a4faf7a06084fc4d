// Storefront configuration: defaults, overridable from STOREFRONT_* environment variables

use crate::logging::{LogConfig, LogFormat, LogLevel};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8787/api/db";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
// Upper bound of the price slider shown to guests
pub const DEFAULT_PRICE_CEILING: f64 = 500.0;

// Connection settings for the hosted backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub price_ceiling: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            price_ceiling: DEFAULT_PRICE_CEILING,
        }
    }
}

// How administrative status changes are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    // Any status may be written over any other
    #[default]
    Unrestricted,
    // Only lifecycle edges are accepted
    Guarded,
}

impl std::str::FromStr for TransitionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unrestricted" => Ok(TransitionPolicy::Unrestricted),
            "guarded" => Ok(TransitionPolicy::Guarded),
            other => bail!("Invalid transition policy: {}", other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub transition_policy: TransitionPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub admin: AdminConfig,
    pub log: LogConfig,
}

impl StorefrontConfig {
    // Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Load through an arbitrary key lookup, unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("STOREFRONT_BASE_URL") {
            config.store.base_url = base_url;
        }
        if let Some(api_key) = lookup("STOREFRONT_API_KEY") {
            config.store.api_key = api_key;
        }
        if let Some(timeout) = lookup("STOREFRONT_TIMEOUT_MS") {
            config.store.timeout_ms = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid STOREFRONT_TIMEOUT_MS: {}", timeout))?;
        }
        if let Some(ceiling) = lookup("STOREFRONT_PRICE_CEILING") {
            let ceiling: f64 = ceiling
                .trim()
                .parse()
                .with_context(|| format!("Invalid STOREFRONT_PRICE_CEILING: {}", ceiling))?;
            if !ceiling.is_finite() || ceiling < 0.0 {
                bail!("STOREFRONT_PRICE_CEILING must be a non-negative amount");
            }
            config.catalog.price_ceiling = ceiling;
        }
        if let Some(policy) = lookup("STOREFRONT_TRANSITION_POLICY") {
            config.admin.transition_policy = policy.parse()?;
        }
        if let Some(level) = lookup("STOREFRONT_LOG_LEVEL") {
            config.log.level = level.parse::<LogLevel>()?;
        }
        if let Some(format) = lookup("STOREFRONT_LOG_FORMAT") {
            config.log.format = format.parse::<LogFormat>()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.base_url.trim().is_empty() {
            bail!("Store base URL must not be empty");
        }
        if self.store.timeout_ms == 0 {
            bail!("Store timeout must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.catalog.price_ceiling, DEFAULT_PRICE_CEILING);
        assert_eq!(config.admin.transition_policy, TransitionPolicy::Unrestricted);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("STOREFRONT_BASE_URL", "https://backend.example.com/db"),
            ("STOREFRONT_API_KEY", "secret"),
            ("STOREFRONT_TIMEOUT_MS", "2500"),
            ("STOREFRONT_PRICE_CEILING", "750"),
            ("STOREFRONT_TRANSITION_POLICY", "Guarded"),
            ("STOREFRONT_LOG_LEVEL", "debug"),
            ("STOREFRONT_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.store.base_url, "https://backend.example.com/db");
        assert_eq!(config.store.api_key, "secret");
        assert_eq!(config.store.timeout_ms, 2500);
        assert_eq!(config.catalog.price_ceiling, 750.0);
        assert_eq!(config.admin.transition_policy, TransitionPolicy::Guarded);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(StorefrontConfig::from_lookup(lookup_from(&[("STOREFRONT_TIMEOUT_MS", "soon")])).is_err());
        assert!(StorefrontConfig::from_lookup(lookup_from(&[("STOREFRONT_TIMEOUT_MS", "0")])).is_err());
        assert!(StorefrontConfig::from_lookup(lookup_from(&[("STOREFRONT_PRICE_CEILING", "-5")])).is_err());
        assert!(
            StorefrontConfig::from_lookup(lookup_from(&[("STOREFRONT_TRANSITION_POLICY", "strict")]))
                .is_err()
        );
    }
}
