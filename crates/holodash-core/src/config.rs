use crate::{HoloDashError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:9000";
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;

pub const ENDPOINT_ENV: &str = "HOLODASH_ENDPOINT";
pub const RECONNECT_ENV: &str = "HOLODASH_RECONNECT_MS";

/// Connection parameters for the telemetry channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl DashboardConfig {
    pub fn new(endpoint: impl Into<String>, reconnect_delay_ms: u64) -> Result<Self> {
        let config = Self {
            endpoint: endpoint.into(),
            reconnect_delay_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a config from `HOLODASH_ENDPOINT` / `HOLODASH_RECONNECT_MS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_ENV).unwrap_or_else(default_endpoint);

        let reconnect_delay_ms = match lookup(RECONNECT_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                HoloDashError::Config(format!("{RECONNECT_ENV}={raw:?} is not a number: {e}"))
            })?,
            None => default_reconnect_delay_ms(),
        };

        Self::new(endpoint, reconnect_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(HoloDashError::Config(format!(
                "endpoint must be a ws:// or wss:// URL, got {:?}",
                self.endpoint
            )));
        }
        if self.reconnect_delay_ms == 0 {
            return Err(HoloDashError::Config(
                "reconnect delay must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
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
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.endpoint, "ws://localhost:9000");
        assert_eq!(config.reconnect_delay(), Duration::from_millis(3000));
    }

    #[test]
    fn test_from_lookup_uses_defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENDPOINT_ENV, "ws://10.0.0.5:9000"),
            (RECONNECT_ENV, " 500 "),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "ws://10.0.0.5:9000");
        assert_eq!(config.reconnect_delay_ms, 500);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(DashboardConfig::from_lookup(lookup_from(&[(RECONNECT_ENV, "soon")])).is_err());
        assert!(DashboardConfig::new("http://localhost:9000", 3000).is_err());
        assert!(DashboardConfig::new("ws://localhost:9000", 0).is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"endpoint":"wss://example.org/ws"}"#).unwrap();
        assert_eq!(config.endpoint, "wss://example.org/ws");
        assert_eq!(config.reconnect_delay_ms, DEFAULT_RECONNECT_DELAY_MS);
    }
}
