//! Client configuration.

use std::time::Duration;

/// Backend used when `IVSS_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_URL_ENV: &str = "IVSS_API_URL";
const TIMEOUT_ENV: &str = "IVSS_API_TIMEOUT_SECS";
const FALLBACK_ENV: &str = "IVSS_OFFLINE_FALLBACK";

/// What fallback-capable operations do when the backend cannot be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Report the error to the caller.
    Disabled,
    /// Write the data to the local registration record and report the
    /// `LocalFallback` path.
    #[default]
    LocalCache,
}

impl FallbackPolicy {
    pub fn allows_local_cache(self) -> bool {
        matches!(self, FallbackPolicy::LocalCache)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub fallback: FallbackPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `IVSS_API_URL`, `IVSS_API_TIMEOUT_SECS` and
    /// `IVSS_OFFLINE_FALLBACK`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV)
            .map(|v| normalize_base_url(&v))
            .filter(|v| !v.is_empty())
        {
            config.base_url = url;
        }

        match lookup(TIMEOUT_ENV).map(|v| v.trim().parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => config.timeout = Duration::from_secs(secs),
            Some(_) => log::warn!("[Config] Ignoring invalid {}", TIMEOUT_ENV),
            None => {}
        }

        if let Some(raw) = lookup(FALLBACK_ENV) {
            match parse_flag(&raw) {
                Some(true) => config.fallback = FallbackPolicy::LocalCache,
                Some(false) => config.fallback = FallbackPolicy::Disabled,
                None => log::warn!("[Config] Ignoring invalid {}={}", FALLBACK_ENV, raw),
            }
        }

        config
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.fallback, FallbackPolicy::LocalCache);
    }

    #[test]
    fn env_overrides() {
        let config = config_from(&[
            ("IVSS_API_URL", " https://api.ivss.example/ "),
            ("IVSS_API_TIMEOUT_SECS", "5"),
            ("IVSS_OFFLINE_FALLBACK", "off"),
        ]);
        assert_eq!(config.base_url, "https://api.ivss.example");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.fallback, FallbackPolicy::Disabled);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = config_from(&[
            ("IVSS_API_URL", "   "),
            ("IVSS_API_TIMEOUT_SECS", "soon"),
            ("IVSS_OFFLINE_FALLBACK", "maybe"),
        ]);
        assert_eq!(config, ClientConfig::default());
    }
}
