//! Gateway configuration.

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "SMARTKIDS_API_BASE_URL";

/// Default backend used when no override is present.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read the base URL from the environment, falling back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = GatewayConfig::new("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(GatewayConfig::default().base_url, "http://localhost:5000");
    }

    #[test]
    fn env_override_wins() {
        std::env::set_var(BASE_URL_ENV, "https://api.smartkids.example/");
        let config = GatewayConfig::from_env();
        std::env::remove_var(BASE_URL_ENV);
        assert_eq!(config.base_url, "https://api.smartkids.example");
    }
}
