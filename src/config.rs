use std::{env, net::SocketAddr, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://localhost:8081/api";
const DEFAULT_PANDEMIC_RESOURCE: &str = "pandemie";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the REST backend, without a trailing slash.
    pub backend_url: String,
    /// Path segment of the pandemic resource (`pandemie` or `pandemies`).
    pub pandemic_resource: String,
    pub predict_url: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            port: non_empty("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            backend_url: non_empty("BACKEND_URL")
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            pandemic_resource: non_empty("PANDEMIC_RESOURCE")
                .map(|value| value.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PANDEMIC_RESOURCE.to_string()),
            predict_url: non_empty("PREDICT_URL"),
            request_timeout: Duration::from_secs(
                non_empty("REQUEST_TIMEOUT_SECS")
                    .and_then(|value| value.parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend_url, "http://localhost:8081/api");
        assert_eq!(config.pandemic_resource, "pandemie");
        assert!(config.predict_url.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = config(&[
            ("PORT", "9000"),
            ("BACKEND_URL", "http://backend:8081/api/"),
            ("PANDEMIC_RESOURCE", "/pandemies/"),
            ("PREDICT_URL", "http://predict/predict"),
            ("REQUEST_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.backend_url, "http://backend:8081/api");
        assert_eq!(config.pandemic_resource, "pandemies");
        assert_eq!(config.predict_url.as_deref(), Some("http://predict/predict"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config(&[("PORT", "http"), ("REQUEST_TIMEOUT_SECS", "0"), ("PREDICT_URL", " ")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.predict_url.is_none());
    }
}
