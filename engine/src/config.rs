use std::time::Duration;

pub const DEFAULT_DIRECTIONS_URL: &str =
    "https://api.openrouteservice.org/v2/directions/driving-car";
pub const DEFAULT_PREDICTOR_URL: &str = "http://127.0.0.1:5000/predict";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the two remote services live.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub directions_url: String,
    pub api_key: String,
    pub predictor_url: String,
    /// Ignored on wasm32, where the browser owns request timeouts.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
            api_key: String::new(),
            predictor_url: DEFAULT_PREDICTOR_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Reads `DIRECTIONS_URL`, `ORS_API_KEY`, `PREDICTOR_URL` and
    /// `REQUEST_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout = match non_empty("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!("ignoring invalid REQUEST_TIMEOUT_SECS={raw:?}");
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        let config = Self {
            directions_url: non_empty("DIRECTIONS_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.directions_url),
            api_key: non_empty("ORS_API_KEY").unwrap_or(defaults.api_key),
            predictor_url: non_empty("PREDICTOR_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.predictor_url),
            timeout,
        };
        if config.api_key.is_empty() {
            tracing::warn!("ORS_API_KEY is not set; direction requests will likely be rejected");
        }
        config
    }
}

/// Marker speed and label cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub speed: f64,
    /// Milliseconds-per-unit scale: one traversal takes
    /// `distance_time_constant / speed` ms.
    pub distance_time_constant: f64,
    /// Labels refresh each time the marker covers this many meters.
    pub label_step_m: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: 60.0,
            distance_time_constant: 1e6,
            label_step_m: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DIRECTIONS_URL", "http://localhost:9000/directions/"),
            ("ORS_API_KEY", "secret"),
            ("PREDICTOR_URL", "http://localhost:9001/predict"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.directions_url, "http://localhost:9000/directions");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.predictor_url, "http://localhost:9001/predict");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeout_falls_back() {
        let config = ClientConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn default_traversal_takes_about_seventeen_seconds() {
        let config = AnimationConfig::default();
        let traversal_ms = config.distance_time_constant / config.speed;
        assert!((traversal_ms - 16_666.67).abs() < 1.0);
    }
}
