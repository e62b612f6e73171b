use crate::error::{GatewayError, Result};
use reqwest::Url;
use std::env;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8081";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);
// Prepared registrations older than this no longer count as a match for confirm.
pub const DEFAULT_AUDIT_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Runtime settings, fixed after startup.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub backend_url: Url,
    pub request_timeout: Duration,
    pub audit_ttl: Duration,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests need not touch the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = match lookup("ASKME_BACKEND_URL") {
            Some(raw) => parse_backend_url(&raw)?,
            None => parse_backend_url(DEFAULT_BACKEND_URL)?,
        };

        let request_timeout = match lookup("ASKME_REQUEST_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(parse_positive("ASKME_REQUEST_TIMEOUT_MS", &raw)?),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let audit_ttl = match lookup("ASKME_AUDIT_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_positive("ASKME_AUDIT_TTL_SECS", &raw)?),
            None => DEFAULT_AUDIT_TTL,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Ok(Self {
            backend_url,
            request_timeout,
            audit_ttl,
            log_format,
        })
    }
}

fn parse_backend_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        GatewayError::Config(format!("ASKME_BACKEND_URL '{raw}' is not a valid URL: {e}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::Config(format!(
            "ASKME_BACKEND_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    // Endpoint paths are appended to the base, so it must end at the path.
    if url.query().is_some() || url.fragment().is_some() {
        return Err(GatewayError::Config(format!(
            "ASKME_BACKEND_URL '{raw}' must not carry a query string or fragment"
        )));
    }
    Ok(url)
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(GatewayError::Config(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
        Ok(value) => Ok(value),
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
    fn defaults_apply_when_nothing_is_set() {
        let config = GatewayConfig::from_lookup(lookup_from(&[])).expect("defaults are valid");

        assert_eq!(config.backend_url.as_str(), "http://localhost:8081/");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.audit_ttl, DEFAULT_AUDIT_TTL);
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("ASKME_BACKEND_URL", "https://askme.internal:9443/api"),
            ("ASKME_REQUEST_TIMEOUT_MS", "2500"),
            ("ASKME_AUDIT_TTL_SECS", "60"),
            ("LOG_FORMAT", "json"),
        ]))
        .expect("config should parse");

        assert_eq!(config.backend_url.as_str(), "https://askme.internal:9443/api");
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.audit_ttl, Duration::from_secs(60));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_non_http_backend() {
        let lookup = lookup_from(&[("ASKME_BACKEND_URL", "ftp://files")]);
        let result = GatewayConfig::from_lookup(lookup);
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn rejects_backend_url_with_query_or_fragment() {
        for raw in ["http://askme.local/?tenant=1", "http://askme.local/api#top"] {
            let result = GatewayConfig::from_lookup(lookup_from(&[("ASKME_BACKEND_URL", raw)]));
            assert!(matches!(result, Err(GatewayError::Config(_))), "accepted {raw}");
        }
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        for raw in ["0", "soon", "-5"] {
            let result =
                GatewayConfig::from_lookup(lookup_from(&[("ASKME_REQUEST_TIMEOUT_MS", raw)]));
            assert!(matches!(result, Err(GatewayError::Config(_))), "accepted {raw}");
        }
    }
}
