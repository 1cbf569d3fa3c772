// Shared transport configuration for building reqwest::Client instances.
//
// Both service clients share user agent and timeout settings through this
// module. No timeout is applied unless one is configured explicitly.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("simcii/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Config with a per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))
    }
}

/// Parse a service base URL and make sure it ends with `/`, so relative
/// resource paths join beneath it instead of replacing its last segment.
pub(crate) fn normalize_base_url(raw: &str) -> Result<url::Url, Error> {
    let mut url = url::Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_trailing_slash() {
        let url = normalize_base_url("http://localhost:8080/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/");
        assert_eq!(
            url.join("dispositivos").unwrap().as_str(),
            "http://localhost:8080/api/dispositivos"
        );
    }

    #[test]
    fn normalize_keeps_single_trailing_slash() {
        let url = normalize_base_url("http://localhost:8000/api//").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn default_has_no_timeout() {
        assert!(TransportConfig::default().timeout.is_none());
        assert!(TransportConfig::default().build_client().is_ok());
    }
}
