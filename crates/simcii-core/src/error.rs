// ── Core error types ──
//
// Consumer-facing errors from simcii-core. The `From<simcii_api::Error>`
// impl folds transport-layer failures into a small set of variants the
// dashboard can report without knowing about reqwest or serde.

use thiserror::Error;

use simcii_api::DeviceId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    // ── Backend errors ───────────────────────────────────────────────
    /// The backend answered with a failure status. `body` is the raw text.
    #[error("Request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response from backend: {message}")]
    Decode { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {id}")]
    DeviceNotFound { id: DeviceId },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// HTTP status of a backend rejection, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<simcii_api::Error> for CoreError {
    fn from(err: simcii_api::Error) -> Self {
        match err {
            simcii_api::Error::Transport(ref e) => {
                if let Some(status) = e.status() {
                    CoreError::Http {
                        status: status.as_u16(),
                        body: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            simcii_api::Error::Http { status, body } => CoreError::Http { status, body },
            simcii_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            simcii_api::Error::Client(message) => CoreError::Config { message },
            simcii_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}
