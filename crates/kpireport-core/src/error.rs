// ── Core error types ──
//
// Errors surfaced by a report run. Consumers see domain variants, not raw
// reqwest or serde failures; the `From<kpireport_api::Error>` impl does the
// translation. Every variant aborts the run before anything is written.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to PRTG at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("PRTG request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
    },

    #[error("Unexpected response from PRTG: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

impl CoreError {
    /// HTTP status behind the failure, for operator-facing messages.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::AuthenticationFailed { .. } => Some(401),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kpireport_api::Error> for CoreError {
    fn from(err: kpireport_api::Error) -> Self {
        match err {
            kpireport_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            kpireport_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| format!("{}://{}", u.scheme(), u.authority()))
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            kpireport_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            kpireport_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            kpireport_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            kpireport_api::Error::Status { endpoint, status } => CoreError::Api {
                message: format!("{endpoint} returned HTTP {status}"),
                status: Some(status),
            },
            kpireport_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_code() {
        let err: CoreError = kpireport_api::Error::Status {
            endpoint: "historicdata.json".into(),
            status: 503,
        }
        .into();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "API error: historicdata.json returned HTTP 503");
    }

    #[test]
    fn auth_error_maps_to_authentication_failed() {
        let err: CoreError = kpireport_api::Error::Authentication {
            message: "nope".into(),
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }
}
