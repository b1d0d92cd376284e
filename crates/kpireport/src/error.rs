//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use kpireport_config::ConfigError;
use kpireport_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    /// Any failure talking to PRTG or writing the report.
    pub const GENERAL: i32 = 1;
    /// Bad flags or configuration.
    pub const USAGE: i32 = 2;
    /// No credentials could be resolved.
    pub const AUTH: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to PRTG at {url}")]
    #[diagnostic(
        code(kpireport::connection_failed),
        help(
            "Check that the PRTG core is reachable from this host.\n\
             For a self-signed certificate, retry with --insecure (-k) or set ca_cert in the profile."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(kpireport::timeout),
        help("Increase the timeout with --timeout, or allow retries with --retries.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(kpireport::auth_failed),
        help("Check --username and the password or passhash of the selected profile.")
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(kpireport::no_credentials),
        help(
            "Pass --password or --passhash, set KPIREPORT_PASSWORD,\n\
             or store one in the keyring under service 'kpireport', entry '{profile}/password'."
        )
    )]
    NoCredentials { profile: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("PRTG API request failed: {message}")]
    #[diagnostic(
        code(kpireport::api_error),
        help("No report was written. The run aborts on the first failed request.")
    )]
    ApiError { message: String },

    #[error("Unexpected response from PRTG: {message}")]
    #[diagnostic(
        code(kpireport::invalid_response),
        help("Check that --host points at the PRTG web server and not a login proxy.")
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kpireport::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(kpireport::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No PRTG host configured")]
    #[diagnostic(
        code(kpireport::no_host),
        help(
            "Pass --host https://prtg.example.net, or add a profile with a host to\n\
             {path}"
        )
    )]
    NoHost { path: String },

    #[error("Configuration could not be loaded")]
    #[diagnostic(code(kpireport::config))]
    Config(#[source] ConfigError),

    // ── Report output ────────────────────────────────────────────────
    #[error("Failed to write {path}")]
    #[diagnostic(code(kpireport::write_failed))]
    Write {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(kpireport::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoHost { .. }
            | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other @ ConfigError::Figment(_) => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Api { message, status: _ } => CliError::ApiError { message },

            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}
