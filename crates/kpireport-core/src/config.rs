// ── Runtime run configuration ──
//
// These types describe how to reach the PRTG core and what report to build.
// They carry credential data and tuning, but never touch disk: the CLI
// resolves flags, profiles and secrets, then hands in one `RunConfig`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use kpireport_api::{ApiCredentials, PrtgClient, TlsMode, TransportConfig};

use crate::error::CoreError;
use crate::model::DateRange;
use crate::percentile::Percentile;

/// Capability tag a sensor must carry to appear in the report.
pub const DEFAULT_FILTER_TAG: &str = "kpi_bandwidth";

/// Default averaging interval for historic data, in seconds.
pub const DEFAULT_AVG_SECS: u32 = 3600;

/// How to authenticate with PRTG.
#[derive(Debug, Clone)]
pub enum Credentials {
    Password {
        username: String,
        password: SecretString,
    },
    Passhash {
        username: String,
        passhash: SecretString,
    },
}

impl Credentials {
    pub fn username(&self) -> &str {
        match self {
            Self::Password { username, .. } | Self::Passhash { username, .. } => username,
        }
    }
}

impl From<&Credentials> for ApiCredentials {
    fn from(creds: &Credentials) -> Self {
        match creds {
            Credentials::Password { username, password } => {
                ApiCredentials::password(username.clone(), password.clone())
            }
            Credentials::Passhash { username, passhash } => {
                ApiCredentials::passhash(username.clone(), passhash.clone())
            }
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed PRTG cores).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Where and how to talk to the PRTG API.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server root, e.g. `https://prtg.example.net`.
    pub url: Url,
    pub credentials: Credentials,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra attempts for transient failures.
    pub retries: u32,
}

impl ConnectionConfig {
    /// Build the shared API client used for every request of a run.
    pub fn connect(&self) -> Result<PrtgClient, CoreError> {
        let transport = TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            retries: self.retries,
            ..TransportConfig::default()
        };
        let client = PrtgClient::new(
            self.url.clone(),
            ApiCredentials::from(&self.credentials),
            &transport,
        )?;
        Ok(client)
    }
}

/// What report to build.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Window 0; the older windows are derived from it.
    pub primary_window: DateRange,
    /// Averaging interval passed to historic-data requests.
    pub avg_secs: u32,
    pub percentile: Percentile,
    /// Tag the sensor listing is filtered on.
    pub filter_tag: String,
    /// Restrict the run to one sensor.
    pub sensor_id: Option<i64>,
    /// Emit device name and sensor id columns.
    pub debug: bool,
}

/// Immutable configuration for one invocation, built once at the CLI
/// boundary and passed by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub connection: ConnectionConfig,
    pub report: ReportConfig,
}
