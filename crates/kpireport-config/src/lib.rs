//! Configuration for kpireport.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext +
//! passhash), and translation of a profile's connection settings into
//! `kpireport_core` types. The CLI layers its flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use kpireport_core::{DEFAULT_AVG_SECS, DEFAULT_FILTER_TAG, TlsVerification};

/// Keyring service name; entries are `<profile>/password`.
pub const KEYRING_SERVICE: &str = "kpireport";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Report defaults, overridden by flags.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named PRTG server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Artifact format: "xlsx" or "csv".
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_percentile")]
    pub percentile: u8,

    /// Historic averaging interval in seconds.
    #[serde(default = "default_avgint")]
    pub avgint: u32,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub retries: u32,

    #[serde(default = "default_filter_tag")]
    pub filter_tag: String,

    #[serde(default)]
    pub insecure: bool,

    /// Where artifacts are written when `--output` is absent.
    pub output_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            format: default_format(),
            percentile: default_percentile(),
            avgint: default_avgint(),
            timeout: default_timeout(),
            retries: 0,
            filter_tag: default_filter_tag(),
            insecure: false,
            output_dir: None,
        }
    }
}

fn default_format() -> String {
    "xlsx".into()
}
fn default_percentile() -> u8 {
    99
}
fn default_avgint() -> u32 {
    DEFAULT_AVG_SECS
}
fn default_timeout() -> u64 {
    30
}
fn default_filter_tag() -> String {
    DEFAULT_FILTER_TAG.into()
}

/// A named PRTG server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://prtg.example.net").
    pub host: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// PRTG passhash, used when no password resolves.
    pub passhash: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    /// Parsed `host`, if set.
    pub fn url(&self) -> Result<Option<url::Url>, ConfigError> {
        self.host
            .as_deref()
            .map(|host| {
                host.parse().map_err(|_| ConfigError::Validation {
                    field: "host".into(),
                    reason: format!("invalid URL: {host}"),
                })
            })
            .transpose()
    }

    /// TLS mode from `insecure` / `ca_cert`, falling back to the defaults.
    pub fn tls(&self, defaults: &Defaults) -> TlsVerification {
        if self.insecure.unwrap_or(defaults.insecure) {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "netops", "kpireport").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("kpireport");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` (missing file is fine) + `KPIREPORT_*` env.
///
/// Nested keys use a double underscore, e.g.
/// `KPIREPORT_DEFAULTS__FILTER_TAG`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KPIREPORT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// The secret a profile resolves to.
#[derive(Debug, Clone)]
pub enum ProfileSecret {
    Password(SecretString),
    Passhash(SecretString),
}

/// Resolve the profile's secret: `password_env` → keyring → plaintext
/// `password` → `passhash`.
pub fn resolve_secret(profile: &Profile, profile_name: &str) -> Result<ProfileSecret, ConfigError> {
    resolve_secret_with(profile, profile_name, keyring_password)
}

fn keyring_password(profile_name: &str) -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")).ok()?;
    entry.get_password().ok()
}

fn resolve_secret_with(
    profile: &Profile,
    profile_name: &str,
    keyring_lookup: impl Fn(&str) -> Option<String>,
) -> Result<ProfileSecret, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(ProfileSecret::Password(SecretString::from(val)));
        }
    }

    // 2. System keyring
    if let Some(pw) = keyring_lookup(profile_name) {
        return Ok(ProfileSecret::Password(SecretString::from(pw)));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(ProfileSecret::Password(SecretString::from(pw.clone())));
    }

    // 4. Passhash
    if let Some(ref hash) = profile.passhash {
        return Ok(ProfileSecret::Passhash(SecretString::from(hash.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}
