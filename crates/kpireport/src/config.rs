//! Flag-aware configuration: layers `GlobalOpts` and `ReportArgs` over the
//! TOML profile and produces the immutable `RunConfig`.
//!
//! This is the single boundary where CLI types cross into core types.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use secrecy::SecretString;
use tracing::debug;

use kpireport_config::{Config, Profile, ProfileSecret, config_path, resolve_secret};
use kpireport_core::{
    ConnectionConfig, Credentials, DateRange, Percentile, ReportConfig, RunConfig, TlsVerification,
};

use crate::cli::{GlobalOpts, ReportArgs, ReportFormat};
use crate::error::CliError;

/// Account used when neither flag nor profile names one.
pub const DEFAULT_USERNAME: &str = "prtgadmin";

/// Where and in which format the artifact goes.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub format: ReportFormat,
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Look up the active profile. An explicitly requested profile must exist;
/// the implicit default may be absent and is then treated as empty.
fn active_profile<'a>(
    global: &GlobalOpts,
    config: &'a Config,
    name: &str,
) -> Result<Option<&'a Profile>, CliError> {
    match config.profiles.get(name) {
        Some(profile) => Ok(Some(profile)),
        None if global.profile.is_some() => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            Err(CliError::ProfileNotFound {
                name: name.into(),
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            })
        }
        None => Ok(None),
    }
}

/// Build the connection settings from flags > env > profile > defaults.
pub fn resolve_connection(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ConnectionConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let empty = Profile::default();
    let profile = active_profile(global, config, &profile_name)?.unwrap_or(&empty);

    // 1. Host (flag > env > profile)
    let url = match global.host.as_deref() {
        Some(host) => host.parse().map_err(|_| CliError::Validation {
            field: "host".into(),
            reason: format!("invalid URL: {host}"),
        })?,
        None => profile.url()?.ok_or_else(|| CliError::NoHost {
            path: config_path().display().to_string(),
        })?,
    };

    // 2. Credentials
    let username = global
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .unwrap_or_else(|| DEFAULT_USERNAME.into());
    let credentials = resolve_credentials(global, profile, &profile_name, username)?;

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        profile.tls(&config.defaults)
    };

    // 4. Timeout and retries
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(config.defaults.timeout),
    );
    let retries = global.retries.unwrap_or(config.defaults.retries);

    debug!(profile = %profile_name, %url, ?tls, ?timeout, retries, "connection resolved");
    Ok(ConnectionConfig {
        url,
        credentials,
        tls,
        timeout,
        retries,
    })
}

// ── Credential helpers ───────────────────────────────────────────────

/// Flag/env password → flag/env passhash → profile chain → interactive prompt.
fn resolve_credentials(
    global: &GlobalOpts,
    profile: &Profile,
    profile_name: &str,
    username: String,
) -> Result<Credentials, CliError> {
    // 1. CLI flag or KPIREPORT_PASSWORD
    if let Some(ref pw) = global.password {
        return Ok(Credentials::Password {
            username,
            password: SecretString::from(pw.clone()),
        });
    }

    // 2. CLI flag or KPIREPORT_PASSHASH
    if let Some(ref hash) = global.passhash {
        return Ok(Credentials::Passhash {
            username,
            passhash: SecretString::from(hash.clone()),
        });
    }

    // 3. Profile: password_env, keyring, plaintext, passhash
    match resolve_secret(profile, profile_name) {
        Ok(ProfileSecret::Password(password)) => {
            return Ok(Credentials::Password { username, password });
        }
        Ok(ProfileSecret::Passhash(passhash)) => {
            return Ok(Credentials::Passhash { username, passhash });
        }
        Err(err) => debug!(error = %err, "no stored credentials"),
    }

    // 4. Prompt, only when someone can answer
    if std::io::stdin().is_terminal() {
        let pw = rpassword::prompt_password(format!("PRTG password for {username}: "))?;
        return Ok(Credentials::Password {
            username,
            password: SecretString::from(pw),
        });
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Report settings ──────────────────────────────────────────────────

/// Build the report settings from flags > config defaults.
pub fn resolve_report(
    args: &ReportArgs,
    global: &GlobalOpts,
    config: &Config,
    today: NaiveDate,
) -> Result<ReportConfig, CliError> {
    // Each bound defaults on its own, like the trailing window.
    let trailing = DateRange::trailing(today);
    let primary_window = DateRange::new(
        args.start.unwrap_or(trailing.start),
        args.end.unwrap_or(trailing.end),
    )?;

    let percentile = Percentile::new(args.percentile.unwrap_or(config.defaults.percentile))?;

    let avg_secs = args.avgint.unwrap_or(config.defaults.avgint);
    if avg_secs == 0 {
        return Err(CliError::Validation {
            field: "avgint".into(),
            reason: "averaging interval must be at least one second".into(),
        });
    }

    Ok(ReportConfig {
        primary_window,
        avg_secs,
        percentile,
        filter_tag: global
            .filter_tag
            .clone()
            .unwrap_or_else(|| config.defaults.filter_tag.clone()),
        sensor_id: args.sensorid,
        debug: args.debug,
    })
}

/// Connection and report settings for one run, resolved once.
pub fn resolve_run(
    args: &ReportArgs,
    global: &GlobalOpts,
    config: &Config,
    today: NaiveDate,
) -> Result<RunConfig, CliError> {
    let report = resolve_report(args, global, config, today)?;
    let connection = resolve_connection(global, config)?;
    Ok(RunConfig { connection, report })
}

/// Resolve artifact directory and format.
pub fn resolve_output(args: &ReportArgs, config: &Config) -> Result<OutputConfig, CliError> {
    let format = match args.format {
        Some(format) => format,
        None => parse_format(&config.defaults.format)?,
    };
    let dir = args
        .output
        .clone()
        .or_else(|| config.defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(OutputConfig { dir, format })
}

fn parse_format(raw: &str) -> Result<ReportFormat, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "xlsx" => Ok(ReportFormat::Xlsx),
        "csv" => Ok(ReportFormat::Csv),
        other => Err(CliError::Validation {
            field: "defaults.format".into(),
            reason: format!("expected 'xlsx' or 'csv', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["kpireport"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn report_defaults() {
        let cli = parse(&[]);
        let report = resolve_report(&cli.report, &cli.global, &Config::default(), today()).unwrap();
        assert_eq!(report.primary_window, DateRange::trailing(today()));
        assert_eq!(report.percentile, Percentile::DEFAULT);
        assert_eq!(report.avg_secs, 3600);
        assert_eq!(report.filter_tag, "kpi_bandwidth");
        assert_eq!(report.sensor_id, None);
        assert!(!report.debug);
    }

    #[test]
    fn explicit_dates_and_overrides() {
        let cli = parse(&[
            "--start", "2024-01-01", "--end", "2024-01-14", "--percentile", "95", "--avgint", "300",
            "--sensorid", "2001", "--debug",
        ]);
        let report = resolve_report(&cli.report, &cli.global, &Config::default(), today()).unwrap();
        assert_eq!(report.primary_window.start.to_string(), "2024-01-01");
        assert_eq!(report.primary_window.end.to_string(), "2024-01-14");
        assert_eq!(report.percentile.get(), 95);
        assert_eq!(report.avg_secs, 300);
        assert_eq!(report.sensor_id, Some(2001));
        assert!(report.debug);
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let cli = parse(&["--start", "2024-01-14", "--end", "2024-01-01"]);
        let err = resolve_report(&cli.report, &cli.global, &Config::default(), today()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn lone_start_keeps_default_end() {
        let cli = parse(&["--start", "2024-02-20"]);
        let report = resolve_report(&cli.report, &cli.global, &Config::default(), today()).unwrap();
        assert_eq!(report.primary_window.start.to_string(), "2024-02-20");
        assert_eq!(report.primary_window.end.to_string(), "2024-03-14");
    }

    #[test]
    fn lone_end_keeps_default_start() {
        let cli = parse(&["--end", "2024-03-10"]);
        let report = resolve_report(&cli.report, &cli.global, &Config::default(), today()).unwrap();
        assert_eq!(report.primary_window.start.to_string(), "2024-03-01");
        assert_eq!(report.primary_window.end.to_string(), "2024-03-10");
    }

    #[test]
    fn lone_end_before_default_start_is_rejected() {
        let cli = parse(&["--end", "2024-02-01"]);
        let err = resolve_report(&cli.report, &cli.global, &Config::default(), today()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn percentile_out_of_range_is_a_usage_error() {
        assert!(Cli::try_parse_from(["kpireport", "--percentile", "101"]).is_err());
    }

    #[test]
    fn connection_from_flags() {
        let cli = parse(&[
            "--host", "https://prtg.example.net", "--password", "pw", "-k", "--timeout", "5",
            "--retries", "2",
        ]);
        let conn = resolve_connection(&cli.global, &Config::default()).unwrap();
        assert_eq!(conn.url.as_str(), "https://prtg.example.net/");
        assert_eq!(conn.credentials.username(), DEFAULT_USERNAME);
        assert_eq!(conn.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(conn.timeout, Duration::from_secs(5));
        assert_eq!(conn.retries, 2);
    }

    #[test]
    fn missing_host_is_a_usage_error() {
        let cli = parse(&["--password", "pw"]);
        let err = resolve_connection(&cli.global, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoHost { .. }));
    }

    #[test]
    fn unknown_profile_is_reported() {
        let cli = parse(&["--profile", "lab", "--host", "https://x", "--password", "pw"]);
        let err = resolve_connection(&cli.global, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "lab"));
    }

    #[test]
    fn output_defaults_to_xlsx_in_cwd() {
        let cli = parse(&[]);
        let out = resolve_output(&cli.report, &Config::default()).unwrap();
        assert_eq!(out.format, ReportFormat::Xlsx);
        assert_eq!(out.dir, PathBuf::from("."));

        let cli = parse(&["--format", "csv", "--output", "/tmp/reports"]);
        let out = resolve_output(&cli.report, &Config::default()).unwrap();
        assert_eq!(out.format, ReportFormat::Csv);
        assert_eq!(out.dir, PathBuf::from("/tmp/reports"));
    }
}
