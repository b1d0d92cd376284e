//! Clap derive structures for the `kpireport` CLI.
//!
//! Running `kpireport` with no subcommand builds the report; `sensors`
//! lists what would be reported on. Connection flags are global.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kpireport -- bandwidth KPI workbooks from PRTG historic data
#[derive(Debug, Parser)]
#[command(
    name = "kpireport",
    version,
    about = "Build bandwidth KPI reports from PRTG historic data",
    long_about = "Queries PRTG for every sensor tagged kpi_bandwidth, reduces four \
        staggered 14-day windows of traffic to a percentile, and writes circuit, \
        choke point, and core segment utilization to an XLSX or CSV report.",
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "KPIREPORT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// PRTG base URL, e.g. https://prtg.example.net (overrides profile)
    #[arg(long, env = "KPIREPORT_HOST", global = true)]
    pub host: Option<String>,

    /// PRTG account name [default: prtgadmin]
    #[arg(long, short = 'u', env = "KPIREPORT_USERNAME", global = true)]
    pub username: Option<String>,

    /// PRTG account password
    #[arg(long, env = "KPIREPORT_PASSWORD", global = true, hide_env_values = true, hide = true)]
    pub password: Option<String>,

    /// PRTG passhash, used instead of a password
    #[arg(long, env = "KPIREPORT_PASSHASH", global = true, hide_env_values = true)]
    pub passhash: Option<String>,

    /// Only sensors carrying this tag are reported [default: kpi_bandwidth]
    #[arg(long, global = true)]
    pub filter_tag: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "KPIREPORT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "KPIREPORT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Extra attempts for transient failures (timeouts, 502/503/504) [default: 0]
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Report Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// First day of the primary window, YYYY-MM-DD [default: 14 days ago]
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the primary window, YYYY-MM-DD [default: yesterday]
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Averaging interval of historic data in seconds [default: 3600]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub avgint: Option<u32>,

    /// Percentile used for max traffic, 0-100 [default: 99]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub percentile: Option<u8>,

    /// Directory the report is written to [default: current directory]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Report file format [default: xlsx]
    #[arg(long, short = 'f')]
    pub format: Option<ReportFormat>,

    /// Only report on this sensor id
    #[arg(long)]
    pub sensorid: Option<i64>,

    /// Add device name and sensor id columns
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Excel workbook with formatting
    Xlsx,
    /// Plain CSV, percentages as text
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tagged sensors and the properties read from their tags
    Sensors(SensorsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct SensorsArgs {
    /// Only show this sensor id
    #[arg(long)]
    pub sensorid: Option<i64>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
