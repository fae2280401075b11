mod config;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use beacon_core::SystemClock;
use beacon_report::{HttpReporter, ReportParams};
use beacon_storage::JsonFileStore;
use beacon_updater::{UpdateOutcome, UpdaterConfig, UsageUpdater};

use config::{load_config, BeaconConfig};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Beacon usage-ping tool.
#[derive(Parser)]
#[command(name = "beacon", version, about = "Beacon usage-ping tool")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one update pass: send any due pings, commit watermarks on success
    Check {
        /// Path to the beacon.toml config file
        #[arg(long)]
        config: PathBuf,
        /// Treat this installation as fresh when resolving the install week
        #[arg(long)]
        fresh_install: bool,
    },
    /// Show stored watermarks and the decision a pass would make right now
    Status {
        /// Path to the beacon.toml config file
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            config,
            fresh_install,
        } => cmd_check(&config, fresh_install, cli.output),
        Commands::Status { config } => cmd_status(&config, cli.output),
    }
}

fn load_or_exit(path: &Path) -> BeaconConfig {
    match load_config(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn build_updater(cfg: &BeaconConfig, fresh_install: bool) -> UsageUpdater<JsonFileStore, HttpReporter> {
    let store = Arc::new(JsonFileStore::new(cfg.data_path.clone()));
    let reporter = Arc::new(HttpReporter::new(ReportParams {
        endpoint: cfg.endpoint.clone(),
        platform: cfg.platform.clone(),
        channel: cfg.channel.clone(),
    }));
    UsageUpdater::new(
        store,
        reporter,
        Arc::new(SystemClock),
        UpdaterConfig {
            version: cfg.version.clone(),
            fresh_install,
            cadence: cfg.cadence_config(),
        },
    )
}

fn cmd_check(config_path: &Path, fresh_install: bool, output: OutputFormat) {
    let cfg = load_or_exit(config_path);
    let updater = build_updater(&cfg, fresh_install);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let outcome = rt.block_on(updater.run_once());

    // Best-effort telemetry: only config errors are fatal. Failed sends
    // and store outages are diagnostics, not exit codes.
    let (status, detail) = match &outcome {
        UpdateOutcome::NothingDue => ("nothing_due", None),
        UpdateOutcome::Reported => ("reported", None),
        UpdateOutcome::SendFailed(e) => ("send_failed", Some(e.to_string())),
        UpdateOutcome::StoreUnavailable(e) => ("store_unavailable", Some(e.to_string())),
    };

    match output {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "outcome": status,
                "detail": detail,
            });
            println!("{value}");
        }
        OutputFormat::Text => match detail {
            Some(detail) => {
                println!("{status}");
                eprintln!("note: {detail}");
            }
            None => println!("{status}"),
        },
    }
}

fn cmd_status(config_path: &Path, output: OutputFormat) {
    let cfg = load_or_exit(config_path);
    let updater = build_updater(&cfg, true);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let (state, decision) = match rt.block_on(updater.peek()) {
        Ok(peeked) => peeked,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "watermarks": state,
                "due": {
                    "first_run": decision.first_run,
                    "daily": decision.daily,
                    "weekly": decision.weekly,
                    "monthly": decision.monthly,
                },
            });
            println!("{value}");
        }
        OutputFormat::Text => {
            println!("last_report_millis:        {}", state.last_report_millis);
            println!(
                "last_weekly_report_millis: {}",
                state.last_weekly_report_millis
            );
            println!("last_report_month:         {}", state.last_report_month);
            println!("last_report_year:          {}", state.last_report_year);
            println!(
                "due: first_run={} daily={} weekly={} monthly={}",
                decision.first_run, decision.daily, decision.weekly, decision.monthly
            );
        }
    }
}
