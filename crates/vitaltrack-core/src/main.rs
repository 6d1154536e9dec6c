//! VitalTrack CLI
//!
//! Command-line interface for the VitalTrack suit and health tracker.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use vitaltrack::config::{LogFormat, LoggingConfig};
use vitaltrack::models::{HealthyRange, MetricKind, RangeTable};
use vitaltrack::tui::App;
use vitaltrack::{Config, TrackerService};

/// VitalTrack - Suit and Health Metrics Tracker
#[derive(Parser)]
#[command(name = "vitaltrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "VITALTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI dashboard (default)
    Dashboard {
        /// Redraw interval in milliseconds
        #[arg(long)]
        tick_rate: Option<u64>,
    },

    /// Record readings and print alerts and the transcript
    Record {
        /// Readings as metric=value, e.g. heart_rate=72
        #[arg(required = true, value_parser = parse_reading)]
        readings: Vec<(MetricKind, String)>,
    },

    /// Check a value against its healthy range without recording it
    Check {
        /// Metric name (heart_rate, oxygen_level, bmi, hydration)
        metric: MetricKind,

        /// Value to check
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show the healthy ranges in effect
    Ranges,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments after `.env` so it can supply `VITALTRACK_CONFIG`
    let cli = parse_args(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let command = cli.command.unwrap_or(Commands::Dashboard { tick_rate: None });

    // Initialize logging; the dashboard owns the terminal so it logs to a file
    let to_file = matches!(command, Commands::Dashboard { .. });
    let _guard = match init_logging(&config.logging, cli.verbose, to_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(version = env!("CARGO_PKG_VERSION"), "VitalTrack starting");

    // Execute command
    let result = match command {
        Commands::Dashboard { tick_rate } => run_dashboard(config, tick_rate).await,
        Commands::Record { readings } => run_record(&config, &readings, cli.format),
        Commands::Check { metric, value } => run_check(&config, metric, &value, cli.format),
        Commands::Ranges => run_ranges(&config, cli.format),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load a `.env` file (the default lookup when `env_file` is `None`), then parse
fn parse_args<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match env_file {
        Some(path) => dotenvy::from_path(path).ok(),
        None => dotenvy::dotenv().ok().map(|_| ()),
    };
    Cli::try_parse_from(args)
}

fn init_logging(
    logging: &LoggingConfig,
    verbose: bool,
    to_file: bool,
) -> anyhow::Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let (writer, guard) = if to_file {
        let directory = logging.create_log_directory()?;
        let appender = tracing_appender::rolling::daily(directory, "vitaltrack.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (BoxMakeWriter::new(writer), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stderr), None)
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.with_ansi(!to_file).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!(e))?;

    Ok(guard)
}

async fn run_dashboard(config: Config, tick_rate: Option<u64>) -> anyhow::Result<()> {
    let tick_rate = tick_rate.unwrap_or(config.tui.tick_rate_ms).max(1);
    info!(tick_rate, "Starting TUI dashboard");

    let tracker = TrackerService::from_config(&config.tracker)?;
    let mut app = App::new(tracker).with_tick_rate(tick_rate);
    app.run().await?;

    Ok(())
}

fn run_record(
    config: &Config,
    readings: &[(MetricKind, String)],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tracker = TrackerService::from_config(&config.tracker)?;

    let mut outcomes = Vec::new();
    let mut errors = Vec::new();
    for (metric, raw) in readings {
        match tracker.record(*metric, raw) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => errors.push(e.to_string()),
        }
    }
    let transcript = tracker.transcript();

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "outcomes": outcomes,
                "errors": errors,
                "transcript": transcript,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for outcome in &outcomes {
                match &outcome.alert {
                    Some(alert) => println!("{}\n", alert.message()),
                    None => println!(
                        "Recorded {}: {}",
                        outcome.metric.title(),
                        outcome.reading.display_value()
                    ),
                }
            }
            for error in &errors {
                eprintln!("Error: {error}");
            }
            println!();
            print!("{transcript}");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} reading(s) rejected", errors.len())
    }
}

fn run_check(
    config: &Config,
    metric: MetricKind,
    raw: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tracker = TrackerService::from_config(&config.tracker)?;
    let alert = tracker.check(metric, raw)?;
    let range = tracker.ranges().bounds_for(metric);

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "metric": metric,
                "range": range,
                "healthy": alert.is_none(),
                "alert": alert,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => match alert {
            Some(alert) => println!("{}", alert.message()),
            None => println!(
                "{} of {} is within the healthy range ({range}).",
                metric.title(),
                raw.trim()
            ),
        },
    }
    Ok(())
}

fn run_ranges(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let tracker = TrackerService::from_config(&config.tracker)?;

    match format {
        OutputFormat::Json => {
            let ranges: BTreeMap<&str, HealthyRange> = tracker
                .ranges()
                .iter()
                .map(|(metric, range)| (metric.key(), range))
                .collect();
            println!("{}", serde_json::to_string_pretty(&ranges)?);
        }
        OutputFormat::Text => print!("{}", ranges_text(tracker.ranges())),
    }
    Ok(())
}

fn ranges_text(ranges: &RangeTable) -> String {
    let mut text = String::from("Healthy Ranges\n──────────────────────────────────\n");
    for (metric, range) in ranges.iter() {
        text.push_str(&format!("{:<14} {range} {}\n", metric.title(), metric.unit()));
    }
    text
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "vitaltrack", &mut io::stdout());
}

/// Parse a `metric=value` argument
fn parse_reading(arg: &str) -> Result<(MetricKind, String), String> {
    let (metric, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected metric=value, got '{arg}'"))?;
    let metric = metric.parse::<MetricKind>().map_err(|e| e.to_string())?;
    Ok((metric, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(
            parse_reading("heart_rate=72").unwrap(),
            (MetricKind::HeartRate, "72".to_string())
        );
        assert_eq!(
            parse_reading("BMI=-1").unwrap(),
            (MetricKind::Bmi, "-1".to_string())
        );
        assert!(parse_reading("heart_rate").is_err());
        assert!(parse_reading("temperature=37").is_err());
    }

    #[test]
    fn test_default_command_is_dashboard() {
        let cli = Cli::try_parse_from(["vitaltrack"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["vitaltrack", "record", "bmi=22", "hydration=60"]).unwrap();
        match cli.command {
            Some(Commands::Record { readings }) => assert_eq!(readings.len(), 2),
            _ => panic!("expected record command"),
        }
    }

    #[test]
    fn test_check_accepts_negative_values() {
        let cli = Cli::try_parse_from(["vitaltrack", "check", "hydration", "-5"]).unwrap();
        match cli.command {
            Some(Commands::Check { metric, value }) => {
                assert_eq!(metric, MetricKind::Hydration);
                assert_eq!(value, "-5");
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_ranges_text_uses_shortest_bounds() {
        let text = ranges_text(&RangeTable::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Healthy Ranges");
        assert_eq!(lines[2], "Heart Rate     60 to 100 bpm");
        assert_eq!(lines[4], "Bmi            18.5 to 24.9 kg/m²");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_env_file_supplies_config_path() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("from-dotenv.toml");
        let env_path = dir.path().join(".env");
        let mut env_file = std::fs::File::create(&env_path).unwrap();
        writeln!(env_file, "VITALTRACK_CONFIG={}", config_path.display()).unwrap();

        let cli = parse_args(Some(&env_path), ["vitaltrack", "ranges"]).unwrap();
        assert_eq!(cli.config, Some(config_path));
        assert!(matches!(cli.command, Some(Commands::Ranges)));
    }
}
