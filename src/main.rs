//! stats-list CLI
//!
//! List the groups, metrics, variables and recorded data of stats stores.

use anyhow::Context;
use clap::Parser;
use stats_list::config::{Config, ConfigLoad, LoggingConfig};
use stats_list::query::{parse_time, QuerySpec};
use stats_list::runner::{ExitStatus, Presenter, QueryRunner, RunOptions};
use stats_list::storage::{JsonStatsStore, KNOWN_UNITS};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "stats-list")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "List statistics.")]
#[command(long_about = "List statistics.\nLeave out what you don't know: every missing piece is answered with the available choices.")]
pub struct Cli {
    /// Path
    #[arg(short = 'a', long, help_heading = "Database")]
    pub path: Option<PathBuf>,

    /// Group
    #[arg(short = 'b', long, help_heading = "Database")]
    pub group: Option<String>,

    /// List recursively
    #[arg(short, long, help_heading = "Database")]
    pub recursive: bool,

    /// List rawly: open path and group without checking them
    #[arg(long, help_heading = "Database")]
    pub raw: bool,

    /// Verbose
    #[arg(short = 'l', long, help_heading = "Presentation")]
    pub verbose: bool,

    /// From time (unix seconds or date)
    #[arg(long = "from-t", value_name = "TIME", help_heading = "Search conditions")]
    pub from_t: Option<String>,

    /// To time (unix seconds or date)
    #[arg(long = "to-t", value_name = "TIME", help_heading = "Search conditions")]
    pub to_t: Option<String>,

    /// Show limits
    #[arg(long, help_heading = "Search conditions")]
    pub limits: bool,

    /// Variable
    #[arg(long, help_heading = "Search conditions")]
    pub variable: Option<String>,

    /// Metric
    #[arg(long, help_heading = "Search conditions")]
    pub metric: Option<String>,

    /// Units
    #[arg(long, help_heading = "Search conditions", long_help = units_help())]
    pub units: Option<String>,

    /// Config file (default: standard locations, then environment)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn units_help() -> String {
    format!("Units ({})", KNOWN_UNITS.join(", "))
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(ExitStatus::NotFound.code());
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitStatus> {
    let loaded = match &cli.config {
        Some(path) => ConfigLoad {
            config: Config::load_with_env(path)?,
            source: Some(path.clone()),
            skipped: Vec::new(),
        },
        None => Config::load_default(),
    };
    init_logging(&loaded.config.logging);

    for error in &loaded.skipped {
        tracing::warn!("Skipping config file: {}", error);
    }
    if let Some(source) = &loaded.source {
        tracing::debug!("Loaded config from {:?}", source);
    }
    let config = loaded.config;

    tracing::debug!("stats-list v{}", env!("CARGO_PKG_VERSION"));

    let spec = build_spec(&cli)?;

    let path = match cli.path.clone().or_else(|| config.stats.path.map(PathBuf::from)) {
        Some(path) => path,
        None => {
            eprintln!("What Statistics path?");
            return Ok(ExitStatus::NotFound);
        }
    };

    let store = JsonStatsStore::new()?;
    let options = RunOptions {
        raw: cli.raw,
        verbose: cli.verbose,
    };
    let mut runner = QueryRunner::new(&store, Presenter::stdio(), options)?;

    let status = if cli.raw || !cli.recursive {
        runner.run_single(&path, cli.group.as_deref(), cli.metric.as_deref(), &spec)?
    } else {
        runner.run_recursive(&path, cli.group.as_deref(), &spec)?.status
    };

    Ok(status)
}

fn build_spec(cli: &Cli) -> anyhow::Result<QuerySpec> {
    let from = cli
        .from_t
        .as_deref()
        .map(parse_time)
        .transpose()
        .context("--from-t")?;
    let to = cli
        .to_t
        .as_deref()
        .map(parse_time)
        .transpose()
        .context("--to-t")?;

    Ok(QuerySpec {
        from,
        to,
        variable: cli.variable.clone(),
        metric: cli.metric.clone(),
        units: cli.units.clone(),
        show_limits: cli.limits,
    })
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stats_list={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
