//! Finance dashboard reports
//!
//! Pulls one snapshot from the spreadsheet-backed dashboard endpoint (or a
//! saved JSON file) and prints the dashboard views: KPIs, expenses as a
//! percent of sales, top category commentary, and the P&L statement.

mod config;
mod constants;
mod fetch;
mod reports;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use expense_dashboard::kpi::expense_consistency;
use expense_dashboard::{DashboardSnapshot, DashboardView, ExpenseCategory, MonthSelector};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, FileConfig};
use fetch::SnapshotQuery;
use reports::ReportData;

/// Load config file, falling back to defaults when a snapshot source is given
fn load_config_file(path: &Path, has_source: bool) -> Result<FileConfig> {
    if !path.exists() {
        if has_source {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(FileConfig::default());
        }
        anyhow::bail!(
            "Config file '{}' not found.\n\n\
            To get started:\n\
            1. Copy config.toml.example to config.toml\n\
            2. Set [source] endpoint to your dashboard URL\n\n\
            Or pass --input <snapshot.json> to read a saved snapshot.",
            path.display()
        );
    }

    FileConfig::load(path)
}

#[derive(Parser, Debug)]
#[command(name = "expense-report")]
#[command(about = "Sales and expense reports from the finance dashboard")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = constants::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Read a saved snapshot JSON instead of querying the endpoint
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Dashboard endpoint URL (overrides config.toml)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Year to report (default: current year)
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Month name or "all"
    #[arg(short, long, default_value = "all", global = true)]
    month: MonthSelector,

    /// Category to chart (repeatable; default: the standard expense categories)
    #[arg(long = "category", global = true)]
    categories: Vec<String>,

    /// Output directory for generated CSV reports
    #[arg(short, long, default_value = "./output", global = true)]
    output_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full console summary (default)
    Summary,

    /// KPI tiles only
    Kpis,

    /// Expenses as a percent of sales, per month
    Percent,

    /// Profit & loss statement
    Pnl {
        /// Hide the Total column
        #[arg(long)]
        no_total: bool,
    },

    /// Write CSV reports to the output directory
    Export {
        /// Hide the Total column
        #[arg(long)]
        no_total: bool,
    },

    /// Print every derived view as JSON
    Json {
        /// Pretty-print
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let has_source = args.input.is_some() || args.endpoint.is_some();
    let file_config = load_config_file(&args.config, has_source)?;
    let config = Config::from_file(&file_config, args.endpoint.clone())?;

    let year = args.year.unwrap_or_else(|| chrono::Local::now().year());
    let categories: Vec<ExpenseCategory> = if args.categories.is_empty() {
        config.categories.clone()
    } else {
        args.categories
            .iter()
            .map(|key| ExpenseCategory::from_key(key))
            .collect()
    };

    let snapshot = load_snapshot(&args, &config, year, &categories).await?;
    check_consistency(&snapshot);

    let view = DashboardView::new(&snapshot, args.month)
        .with_categories(categories)
        .with_target_overrides(&config.target_overrides);

    let data = |show_total| ReportData {
        view: &view,
        currency: &config.currency,
        year,
        show_total,
    };

    match args.command.unwrap_or(Command::Summary) {
        Command::Summary => reports::print_summary(&data(true)),
        Command::Kpis => reports::print_kpis(&view, &config.currency),
        Command::Percent => reports::print_percent_table(&view),
        Command::Pnl { no_total } => reports::print_pnl_table(
            "PROFIT & LOSS",
            &view.profit_and_loss(!no_total),
            &config.currency,
        ),
        Command::Export { no_total } => {
            std::fs::create_dir_all(&args.output_dir).with_context(|| {
                format!("Failed to create output directory: {}", args.output_dir.display())
            })?;
            println!("Generating reports in {}...", args.output_dir.display());
            reports::generate_all_reports(&args.output_dir, &data(!no_total))?;
        }
        Command::Json { pretty } => {
            let report = view.report(&config.currency, true);
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}

async fn load_snapshot(
    args: &Args,
    config: &Config,
    year: i32,
    categories: &[ExpenseCategory],
) -> Result<DashboardSnapshot> {
    if let Some(path) = &args.input {
        return fetch::load_snapshot_file(path);
    }

    let query = SnapshotQuery {
        year,
        month: args.month,
        category: categories.first().cloned().filter(|_| categories.len() == 1),
    };
    fetch::fetch_snapshot(config, &query).await
}

/// Warn when the reported total disagrees with the category breakdown
fn check_consistency(snapshot: &DashboardSnapshot) {
    if let Some(check) = expense_consistency(snapshot)
        && !check.is_consistent()
    {
        warn!(
            reported = check.reported,
            computed = check.computed,
            difference = check.difference(),
            "totalExpenses does not match the sum of category totals; using category totals"
        );
    }
}
