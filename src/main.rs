//! finreport command line entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use finreport_config::{Config, LabelConfig};
use finreport_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use finreport_core::tree::PreOrder;
use finreport_core::{
    build_account_tree, build_ledger_tree, build_report_display_data, calculate_parent_balances, entry_prefix_info,
    ledgers_for_period, Account, CoreError, Entry, Forest, LayoutOptions, Ledger, Report, ReportDisplayData,
};
use finreport_utils::format_amount;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

const AMOUNT_PLACES: u32 = 2;
const COLUMN_WIDTH: usize = 48;

#[derive(Parser, Debug)]
#[command(name = "finreport")]
#[command(author = "finreport contributors")]
#[command(version = "0.1.0")]
#[command(about = "Account trees, ledger rollups and financial report layouts", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a report for display
    Layout {
        /// Report JSON file
        report: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the chart-of-accounts tree
    Accounts {
        /// Account list JSON file
        accounts: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Build the ledger tree and roll balances up to parent accounts
    Ledgers {
        /// Ledger list JSON file
        ledgers: PathBuf,
        /// Only use ledgers of this period id
        #[arg(long)]
        period: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => Config::load(path.clone()).map_err(CoreError::from),
        None => Ok(Config::default()),
    };

    let level = loaded.as_ref().map(|c| c.logging.level.as_str()).unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config_path = args.config.as_deref().unwrap_or(Path::new("<default>"));
    let config = logged(loaded, "load_config", config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    log::debug!("Config loaded: {:?}", config);

    match args.command {
        Command::Layout { report, format } => layout(&config, &report, format),
        Command::Accounts { accounts, format } => accounts_tree(&config, &accounts, format),
        Command::Ledgers {
            ledgers,
            period,
            format,
        } => ledger_tree(&config, &ledgers, period.as_deref(), format),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(CoreError::from)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

/// Log a core failure with its context before handing it to anyhow
fn logged<T>(result: Result<T, CoreError>, operation: &str, path: &Path) -> Result<T> {
    result.map_err(|error| {
        let context = ErrorContext::new(operation.to_string())
            .with_data("file", serde_json::json!(path.display().to_string()));
        DefaultErrorLogger.log_error(&error, &context);
        anyhow::Error::new(error)
    })
}

fn report_forest_gaps<T>(forest: &Forest<T>, path: &Path) {
    let context = ErrorContext::new("build_tree".to_string()).with_data("file", serde_json::json!(path.display().to_string()));
    if !forest.orphans.is_empty() {
        DefaultErrorLogger.log_warning(&format!("orphaned records left out: {}", forest.orphans.join(", ")), &context);
    }
    if !forest.cycles.is_empty() {
        DefaultErrorLogger.log_warning(&format!("cyclic records left out: {}", forest.cycles.join(", ")), &context);
    }
}

// ==================== Commands ====================

fn layout(config: &Config, path: &Path, format: Format) -> Result<()> {
    let report: Report = read_json(path)?;
    let options = LayoutOptions::from_config(config);
    let data = logged(build_report_display_data(&report, &options), "layout", path)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        Format::Text => {
            match report.period {
                Some(period) => println!("{}  {}", report.title, period.heading()),
                None => println!("{}", report.title),
            }
            print_display_data(&data, &config.labels)
        }
    }
    Ok(())
}

fn accounts_tree(config: &Config, path: &Path, format: Format) -> Result<()> {
    let accounts: Vec<Account> = read_json(path)?;
    let forest = logged(build_account_tree(accounts, config.tree.orphan_policy), "accounts", path)?;
    report_forest_gaps(&forest, path);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&forest.roots)?),
        Format::Text => {
            for (depth, node) in forest.iter() {
                println!("{}{}", "  ".repeat(depth), node.data.display_name());
            }
        }
    }
    Ok(())
}

fn ledger_tree(config: &Config, path: &Path, period: Option<&str>, format: Format) -> Result<()> {
    let mut ledgers: Vec<Ledger> = read_json(path)?;
    if let Some(period) = period {
        ledgers = ledgers_for_period(ledgers, period);
        log::info!("Using {} ledgers of period {}", ledgers.len(), period);
    }

    let forest = logged(build_ledger_tree(ledgers, config.tree.orphan_policy), "ledgers", path)?;
    report_forest_gaps(&forest, path);
    let mut roots = forest.into_roots();
    calculate_parent_balances(&mut roots);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&roots)?),
        Format::Text => {
            println!(
                "{:<width$} {:>16} {:>16} {:>16} {:>16}",
                "account",
                "opening debit",
                "opening credit",
                "period debit",
                "period credit",
                width = COLUMN_WIDTH
            );
            for (depth, node) in PreOrder::new(&roots) {
                let entry = &node.data;
                let name = format!("{}{}", "  ".repeat(depth), entry.account().display_name());
                println!(
                    "{:<width$} {:>16} {:>16} {:>16} {:>16}",
                    name,
                    format_amount(entry.opening_debit, AMOUNT_PLACES),
                    format_amount(entry.opening_credit, AMOUNT_PLACES),
                    format_amount(entry.ledger.period_debit, AMOUNT_PLACES),
                    format_amount(entry.ledger.period_credit, AMOUNT_PLACES),
                    width = COLUMN_WIDTH
                );
            }
        }
    }
    Ok(())
}

// ==================== Text rendering ====================

fn render_entry(entry: &Entry, prev: Option<&Entry>, labels: &LabelConfig) -> String {
    let prefix = entry_prefix_info(entry, prev, labels).render();
    let line_number = entry.line_number.map(|n| n.to_string()).unwrap_or_default();
    let amounts: Vec<String> = entry
        .item
        .amounts
        .iter()
        .flatten()
        .map(|amount| format_amount(*amount, AMOUNT_PLACES))
        .collect();
    format!(
        "{:>4}  {}{}{}  {}",
        line_number,
        " ".repeat(entry.indentation as usize),
        prefix,
        entry.item.text,
        amounts.join("  ")
    )
}

fn print_display_data(data: &ReportDisplayData, labels: &LabelConfig) {
    let header_line: Vec<String> = data
        .headers
        .iter()
        .map(|h| format!("{:>4}  {}  {}", h.line_number_label, h.title, h.amount_types.join("  ")))
        .collect();
    println!("{}", header_line.join(" | "));

    if let Some(rows) = &data.rows {
        let mut prev_asset: Option<&Entry> = None;
        let mut prev_claim: Option<&Entry> = None;
        for row in rows {
            let asset = row.asset.entry.as_ref();
            let claim = row.liability.entry.as_ref();
            let left = asset.map(|e| render_entry(e, prev_asset, labels)).unwrap_or_default();
            let right = claim.map(|e| render_entry(e, prev_claim, labels)).unwrap_or_default();
            println!("{:<width$} | {}", left, right, width = COLUMN_WIDTH);
            prev_asset = asset;
            prev_claim = claim;
        }
    } else if let Some(entries) = &data.entries {
        let mut prev: Option<&Entry> = None;
        for entry in entries {
            println!("{}", render_entry(entry, prev, labels));
            prev = Some(entry);
        }
    }
}
