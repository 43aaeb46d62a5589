//! Gurume: restaurant record integration.
//!
//! Restaurant recommendations arrive from several places (listing scrapes,
//! LLM answers) as JSON arrays, and the same establishment shows up many
//! times under slightly different names. Gurume folds those observations
//! into one canonical record per establishment and keeps them in a local
//! SQLite catalog.
//!
//! # Pipeline
//!
//! ```text
//! JSON files ─► WorkingSet ─► Integrator ─► Store ─► reports
//! ```
//!
//! - [`plugins::loader`]: JSON arrays into an ordered [`plugins::loader::WorkingSet`]
//! - [`plugins::similarity`]: pluggable name similarity, gestalt ratio by default
//! - [`plugins::dedup`] / [`plugins::merge`]: near-duplicate grouping and
//!   first-non-empty-wins field merge
//! - [`plugins::integrate`]: the two combined under a [`core::config::MergeStrategy`]
//! - [`core::store`]: the `restaurants` table, upsert by name, counts and averages
//! - [`plugins::report`]: rating histogram and price bands
//!
//! # Examples
//!
//! ```rust
//! use gurume::core::record::RestaurantRecord;
//! use gurume::core::store::Store;
//! use gurume::plugins::integrate::Integrator;
//!
//! # fn main() -> Result<(), gurume::core::error::GurumeError> {
//! let integrator = Integrator::from_config(&Default::default())?;
//! let (canonical, _) = integrator.integrate(vec![
//!     RestaurantRecord::new("Sushi Ken").with_rating("4.2"),
//!     RestaurantRecord::new("Sushi Ken 2").with_address("1-2-3 Ginza"),
//! ]);
//!
//! let store = Store::open_in_memory()?;
//! store.bulk_load(&canonical)?;
//! assert_eq!(store.count()?, 1);
//! store.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ```bash
//! gurume integrate ginza_sushi.json llm_answers.json -o integrated.json
//! gurume store load integrated.json
//! gurume report distribution --by location
//! ```

pub mod core;
pub mod plugins;

mod cli;

use crate::cli::{Cli, Command, DedupArgs, OutputFormat, ReportCommand, StoreCommand};
use crate::core::config::GurumeConfig;
use crate::core::error::GurumeError;
use crate::core::output::{bar, compact_line, or_dash};
use crate::core::record::RestaurantRecord;
use crate::core::store::{Dimension, Store};
use crate::core::time::command_envelope;
use crate::plugins::integrate::{IntegrationSummary, Integrator};
use crate::plugins::loader::{self, WorkingSet};
use crate::plugins::report;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const BAR_WIDTH: usize = 30;

pub fn run() -> Result<(), GurumeError> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let current_dir = std::env::current_dir()?;
    let mut config = GurumeConfig::load(cli.config.as_deref(), &current_dir)?;
    if let Some(db) = cli.db {
        config.store.path = db;
    }
    let format = cli.format;

    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Integrate(integrate_cli) => {
            apply_dedup_args(&mut config, &integrate_cli.dedup)?;
            run_integrate(&config, &integrate_cli.inputs, integrate_cli.output, format)
        }
        Command::Store(store_cli) => match store_cli.command {
            StoreCommand::Load {
                inputs,
                integrate,
                dedup,
            } => {
                apply_dedup_args(&mut config, &dedup)?;
                run_store_load(&config, &inputs, integrate, format)
            }
            StoreCommand::Count => {
                let store = Store::open_existing(&config.store)?;
                let count = store.count()?;
                store.close()?;
                match format {
                    OutputFormat::Json => print_envelope(
                        "store.count",
                        "ok",
                        serde_json::json!({ "count": count }),
                    ),
                    OutputFormat::Text => println!("{}", count),
                }
                Ok(())
            }
            StoreCommand::List { limit } => {
                let store = Store::open_existing(&config.store)?;
                let rows = store.list(limit)?;
                store.close()?;
                match format {
                    OutputFormat::Json => print_envelope(
                        "store.list",
                        "ok",
                        serde_json::json!({ "restaurants": rows }),
                    ),
                    OutputFormat::Text => {
                        for row in &rows {
                            println!(
                                "{:>5}  {}  {:>6} reviews  {}  {}",
                                or_dash(row.rating.map(|r| format!("{:.2}", r))).bright_yellow(),
                                row.name.bold(),
                                or_dash(row.reviews),
                                or_dash(row.location.as_deref()).cyan(),
                                compact_line(row.address.as_deref().unwrap_or(""), 40).dimmed()
                            );
                        }
                    }
                }
                Ok(())
            }
        },
        Command::Report(report_cli) => {
            let store = Store::open_existing(&config.store)?;
            let result = run_report(&store, &config, report_cli.command, format);
            store.close()?;
            result
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gurume=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn apply_dedup_args(config: &mut GurumeConfig, args: &DedupArgs) -> Result<(), GurumeError> {
    if let Some(threshold) = args.threshold {
        config.dedup.threshold = threshold;
    }
    if let Some(strategy) = args.strategy {
        config.dedup.strategy = strategy.into();
    }
    config.validate()
}

fn load_inputs(inputs: &[PathBuf]) -> Result<WorkingSet, GurumeError> {
    let mut working_set = WorkingSet::new();
    for input in inputs {
        working_set.load(input)?;
    }
    Ok(working_set)
}

fn integrate_inputs(
    config: &GurumeConfig,
    inputs: &[PathBuf],
) -> Result<(Vec<RestaurantRecord>, IntegrationSummary), GurumeError> {
    let integrator = Integrator::from_config(&config.dedup)?;
    let working_set = load_inputs(inputs)?;
    Ok(integrator.integrate(working_set.into_records()))
}

fn run_integrate(
    config: &GurumeConfig,
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), GurumeError> {
    let (records, summary) = integrate_inputs(config, inputs)?;

    match (&output, format) {
        (Some(path), OutputFormat::Text) => {
            loader::save_json(path, &records)?;
            println!(
                "{} {} records -> {} canonical ({} folded) written to {}",
                "✔".green().bold(),
                summary.input,
                summary.canonical.to_string().bold(),
                summary.collapsed(),
                path.display()
            );
        }
        (Some(path), OutputFormat::Json) => {
            loader::save_json(path, &records)?;
            print_envelope(
                "integrate",
                "ok",
                serde_json::json!({ "summary": summary, "output": path }),
            );
        }
        (None, OutputFormat::Text) => {
            let stdout = std::io::stdout();
            loader::write_json(stdout.lock(), &records)?;
            println!();
        }
        (None, OutputFormat::Json) => print_envelope(
            "integrate",
            "ok",
            serde_json::json!({ "summary": summary, "records": records }),
        ),
    }
    Ok(())
}

fn run_store_load(
    config: &GurumeConfig,
    inputs: &[PathBuf],
    integrate: bool,
    format: OutputFormat,
) -> Result<(), GurumeError> {
    let records = if integrate {
        integrate_inputs(config, inputs)?.0
    } else {
        load_inputs(inputs)?.into_records()
    };

    let store = Store::open_with(&config.store)?;
    let report = store.bulk_load(&records)?;
    let total = store.count()?;
    store.close()?;

    match format {
        OutputFormat::Json => {
            let status = if report.is_clean() { "ok" } else { "partial" };
            print_envelope(
                "store.load",
                status,
                serde_json::json!({ "report": report, "total": total }),
            );
        }
        OutputFormat::Text => {
            println!(
                "{} upserted {} records ({} in catalog)",
                "✔".green().bold(),
                report.upserted,
                total
            );
            for rejected in &report.rejected {
                println!(
                    "{} rejected {}: {}",
                    "✘".red().bold(),
                    rejected.name.bold(),
                    rejected.reason
                );
            }
        }
    }
    Ok(())
}

fn run_report(
    store: &Store,
    config: &GurumeConfig,
    command: ReportCommand,
    format: OutputFormat,
) -> Result<(), GurumeError> {
    match command {
        ReportCommand::Stats => {
            let stats = store.stats()?;
            match (format, stats) {
                (OutputFormat::Json, stats) => print_envelope(
                    "report.stats",
                    if stats.is_some() { "ok" } else { "no_data" },
                    serde_json::json!({ "stats": stats }),
                ),
                (OutputFormat::Text, None) => println!("{}", "no data: the catalog is empty".yellow()),
                (OutputFormat::Text, Some(stats)) => {
                    println!("restaurants  {}", stats.restaurants.to_string().bold());
                    println!(
                        "avg rating   {}",
                        or_dash(stats.avg_rating.map(|r| format!("{:.2}", r)))
                    );
                    println!(
                        "avg reviews  {}",
                        or_dash(stats.avg_reviews.map(|r| format!("{:.1}", r)))
                    );
                }
            }
        }
        ReportCommand::Distribution { by } => {
            let by: Dimension = by.into();
            let distribution = store.distribution_by(by)?;
            match format {
                OutputFormat::Json => print_envelope(
                    "report.distribution",
                    "ok",
                    serde_json::json!({ "by": by, "distribution": distribution }),
                ),
                OutputFormat::Text => {
                    let max = distribution.values().copied().max().unwrap_or(0);
                    for (category, count) in &distribution {
                        let label = if category.is_empty() { "(untagged)" } else { category.as_str() };
                        println!("{:<16} {:>5} {}", label, count, bar(*count, max, BAR_WIDTH).cyan());
                    }
                }
            }
        }
        ReportCommand::Ratings { bins } => {
            let bins = bins.unwrap_or(config.report.rating_bins);
            let histogram = report::rating_histogram(store, bins)?;
            match format {
                OutputFormat::Json => print_envelope(
                    "report.ratings",
                    "ok",
                    serde_json::json!({ "bins": histogram }),
                ),
                OutputFormat::Text => {
                    let max = histogram.iter().map(|b| b.count).max().unwrap_or(0);
                    for bin in &histogram {
                        println!(
                            "{:.2}-{:.2} {:>5} {}",
                            bin.lower,
                            bin.upper,
                            bin.count,
                            bar(bin.count, max, BAR_WIDTH).bright_yellow()
                        );
                    }
                }
            }
        }
        ReportCommand::Prices => {
            let bands = report::price_bands(store)?;
            match format {
                OutputFormat::Json => print_envelope(
                    "report.prices",
                    "ok",
                    serde_json::json!({ "prices": bands }),
                ),
                OutputFormat::Text => {
                    let max = bands.bands.iter().map(|b| b.count).max().unwrap_or(0);
                    for band in &bands.bands {
                        println!(
                            "{:<12} {:>5} {}",
                            band.band,
                            band.count,
                            bar(band.count, max, BAR_WIDTH).green()
                        );
                    }
                    if bands.unparsed > 0 {
                        println!("{:<12} {:>5}", "unparsed", bands.unparsed);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_envelope(cmd: &str, status: &str, extra: serde_json::Value) {
    let envelope = command_envelope(cmd, status, extra);
    match serde_json::to_string_pretty(&envelope) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("failed to render {} output: {}", cmd, e),
    }
}
