use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use trade_journal::config::Config;
use trade_journal::core::stats::{self, DIMENSIONS};
use trade_journal::journal::{archive, Daybook, TradeDraft};
use trade_journal::models::{
    Confirmation, EmotionalState, EntryQuality, MarketConditions, Score, Sizing, TradeStatus,
};
use trade_journal::report;

#[derive(Parser)]
#[command(name = "trade-journal", version, about = "Futures trading journal with a pressing roadmap")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "JOURNAL_CONFIG", default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new trade; anything not given comes from the config defaults
    Add {
        #[arg(short, long)]
        instrument: Option<String>,
        #[arg(short, long)]
        size: Option<f64>,
        /// Stop distance in points
        #[arg(long)]
        stop: Option<f64>,
        /// Exit points, when the trade is already closed
        #[arg(short, long)]
        points: Option<String>,
        #[arg(long)]
        sizing: Option<Sizing>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Record the exit points for a trade
    Close { id: i64, points: String },
    /// Clear the exit points and set a trade back to Active
    Reopen { id: i64 },
    /// Edit fields of a trade; derived fields are recomputed
    Edit {
        id: i64,
        #[arg(short, long)]
        instrument: Option<String>,
        #[arg(short, long)]
        size: Option<f64>,
        #[arg(long)]
        stop: Option<f64>,
        #[arg(short, long)]
        points: Option<String>,
        #[arg(long)]
        status: Option<TradeStatus>,
        #[arg(long)]
        came_to_me: Option<Confirmation>,
        #[arg(long)]
        with_value: Option<Confirmation>,
        #[arg(long)]
        market_conditions: Option<MarketConditions>,
        #[arg(long)]
        score: Option<Score>,
        #[arg(long)]
        entry_quality: Option<EntryQuality>,
        #[arg(long)]
        emotional_state: Option<EmotionalState>,
        #[arg(long)]
        sizing: Option<Sizing>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a trade; deleting counts as a loss for the streak
    Rm { id: i64 },
    /// List the trades of one day
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Day report: trades, exposure, and the pressing state
    Day {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Journal-wide statistics
    Stats,
    /// P&L breakdown by classification tag
    Breakdown {
        #[arg(long)]
        dimension: Option<String>,
    },
    /// Show the pressing roadmap and the suggested size
    Roadmap,
    /// Export the journal as JSON (or CSV with --csv)
    Export {
        path: Option<PathBuf>,
        #[arg(long)]
        csv: bool,
    },
    /// Merge a JSON export back into the journal
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let mut book = Daybook::open(cfg)?;

    match cli.command {
        Commands::Add {
            instrument,
            size,
            stop,
            points,
            sizing,
            notes,
        } => {
            let record = book.add_trade(TradeDraft {
                instrument,
                size,
                stop_loss_points: stop,
                points,
                sizing,
                notes,
            })?;
            report::print_trade_line(&record);
        }
        Commands::Close { id, points } => {
            let summary = book.close_trade(id, &points)?;
            report::print_trade_line(&summary.record);
            println!(
                "  outcome: {} | pressing step {}",
                summary.outcome,
                summary.pressing.index + 1
            );
        }
        Commands::Reopen { id } => {
            let summary = book.reopen_trade(id)?;
            report::print_trade_line(&summary.record);
        }
        Commands::Edit {
            id,
            instrument,
            size,
            stop,
            points,
            status,
            came_to_me,
            with_value,
            market_conditions,
            score,
            entry_quality,
            emotional_state,
            sizing,
            notes,
        } => {
            let mut edited = book.get(id)?;
            if let Some(v) = instrument {
                edited.instrument = v;
            }
            if let Some(v) = size {
                edited.size = v;
            }
            if let Some(v) = stop {
                edited.stop_loss_points = Some(v);
            }
            if let Some(v) = points {
                edited.set_points(Some(&v));
            }
            if let Some(v) = status {
                edited.status = v;
            }
            if let Some(v) = came_to_me {
                edited.came_to_me = Some(v);
            }
            if let Some(v) = with_value {
                edited.with_value = Some(v);
            }
            if let Some(v) = market_conditions {
                edited.market_conditions = Some(v);
            }
            if let Some(v) = score {
                edited.score = Some(v);
            }
            if let Some(v) = entry_quality {
                edited.entry_quality = Some(v);
            }
            if let Some(v) = emotional_state {
                edited.emotional_state = Some(v);
            }
            if let Some(v) = sizing {
                edited.sizing = v;
            }
            if let Some(v) = notes {
                edited.notes = v;
            }
            let summary = book.apply_edit(edited)?;
            report::print_trade_line(&summary.record);
            println!(
                "  outcome: {} | pressing step {}",
                summary.outcome,
                summary.pressing.index + 1
            );
        }
        Commands::Rm { id } => {
            book.delete_trade(id)?;
            println!("deleted trade {id}");
        }
        Commands::List { date } => {
            let date = date.unwrap_or_else(|| book.today());
            let records = book.day_records(date)?;
            if records.is_empty() {
                println!("(no trades on {date})");
            }
            for r in &records {
                report::print_trade_line(r);
            }
        }
        Commands::Day { date } => {
            let date = date.unwrap_or_else(|| book.today());
            let records = book.day_records(date)?;
            let exposure = book.exposure(date)?;
            report::print_day_report(date, &records, &exposure, book.config(), &book.roadmap());
        }
        Commands::Stats => {
            let records = book.all_records()?;
            let overall = stats::compute_stats(&records);
            let days = stats::daily_summaries(&records);
            report::print_stats_report(&overall, &days);
        }
        Commands::Breakdown { dimension } => {
            let records = book.all_records()?;
            match dimension {
                Some(dim) => {
                    if !DIMENSIONS.contains(&dim.as_str()) {
                        anyhow::bail!(
                            "unknown dimension '{dim}' (expected one of: {})",
                            DIMENSIONS.join(", ")
                        );
                    }
                    report::print_breakdown(&dim, &stats::dimension_breakdown(&records, &dim));
                }
                None => {
                    for dim in DIMENSIONS {
                        report::print_breakdown(dim, &stats::dimension_breakdown(&records, dim));
                    }
                }
            }
        }
        Commands::Roadmap => {
            report::print_roadmap(&book.roadmap(), book.suggested_size());
        }
        Commands::Export { path, csv } => {
            if csv {
                let path = path.unwrap_or_else(|| PathBuf::from("journal_export.csv"));
                let n = archive::export_csv(&book, &path)?;
                println!("exported {n} trades to {}", path.display());
            } else {
                let path =
                    path.unwrap_or_else(|| PathBuf::from(archive::default_export_name(book.now())));
                let n = archive::export_json(&book, &path)?;
                println!("exported {n} trades to {}", path.display());
            }
        }
        Commands::Import { path } => {
            let summary = archive::import_json(&book, &path)?;
            println!(
                "imported {} trades ({} skipped) from {}",
                summary.imported,
                summary.skipped,
                path.display()
            );
        }
    }

    Ok(())
}
