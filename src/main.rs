// Command-line entry point for the collar scanner.
use std::{fs, io::Write};

use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;

use collar_scan::{
    constants,
    marketdata::api_caller::Requester,
    model::{self, CollarCandidate, CollarError, Filter},
    pipeline::{self, FetchReport, SymbolOutcome},
    ranking::{self, SortColumn, SortDirection},
    symbols,
};

// Command-line argument parser.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Csv,
    Json,
}

// Subcommands for the application.
#[derive(Subcommand, Debug)]
enum Commands {
    // Scan symbols for profitable collar positions.
    Scan(ScanArgs),
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    symbols: Vec<String>,
    #[arg(long)]
    symbols_file: Option<String>,
    #[arg(long, default_value_t = constants::DEFAULT_MIN_STRIKE_PCT)]
    min_strike_pct: f64,
    #[arg(long, default_value_t = constants::DEFAULT_MAX_STRIKE_PCT)]
    max_strike_pct: f64,
    #[arg(long, default_value_t = constants::DEFAULT_MIN_DTE)]
    min_dte: i64,
    #[arg(long, default_value_t = constants::DEFAULT_MAX_DTE)]
    max_dte: i64,
    // Record key to sort by, e.g. annReturn or dte. Defaults to highest return first.
    #[arg(long)]
    sort: Option<SortColumn>,
    #[arg(long, default_value = "asc")]
    direction: SortDirection,
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
    // Write records here instead of stdout.
    #[arg(long)]
    output: Option<String>,
}

#[tokio::main]
// Main function entry point.
async fn main() {
    dotenv().ok();

    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Scan(scan_args) => match scan(scan_args).await {
            Ok(_) => log::info!("Scan finished"),
            Err(err) => {
                log::error!("Error scanning collars: {}", err);
                std::process::exit(1);
            }
        },
    }
}

async fn scan(args: ScanArgs) -> model::Result<()> {
    let symbols = symbols::collect_symbols(&args.symbols, args.symbols_file.as_deref())?;
    let filter = Filter::new(
        args.min_strike_pct,
        args.max_strike_pct,
        args.min_dte,
        args.max_dte,
    )?;
    let requester = Requester::from_env()?;

    log::info!("Loading collar options for {} stock(s)...", symbols.len());
    let report = pipeline::fetch_collars(&requester, &symbols, &filter).await;
    summarize(&report);

    let records = match args.sort {
        Some(column) => ranking::rank(&report.records, column, args.direction),
        None => ranking::default_order(&report.records),
    };
    write_records(&records, args.format, args.output.as_deref())
}

fn summarize(report: &FetchReport) {
    for symbol in &report.symbols {
        match &symbol.outcome {
            SymbolOutcome::Collars {
                count,
                expirations,
                skipped_expirations,
            } => log::info!(
                "{}: {} collars, {} expirations ({} without data)",
                symbol.symbol,
                count,
                expirations,
                skipped_expirations
            ),
            SymbolOutcome::NoExpirations => {
                log::info!("{}: no expirations in range", symbol.symbol)
            }
            SymbolOutcome::NoUnderlyingPrice => {
                log::warn!("{}: no underlying price", symbol.symbol)
            }
            SymbolOutcome::Failed(err) => log::error!("{}: failed: {}", symbol.symbol, err),
        }
    }

    if report.records.is_empty() {
        log::info!("No profitable collar positions found. Try adjusting your filters.");
    } else {
        log::info!(
            "Found {} profitable collar positions. API calls: {}",
            report.records.len(),
            report.api_calls
        );
    }
}

fn write_records(records: &[CollarCandidate], format: Format, output: Option<&str>) -> model::Result<()> {
    let bytes = match format {
        Format::Csv => model::collars_to_csv_vec(records)?,
        Format::Json => serde_json::to_vec_pretty(records)?,
    };
    let written = match output {
        Some(path) => fs::write(path, bytes),
        None => std::io::stdout().write_all(&bytes),
    };
    written.map_err(CollarError::CouldNotWrite)
}
