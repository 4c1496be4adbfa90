mod analysis;
mod config;
mod db;
mod error;
mod export;
mod report;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::analysis::convergence::{select_market, total_price_stats};
use crate::analysis::efficiency::{efficiency_summary, hourly_gap_series, snapshot_gap_stats};
use crate::analysis::signals::analyze_signals;
use crate::config::Config;
use crate::db::store::Store;
use crate::error::Result;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    match run(cfg).await {
        Ok(0) => {}
        Ok(failed) => {
            error!("{failed} report section(s) failed");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Fatal error: {e}");
            std::process::exit(1);
        }
    }
}

/// Runs each report section over one read-only store handle. Sections are
/// independent: an EmptyDataset or NoQualifyingMarket in one must not stop
/// the others, so errors are collected instead of propagated.
async fn run(cfg: Config) -> Result<u32> {
    let store = Store::open(&cfg.db_path).await?;
    info!("Store open (read-only) at {}", cfg.db_path);

    let mut failed = 0u32;
    if let Err(e) = overview_report(&store).await {
        error!("Data overview failed: {e}");
        failed += 1;
    }
    if let Err(e) = efficiency_report(&store, &cfg).await {
        error!("Efficiency report failed: {e}");
        failed += 1;
    }
    if let Err(e) = convergence_report(&store, &cfg).await {
        error!("Convergence report failed: {e}");
        failed += 1;
    }
    if let Err(e) = signals_report(&store).await {
        error!("Signal report failed: {e}");
        failed += 1;
    }
    Ok(failed)
}

async fn overview_report(store: &Store) -> Result<()> {
    let counts = store.table_counts().await?;
    let range = store.snapshot_time_range().await?;
    println!("{}", report::overview_section(&counts, range.as_ref()));
    Ok(())
}

async fn efficiency_report(store: &Store, cfg: &Config) -> Result<()> {
    let snapshots = store.valid_snapshots().await?;
    let series = hourly_gap_series(&snapshots);
    let summary = efficiency_summary(&series)?;
    let stats = snapshot_gap_stats(&snapshots)?;
    println!("{}", report::efficiency_section(&summary, &stats));

    if let Some(dir) = &cfg.data_dir {
        match export::write_hourly_series(dir, &series) {
            Ok(path) => info!("Saved hourly gap series to {}", path.display()),
            Err(e) => warn!("Hourly series export failed: {e}"),
        }
    }
    Ok(())
}

async fn convergence_report(store: &Store, cfg: &Config) -> Result<()> {
    let candidates = store.market_candidates().await?;
    let market = select_market(&candidates)?;
    let series = store.market_snapshots(&market.market_id).await?;
    let stats = total_price_stats(&series)?;
    println!("{}", report::convergence_section(market, &stats));

    if let Some(dir) = &cfg.data_dir {
        match export::write_convergence_series(dir, &series) {
            Ok(path) => info!("Saved convergence series to {}", path.display()),
            Err(e) => warn!("Convergence series export failed: {e}"),
        }
    }
    Ok(())
}

async fn signals_report(store: &Store) -> Result<()> {
    let rows = store.signals().await?;
    let signal_report = analyze_signals(&rows);
    if signal_report.parse_failures > 0 {
        warn!(
            "{} signals had missing or malformed spread features; defaulted to 100% spread",
            signal_report.parse_failures
        );
    }
    println!("{}", report::signals_section(&signal_report));
    println!("{}", report::tradability_section(&signal_report));
    println!("{}", report::complement_section(&signal_report));
    println!("{}", report::markdown_table(&signal_report));
    Ok(())
}
