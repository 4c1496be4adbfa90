use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Default location of the scanner's SQLite store, relative to the repo root.
pub const DEFAULT_DB_PATH: &str = "data/polymarket.db";

/// Default directory for exported chart series (CSV). The rendering step
/// picks these up; the report itself only writes the numbers.
pub const DEFAULT_DATA_DIR: &str = "docs/data";

/// Gap level (cents) approximating the 2% trading fee. Hour buckets whose
/// mean gap sits below this are not profitably arbitrageable.
pub const EFFICIENCY_THRESHOLD_CENTS: f64 = 2.0;

/// A signal is tradeable iff its spread feature is strictly below this.
pub const TRADEABLE_SPREAD_MAX: f64 = 0.05;

/// Spread substituted when features_json is malformed or lacks a numeric
/// `spread` entry. Worst case by construction: always non-tradeable.
pub const DEFAULT_SPREAD: f64 = 1.0;

/// Convergence candidates need strictly more qualifying snapshots than this.
pub const MIN_QUALIFYING_SNAPSHOTS: i64 = 1000;

/// price_yes band for qualifying snapshots. Outside it the market is close
/// to resolved and its series shows certainty, not convergence.
pub const PRICE_BAND_LOW: f64 = 0.05;
pub const PRICE_BAND_HIGH: f64 = 0.95;

/// Total (yes + no) below this is cheap enough to arb even after the fee.
pub const FEE_TOTAL_THRESHOLD: f64 = 0.98;

/// Market questions are truncated to this many characters for display.
pub const QUESTION_DISPLAY_LEN: usize = 80;

/// Fixed row order for the per-type markdown table. Signal types outside
/// this list are still counted but get no row of their own.
pub const SIGNAL_TYPE_ORDER: [&str; 4] = ["complement", "anchoring", "low_attention", "deadline"];

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the scanner's SQLite store (DB_PATH).
    pub db_path: String,
    pub log_level: String,
    /// Where the exported CSV series go (REPORT_DATA_DIR).
    /// An empty value disables export.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        if db_path.trim().is_empty() {
            return Err(AppError::Config("DB_PATH must not be empty".to_string()));
        }

        let data_dir = match std::env::var("REPORT_DATA_DIR") {
            Ok(v) if v.trim().is_empty() => None,
            Ok(v) => Some(PathBuf::from(v)),
            Err(_) => Some(PathBuf::from(DEFAULT_DATA_DIR)),
        };

        Ok(Self {
            db_path,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            data_dir,
        })
    }
}
