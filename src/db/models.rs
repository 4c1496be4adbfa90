//! Row types for the scanner's SQLite schema, read via runtime `query_as`
//! (the store is external and not present at build time, so no compile-time
//! checked queries here).

use chrono::{DateTime, NaiveDateTime, Utc};

/// Raw snapshot row as stored. Timestamps are text; rows whose timestamp
/// does not parse are dropped by the store layer with a warning.
#[derive(Debug, sqlx::FromRow)]
pub struct SnapshotRow {
    pub timestamp: String,
    pub price_yes: f64,
    pub price_no: f64,
    pub spread: f64,
}

impl SnapshotRow {
    pub fn into_snapshot(self) -> Option<Snapshot> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        Some(Snapshot {
            timestamp,
            price_yes: self.price_yes,
            price_no: self.price_no,
            spread: self.spread,
        })
    }
}

/// A parsed market snapshot. Analytics input; never written back.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub price_yes: f64,
    pub price_no: f64,
    pub spread: f64,
}

/// Per-market aggregate over the qualifying price band, one row per market.
#[derive(Debug, sqlx::FromRow)]
pub struct MarketCandidate {
    pub market_id: String,
    pub question: String,
    pub snapshot_count: i64,
    pub avg_volume: f64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SignalRow {
    pub signal_type: String,
    pub score: f64,
    pub edge_estimate: f64,
    pub composite_score: f64,
    pub features_json: Option<String>,
}

#[derive(Debug)]
pub struct TableCounts {
    pub snapshots: i64,
    pub signals: i64,
    pub markets: i64,
    pub trades: i64,
}

#[derive(Debug)]
pub struct TimeRange {
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

impl TimeRange {
    pub fn hours(&self) -> f64 {
        (self.last - self.first).num_seconds() as f64 / 3600.0
    }
}

/// The store has accumulated a few timestamp shapes over scanner versions:
/// RFC 3339 with offset, and naive ISO with either a space or a `T`
/// separator (fractional seconds optional). Naive values are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}
