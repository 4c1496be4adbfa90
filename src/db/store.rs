use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::warn;

use crate::config::{PRICE_BAND_HIGH, PRICE_BAND_LOW};
use crate::db::models::{
    parse_timestamp, MarketCandidate, SignalRow, Snapshot, SnapshotRow, TableCounts, TimeRange,
};
use crate::error::{AppError, Result};

/// Read-only handle to the scanner's SQLite store. One pool per run,
/// used sequentially by each report section.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the store at `path` in read-only mode. The analytics layer has
    /// no write path; a missing or unreadable file is `StoreUnavailable`.
    pub async fn open(path: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| AppError::StoreUnavailable {
                path: path.to_string(),
                source: e,
            })?;
        Ok(Self { pool })
    }

    /// Row counts for the data-overview section.
    pub async fn table_counts(&self) -> Result<TableCounts> {
        let snapshots = self.count("market_snapshots").await?;
        let signals = self.count("signals").await?;
        let markets = self.count("markets").await?;
        let trades = self.count("trades").await?;
        Ok(TableCounts {
            snapshots,
            signals,
            markets,
            trades,
        })
    }

    async fn count(&self, table: &str) -> Result<i64> {
        // Table names come from the fixed schema, never from input.
        let n = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// First/last snapshot timestamps, or None for an empty table.
    pub async fn snapshot_time_range(&self) -> Result<Option<TimeRange>> {
        let (first, last) = sqlx::query_as::<_, (Option<String>, Option<String>)>(
            "SELECT MIN(timestamp), MAX(timestamp) FROM market_snapshots",
        )
        .fetch_one(&self.pool)
        .await?;

        match (first, last) {
            (Some(first), Some(last)) => {
                match (parse_timestamp(&first), parse_timestamp(&last)) {
                    (Some(f), Some(l)) => Ok(Some(TimeRange { first: f, last: l })),
                    _ => {
                        warn!("Unparseable snapshot time range: {first} .. {last}");
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Every snapshot with a real two-sided quote, ordered by timestamp.
    /// A snapshot with price_yes <= 0 or price_no <= 0 is a missing quote
    /// and is excluded from efficiency math.
    pub async fn valid_snapshots(&self) -> Result<Vec<Snapshot>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT timestamp, price_yes, price_no, spread
            FROM market_snapshots
            WHERE price_yes > 0 AND price_no > 0
            ORDER BY timestamp
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(convert_rows(rows))
    }

    /// Per-market snapshot count and mean 24h volume over the qualifying
    /// price band. Selection itself (threshold, max, tie-break) happens in
    /// `analysis::convergence` so it stays testable without a store.
    pub async fn market_candidates(&self) -> Result<Vec<MarketCandidate>> {
        let rows = sqlx::query_as::<_, MarketCandidate>(
            r#"
            SELECT
                m.id AS market_id,
                m.question AS question,
                COUNT(*) AS snapshot_count,
                AVG(s.volume_24h) AS avg_volume
            FROM markets m
            JOIN market_snapshots s ON m.id = s.market_id
            WHERE s.price_yes > ? AND s.price_yes < ?
            GROUP BY m.id
            "#,
        )
        .bind(PRICE_BAND_LOW)
        .bind(PRICE_BAND_HIGH)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Full snapshot series for one market, unfiltered, ordered by timestamp.
    pub async fn market_snapshots(&self, market_id: &str) -> Result<Vec<Snapshot>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT timestamp, price_yes, price_no, spread
            FROM market_snapshots
            WHERE market_id = ?
            ORDER BY timestamp
            "#,
        )
        .bind(market_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(convert_rows(rows))
    }

    pub async fn signals(&self) -> Result<Vec<SignalRow>> {
        let rows = sqlx::query_as::<_, SignalRow>(
            r#"
            SELECT signal_type, score, edge_estimate, composite_score, features_json
            FROM signals
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn convert_rows(rows: Vec<SnapshotRow>) -> Vec<Snapshot> {
    let total = rows.len();
    let snapshots: Vec<Snapshot> = rows
        .into_iter()
        .filter_map(SnapshotRow::into_snapshot)
        .collect();
    let dropped = total - snapshots.len();
    if dropped > 0 {
        warn!("Skipped {dropped} snapshot rows with unparseable timestamps");
    }
    snapshots
}
