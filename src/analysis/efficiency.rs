//! Market efficiency: how far Yes + No drifts from the $1.00 par value,
//! bucketed by hour. Inputs are the store's valid snapshots (two-sided
//! quotes only); everything here is pure over that slice.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::EFFICIENCY_THRESHOLD_CENTS;
use crate::db::models::Snapshot;
use crate::error::{AppError, Result};

/// Gap from par in cents. Positive means the pair trades below $1.00.
pub fn gap_cents(snapshot: &Snapshot) -> f64 {
    100.0 * (1.0 - (snapshot.price_yes + snapshot.price_no))
}

#[derive(Debug, Clone)]
pub struct HourlyGap {
    pub hour: DateTime<Utc>,
    pub samples: u64,
    pub mean_gap_cents: f64,
    pub min_gap_cents: f64,
    pub max_gap_cents: f64,
}

/// Buckets snapshots by hour and aggregates the gap per bucket, ordered by
/// hour. Empty input yields an empty series.
pub fn hourly_gap_series(snapshots: &[Snapshot]) -> Vec<HourlyGap> {
    struct Accum {
        count: u64,
        sum: f64,
        min: f64,
        max: f64,
    }

    let mut buckets: BTreeMap<DateTime<Utc>, Accum> = BTreeMap::new();
    for snapshot in snapshots {
        let gap = gap_cents(snapshot);
        let acc = buckets
            .entry(truncate_to_hour(snapshot.timestamp))
            .or_insert(Accum {
                count: 0,
                sum: 0.0,
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            });
        acc.count += 1;
        acc.sum += gap;
        acc.min = acc.min.min(gap);
        acc.max = acc.max.max(gap);
    }

    buckets
        .into_iter()
        .map(|(hour, acc)| HourlyGap {
            hour,
            samples: acc.count,
            mean_gap_cents: acc.sum / acc.count as f64,
            min_gap_cents: acc.min,
            max_gap_cents: acc.max,
        })
        .collect()
}

fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let floored = secs - secs.rem_euclid(3600);
    DateTime::from_timestamp(floored, 0).unwrap_or(ts)
}

#[derive(Debug)]
pub struct EfficiencySummary {
    pub total_hours: usize,
    /// Mean of the per-hour mean gaps.
    pub mean_gap_cents: f64,
    pub max_gap_cents: f64,
    /// Fraction of hour buckets whose mean gap sits below the fee threshold.
    pub efficient_hour_frac: f64,
}

pub fn efficiency_summary(series: &[HourlyGap]) -> Result<EfficiencySummary> {
    if series.is_empty() {
        return Err(AppError::EmptyDataset("no valid market snapshots"));
    }
    let hours = series.len() as f64;
    let mean_gap_cents = series.iter().map(|h| h.mean_gap_cents).sum::<f64>() / hours;
    let max_gap_cents = series
        .iter()
        .map(|h| h.max_gap_cents)
        .fold(f64::NEG_INFINITY, f64::max);
    let efficient = series
        .iter()
        .filter(|h| h.mean_gap_cents < EFFICIENCY_THRESHOLD_CENTS)
        .count();
    Ok(EfficiencySummary {
        total_hours: series.len(),
        mean_gap_cents,
        max_gap_cents,
        efficient_hour_frac: efficient as f64 / hours,
    })
}

/// Snapshot-level counterpart of the hourly summary, for the README stats:
/// gap aggregated over individual snapshots instead of hour buckets.
#[derive(Debug)]
pub struct SnapshotGapStats {
    pub samples: usize,
    pub mean_gap_cents: f64,
    pub min_gap_cents: f64,
    pub max_gap_cents: f64,
    pub efficient_frac: f64,
}

pub fn snapshot_gap_stats(snapshots: &[Snapshot]) -> Result<SnapshotGapStats> {
    if snapshots.is_empty() {
        return Err(AppError::EmptyDataset("no valid market snapshots"));
    }
    let n = snapshots.len() as f64;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut efficient = 0usize;
    for snapshot in snapshots {
        let gap = gap_cents(snapshot);
        sum += gap;
        min = min.min(gap);
        max = max.max(gap);
        if gap < EFFICIENCY_THRESHOLD_CENTS {
            efficient += 1;
        }
    }
    Ok(SnapshotGapStats {
        samples: snapshots.len(),
        mean_gap_cents: sum / n,
        min_gap_cents: min,
        max_gap_cents: max,
        efficient_frac: efficient as f64 / n,
    })
}
