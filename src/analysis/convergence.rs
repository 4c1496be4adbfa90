//! Price convergence: pick one liquid, well-sampled market and measure how
//! tightly its Yes + No total hugs $1.00 over the full series.

use std::cmp::Ordering;

use crate::config::{FEE_TOTAL_THRESHOLD, MIN_QUALIFYING_SNAPSHOTS};
use crate::db::models::{MarketCandidate, Snapshot};
use crate::error::{AppError, Result};

/// Picks the convergence market: among candidates with strictly more than
/// 1000 qualifying snapshots, the one with the highest average 24h volume.
/// Equal volumes tie-break to the lowest market id so the pick is stable
/// across runs.
pub fn select_market(candidates: &[MarketCandidate]) -> Result<&MarketCandidate> {
    candidates
        .iter()
        .filter(|c| c.snapshot_count > MIN_QUALIFYING_SNAPSHOTS)
        .max_by(|a, b| {
            a.avg_volume
                .partial_cmp(&b.avg_volume)
                .unwrap_or(Ordering::Equal)
                // reversed id comparison: on equal volume the lower id wins the max
                .then_with(|| b.market_id.cmp(&a.market_id))
        })
        .ok_or(AppError::NoQualifyingMarket)
}

#[derive(Debug)]
pub struct TotalPriceStats {
    pub samples: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); 0.0 when the series has one point.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of snapshots with total below the $0.98 fee threshold.
    pub below_fee_frac: f64,
}

/// Descriptive stats of `total = price_yes + price_no` over a market's
/// full series (no price-band filter here).
pub fn total_price_stats(series: &[Snapshot]) -> Result<TotalPriceStats> {
    if series.is_empty() {
        return Err(AppError::EmptyDataset("selected market has no snapshots"));
    }
    let totals: Vec<f64> = series.iter().map(|s| s.price_yes + s.price_no).collect();
    let n = totals.len() as f64;
    let mean = totals.iter().sum::<f64>() / n;
    let std_dev = if totals.len() < 2 {
        0.0
    } else {
        (totals.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };
    let min = totals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let below = totals.iter().filter(|&&t| t < FEE_TOTAL_THRESHOLD).count();

    Ok(TotalPriceStats {
        samples: totals.len(),
        mean,
        std_dev,
        min,
        max,
        below_fee_frac: below as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::parse_timestamp;

    fn candidate(id: &str, count: i64, volume: f64) -> MarketCandidate {
        MarketCandidate {
            market_id: id.to_string(),
            question: format!("Question for {id}"),
            snapshot_count: count,
            avg_volume: volume,
        }
    }

    fn snap(yes: f64, no: f64) -> Snapshot {
        Snapshot {
            timestamp: parse_timestamp("2026-08-01 10:00:00").unwrap(),
            price_yes: yes,
            price_no: no,
            spread: 0.01,
        }
    }

    #[test]
    fn selects_highest_volume_among_qualifying() {
        let candidates = vec![
            candidate("a", 1500, 200.0),
            candidate("b", 2000, 900.0),
            candidate("c", 1200, 500.0),
        ];
        assert_eq!(select_market(&candidates).unwrap().market_id, "b");
    }

    #[test]
    fn threshold_is_strict() {
        // exactly 1000 does not qualify, even with the top volume
        let candidates = vec![candidate("a", 1000, 9999.0), candidate("b", 1001, 1.0)];
        assert_eq!(select_market(&candidates).unwrap().market_id, "b");
    }

    #[test]
    fn no_qualifying_market_is_fatal() {
        let candidates = vec![candidate("a", 12, 500.0), candidate("b", 1000, 800.0)];
        assert!(matches!(
            select_market(&candidates),
            Err(AppError::NoQualifyingMarket)
        ));
        assert!(matches!(select_market(&[]), Err(AppError::NoQualifyingMarket)));
    }

    #[test]
    fn volume_tie_breaks_to_lowest_id() {
        let candidates = vec![
            candidate("zzz", 1500, 700.0),
            candidate("aaa", 1500, 700.0),
            candidate("mmm", 1500, 700.0),
        ];
        assert_eq!(select_market(&candidates).unwrap().market_id, "aaa");
    }

    #[test]
    fn total_stats_on_known_series() {
        let series = vec![snap(0.50, 0.49), snap(0.50, 0.51), snap(0.40, 0.50)];
        let stats = total_price_stats(&series).unwrap();
        assert_eq!(stats.samples, 3);
        assert!((stats.mean - 0.9666666666666667).abs() < 1e-12);
        assert!((stats.min - 0.90).abs() < 1e-12);
        assert!((stats.max - 1.01).abs() < 1e-12);
        // only the 0.90 total falls below 0.98
        assert!((stats.below_fee_frac - 1.0 / 3.0).abs() < 1e-12);
        // sample std dev of {0.99, 1.01, 0.90}
        assert!((stats.std_dev - 0.05859465277082314).abs() < 1e-9);
    }

    #[test]
    fn single_snapshot_has_zero_std_dev() {
        let stats = total_price_stats(&[snap(0.50, 0.49)]).unwrap();
        assert_eq!(stats.samples, 1);
        assert_eq!(stats.std_dev, 0.0);
        assert!((stats.mean - 0.99).abs() < 1e-12);
    }

    #[test]
    fn empty_series_is_empty_dataset() {
        assert!(matches!(
            total_price_stats(&[]),
            Err(AppError::EmptyDataset(_))
        ));
    }
}
