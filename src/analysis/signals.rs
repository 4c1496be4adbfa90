//! Signal tradability: parse each signal's features_json for its spread and
//! decide whether the signal was practically executable, then aggregate per
//! signal type.
//!
//! The spread is never bounds-checked against [0, 1]; the scanner writes it
//! and out-of-range values pass through as-is.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::{DEFAULT_SPREAD, TRADEABLE_SPREAD_MAX};
use crate::db::models::SignalRow;

#[derive(Debug, Deserialize)]
struct SignalFeatures {
    spread: Option<f64>,
}

/// Reads the `spread` feature out of a features_json blob. The blob is
/// untrusted: on malformed JSON, a missing key, or a non-numeric value the
/// spread defaults to 1.0 (100%), which classifies as non-tradeable. The
/// bool reports whether a real value was found, so the default path is
/// observable without error plumbing.
pub fn extract_spread(features_json: &str) -> (f64, bool) {
    match serde_json::from_str::<SignalFeatures>(features_json) {
        Ok(SignalFeatures { spread: Some(s) }) => (s, true),
        _ => (DEFAULT_SPREAD, false),
    }
}

/// Strict inequality: a spread of exactly 5% is not tradeable.
pub fn is_tradeable(spread: f64) -> bool {
    spread < TRADEABLE_SPREAD_MAX
}

#[derive(Debug)]
pub struct TypeStats {
    pub signal_type: String,
    pub count: u64,
    pub tradeable: u64,
    pub mean_score: f64,
    pub mean_edge: f64,
    pub mean_composite: f64,
}

impl TypeStats {
    pub fn tradeable_frac(&self) -> f64 {
        self.tradeable as f64 / self.count as f64
    }
}

#[derive(Debug)]
pub struct SignalReport {
    /// One entry per observed signal type, ordered by count descending
    /// (ties alphabetical).
    pub by_type: Vec<TypeStats>,
    /// Signals whose spread fell back to the 100% default.
    pub parse_failures: u64,
}

impl SignalReport {
    pub fn stats_for(&self, signal_type: &str) -> Option<&TypeStats> {
        self.by_type.iter().find(|t| t.signal_type == signal_type)
    }
}

pub fn analyze_signals(rows: &[SignalRow]) -> SignalReport {
    struct Accum {
        count: u64,
        tradeable: u64,
        sum_score: f64,
        sum_edge: f64,
        sum_composite: f64,
    }

    let mut by_type: BTreeMap<&str, Accum> = BTreeMap::new();
    let mut parse_failures = 0u64;

    for row in rows {
        let (spread, parsed) = extract_spread(row.features_json.as_deref().unwrap_or(""));
        if !parsed {
            parse_failures += 1;
        }
        let acc = by_type.entry(row.signal_type.as_str()).or_insert(Accum {
            count: 0,
            tradeable: 0,
            sum_score: 0.0,
            sum_edge: 0.0,
            sum_composite: 0.0,
        });
        acc.count += 1;
        if is_tradeable(spread) {
            acc.tradeable += 1;
        }
        acc.sum_score += row.score;
        acc.sum_edge += row.edge_estimate;
        acc.sum_composite += row.composite_score;
    }

    let mut by_type: Vec<TypeStats> = by_type
        .into_iter()
        .map(|(signal_type, acc)| {
            let n = acc.count as f64;
            TypeStats {
                signal_type: signal_type.to_string(),
                count: acc.count,
                tradeable: acc.tradeable,
                mean_score: acc.sum_score / n,
                mean_edge: acc.sum_edge / n,
                mean_composite: acc.sum_composite / n,
            }
        })
        .collect();
    // BTreeMap iteration is alphabetical, sort_by is stable: ties stay alphabetical
    by_type.sort_by(|a, b| b.count.cmp(&a.count));

    SignalReport {
        by_type,
        parse_failures,
    }
}
