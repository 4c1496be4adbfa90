//! Plain-text report sections. Pure string builders so the exact shapes are
//! testable; main prints them to stdout in order.

use crate::analysis::convergence::TotalPriceStats;
use crate::analysis::efficiency::{EfficiencySummary, SnapshotGapStats};
use crate::analysis::signals::SignalReport;
use crate::config::{QUESTION_DISPLAY_LEN, SIGNAL_TYPE_ORDER};
use crate::db::models::{MarketCandidate, TableCounts, TimeRange};

pub fn overview_section(counts: &TableCounts, range: Option<&TimeRange>) -> String {
    let mut out = String::from("=== DATA OVERVIEW ===\n");
    out.push_str(&format!(
        "market_snapshots: {}\n",
        group_thousands(counts.snapshots)
    ));
    out.push_str(&format!("signals: {}\n", group_thousands(counts.signals)));
    out.push_str(&format!("markets: {}\n", group_thousands(counts.markets)));
    out.push_str(&format!("trades: {}\n", group_thousands(counts.trades)));

    match range {
        Some(r) => {
            out.push_str(&format!(
                "\nTime range: {} to {}\n",
                r.first.format("%Y-%m-%d %H:%M:%S"),
                r.last.format("%Y-%m-%d %H:%M:%S"),
            ));
            out.push_str(&format!(
                "Duration: {:.1} hours ({:.1} days)\n",
                r.hours(),
                r.hours() / 24.0,
            ));
        }
        None => out.push_str("\nNo snapshots recorded.\n"),
    }
    out
}

pub fn efficiency_section(summary: &EfficiencySummary, stats: &SnapshotGapStats) -> String {
    let mut out = String::from("=== MARKET EFFICIENCY ===\n");
    out.push_str(&format!("Hours sampled: {}\n", summary.total_hours));
    out.push_str(&format!(
        "Avg hourly gap: {:.3} cents\n",
        summary.mean_gap_cents
    ));
    out.push_str(&format!(
        "Max gap observed: {:.3} cents\n",
        summary.max_gap_cents
    ));
    out.push_str(&format!(
        "% of hours with gap < 2c (fee): {:.1}%\n",
        summary.efficient_hour_frac * 100.0
    ));
    out.push_str(&format!(
        "Avg snapshot gap: {:.3} cents (range {:.3} to {:.3})\n",
        stats.mean_gap_cents, stats.min_gap_cents, stats.max_gap_cents
    ));
    out.push_str(&format!(
        "% of snapshots with gap < 2c (fee): {:.1}%\n",
        stats.efficient_frac * 100.0
    ));
    out
}

pub fn convergence_section(market: &MarketCandidate, stats: &TotalPriceStats) -> String {
    let mut out = String::from("=== PRICE CONVERGENCE ===\n");
    out.push_str(&format!(
        "Using market: {}\n",
        truncate_question(&market.question)
    ));
    out.push_str(&format!("Market ID: {}\n", market.market_id));
    out.push_str(&format!(
        "Snapshots: {}\n",
        group_thousands(stats.samples as i64)
    ));
    out.push_str(&format!("Avg total: {:.2} cents\n", stats.mean * 100.0));
    out.push_str(&format!("Std dev: {:.3} cents\n", stats.std_dev * 100.0));
    out.push_str(&format!("Min total: {:.2} cents\n", stats.min * 100.0));
    out.push_str(&format!("Max total: {:.2} cents\n", stats.max * 100.0));
    out.push_str(&format!(
        "% below $0.98: {:.2}%\n",
        stats.below_fee_frac * 100.0
    ));
    out
}

pub fn signals_section(report: &SignalReport) -> String {
    let mut out = String::from("=== SIGNALS BY TYPE ===\n");
    if report.by_type.is_empty() {
        out.push_str("No signals recorded.\n");
        return out;
    }
    out.push_str(&format!(
        "{:<16} {:>7} {:>10} {:>9} {:>14}\n",
        "signal_type", "count", "avg_score", "avg_edge", "avg_composite"
    ));
    for stats in &report.by_type {
        out.push_str(&format!(
            "{:<16} {:>7} {:>10.3} {:>9.2} {:>14.3}\n",
            stats.signal_type,
            group_thousands(stats.count as i64),
            stats.mean_score,
            stats.mean_edge,
            stats.mean_composite,
        ));
    }
    out
}

pub fn tradability_section(report: &SignalReport) -> String {
    let mut out = String::from("=== TRADABILITY (spread < 5%) ===\n");
    for signal_type in SIGNAL_TYPE_ORDER {
        match report.stats_for(signal_type) {
            Some(stats) => out.push_str(&format!(
                "{signal_type}: {} tradeable ({:.1}%)\n",
                stats.tradeable,
                stats.tradeable_frac() * 100.0
            )),
            None => out.push_str(&format!("{signal_type}: 0 signals detected\n")),
        }
    }
    out
}

pub fn complement_section(report: &SignalReport) -> String {
    let mut out = String::from("=== COMPLEMENT ARBITRAGE ===\n");
    match report.stats_for("complement") {
        Some(stats) => {
            out.push_str(&format!(
                "Total opportunities found: {}\n",
                group_thousands(stats.count as i64)
            ));
            out.push_str(&format!("Average edge: {:.2} cents\n", stats.mean_edge));
            out.push_str(&format!("Tradeable (spread < 5%): {}\n", stats.tradeable));
        }
        None => out.push_str("Total opportunities found: 0\n"),
    }
    out
}

/// Fixed-shape markdown table for the README: always exactly four data rows
/// in a fixed type order, so report runs diff cleanly against each other.
pub fn markdown_table(report: &SignalReport) -> String {
    let mut out = String::from("=== MARKDOWN TABLE FOR README ===\n");
    out.push_str("| Signal Type | Count | Tradeable (spread <5%) |\n");
    out.push_str("|-------------|-------|------------------------|\n");
    for signal_type in SIGNAL_TYPE_ORDER {
        match report.stats_for(signal_type) {
            Some(stats) => out.push_str(&format!(
                "| {} | {} | {} ({:.0}%) |\n",
                display_name(signal_type),
                group_thousands(stats.count as i64),
                stats.tradeable,
                stats.tradeable_frac() * 100.0,
            )),
            None => out.push_str(&format!("| {} | 0 | - |\n", display_name(signal_type))),
        }
    }
    out
}

/// "low_attention" -> "Low Attention"
fn display_name(signal_type: &str) -> String {
    signal_type
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_question(question: &str) -> String {
    if question.chars().count() > QUESTION_DISPLAY_LEN {
        let head: String = question.chars().take(QUESTION_DISPLAY_LEN).collect();
        format!("{head}...")
    } else {
        question.to_string()
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::signals::analyze_signals;
    use crate::db::models::SignalRow;

    fn signal(signal_type: &str, features_json: &str) -> SignalRow {
        SignalRow {
            signal_type: signal_type.to_string(),
            score: 0.5,
            edge_estimate: 2.5,
            composite_score: 0.6,
            features_json: Some(features_json.to_string()),
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-45123), "-45,123");
    }

    #[test]
    fn display_names_title_case_underscores() {
        assert_eq!(display_name("complement"), "Complement");
        assert_eq!(display_name("low_attention"), "Low Attention");
    }

    #[test]
    fn long_questions_get_ellipsis() {
        let long = "x".repeat(100);
        let shown = truncate_question(&long);
        assert_eq!(shown.chars().count(), 83);
        assert!(shown.ends_with("..."));
        assert_eq!(truncate_question("short?"), "short?");
    }

    #[test]
    fn markdown_table_has_four_rows_in_fixed_order() {
        // only two of the four types present, in "wrong" insert order
        let rows = vec![
            signal("deadline", r#"{"spread": 0.01}"#),
            signal("complement", r#"{"spread": 0.03}"#),
            signal("complement", r#"{"spread": 0.30}"#),
        ];
        let table = markdown_table(&analyze_signals(&rows));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "| Signal Type | Count | Tradeable (spread <5%) |");
        assert_eq!(lines[3], "| Complement | 2 | 1 (50%) |");
        assert_eq!(lines[4], "| Anchoring | 0 | - |");
        assert_eq!(lines[5], "| Low Attention | 0 | - |");
        assert_eq!(lines[6], "| Deadline | 1 | 1 (100%) |");
    }

    #[test]
    fn markdown_table_is_stable_for_empty_dataset() {
        let table = markdown_table(&analyze_signals(&[]));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 7);
        for (line, name) in lines[3..].iter().zip(["Complement", "Anchoring", "Low Attention", "Deadline"]) {
            assert_eq!(*line, format!("| {name} | 0 | - |"));
        }
    }

    #[test]
    fn tradability_section_marks_absent_types() {
        let rows = vec![signal("anchoring", r#"{"spread": 0.01}"#)];
        let section = tradability_section(&analyze_signals(&rows));
        assert!(section.contains("anchoring: 1 tradeable (100.0%)"));
        assert!(section.contains("complement: 0 signals detected"));
        assert!(section.contains("deadline: 0 signals detected"));
    }

    #[test]
    fn complement_section_with_and_without_signals() {
        let rows = vec![
            signal("complement", r#"{"spread": 0.01}"#),
            signal("complement", "not-json"),
        ];
        let section = complement_section(&analyze_signals(&rows));
        assert!(section.contains("Total opportunities found: 2"));
        assert!(section.contains("Average edge: 2.50 cents"));
        assert!(section.contains("Tradeable (spread < 5%): 1"));

        let empty = complement_section(&analyze_signals(&[]));
        assert!(empty.contains("Total opportunities found: 0"));
        assert!(!empty.contains("Average edge"));
    }
}
