//! CSV export of the chart input series. Rendering itself lives outside
//! this crate; these files are its contract.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analysis::efficiency::HourlyGap;
use crate::db::models::Snapshot;
use crate::error::Result;

pub fn write_hourly_series(dir: &Path, series: &[HourlyGap]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("efficiency_hourly.csv");
    let mut w = BufWriter::new(File::create(&path)?);
    writeln!(w, "hour,samples,avg_gap_cents,min_gap_cents,max_gap_cents")?;
    for bucket in series {
        writeln!(
            w,
            "{},{},{:.6},{:.6},{:.6}",
            bucket.hour.format("%Y-%m-%d %H:%M"),
            bucket.samples,
            bucket.mean_gap_cents,
            bucket.min_gap_cents,
            bucket.max_gap_cents,
        )?;
    }
    w.flush()?;
    Ok(path)
}

pub fn write_convergence_series(dir: &Path, series: &[Snapshot]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("price_convergence.csv");
    let mut w = BufWriter::new(File::create(&path)?);
    writeln!(w, "timestamp,price_yes,price_no,total,spread")?;
    for snapshot in series {
        writeln!(
            w,
            "{},{:.6},{:.6},{:.6},{:.6}",
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
            snapshot.price_yes,
            snapshot.price_no,
            snapshot.price_yes + snapshot.price_no,
            snapshot.spread,
        )?;
    }
    w.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::parse_timestamp;

    #[test]
    fn hourly_series_round_trips_through_csv() {
        let dir = std::env::temp_dir().join("polymarket-report-test-hourly");
        let series = vec![HourlyGap {
            hour: parse_timestamp("2026-08-01 10:00:00").unwrap(),
            samples: 3,
            mean_gap_cents: 1.0,
            min_gap_cents: 0.5,
            max_gap_cents: 1.5,
        }];
        let path = write_hourly_series(&dir, &series).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "hour,samples,avg_gap_cents,min_gap_cents,max_gap_cents");
        assert_eq!(lines[1], "2026-08-01 10:00,3,1.000000,0.500000,1.500000");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn convergence_series_includes_total_column() {
        let dir = std::env::temp_dir().join("polymarket-report-test-convergence");
        let series = vec![Snapshot {
            timestamp: parse_timestamp("2026-08-01 10:00:00").unwrap(),
            price_yes: 0.50,
            price_no: 0.49,
            spread: 0.01,
        }];
        let path = write_convergence_series(&dir, &series).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("0.500000,0.490000,0.990000,0.010000"));
        fs::remove_dir_all(&dir).ok();
    }
}
