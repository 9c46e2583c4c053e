//! CSV export of sampled curves.
//!
//! Each row is one sample; the sample nearest the queried time is flagged in
//! the `highlight` column so a plotting tool can mark the prediction.

use crate::curve::{Curve, CurvePoint};
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    time: f64,
    value: f64,
    highlight: bool,
}

impl CsvRow {
    fn new(point: CurvePoint, highlight: bool) -> Self {
        CsvRow {
            time: point.time,
            value: point.value,
            highlight,
        }
    }
}

/// Write every sample of `curve` as CSV with headers, returning the row count
pub fn write_curve_csv<W: Write>(curve: &Curve, highlight_at: f64, writer: W) -> Result<usize> {
    let highlighted = curve.nearest_index(highlight_at);
    let mut writer = csv::Writer::from_writer(writer);

    let mut count = 0;
    for (index, point) in curve.samples().enumerate() {
        writer.serialize(CsvRow::new(point, index == highlighted))?;
        count += 1;
    }

    writer.flush()?;
    tracing::debug!("Wrote {} curve samples", count);
    Ok(count)
}

/// Write the curve to `path`, replacing any existing file
///
/// The file is synced to disk before returning.
pub fn write_curve_csv_file(curve: &Curve, highlight_at: f64, path: &Path) -> Result<usize> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let count = write_curve_csv(curve, highlight_at, &file)?;
    file.sync_all()?;

    tracing::info!("Wrote {} curve samples to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_has_header_and_one_highlight() {
        crate::logging::init_test();

        let curve = Curve::decay(800.0, 0.015, 50.0, 13).unwrap();
        let mut buffer = Vec::new();
        let count = write_curve_csv(&curve, 50.0, &mut buffer).unwrap();
        assert_eq!(count, 13);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time,value,highlight"));

        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 13);
        let highlighted: Vec<_> = rows.iter().filter(|r| r.ends_with(",true")).collect();
        assert_eq!(highlighted.len(), 1);
        // Horizon 60 over 12 steps: t = 50 is sample 10
        assert!(rows[10].starts_with("50"));
        assert!(rows[10].ends_with(",true"));
    }

    #[test]
    fn test_csv_file_written() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("cooling.csv");

        let curve = Curve::cooling(25.0, 100.0, 0.1, 12.0, 25).unwrap();
        let count = write_curve_csv_file(&curve, 10.0, &path).unwrap();
        assert_eq!(count, 25);

        let reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.into_records().count(), 25);
    }
}
