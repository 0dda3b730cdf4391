//! CSV ingest and normalization.
//!
//! This module is responsible for turning a CSV of observations into a clean
//! `Sample` that is safe to fit.
//!
//! Design goals:
//! - **Strict schema** for the selected columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here
//!
//! Column selection: explicit `--x-col` / `--y-col` names win; otherwise columns
//! named `x` and `y` are used, falling back to the first two columns.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::Sample;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the usable sample plus what was dropped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub sample: Sample,
    pub x_label: String,
    pub y_label: String,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a sample from a CSV file.
pub fn load_sample(
    path: &Path,
    x_column: Option<&str>,
    y_column: Option<&str>,
) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_sample(file, x_column, y_column)
}

/// Read a sample from any CSV source.
pub fn read_sample<R: Read>(
    source: R,
    x_column: Option<&str>,
    y_column: Option<&str>,
) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let (x_idx, x_label) = resolve_column(&headers, &header_map, x_column, "x", 0)?;
    let (y_idx, y_label) = resolve_column(&headers, &header_map, y_column, "y", 1)?;
    if x_idx == y_idx {
        return Err(AppError::new(
            2,
            format!("x and y refer to the same column `{x_label}`."),
        ));
    }

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for result in reader.records() {
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let parsed = parse_value(&record, x_idx, &x_label)
            .and_then(|x| parse_value(&record, y_idx, &y_label).map(|y| (x, y)));
        match parsed {
            Ok((x, y)) => {
                xs.push(x);
                ys.push(y);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        warn!(line = err.line, "skipping row: {}", err.message);
    }

    let rows_used = xs.len();
    if rows_used < 2 {
        return Err(AppError::new(
            3,
            format!("At least 2 valid rows are required, found {rows_used}."),
        ));
    }
    debug!(rows_read, rows_used, x = %x_label, y = %y_label, "ingested sample");

    Ok(IngestedData {
        sample: Sample::new(xs, ys)?,
        x_label,
        y_label,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_column(
    headers: &StringRecord,
    header_map: &HashMap<String, usize>,
    requested: Option<&str>,
    default_name: &str,
    fallback_idx: usize,
) -> Result<(usize, String), AppError> {
    if let Some(name) = requested {
        let idx = header_map
            .get(&normalize_header_name(name))
            .ok_or_else(|| AppError::new(2, format!("Missing column: `{name}`")))?;
        return Ok((*idx, name.to_string()));
    }
    if let Some(&idx) = header_map.get(default_name) {
        return Ok((idx, default_name.to_string()));
    }
    match headers.get(fallback_idx) {
        Some(name) if headers.len() >= 2 => Ok((fallback_idx, name.trim().to_string())),
        _ => Err(AppError::new(
            2,
            "CSV needs `x` and `y` columns (or at least two columns).",
        )),
    }
}

fn parse_value(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value: `{name}`"))?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` value '{raw}'.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_columns() {
        let csv = "size,label,ms\n10,a,1.5\n20,b,3.0\n40,c,6.5\n";
        let data = read_sample(csv.as_bytes(), Some("size"), Some("ms")).unwrap();
        assert_eq!(data.sample.xs(), &[10.0, 20.0, 40.0]);
        assert_eq!(data.sample.ys(), &[1.5, 3.0, 6.5]);
        assert_eq!(data.rows_used, 3);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn defaults_to_x_y_then_first_two_columns() {
        let data = read_sample("y,x\n1,2\n3,4\n".as_bytes(), None, None).unwrap();
        assert_eq!(data.sample.xs(), &[2.0, 4.0]);

        let data = read_sample("n,t\n1,2\n3,4\n".as_bytes(), None, None).unwrap();
        assert_eq!((data.x_label.as_str(), data.y_label.as_str()), ("n", "t"));
        assert_eq!(data.sample.ys(), &[2.0, 4.0]);
    }

    #[test]
    fn skips_bad_rows_with_line_numbers() {
        let csv = "x,y\n1,2\n2,oops\n3,\n4,8\n";
        let data = read_sample(csv.as_bytes(), None, None).unwrap();
        assert_eq!(data.rows_read, 4);
        assert_eq!(data.rows_used, 2);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn too_few_rows_is_an_error() {
        let err = read_sample("x,y\n1,2\n".as_bytes(), None, None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_requested_column_is_an_error() {
        let err = read_sample("x,y\n1,2\n2,3\n".as_bytes(), Some("size"), None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
