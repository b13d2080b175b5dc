//! Generic CSV table reading and writing

use crate::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

/// A row type stored in a headered CSV file
pub trait CsvRecord: Sized {
    /// Header row written at the top of every file
    const HEADER: &'static [&'static str];

    fn to_row(&self) -> Vec<String>;

    fn from_row(row: &csv::StringRecord) -> Result<Self, String>;
}

/// Read every row of a table. A missing file is an empty table.
pub fn read_table<T: CsvRecord>(path: &Path) -> StoreResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = T::from_row(&record).map_err(|message| StoreError::InvalidRow {
            file: path.display().to_string(),
            line,
            message,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Rewrite a whole table. Rows land in a sibling temp file that is then
/// renamed over the target, so readers never observe a half-written file.
pub fn write_table<T: CsvRecord>(path: &Path, rows: &[T]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        writer.write_record(T::HEADER)?;
        for row in rows {
            writer.write_record(row.to_row())?;
        }
        writer.flush()?;
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

// ==================== Field Helpers ====================

/// Money is always written with two fractional digits
pub fn format_decimal(value: &Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

pub fn format_bool(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

pub fn format_date(value: &Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn field<'a>(row: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str, String> {
    row.get(index)
        .ok_or_else(|| format!("missing column '{}'", name))
}

pub fn parse_decimal(raw: &str, name: &str) -> Result<Decimal, String> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    raw.parse::<Decimal>()
        .map_err(|e| format!("invalid {} '{}': {}", name, raw, e))
}

/// `yes`/`no`, with `true`/`false` accepted on read
pub fn parse_bool(raw: &str, name: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "yes" | "true" | "y" | "1" => Ok(true),
        "no" | "false" | "n" | "0" | "" => Ok(false),
        other => Err(format!("invalid {} '{}'", name, other)),
    }
}

pub fn parse_optional_date(raw: &str, name: &str) -> Result<Option<NaiveDate>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_date(raw, name).map(Some)
}

pub fn parse_date(raw: &str, name: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid {} '{}': {}", name, raw, e))
}
