//! Net-worth history, one row per period key

use crate::error::StoreResult;
use crate::model::Record;
use crate::table::{read_table, write_table};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record, oldest first
    pub fn load(&self) -> StoreResult<Vec<Record>> {
        let mut rows: Vec<Record> = read_table(&self.path)?;
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    pub fn get(&self, date: NaiveDate) -> StoreResult<Option<Record>> {
        Ok(self.load()?.into_iter().find(|r| r.date == date))
    }

    /// Replace the record of the same date, or insert it in date order
    pub fn upsert(&self, record: &Record) -> StoreResult<()> {
        let mut rows = self.load()?;
        rows.retain(|r| r.date != record.date);
        let index = rows.partition_point(|r| r.date < record.date);
        rows.insert(index, record.clone());
        write_table(&self.path, &rows)
    }

    /// Overwrite the whole history
    pub fn replace_all(&self, records: &[Record]) -> StoreResult<()> {
        let mut rows = records.to_vec();
        rows.sort_by_key(|r| r.date);
        rows.dedup_by_key(|r| r.date);
        write_table(&self.path, &rows)
    }
}
