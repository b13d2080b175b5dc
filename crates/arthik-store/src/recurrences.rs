//! Recurring transaction templates

use crate::error::StoreResult;
use crate::model::Recurrence;
use crate::table::{read_table, write_table};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Templates live in one file that is re-read on every access
#[derive(Debug, Clone)]
pub struct RecurrenceStore {
    path: PathBuf,
}

impl RecurrenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every template, earliest `next_date` first
    pub fn list(&self) -> StoreResult<Vec<Recurrence>> {
        let mut rows: Vec<Recurrence> = read_table(&self.path)?;
        rows.sort_by(|a, b| a.next_date.cmp(&b.next_date).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Recurrence>> {
        let rows: Vec<Recurrence> = read_table(&self.path)?;
        Ok(rows.into_iter().find(|r| r.id == id))
    }

    /// Templates whose next date is on or before `today`
    pub fn due(&self, today: NaiveDate) -> StoreResult<Vec<Recurrence>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.next_date <= today)
            .collect())
    }

    /// Insert or replace by id
    pub fn upsert(&self, recurrence: &Recurrence) -> StoreResult<()> {
        let mut rows: Vec<Recurrence> = read_table(&self.path)?;
        match rows.iter_mut().find(|r| r.id == recurrence.id) {
            Some(existing) => *existing = recurrence.clone(),
            None => rows.push(recurrence.clone()),
        }
        write_table(&self.path, &rows)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut rows: Vec<Recurrence> = read_table(&self.path)?;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Ok(false);
        }
        write_table(&self.path, &rows)?;
        Ok(true)
    }
}
