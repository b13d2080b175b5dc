//! Transaction history partitioned into one file per period

use crate::error::StoreResult;
use crate::model::Transaction;
use crate::table::{read_table, write_table};
use crate::types::{PeriodKey, TransactionId};
use arthik_config::PartitionScheme;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Reads and writes `transactions_<period>.csv` files under one directory
#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
    scheme: PartitionScheme,
}

impl LedgerStore {
    pub fn new(dir: impl Into<PathBuf>, scheme: PartitionScheme) -> Self {
        Self {
            dir: dir.into(),
            scheme,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn scheme(&self) -> PartitionScheme {
        self.scheme
    }

    pub fn period_of(&self, date: NaiveDate) -> PeriodKey {
        PeriodKey::for_date(self.scheme, date)
    }

    pub fn partition_path(&self, period: &PeriodKey) -> PathBuf {
        self.dir.join(period.file_name())
    }

    /// Write a transaction into the partition of its date. An existing record
    /// with the same id keeps its position; otherwise the record is appended.
    pub fn append_or_replace(&self, transaction: &Transaction) -> StoreResult<PeriodKey> {
        let period = self.period_of(transaction.date());
        let path = self.partition_path(&period);
        let mut rows: Vec<Transaction> = read_table(&path)?;

        match rows.iter_mut().find(|t| t.id == transaction.id) {
            Some(existing) => {
                *existing = transaction.clone();
                log::debug!(target: "arthik::store", "Replaced {} in {}", transaction.id, period);
            }
            None => {
                rows.push(transaction.clone());
                log::debug!(target: "arthik::store", "Appended {} to {}", transaction.id, period);
            }
        }

        write_table(&path, &rows)?;
        Ok(period)
    }

    /// Remove a record from the partition implied by its id.
    /// Returns false when nothing matched.
    pub fn delete(&self, id: &TransactionId) -> StoreResult<bool> {
        let period = self.period_of(id.date());
        let path = self.partition_path(&period);
        if !path.exists() {
            return Ok(false);
        }

        let mut rows: Vec<Transaction> = read_table(&path)?;
        let before = rows.len();
        rows.retain(|t| t.id != *id);
        if rows.len() == before {
            return Ok(false);
        }

        write_table(&path, &rows)?;
        log::debug!(target: "arthik::store", "Deleted {} from {}", id, period);
        Ok(true)
    }

    pub fn find(&self, id: &TransactionId) -> StoreResult<Option<Transaction>> {
        let period = self.period_of(id.date());
        Ok(self
            .load_period(&period)?
            .into_iter()
            .find(|t| t.id == *id))
    }

    pub fn contains(&self, id: &TransactionId) -> StoreResult<bool> {
        Ok(self.find(id)?.is_some())
    }

    /// Every transaction of one partition. Missing file is empty, corrupt file is an error.
    pub fn load_period(&self, period: &PeriodKey) -> StoreResult<Vec<Transaction>> {
        read_table(&self.partition_path(period))
    }

    /// Every partition key present on disk for the configured scheme, sorted
    pub fn periods(&self) -> StoreResult<Vec<PeriodKey>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            PeriodKey::file_pattern(self.scheme)
        );

        let mut periods: Vec<PeriodKey> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(PeriodKey::from_file_name),
                Err(e) => {
                    log::warn!(target: "arthik::store", "Unreadable partition entry: {}", e);
                    None
                }
            })
            .collect();
        periods.sort();
        periods.dedup();
        Ok(periods)
    }

    /// Concatenation of every partition, in no particular order.
    /// A corrupt partition is logged and skipped.
    pub fn load_all(&self) -> StoreResult<Vec<Transaction>> {
        let mut all = Vec::new();
        for period in self.periods()? {
            match self.load_period(&period) {
                Ok(mut rows) => all.append(&mut rows),
                Err(e) => {
                    log::error!(target: "arthik::store", "Skipping partition {}: {}", period, e);
                }
            }
        }
        Ok(all)
    }

    /// Rewrite every reference to an account name. Returns the number of
    /// transactions changed.
    pub fn rename_account(&self, old: &str, new: &str) -> StoreResult<usize> {
        let mut changed = 0;
        for period in self.periods()? {
            let path = self.partition_path(&period);
            let mut rows: Vec<Transaction> = read_table(&path)?;
            let mut touched = false;
            for row in rows.iter_mut().filter(|t| t.touches(old)) {
                if row.from == old {
                    row.from = new.to_string();
                }
                if row.to == old {
                    row.to = new.to_string();
                }
                changed += 1;
                touched = true;
            }
            if touched {
                write_table(&path, &rows)?;
            }
        }
        if changed > 0 {
            log::info!(target: "arthik::store", "Renamed account '{}' to '{}' in {} transactions", old, new, changed);
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::TempDir;

    fn tx(y: i32, m: u32, d: u32, h: u32, from: &str, to: &str, amount: i64) -> Transaction {
        Transaction {
            id: TransactionId::from_parts(
                NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
            ),
            from: from.to_string(),
            to: to.to_string(),
            description: "test".to_string(),
            amount: Decimal::new(amount, 0),
        }
    }

    #[test]
    fn test_append_routes_to_partition_of_date() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path(), PartitionScheme::Month);

        store.append_or_replace(&tx(2025, 1, 15, 9, "Cash", "Food", 50)).unwrap();
        store.append_or_replace(&tx(2025, 2, 1, 9, "Bank", "Rent", 900)).unwrap();

        assert!(dir.path().join("transactions_202501.csv").exists());
        assert!(dir.path().join("transactions_202502.csv").exists());
        let january = store.load_period(&PeriodKey::Month { year: 2025, month: 1 }).unwrap();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].to, "Food");
    }

    #[test]
    fn test_year_scheme_uses_yearly_files() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path(), PartitionScheme::Year);
        store.append_or_replace(&tx(2024, 3, 1, 9, "Cash", "Food", 5)).unwrap();
        store.append_or_replace(&tx(2024, 11, 1, 9, "Cash", "Food", 5)).unwrap();
        assert!(dir.path().join("transactions_2024.csv").exists());
        assert_eq!(store.periods().unwrap(), vec![PeriodKey::Year { year: 2024 }]);
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_replace_keeps_position() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path(), PartitionScheme::Month);
        let first = tx(2025, 1, 10, 9, "Cash", "Food", 10);
        let second = tx(2025, 1, 11, 9, "Cash", "Food", 20);
        store.append_or_replace(&first).unwrap();
        store.append_or_replace(&second).unwrap();

        let mut edited = first.clone();
        edited.amount = Decimal::new(15, 0);
        store.append_or_replace(&edited).unwrap();

        let rows = store.load_period(&PeriodKey::Month { year: 2025, month: 1 }).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, first.id);
        assert_eq!(rows[0].amount, Decimal::new(15, 0));
    }

    #[test]
    fn test_delete_reports_whether_removed() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path(), PartitionScheme::Month);
        let t = tx(2025, 1, 15, 9, "Cash", "Food", 50);
        store.append_or_replace(&t).unwrap();

        assert!(store.delete(&t.id).unwrap());
        assert!(!store.delete(&t.id).unwrap());
        assert!(!store.contains(&t.id).unwrap());

        let absent = tx(2030, 6, 1, 9, "Cash", "Food", 1);
        assert!(!store.delete(&absent.id).unwrap());
    }

    #[test]
    fn test_load_all_skips_corrupt_partition() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path(), PartitionScheme::Month);
        store.append_or_replace(&tx(2025, 1, 15, 9, "Cash", "Food", 50)).unwrap();
        fs::write(
            dir.path().join("transactions_202502.csv"),
            "id,from,to,description,amount\nnot-an-id,Cash,Food,x,1\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.csv"), "ignored").unwrap();

        assert!(store.load_period(&PeriodKey::Month { year: 2025, month: 2 }).is_err());
        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(store.periods().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_directory_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path().join("nope"), PartitionScheme::Month);
        assert!(store.load_all().unwrap().is_empty());
        assert!(store.periods().unwrap().is_empty());
    }

    #[test]
    fn test_rename_account_rewrites_references() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path(), PartitionScheme::Month);
        store.append_or_replace(&tx(2025, 1, 15, 9, "Cash", "Food", 50)).unwrap();
        store.append_or_replace(&tx(2025, 2, 15, 9, "Food", "Cash", 5)).unwrap();
        store.append_or_replace(&tx(2025, 2, 16, 9, "Bank", "Rent", 5)).unwrap();

        assert_eq!(store.rename_account("Food", "Groceries").unwrap(), 2);
        let all = store.load_all().unwrap();
        assert!(all.iter().all(|t| !t.touches("Food")));
        assert_eq!(all.iter().filter(|t| t.touches("Groceries")).count(), 2);
    }
}
