//! The account list

use crate::error::{StoreError, StoreResult};
use crate::model::Account;
use crate::table::{read_table, write_table};
use crate::types::AccountCategory;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

const KIND: &str = "Account";

/// In-memory account list backed by one CSV file.
///
/// `add`, `delete` and `replace` persist immediately and restore memory when
/// the write fails. Balance updates only touch memory; callers persist them
/// with [`AccountStore::save`] once an operation is complete.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
    accounts: Vec<Account>,
}

impl AccountStore {
    /// Open the store, reading the file when it exists
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut store = Self {
            path: path.into(),
            accounts: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&mut self) -> StoreResult<()> {
        self.accounts = read_table(&self.path)?;
        log::debug!(target: "arthik::store", "Loaded {} accounts from {}", self.accounts.len(), self.path.display());
        Ok(())
    }

    pub fn save(&self) -> StoreResult<()> {
        write_table(&self.path, &self.accounts)
    }

    pub fn all(&self) -> &[Account] {
        &self.accounts
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn list_by_category(&self, category: AccountCategory) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }

    pub fn add(&mut self, account: Account) -> StoreResult<()> {
        if self.exists(&account.name) {
            return Err(StoreError::already_exists(KIND, account.name));
        }
        self.accounts.push(account);
        if let Err(e) = self.save() {
            self.accounts.pop();
            return Err(e);
        }
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> StoreResult<Account> {
        let index = self.index_of(name)?;
        let removed = self.accounts.remove(index);
        if let Err(e) = self.save() {
            self.accounts.insert(index, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Swap the account stored under `old_name` for `account`, which may carry
    /// a new name as long as that name is free.
    pub fn replace(&mut self, old_name: &str, account: Account) -> StoreResult<Account> {
        let index = self.index_of(old_name)?;
        if account.name != old_name && self.exists(&account.name) {
            return Err(StoreError::already_exists(KIND, account.name));
        }
        let previous = std::mem::replace(&mut self.accounts[index], account);
        if let Err(e) = self.save() {
            self.accounts[index] = previous;
            return Err(e);
        }
        Ok(previous)
    }

    /// Add `delta` to a balance in memory
    pub fn update_balance(&mut self, name: &str, delta: Decimal) -> StoreResult<Decimal> {
        let index = self.index_of(name)?;
        let account = &mut self.accounts[index];
        account.balance += delta;
        Ok(account.balance)
    }

    /// Overwrite a balance in memory
    pub fn set_balance(&mut self, name: &str, value: Decimal) -> StoreResult<()> {
        let index = self.index_of(name)?;
        self.accounts[index].balance = value;
        Ok(())
    }

    fn index_of(&self, name: &str) -> StoreResult<usize> {
        self.accounts
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| StoreError::not_found(KIND, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> AccountStore {
        let mut store = AccountStore::open(dir.path().join("accounts.csv")).unwrap();
        store.add(Account::new("Cash", AccountCategory::Assets, true)).unwrap();
        store.add(Account::new("Salary", AccountCategory::Revenue, false)).unwrap();
        store.add(Account::new("Food", AccountCategory::Expenses, false)).unwrap();
        store
    }

    #[test]
    fn test_add_persists_and_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut accounts = store(&dir);

        let err = accounts.add(Account::new("Cash", AccountCategory::Assets, true)).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));

        let reopened = AccountStore::open(dir.path().join("accounts.csv")).unwrap();
        assert_eq!(reopened.all().len(), 3);
        assert_eq!(reopened.all()[0].name, "Cash");
    }

    #[test]
    fn test_update_balance_is_in_memory_until_saved() {
        let dir = TempDir::new().unwrap();
        let mut accounts = store(&dir);

        let balance = accounts.update_balance("Cash", Decimal::new(1000, 0)).unwrap();
        assert_eq!(balance, Decimal::new(1000, 0));
        let on_disk = AccountStore::open(accounts.path()).unwrap();
        assert_eq!(on_disk.get("Cash").unwrap().balance, Decimal::ZERO);

        accounts.save().unwrap();
        let on_disk = AccountStore::open(accounts.path()).unwrap();
        assert_eq!(on_disk.get("Cash").unwrap().balance, Decimal::new(1000, 0));
    }

    #[test]
    fn test_missing_account_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut accounts = store(&dir);
        assert!(accounts.update_balance("Ghost", Decimal::ONE).unwrap_err().is_not_found());
        assert!(accounts.delete("Ghost").unwrap_err().is_not_found());
        assert!(accounts.set_balance("Ghost", Decimal::ONE).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_by_category_preserves_order() {
        let dir = TempDir::new().unwrap();
        let mut accounts = store(&dir);
        accounts.add(Account::new("Bank", AccountCategory::Assets, true)).unwrap();
        let names: Vec<&str> = accounts
            .list_by_category(AccountCategory::Assets)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Cash", "Bank"]);
    }

    #[test]
    fn test_replace_checks_new_name() {
        let dir = TempDir::new().unwrap();
        let mut accounts = store(&dir);

        let clash = Account::new("Cash", AccountCategory::Expenses, false);
        assert!(accounts.replace("Food", clash).is_err());

        let renamed = Account::new("Groceries", AccountCategory::Expenses, false);
        let previous = accounts.replace("Food", renamed).unwrap();
        assert_eq!(previous.name, "Food");
        assert!(accounts.exists("Groceries"));
        assert!(!accounts.exists("Food"));
    }

    #[test]
    fn test_delete_removes_row() {
        let dir = TempDir::new().unwrap();
        let mut accounts = store(&dir);
        accounts.delete("Salary").unwrap();
        let content = fs::read_to_string(accounts.path()).unwrap();
        assert!(!content.contains("Salary"));
        assert!(content.starts_with("name,category,include_in_net_worth,balance"));
    }
}
