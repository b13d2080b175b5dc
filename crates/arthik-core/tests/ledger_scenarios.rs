use arthik_config::{Config, PartitionScheme};
use arthik_core::{
    AccountCategory, AccountDraft, CoreError, Ledger, MemoryAuditSink, PeriodKey, RecurrenceDraft, TransactionDraft,
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::TempDir;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
}

fn config(dir: &TempDir) -> Config {
    let mut config = Config::default().with_data_path(dir.path());
    config.ledger.seed_default_accounts = false;
    config
}

fn open(config: &Config) -> Ledger {
    let mut ledger = Ledger::open(config, Arc::new(MemoryAuditSink::default())).unwrap();
    ledger
        .create_account(AccountDraft::new("Cash", AccountCategory::Assets, true))
        .unwrap();
    ledger
        .create_account(AccountDraft::new("Salary", AccountCategory::Revenue, false))
        .unwrap();
    let mut food = AccountDraft::new("Food", AccountCategory::Expenses, false);
    food.budget = Decimal::new(500, 0);
    ledger.create_account(food).unwrap();
    ledger
}

fn transfer(from: &str, to: &str, amount: i64, when: NaiveDateTime) -> TransactionDraft {
    TransactionDraft {
        from: from.to_string(),
        to: to.to_string(),
        description: format!("{} to {}", from, to),
        amount: Decimal::new(amount, 0),
        timestamp: when,
    }
}

#[test]
fn salary_raises_net_worth() {
    let dir = TempDir::new().unwrap();
    let mut ledger = open(&config(&dir));

    ledger
        .create_transaction(transfer("Salary", "Cash", 1000, at(2025, 1, 10, 9, 0)))
        .unwrap();

    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(1000, 0));
    let dashboard = ledger.dashboard(NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()).unwrap();
    assert_eq!(dashboard.net_worth, Decimal::new(1000, 0));
    assert_eq!(dashboard.month_income, Decimal::new(1000, 0));

    let reports = ledger.reports().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    assert_eq!(reports[0].net_worth, Decimal::new(1000, 0));
}

#[test]
fn spending_shows_in_budget() {
    let dir = TempDir::new().unwrap();
    let mut ledger = open(&config(&dir));
    ledger
        .create_transaction(transfer("Salary", "Cash", 1000, at(2025, 1, 10, 9, 0)))
        .unwrap();
    ledger
        .create_transaction(transfer("Cash", "Food", 50, at(2025, 1, 11, 13, 0)))
        .unwrap();

    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(950, 0));
    let budget = ledger.budget_report(2025, 1).unwrap();
    let food = budget.lines.iter().find(|l| l.account == "Food").unwrap();
    assert_eq!(food.budget, Decimal::new(500, 0));
    assert_eq!(food.actual, Decimal::new(50, 0));
    assert_eq!(food.remaining, Decimal::new(450, 0));
    assert_eq!(food.percent_used, Decimal::new(10, 0));
    assert_eq!(ledger.reports().unwrap()[0].expenses, Decimal::new(50, 0));
}

#[test]
fn deleting_reverses_the_transaction() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let mut ledger = open(&config);
    ledger
        .create_transaction(transfer("Salary", "Cash", 1000, at(2025, 1, 10, 9, 0)))
        .unwrap();
    let lunch = ledger
        .create_transaction(transfer("Cash", "Food", 50, at(2025, 1, 11, 13, 0)))
        .unwrap();

    let removed = ledger.delete_transaction(&lunch.id).unwrap();
    assert_eq!(removed.id, lunch.id);
    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(1000, 0));
    assert_eq!(ledger.account("Food").unwrap().balance, Decimal::ZERO);

    let partition = config
        .ledger_path()
        .join(PeriodKey::Month { year: 2025, month: 1 }.file_name());
    let content = std::fs::read_to_string(partition).unwrap();
    assert!(!content.contains(&lunch.id.to_string()));
    assert!(ledger.delete_transaction(&lunch.id).unwrap_err().is_not_found());
}

#[test]
fn applying_a_recurrence_advances_it() {
    let dir = TempDir::new().unwrap();
    let mut ledger = open(&config(&dir));
    let now = at(2025, 1, 15, 8, 30);
    let template = ledger
        .save_recurrence(
            None,
            RecurrenceDraft {
                from: "Cash".to_string(),
                to: "Food".to_string(),
                description: "Groceries".to_string(),
                amount: Decimal::new(120, 0),
                day_of_month: 15,
                next_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            },
            now,
        )
        .unwrap();
    assert_eq!(ledger.due_recurrences(now.date()).unwrap().len(), 1);

    let applied = ledger.apply_recurrence(&template.id, now).unwrap();
    assert_eq!(applied.transaction.id.timestamp(), now);
    assert_eq!(applied.recurrence.next_date, NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());
    assert_eq!(ledger.recurrence(&template.id).unwrap().next_date, applied.recurrence.next_date);
    assert_eq!(ledger.account("Food").unwrap().balance, Decimal::new(120, 0));
    assert!(ledger.due_recurrences(now.date()).unwrap().is_empty());
}

#[test]
fn ids_are_unique_within_a_minute() {
    let dir = TempDir::new().unwrap();
    let mut ledger = open(&config(&dir));
    let when = at(2025, 1, 10, 9, 0);
    let mut ids = Vec::new();
    for _ in 0..60 {
        ids.push(ledger.create_transaction(transfer("Salary", "Cash", 1, when)).unwrap().id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 60);

    let err = ledger
        .create_transaction(transfer("Salary", "Cash", 1, when))
        .unwrap_err();
    assert!(matches!(err, CoreError::AlreadyExists { .. }));
    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(60, 0));
}

#[test]
fn transactions_land_in_their_period() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let mut ledger = open(&config);
    ledger
        .create_transaction(transfer("Salary", "Cash", 10, at(2025, 1, 31, 23, 59)))
        .unwrap();
    ledger
        .create_transaction(transfer("Salary", "Cash", 20, at(2025, 2, 1, 0, 0)))
        .unwrap();

    assert!(config.ledger_path().join("transactions_202501.csv").exists());
    assert!(config.ledger_path().join("transactions_202502.csv").exists());
    let february = ledger
        .transactions(Some(PeriodKey::Month { year: 2025, month: 2 }))
        .unwrap();
    assert_eq!(february.len(), 1);
    assert_eq!(february[0].amount, Decimal::new(20, 0));

    let all = ledger.transactions(None).unwrap();
    assert_eq!(all[0].amount, Decimal::new(20, 0));
}

#[test]
fn yearly_partitions() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.ledger.partition = PartitionScheme::Year;
    let mut ledger = open(&config);
    ledger
        .create_transaction(transfer("Salary", "Cash", 10, at(2025, 1, 31, 9, 0)))
        .unwrap();
    ledger
        .create_transaction(transfer("Salary", "Cash", 20, at(2025, 11, 2, 9, 0)))
        .unwrap();

    assert!(config.ledger_path().join("transactions_2025.csv").exists());
    assert_eq!(ledger.transactions(Some(PeriodKey::Year { year: 2025 })).unwrap().len(), 2);
    assert_eq!(ledger.budget_report(2025, 11).unwrap().month, "2025-11");
}

/// A non-empty directory in place of the account file makes every save fail.
fn block_account_file(config: &Config) {
    let accounts = config.accounts_path();
    std::fs::remove_file(&accounts).unwrap();
    std::fs::create_dir(&accounts).unwrap();
    std::fs::write(accounts.join("blocker"), "x").unwrap();
}

fn partition(config: &Config, year: i32, month: u32) -> String {
    let path = config
        .ledger_path()
        .join(PeriodKey::Month { year, month }.file_name());
    std::fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn failed_save_rolls_back() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let mut ledger = open(&config);
    ledger
        .create_transaction(transfer("Salary", "Cash", 100, at(2025, 1, 10, 9, 0)))
        .unwrap();

    block_account_file(&config);
    let err = ledger
        .create_transaction(transfer("Cash", "Food", 30, at(2025, 1, 12, 9, 0)))
        .unwrap_err();
    assert!(matches!(err, CoreError::IoError { .. }));

    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(100, 0));
    assert_eq!(ledger.account("Food").unwrap().balance, Decimal::ZERO);
    assert_eq!(ledger.transactions(None).unwrap().len(), 1);
    assert!(ledger.verify_consistency().unwrap().is_empty());
}

#[test]
fn failed_update_rolls_back() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let mut ledger = open(&config);
    let pay = ledger
        .create_transaction(transfer("Salary", "Cash", 100, at(2025, 1, 10, 9, 0)))
        .unwrap();
    block_account_file(&config);

    let err = ledger
        .update_transaction(&pay.id, transfer("Salary", "Food", 40, at(2025, 2, 1, 8, 0)))
        .unwrap_err();
    assert!(matches!(err, CoreError::IoError { .. }));

    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(100, 0));
    assert_eq!(ledger.account("Food").unwrap().balance, Decimal::ZERO);
    assert_eq!(ledger.transaction(&pay.id).unwrap(), pay);
    assert!(partition(&config, 2025, 1).contains("TRAN20250110090000"));
    assert!(!partition(&config, 2025, 2).contains("TRAN20250201080000"));
    assert_eq!(ledger.transactions(None).unwrap().len(), 1);
    assert!(ledger.verify_consistency().unwrap().is_empty());
}

#[test]
fn failed_delete_rolls_back() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let mut ledger = open(&config);
    let pay = ledger
        .create_transaction(transfer("Salary", "Cash", 100, at(2025, 1, 10, 9, 0)))
        .unwrap();
    block_account_file(&config);

    let err = ledger.delete_transaction(&pay.id).unwrap_err();
    assert!(matches!(err, CoreError::IoError { .. }));

    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(100, 0));
    assert_eq!(ledger.transaction(&pay.id).unwrap(), pay);
    assert!(partition(&config, 2025, 1).contains("TRAN20250110090000"));
    assert!(ledger.verify_consistency().unwrap().is_empty());
}

#[test]
fn reopening_recovers_state() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    {
        let mut ledger = open(&config);
        ledger
            .create_transaction(transfer("Salary", "Cash", 250, at(2025, 3, 1, 9, 0)))
            .unwrap();
    }
    let mut ledger = Ledger::open(&config, Arc::new(MemoryAuditSink::default())).unwrap();
    assert_eq!(ledger.account("Cash").unwrap().balance, Decimal::new(250, 0));
    let summary = ledger.recalculate_all().unwrap();
    assert_eq!(summary.transactions, 1);
    assert!(summary.corrected.is_empty());
}
