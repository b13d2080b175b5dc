use arthik_config::Config;
use arthik_core::{AccountCategory, AccountDraft, Ledger, MemoryAuditSink, TransactionDraft};
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::TempDir;

const ACCOUNTS: [(&str, AccountCategory, i64); 4] = [
    ("Cash", AccountCategory::Assets, 10_000),
    ("Card", AccountCategory::Liabilities, -2_500),
    ("Salary", AccountCategory::Revenue, 0),
    ("Food", AccountCategory::Expenses, 0),
];

#[derive(Debug, Clone)]
enum Op {
    Create { from: usize, to: usize, cents: i64, day: u32, minute: u32 },
    Update { index: usize, from: usize, to: usize, cents: i64, day: u32, minute: u32 },
    Delete { index: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..4usize, 0..4usize, 1..100_000i64, 1..=28u32, 0..60u32)
            .prop_map(|(from, to, cents, day, minute)| Op::Create { from, to, cents, day, minute }),
        1 => (any::<usize>(), 0..4usize, 0..4usize, 1..100_000i64, 1..=28u32, 0..60u32)
            .prop_map(|(index, from, to, cents, day, minute)| Op::Update { index, from, to, cents, day, minute }),
        1 => any::<usize>().prop_map(|index| Op::Delete { index }),
    ]
}

fn when(day: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1 + day % 3, day)
        .unwrap()
        .and_hms_opt(12, minute, 0)
        .unwrap()
}

fn draft(from: usize, to: usize, cents: i64, day: u32, minute: u32) -> TransactionDraft {
    TransactionDraft {
        from: ACCOUNTS[from].0.to_string(),
        to: ACCOUNTS[to].0.to_string(),
        description: String::new(),
        amount: Decimal::new(cents, 2),
        timestamp: when(day, minute),
    }
}

/// Ledger that trusts its incremental path: no healing after mutations
fn open(dir: &TempDir) -> (Config, Ledger) {
    let mut config = Config::default().with_data_path(dir.path());
    config.ledger.seed_default_accounts = false;
    config.ledger.verify_incremental = false;
    let mut ledger = Ledger::open(&config, Arc::new(MemoryAuditSink::default())).unwrap();
    for (name, category, opening) in ACCOUNTS {
        let mut account = AccountDraft::new(name, category, category.is_balance_sheet());
        account.opening_balance = Decimal::new(opening, 0);
        ledger.create_account(account).unwrap();
    }
    (config, ledger)
}

fn run(ledger: &mut Ledger, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Create { from, to, cents, day, minute } => {
                let result = ledger.create_transaction(draft(from, to, cents, day, minute));
                assert_eq!(result.is_err(), from == to);
            }
            Op::Update { index, from, to, cents, day, minute } => {
                let existing = ledger.transactions(None).unwrap();
                if existing.is_empty() {
                    continue;
                }
                let id = existing[index % existing.len()].id;
                let result = ledger.update_transaction(&id, draft(from, to, cents, day, minute));
                assert_eq!(result.is_err(), from == to);
            }
            Op::Delete { index } => {
                let existing = ledger.transactions(None).unwrap();
                if existing.is_empty() {
                    continue;
                }
                let id = existing[index % existing.len()].id;
                ledger.delete_transaction(&id).unwrap();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn incremental_matches_replay(ops in prop::collection::vec(op(), 1..25)) {
        let dir = TempDir::new().unwrap();
        let (_, mut ledger) = open(&dir);
        run(&mut ledger, &ops);
        prop_assert!(ledger.verify_consistency().unwrap().is_empty());
    }

    #[test]
    fn balances_are_conserved(ops in prop::collection::vec(op(), 1..25)) {
        let dir = TempDir::new().unwrap();
        let (_, mut ledger) = open(&dir);
        run(&mut ledger, &ops);

        let total: Decimal = ledger.accounts().iter().map(|a| a.balance).sum();
        let opening: Decimal = ledger.accounts().iter().map(|a| a.opening_balance).sum();
        prop_assert_eq!(total, opening);
    }

    #[test]
    fn recalculation_is_idempotent(ops in prop::collection::vec(op(), 1..25)) {
        let dir = TempDir::new().unwrap();
        let (config, mut ledger) = open(&dir);
        run(&mut ledger, &ops);

        let first = ledger.recalculate_all().unwrap();
        let reports = std::fs::read(config.reports_path()).unwrap();
        let accounts = std::fs::read(config.accounts_path()).unwrap();

        let second = ledger.recalculate_all().unwrap();
        prop_assert!(second.corrected.is_empty());
        prop_assert_eq!(first.records, second.records);
        prop_assert_eq!(std::fs::read(config.reports_path()).unwrap(), reports);
        prop_assert_eq!(std::fs::read(config.accounts_path()).unwrap(), accounts);
    }
}
