//! The ledger engine
//!
//! [`Ledger`] owns every store. Mutations take the incremental fast path
//! (move two balances, persist) and then settle: the whole history is
//! replayed, any disagreement is reported and healed, and the report
//! history is regenerated.

use crate::audit::{AuditEvent, AuditSink};
use crate::balance::{self, BalanceDrift, Direction};
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
use crate::recurrence::{self, RECURRING_SUFFIX};
use crate::reports::{self, BudgetReport, Dashboard};
use arthik_config::{Config, LedgerConfig, LimitsConfig};
use arthik_store::{
    Account, AccountCategory, AccountStore, LedgerStore, PeriodKey, Record, Recurrence,
    RecurrenceStore, ReportStore, Transaction, TransactionId,
};
use arthik_utils::{
    generate_recurrence_id, text_length, validate_amount, validate_budget, validate_day_of_month,
    validate_transfer,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Fields of an account as supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    pub category: AccountCategory,
    pub include_in_net_worth: bool,
    pub opening_balance: Decimal,
    pub budget: Decimal,
    pub due_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub exclude_from_expense_rollup: bool,
}

impl AccountDraft {
    pub fn new(name: impl Into<String>, category: AccountCategory, include_in_net_worth: bool) -> Self {
        Self {
            name: name.into(),
            category,
            include_in_net_worth,
            opening_balance: Decimal::ZERO,
            budget: Decimal::ZERO,
            due_date: None,
            last_payment_date: None,
            exclude_from_expense_rollup: false,
        }
    }

    fn into_account(self, balance: Decimal) -> Account {
        Account {
            name: self.name,
            category: self.category,
            include_in_net_worth: self.include_in_net_worth,
            balance,
            opening_balance: self.opening_balance,
            budget: self.budget,
            due_date: self.due_date,
            last_payment_date: self.last_payment_date,
            exclude_from_expense_rollup: self.exclude_from_expense_rollup,
        }
    }
}

/// A transaction before it has an id
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub from: String,
    pub to: String,
    pub description: String,
    pub amount: Decimal,
    pub timestamp: NaiveDateTime,
}

impl TransactionDraft {
    fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            from: self.from,
            to: self.to,
            description: self.description,
            amount: self.amount,
        }
    }
}

/// A recurrence template before it has an id
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceDraft {
    pub from: String,
    pub to: String,
    pub description: String,
    pub amount: Decimal,
    pub day_of_month: u32,
    /// Defaults to the first matching day on or after today
    pub next_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRecurrence {
    pub transaction: Transaction,
    pub recurrence: Recurrence,
}

/// Result of a full rebuild from the transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recalculation {
    pub transactions: usize,
    pub records: Vec<Record>,
    /// Balances that were replaced by their replayed value
    pub corrected: Vec<BalanceDrift>,
    /// Transactions naming an account that no longer exists
    pub skipped: Vec<TransactionId>,
}

/// Accounts, transaction history, recurrence templates and reports
pub struct Ledger {
    accounts: AccountStore,
    transactions: LedgerStore,
    recurrences: RecurrenceStore,
    reports: ReportStore,
    settings: LedgerConfig,
    limits: LimitsConfig,
    audit: Arc<dyn AuditSink>,
    error_logger: Arc<dyn ErrorLogger>,
}

impl Ledger {
    /// Open every store under the configured data directory
    pub fn open(config: &Config, audit: Arc<dyn AuditSink>) -> CoreResult<Self> {
        let ledger = Self {
            accounts: AccountStore::open(config.accounts_path())?,
            transactions: LedgerStore::new(config.ledger_path(), config.ledger.partition),
            recurrences: RecurrenceStore::new(config.recurrence_path()),
            reports: ReportStore::new(config.reports_path()),
            settings: config.ledger.clone(),
            limits: config.limits.clone(),
            audit,
            error_logger: Arc::new(DefaultErrorLogger),
        };
        log::info!(
            target: "arthik::ledger",
            "Opened ledger at {} ({} accounts, {} partitioning)",
            config.data_path().display(),
            ledger.accounts.all().len(),
            config.ledger.partition
        );
        Ok(ledger)
    }

    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.error_logger = logger;
        self
    }

    /// Create the configured default accounts when the account file is empty
    pub fn seed_default_accounts(&mut self) -> CoreResult<usize> {
        if !self.settings.seed_default_accounts || !self.accounts.is_empty() {
            return Ok(0);
        }
        let defaults = self.settings.default_accounts.clone();
        for default in &defaults {
            let category = default
                .category
                .parse::<AccountCategory>()
                .map_err(|message| CoreError::ConfigError { message })?;
            self.accounts
                .add(Account::new(default.name.clone(), category, default.include_in_net_worth))?;
        }
        log::info!(target: "arthik::ledger", "Seeded {} default accounts", defaults.len());
        Ok(defaults.len())
    }

    // ==================== Accounts ====================

    pub fn accounts(&self) -> &[Account] {
        self.accounts.all()
    }

    pub fn accounts_by_category(&self, category: AccountCategory) -> Vec<&Account> {
        self.accounts.list_by_category(category)
    }

    pub fn account(&self, name: &str) -> CoreResult<&Account> {
        self.accounts
            .get(name)
            .ok_or_else(|| CoreError::account_not_found(name))
    }

    pub fn create_account(&mut self, draft: AccountDraft) -> CoreResult<Account> {
        let resource = draft.name.clone();
        let result = self.insert_account(draft);
        self.finish("create_account", &resource, result)
    }

    /// Edit an account. A rename is carried into every transaction and template;
    /// a new opening balance shifts the current balance by the difference.
    pub fn update_account(&mut self, name: &str, draft: AccountDraft) -> CoreResult<Account> {
        let result = self.replace_account(name, draft);
        self.finish("update_account", name, result)
    }

    /// Remove an account no transaction or template refers to
    pub fn delete_account(&mut self, name: &str) -> CoreResult<Account> {
        let result = self.remove_account(name);
        self.finish("delete_account", name, result)
    }

    fn insert_account(&mut self, draft: AccountDraft) -> CoreResult<Account> {
        self.validate_account(&draft)?;
        let account = draft.clone().into_account(draft.opening_balance);
        self.accounts.add(account.clone())?;
        log::info!(target: "arthik::ledger", "Created account '{}' ({})", account.name, account.category);
        self.settle("create_account");
        Ok(account)
    }

    fn replace_account(&mut self, name: &str, draft: AccountDraft) -> CoreResult<Account> {
        let current = self.account(name)?.clone();
        self.validate_account(&draft)?;

        let balance = current.balance + (draft.opening_balance - current.opening_balance);
        let updated = draft.into_account(balance);
        self.accounts.replace(name, updated.clone())?;

        if updated.name != current.name {
            if let Err(e) = self.transactions.rename_account(name, &updated.name) {
                let _ = self.transactions.rename_account(&updated.name, name);
                let _ = self.accounts.replace(&updated.name, current);
                return Err(e.into());
            }
            self.rename_in_recurrences(name, &updated.name);
            log::info!(target: "arthik::ledger", "Renamed account '{}' to '{}'", name, updated.name);
        }

        self.settle("update_account");
        Ok(self.account(&updated.name)?.clone())
    }

    fn remove_account(&mut self, name: &str) -> CoreResult<Account> {
        self.account(name)?;

        let referencing = self
            .transactions
            .load_all()?
            .iter()
            .filter(|t| t.touches(name))
            .count();
        if referencing > 0 {
            return Err(CoreError::validation(format!(
                "account '{}' is used by {} transaction(s)",
                name, referencing
            )));
        }
        let templates = self
            .recurrences
            .list()?
            .iter()
            .filter(|r| r.from == name || r.to == name)
            .count();
        if templates > 0 {
            return Err(CoreError::validation(format!(
                "account '{}' is used by {} recurring template(s)",
                name, templates
            )));
        }

        let removed = self.accounts.delete(name)?;
        log::info!(target: "arthik::ledger", "Deleted account '{}'", name);
        self.settle("delete_account");
        Ok(removed)
    }

    fn rename_in_recurrences(&mut self, old: &str, new: &str) {
        let templates = match self.recurrences.list() {
            Ok(templates) => templates,
            Err(e) => {
                self.report(&e.into(), "rename_account");
                return;
            }
        };
        for mut template in templates.into_iter().filter(|r| r.from == old || r.to == old) {
            if template.from == old {
                template.from = new.to_string();
            }
            if template.to == old {
                template.to = new.to_string();
            }
            if let Err(e) = self.recurrences.upsert(&template) {
                self.report(&e.into(), "rename_account");
            }
        }
    }

    fn validate_account(&self, draft: &AccountDraft) -> CoreResult<()> {
        let length = text_length(draft.name.trim());
        if length == 0 {
            return Err(CoreError::validation("account name is required"));
        }
        if length > self.limits.max_name_length {
            return Err(CoreError::validation(format!(
                "account name exceeds maximum length of {} characters",
                self.limits.max_name_length
            )));
        }
        validate_budget(draft.budget, self.limits.max_amount)?;
        if draft.opening_balance.abs() > self.limits.max_amount {
            return Err(CoreError::validation("opening balance exceeds the maximum amount"));
        }
        if draft.opening_balance.normalize().scale() > 2 {
            return Err(CoreError::validation("opening balance allows at most two decimal places"));
        }
        Ok(())
    }

    // ==================== Transactions ====================

    /// Transactions of one period, or of the whole history, newest first
    pub fn transactions(&self, period: Option<PeriodKey>) -> CoreResult<Vec<Transaction>> {
        let mut rows = match period {
            Some(period) => self.transactions.load_period(&period)?,
            None => self.transactions.load_all()?,
        };
        balance::sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub fn transaction(&self, id: &TransactionId) -> CoreResult<Transaction> {
        self.transactions
            .find(id)?
            .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })
    }

    /// Record a new transaction. The id is taken from the timestamp; when that
    /// second is taken, the next free second of the same minute is used.
    pub fn create_transaction(&mut self, draft: TransactionDraft) -> CoreResult<Transaction> {
        let result = self.insert_transaction(draft);
        let resource = match &result {
            Ok(tx) => tx.id.to_string(),
            Err(_) => "transaction".to_string(),
        };
        self.finish("create_transaction", &resource, result)
    }

    /// Replace a transaction's content. A changed timestamp moves it to a new id
    /// and possibly a new partition.
    pub fn update_transaction(&mut self, id: &TransactionId, draft: TransactionDraft) -> CoreResult<Transaction> {
        let result = self.replace_transaction(id, draft);
        self.finish("update_transaction", &id.to_string(), result)
    }

    pub fn delete_transaction(&mut self, id: &TransactionId) -> CoreResult<Transaction> {
        let result = self.remove_transaction(id);
        self.finish("delete_transaction", &id.to_string(), result)
    }

    fn insert_transaction(&mut self, draft: TransactionDraft) -> CoreResult<Transaction> {
        self.validate_transaction(&draft)?;
        let id = self.allocate_id(draft.timestamp, None)?;
        let tx = draft.into_transaction(id);

        self.transactions.append_or_replace(&tx)?;
        if let Err(e) = self.move_balances(&tx, Direction::Apply) {
            self.discard_record(&tx.id);
            return Err(e);
        }
        if let Err(e) = self.accounts.save() {
            let _ = self.move_balances(&tx, Direction::Reverse);
            self.discard_record(&tx.id);
            return Err(e.into());
        }

        log::info!(
            target: "arthik::ledger",
            "Recorded {}: {} -> {} {}",
            tx.id, tx.from, tx.to, tx.amount
        );
        self.settle("create_transaction");
        Ok(tx)
    }

    fn replace_transaction(&mut self, id: &TransactionId, draft: TransactionDraft) -> CoreResult<Transaction> {
        let old = self.transaction(id)?;
        self.validate_transaction(&draft)?;

        let new_id = if TransactionId::from_timestamp(draft.timestamp) == old.id {
            old.id
        } else {
            self.allocate_id(draft.timestamp, Some(old.id))?
        };
        let updated = draft.into_transaction(new_id);

        self.transactions.append_or_replace(&updated)?;
        if updated.id != old.id {
            if let Err(e) = self.transactions.delete(&old.id) {
                self.discard_record(&updated.id);
                return Err(e.into());
            }
        }

        if let Err(e) = self.move_balances(&old, Direction::Reverse) {
            self.restore_record(&old, &updated);
            return Err(e);
        }
        if let Err(e) = self.move_balances(&updated, Direction::Apply) {
            let _ = self.move_balances(&old, Direction::Apply);
            self.restore_record(&old, &updated);
            return Err(e);
        }
        if let Err(e) = self.accounts.save() {
            let _ = self.move_balances(&updated, Direction::Reverse);
            let _ = self.move_balances(&old, Direction::Apply);
            self.restore_record(&old, &updated);
            return Err(e.into());
        }

        log::info!(target: "arthik::ledger", "Updated {} (now {})", old.id, updated.id);
        self.settle("update_transaction");
        Ok(updated)
    }

    fn remove_transaction(&mut self, id: &TransactionId) -> CoreResult<Transaction> {
        let old = self.transaction(id)?;
        if !self.transactions.delete(id)? {
            return Err(CoreError::TransactionNotFound { id: id.to_string() });
        }

        if let Err(e) = self.move_balances(&old, Direction::Reverse) {
            self.reinsert_record(&old);
            return Err(e);
        }
        if let Err(e) = self.accounts.save() {
            let _ = self.move_balances(&old, Direction::Apply);
            self.reinsert_record(&old);
            return Err(e.into());
        }

        log::info!(target: "arthik::ledger", "Deleted {}", old.id);
        self.settle("delete_transaction");
        Ok(old)
    }

    fn validate_transaction(&self, draft: &TransactionDraft) -> CoreResult<()> {
        validate_transfer(&draft.from, &draft.to)?;
        validate_amount(draft.amount, self.limits.max_amount)?;
        if text_length(&draft.description) > self.limits.max_description_length {
            return Err(CoreError::validation(format!(
                "description exceeds maximum length of {} characters",
                self.limits.max_description_length
            )));
        }
        self.account(&draft.from)?;
        self.account(&draft.to)?;
        Ok(())
    }

    /// First free id at or after `timestamp` within the same minute
    fn allocate_id(&self, timestamp: NaiveDateTime, keep: Option<TransactionId>) -> CoreResult<TransactionId> {
        let first = TransactionId::from_timestamp(timestamp);
        let taken: HashSet<TransactionId> = self
            .transactions
            .load_period(&self.transactions.period_of(first.date()))?
            .into_iter()
            .map(|t| t.id)
            .collect();

        let room = 60 - i64::from(first.time().second());
        (0..room)
            .map(|offset| first.plus_seconds(offset))
            .find(|candidate| Some(*candidate) == keep || !taken.contains(candidate))
            .ok_or_else(|| CoreError::AlreadyExists {
                kind: "Transaction".to_string(),
                key: first.to_string(),
            })
    }

    /// Move both legs of a transaction in memory; the first leg is undone
    /// when the second one fails.
    fn move_balances(&mut self, tx: &Transaction, direction: Direction) -> CoreResult<()> {
        let (from_delta, to_delta) = direction.deltas(tx.amount);
        self.accounts.update_balance(&tx.from, from_delta)?;
        if let Err(e) = self.accounts.update_balance(&tx.to, to_delta) {
            let _ = self.accounts.update_balance(&tx.from, -from_delta);
            return Err(e.into());
        }
        Ok(())
    }

    fn discard_record(&mut self, id: &TransactionId) {
        if let Err(e) = self.transactions.delete(id) {
            self.report(&e.into(), "rollback");
        }
    }

    fn reinsert_record(&mut self, tx: &Transaction) {
        if let Err(e) = self.transactions.append_or_replace(tx) {
            self.report(&e.into(), "rollback");
        }
    }

    fn restore_record(&mut self, old: &Transaction, updated: &Transaction) {
        if updated.id != old.id {
            self.discard_record(&updated.id);
        }
        self.reinsert_record(old);
    }

    // ==================== Derivation ====================

    /// Rebuild every balance and the whole report history from the ledger
    pub fn recalculate_all(&mut self) -> CoreResult<Recalculation> {
        let result = self.rebuild("recalculate_all", false);
        if let Ok(ref summary) = result {
            log::info!(
                target: "arthik::ledger",
                "Recalculated {} transactions into {} report rows ({} balances corrected)",
                summary.transactions,
                summary.records.len(),
                summary.corrected.len()
            );
        }
        self.finish("recalculate_all", "reports", result)
    }

    /// Stored balances that disagree with a full replay. Changes nothing.
    pub fn verify_consistency(&self) -> CoreResult<Vec<BalanceDrift>> {
        let history = self.transactions.load_all()?;
        let replay = balance::replay(self.accounts.all(), &history);
        Ok(balance::drift(self.accounts.all(), &replay.balances))
    }

    /// Rebuild after a committed mutation. Failures are logged; the next
    /// recalculation repairs whatever was left behind.
    fn settle(&mut self, operation: &str) {
        if let Err(e) = self.rebuild(operation, true) {
            self.report(&e, operation);
        }
    }

    fn rebuild(&mut self, operation: &str, after_mutation: bool) -> CoreResult<Recalculation> {
        let history = self.transactions.load_all()?;
        let replay = balance::replay(self.accounts.all(), &history);
        if !replay.skipped.is_empty() {
            self.error_logger.log_warning(
                &format!("{} transaction(s) reference unknown accounts", replay.skipped.len()),
                &ErrorContext::new(operation).with_data(
                    "skipped",
                    serde_json::json!(replay.skipped.iter().map(|id| id.to_string()).collect::<Vec<_>>()),
                ),
            );
        }

        let mut corrected = Vec::new();
        if !after_mutation || self.settings.verify_incremental {
            corrected = balance::drift(self.accounts.all(), &replay.balances);
            if !corrected.is_empty() {
                if after_mutation {
                    let error = CoreError::InconsistentState {
                        message: format!(
                            "{} balance(s) disagree with the replayed history after {}",
                            corrected.len(),
                            operation
                        ),
                    };
                    let context = ErrorContext::new(operation)
                        .with_data("drift", serde_json::to_value(&corrected).unwrap_or_default());
                    self.error_logger.log_error(&error, &context);
                }
                for drift in &corrected {
                    self.accounts.set_balance(&drift.account, drift.derived)?;
                }
                self.accounts.save()?;
            }
        }

        let records = reports::progressive(self.accounts.all(), &history, self.settings.report_granularity);
        self.reports.replace_all(&records)?;

        Ok(Recalculation {
            transactions: replay.applied,
            records,
            corrected,
            skipped: replay.skipped,
        })
    }

    // ==================== Recurrences ====================

    pub fn recurrences(&self) -> CoreResult<Vec<Recurrence>> {
        Ok(self.recurrences.list()?)
    }

    pub fn recurrence(&self, id: &str) -> CoreResult<Recurrence> {
        self.recurrences
            .get(id)?
            .ok_or_else(|| CoreError::RecurrenceNotFound { id: id.to_string() })
    }

    /// Templates whose next date has arrived
    pub fn due_recurrences(&self, today: NaiveDate) -> CoreResult<Vec<Recurrence>> {
        Ok(self.recurrences.due(today)?)
    }

    /// Create a template (`id` is None) or replace an existing one
    pub fn save_recurrence(
        &mut self,
        id: Option<&str>,
        draft: RecurrenceDraft,
        now: NaiveDateTime,
    ) -> CoreResult<Recurrence> {
        let result = self.store_recurrence(id, draft, now);
        let resource = match &result {
            Ok(r) => r.id.clone(),
            Err(_) => id.unwrap_or("recurrence").to_string(),
        };
        self.finish("save_recurrence", &resource, result)
    }

    pub fn delete_recurrence(&mut self, id: &str) -> CoreResult<()> {
        let result = match self.recurrences.delete(id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CoreError::RecurrenceNotFound { id: id.to_string() }),
            Err(e) => Err(e.into()),
        };
        self.finish("delete_recurrence", id, result)
    }

    /// Materialize one transaction dated `now` from a template and move the
    /// template to the same day of the following month.
    pub fn apply_recurrence(&mut self, id: &str, now: NaiveDateTime) -> CoreResult<AppliedRecurrence> {
        let result = self.materialize_recurrence(id, now);
        self.finish("apply_recurrence", id, result)
    }

    fn store_recurrence(
        &mut self,
        id: Option<&str>,
        draft: RecurrenceDraft,
        now: NaiveDateTime,
    ) -> CoreResult<Recurrence> {
        validate_transfer(&draft.from, &draft.to)?;
        validate_amount(draft.amount, self.limits.max_amount)?;
        validate_day_of_month(draft.day_of_month)?;
        let max_description = self
            .limits
            .max_description_length
            .saturating_sub(RECURRING_SUFFIX.chars().count());
        if text_length(&draft.description) > max_description {
            return Err(CoreError::validation(format!(
                "description exceeds maximum length of {} characters",
                max_description
            )));
        }
        self.account(&draft.from)?;
        self.account(&draft.to)?;

        let next_date = match draft.next_date {
            Some(date) => date,
            None => recurrence::first_occurrence(now.date(), draft.day_of_month).ok_or_else(|| {
                CoreError::InternalError {
                    message: format!("no valid date for day {}", draft.day_of_month),
                }
            })?,
        };

        let id = match id {
            Some(id) => self.recurrence(id)?.id,
            None => self.allocate_recurrence_id(now)?,
        };

        let template = Recurrence {
            id,
            from: draft.from,
            to: draft.to,
            description: draft.description,
            amount: draft.amount,
            next_date,
            day_of_month: draft.day_of_month,
        };
        self.recurrences.upsert(&template)?;
        log::info!(target: "arthik::ledger", "Saved recurring template {} (next {})", template.id, template.next_date);
        Ok(template)
    }

    fn allocate_recurrence_id(&self, now: NaiveDateTime) -> CoreResult<String> {
        let taken: HashSet<String> = self.recurrences.list()?.into_iter().map(|r| r.id).collect();
        (0..60)
            .map(|offset| generate_recurrence_id(now + chrono::Duration::seconds(offset)))
            .find(|candidate| !taken.contains(candidate))
            .ok_or_else(|| CoreError::AlreadyExists {
                kind: "Recurrence".to_string(),
                key: generate_recurrence_id(now),
            })
    }

    fn materialize_recurrence(&mut self, id: &str, now: NaiveDateTime) -> CoreResult<AppliedRecurrence> {
        let template = self.recurrence(id)?;
        let next_date = recurrence::advance(template.next_date, template.day_of_month).ok_or_else(|| {
            CoreError::InternalError {
                message: format!("cannot advance {} past {}", template.id, template.next_date),
            }
        })?;

        let transaction = self.insert_transaction(recurrence::materialize(&template, now))?;

        let advanced = Recurrence {
            next_date,
            ..template
        };
        if let Err(e) = self.recurrences.upsert(&advanced) {
            // The money already moved; the template keeps its old date.
            self.report(&e.into(), "apply_recurrence");
        }
        log::info!(
            target: "arthik::ledger",
            "Applied recurring template {} as {} (next {})",
            advanced.id, transaction.id, advanced.next_date
        );
        Ok(AppliedRecurrence {
            transaction,
            recurrence: advanced,
        })
    }

    // ==================== Reports ====================

    /// Stored report history, oldest first
    pub fn reports(&self) -> CoreResult<Vec<Record>> {
        Ok(self.reports.load()?)
    }

    pub fn budget_report(&self, year: i32, month: u32) -> CoreResult<BudgetReport> {
        let transactions = self.month_transactions(year, month)?;
        Ok(reports::budget_report(self.accounts.all(), &transactions, year, month))
    }

    pub fn dashboard(&self, today: NaiveDate) -> CoreResult<Dashboard> {
        let transactions = self.month_transactions(today.year(), today.month())?;
        let history = self.reports.load()?;
        Ok(reports::dashboard(self.accounts.all(), &transactions, history, today))
    }

    fn month_transactions(&self, year: i32, month: u32) -> CoreResult<Vec<Transaction>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CoreError::validation(format!("invalid month {:04}-{:02}", year, month)))?;
        let period = self.transactions.period_of(first);
        Ok(self
            .transactions
            .load_period(&period)?
            .into_iter()
            .filter(|t| t.date().year() == year && t.date().month() == month)
            .collect())
    }

    // ==================== Audit ====================

    fn finish<T>(&self, action: &str, resource: &str, result: CoreResult<T>) -> CoreResult<T> {
        self.audit.record(&AuditEvent::new(action, resource, result.is_ok()));
        if let Err(ref e) = result {
            match e.severity() {
                ErrorSeverity::Error | ErrorSeverity::Critical => self.report(e, action),
                _ => log::debug!(target: "arthik::ledger", "{} rejected: {}", action, e),
            }
        }
        result
    }

    fn report(&self, error: &CoreError, operation: &str) {
        self.error_logger.log_error(error, &ErrorContext::new(operation));
    }
}
