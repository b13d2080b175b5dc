//! Report generation: net-worth snapshots, budgets and the dashboard

use crate::balance::{self, Balances, Direction};
use crate::recurrence::last_day_of_month;
use arthik_config::ReportGranularity;
use arthik_store::{Account, AccountCategory, Record, Transaction};
use arthik_utils::percentage;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Days ahead in which a liability due date counts as upcoming
pub const UPCOMING_BILL_WINDOW_DAYS: i64 = 30;

/// Key date of the report row a transaction date belongs to
pub fn period_date(date: NaiveDate, granularity: ReportGranularity) -> NaiveDate {
    match granularity {
        ReportGranularity::Daily => date,
        ReportGranularity::Monthly => last_day_of_month(date.year(), date.month()).unwrap_or(date),
    }
}

/// Included assets and included liabilities, liabilities signed
fn balance_sheet(accounts: &[Account], balances: &Balances) -> (Decimal, Decimal) {
    let mut assets = Decimal::ZERO;
    let mut liabilities = Decimal::ZERO;
    for account in accounts.iter().filter(|a| a.counts_toward_net_worth()) {
        let value = balances.get(&account.name).copied().unwrap_or(account.balance);
        match account.category {
            AccountCategory::Assets => assets += value,
            AccountCategory::Liabilities => liabilities += value,
            _ => {}
        }
    }
    (assets, liabilities)
}

/// Sum of transfers into Expenses accounts that are not excluded from the rollup
pub fn expense_total(accounts: &[Account], transactions: &[Transaction]) -> Decimal {
    let expense_accounts: HashMap<&str, &Account> = accounts
        .iter()
        .filter(|a| a.category == AccountCategory::Expenses && !a.exclude_from_expense_rollup)
        .map(|a| (a.name.as_str(), a))
        .collect();
    transactions
        .iter()
        .filter(|t| expense_accounts.contains_key(t.to.as_str()))
        .map(|t| t.amount)
        .sum()
}

/// Sum of transfers out of Revenue accounts
pub fn income_total(accounts: &[Account], transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| {
            accounts
                .iter()
                .any(|a| a.name == t.from && a.category == AccountCategory::Revenue)
        })
        .map(|t| t.amount)
        .sum()
}

fn snapshot_with(
    date: NaiveDate,
    accounts: &[Account],
    balances: &Balances,
    period_transactions: &[Transaction],
) -> Record {
    let (assets, liabilities) = balance_sheet(accounts, balances);
    Record {
        date,
        net_worth: assets + liabilities,
        assets,
        liabilities,
        expenses: expense_total(accounts, period_transactions),
    }
}

/// One report row from the accounts' current balances
pub fn snapshot(date: NaiveDate, accounts: &[Account], period_transactions: &[Transaction]) -> Record {
    snapshot_with(date, accounts, &balance::current_balances(accounts), period_transactions)
}

/// Replay the whole history from opening balances and emit one row per
/// period. Each row reflects every transaction up to the end of its period.
pub fn progressive(
    accounts: &[Account],
    history: &[Transaction],
    granularity: ReportGranularity,
) -> Vec<Record> {
    let mut ordered = history.to_vec();
    balance::sort_for_replay(&mut ordered);

    let mut balances = balance::opening_balances(accounts);
    let mut records = Vec::new();
    let mut start = 0;
    while start < ordered.len() {
        let key = period_date(ordered[start].date(), granularity);
        let end = ordered[start..]
            .iter()
            .position(|t| period_date(t.date(), granularity) != key)
            .map_or(ordered.len(), |offset| start + offset);

        let group = &ordered[start..end];
        for tx in group {
            balance::shift(&mut balances, tx, Direction::Apply);
        }
        records.push(snapshot_with(key, accounts, &balances, group));
        start = end;
    }
    records
}

/// Budget against spending for one Expenses account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub account: String,
    pub budget: Decimal,
    pub actual: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// `YYYY-MM`
    pub month: String,
    pub lines: Vec<BudgetLine>,
    pub total_budget: Decimal,
    pub total_actual: Decimal,
    pub total_remaining: Decimal,
}

/// Budget versus actual for every Expenses account that takes part in the rollup.
/// `month_transactions` must already be restricted to the month.
pub fn budget_report(
    accounts: &[Account],
    month_transactions: &[Transaction],
    year: i32,
    month: u32,
) -> BudgetReport {
    let lines: Vec<BudgetLine> = accounts
        .iter()
        .filter(|a| a.category == AccountCategory::Expenses && !a.exclude_from_expense_rollup)
        .map(|a| {
            let actual: Decimal = month_transactions
                .iter()
                .filter(|t| t.to == a.name)
                .map(|t| t.amount)
                .sum();
            BudgetLine {
                account: a.name.clone(),
                budget: a.budget,
                actual,
                remaining: a.budget - actual,
                percent_used: percentage(actual, a.budget),
            }
        })
        .collect();

    let total_budget: Decimal = lines.iter().map(|l| l.budget).sum();
    let total_actual: Decimal = lines.iter().map(|l| l.actual).sum();
    BudgetReport {
        month: format!("{:04}-{:02}", year, month),
        lines,
        total_budget,
        total_actual,
        total_remaining: total_budget - total_actual,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Normal,
}

impl Urgency {
    pub fn for_days_left(days: i64) -> Self {
        if days < 3 {
            Urgency::High
        } else if days < 7 {
            Urgency::Medium
        } else {
            Urgency::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBill {
    pub account: String,
    pub due_date: NaiveDate,
    /// Amount owed, positive
    pub amount: Decimal,
    pub days_left: i64,
    pub urgency: Urgency,
}

/// Liabilities due within the next thirty days, soonest first
pub fn upcoming_bills(accounts: &[Account], today: NaiveDate) -> Vec<UpcomingBill> {
    let mut bills: Vec<UpcomingBill> = accounts
        .iter()
        .filter(|a| a.category == AccountCategory::Liabilities)
        .filter_map(|a| {
            let due_date = a.due_date?;
            let days_left = (due_date - today).num_days();
            if !(0..=UPCOMING_BILL_WINDOW_DAYS).contains(&days_left) {
                return None;
            }
            Some(UpcomingBill {
                account: a.name.clone(),
                due_date,
                amount: a.balance.abs(),
                days_left,
                urgency: Urgency::for_days_left(days_left),
            })
        })
        .collect();
    bills.sort_by(|a, b| a.days_left.cmp(&b.days_left).then_with(|| a.account.cmp(&b.account)));
    bills
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetShare {
    pub account: String,
    pub balance: Decimal,
}

/// Summary for the landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub net_worth: Decimal,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub month_income: Decimal,
    pub month_expenses: Decimal,
    pub month_savings: Decimal,
    pub savings_rate: Decimal,
    pub budget: BudgetReport,
    pub upcoming_bills: Vec<UpcomingBill>,
    pub asset_distribution: Vec<AssetShare>,
    pub history: Vec<Record>,
}

pub fn dashboard(
    accounts: &[Account],
    month_transactions: &[Transaction],
    history: Vec<Record>,
    today: NaiveDate,
) -> Dashboard {
    let (assets, liabilities) = balance_sheet(accounts, &balance::current_balances(accounts));
    let month_income = income_total(accounts, month_transactions);
    let month_expenses = expense_total(accounts, month_transactions);
    let month_savings = month_income - month_expenses;

    let asset_distribution = accounts
        .iter()
        .filter(|a| a.category == AccountCategory::Assets && a.balance > Decimal::ZERO)
        .map(|a| AssetShare {
            account: a.name.clone(),
            balance: a.balance,
        })
        .collect();

    Dashboard {
        date: today,
        net_worth: assets + liabilities,
        assets,
        liabilities,
        month_income,
        month_expenses,
        month_savings,
        savings_rate: percentage(month_savings, month_income),
        budget: budget_report(accounts, month_transactions, today.year(), today.month()),
        upcoming_bills: upcoming_bills(accounts, today),
        asset_distribution,
        history,
    }
}
