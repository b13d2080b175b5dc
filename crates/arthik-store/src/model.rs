//! Persisted entities

use crate::table::{
    field, format_bool, format_date, format_decimal, parse_bool, parse_date, parse_decimal,
    parse_optional_date, CsvRecord,
};
use crate::types::{AccountCategory, TransactionId};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named bucket of value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub category: AccountCategory,
    /// Only Assets and Liabilities accounts with this flag feed net worth
    pub include_in_net_worth: bool,
    /// Current derived balance
    pub balance: Decimal,
    /// Balance the account had before any recorded transaction
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Monthly budget, meaningful for Expenses accounts
    #[serde(default)]
    pub budget: Decimal,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_payment_date: Option<NaiveDate>,
    /// Keeps the account out of expense totals
    #[serde(default)]
    pub exclude_from_expense_rollup: bool,
}

impl Account {
    pub fn new(name: impl Into<String>, category: AccountCategory, include_in_net_worth: bool) -> Self {
        Self {
            name: name.into(),
            category,
            include_in_net_worth,
            balance: Decimal::ZERO,
            opening_balance: Decimal::ZERO,
            budget: Decimal::ZERO,
            due_date: None,
            last_payment_date: None,
            exclude_from_expense_rollup: false,
        }
    }

    pub fn with_opening_balance(mut self, amount: Decimal) -> Self {
        self.opening_balance = amount;
        self.balance = amount;
        self
    }

    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.budget = budget;
        self
    }

    pub fn counts_toward_net_worth(&self) -> bool {
        self.include_in_net_worth && self.category.is_balance_sheet()
    }
}

impl CsvRecord for Account {
    const HEADER: &'static [&'static str] = &[
        "name",
        "category",
        "include_in_net_worth",
        "balance",
        "opening_balance",
        "budget",
        "due_date",
        "last_payment_date",
        "exclude_from_expense_rollup",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.to_string(),
            format_bool(self.include_in_net_worth),
            format_decimal(&self.balance),
            format_decimal(&self.opening_balance),
            format_decimal(&self.budget),
            format_date(&self.due_date),
            format_date(&self.last_payment_date),
            format_bool(self.exclude_from_expense_rollup),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Result<Self, String> {
        let optional = |index: usize| row.get(index).unwrap_or("");

        let name = field(row, 0, "name")?.to_string();
        if name.is_empty() {
            return Err("empty account name".to_string());
        }
        let category = field(row, 1, "category")?.parse::<AccountCategory>()?;
        let include_in_net_worth = parse_bool(field(row, 2, "include_in_net_worth")?, "include_in_net_worth")?;
        let balance = parse_decimal(field(row, 3, "balance")?, "balance")?;

        Ok(Account {
            name,
            category,
            include_in_net_worth,
            balance,
            opening_balance: parse_decimal(optional(4), "opening_balance")?,
            budget: parse_decimal(optional(5), "budget")?,
            due_date: parse_optional_date(optional(6), "due_date")?,
            last_payment_date: parse_optional_date(optional(7), "last_payment_date")?,
            exclude_from_expense_rollup: parse_bool(optional(8), "exclude_from_expense_rollup")?,
        })
    }
}

/// A transfer of a positive amount from one account to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub from: String,
    pub to: String,
    pub description: String,
    pub amount: Decimal,
}

impl Transaction {
    pub fn date(&self) -> NaiveDate {
        self.id.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.id.time()
    }

    pub fn touches(&self, account: &str) -> bool {
        self.from == account || self.to == account
    }
}

impl CsvRecord for Transaction {
    const HEADER: &'static [&'static str] = &["id", "from", "to", "description", "amount"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.from.clone(),
            self.to.clone(),
            self.description.clone(),
            format_decimal(&self.amount),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Result<Self, String> {
        Ok(Transaction {
            id: field(row, 0, "id")?.parse()?,
            from: field(row, 1, "from")?.to_string(),
            to: field(row, 2, "to")?.to_string(),
            description: field(row, 3, "description")?.to_string(),
            amount: parse_decimal(field(row, 4, "amount")?, "amount")?,
        })
    }
}

/// A monthly template that materializes into transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub id: String,
    pub from: String,
    pub to: String,
    pub description: String,
    pub amount: Decimal,
    pub next_date: NaiveDate,
    pub day_of_month: u32,
}

impl CsvRecord for Recurrence {
    const HEADER: &'static [&'static str] = &[
        "id",
        "from",
        "to",
        "description",
        "amount",
        "next_date",
        "day_of_month",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.from.clone(),
            self.to.clone(),
            self.description.clone(),
            format_decimal(&self.amount),
            self.next_date.format("%Y-%m-%d").to_string(),
            self.day_of_month.to_string(),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Result<Self, String> {
        let raw_day = field(row, 6, "day_of_month")?;
        let day_of_month = raw_day
            .parse::<u32>()
            .map_err(|e| format!("invalid day_of_month '{}': {}", raw_day, e))?;
        Ok(Recurrence {
            id: field(row, 0, "id")?.to_string(),
            from: field(row, 1, "from")?.to_string(),
            to: field(row, 2, "to")?.to_string(),
            description: field(row, 3, "description")?.to_string(),
            amount: parse_decimal(field(row, 4, "amount")?, "amount")?,
            next_date: parse_date(field(row, 5, "next_date")?, "next_date")?,
            day_of_month,
        })
    }
}

/// One point of the net-worth history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub net_worth: Decimal,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub expenses: Decimal,
}

impl CsvRecord for Record {
    const HEADER: &'static [&'static str] = &["date", "net_worth", "assets", "liabilities", "expenses"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            format_decimal(&self.net_worth),
            format_decimal(&self.assets),
            format_decimal(&self.liabilities),
            format_decimal(&self.expenses),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Result<Self, String> {
        Ok(Record {
            date: parse_date(field(row, 0, "date")?, "date")?,
            net_worth: parse_decimal(field(row, 1, "net_worth")?, "net_worth")?,
            assets: parse_decimal(field(row, 2, "assets")?, "assets")?,
            liabilities: parse_decimal(field(row, 3, "liabilities")?, "liabilities")?,
            expenses: parse_decimal(field(row, 4, "expenses")?, "expenses")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_account_row_accepts_short_legacy_rows() {
        let account = Account::from_row(&record(&["Cash", "ASSET", "yes", "1000"])).unwrap();
        assert_eq!(account.category, AccountCategory::Assets);
        assert!(account.include_in_net_worth);
        assert_eq!(account.balance, Decimal::new(1000, 0));
        assert_eq!(account.opening_balance, Decimal::ZERO);
        assert_eq!(account.due_date, None);
    }

    #[test]
    fn test_account_row_layout() {
        let mut account = Account::new("Credit Card", AccountCategory::Liabilities, true)
            .with_opening_balance(Decimal::new(-25050, 2));
        account.due_date = NaiveDate::from_ymd_opt(2025, 2, 10);
        assert_eq!(
            account.to_row(),
            vec!["Credit Card", "Liabilities", "yes", "-250.50", "-250.50", "0.00", "2025-02-10", "", "no"]
        );
        assert!(account.counts_toward_net_worth());
    }

    #[test]
    fn test_account_row_rejects_bad_category() {
        let err = Account::from_row(&record(&["Cash", "Stocks", "yes", "0"])).unwrap_err();
        assert!(err.contains("Stocks"));
    }

    #[test]
    fn test_revenue_never_counts_toward_net_worth() {
        let account = Account::new("Salary", AccountCategory::Revenue, true);
        assert!(!account.counts_toward_net_worth());
    }

    #[test]
    fn test_transaction_row() {
        let tx = Transaction::from_row(&record(&["TRAN20250115090000", "Cash", "Food", "Lunch", "50"])).unwrap();
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(tx.to_row()[4], "50.00");
        assert!(tx.touches("Food"));
        assert!(!tx.touches("Bank"));
    }

    #[test]
    fn test_recurrence_row_rejects_bad_day() {
        let err = Recurrence::from_row(&record(&[
            "REC1", "Bank", "Rent", "Rent", "900", "2025-02-01", "first",
        ]))
        .unwrap_err();
        assert!(err.contains("day_of_month"));
    }
}
