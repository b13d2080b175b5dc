//! Value types shared by every table

use arthik_config::PartitionScheme;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Account category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountCategory {
    /// Cash, bank, investments
    Assets,
    /// Credit cards, loans
    Liabilities,
    /// Owner's equity, opening balances
    Equity,
    /// Salary, dividends
    Revenue,
    /// Food, transport
    Expenses,
}

impl AccountCategory {
    pub const ALL: [AccountCategory; 5] = [
        AccountCategory::Assets,
        AccountCategory::Liabilities,
        AccountCategory::Equity,
        AccountCategory::Revenue,
        AccountCategory::Expenses,
    ];

    /// Whether balances of this category feed net worth when the account opts in
    pub fn is_balance_sheet(&self) -> bool {
        matches!(self, AccountCategory::Assets | AccountCategory::Liabilities)
    }
}

impl std::str::FromStr for AccountCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assets" | "asset" => Ok(AccountCategory::Assets),
            "liabilities" | "liability" => Ok(AccountCategory::Liabilities),
            "equity" => Ok(AccountCategory::Equity),
            "revenue" | "income" => Ok(AccountCategory::Revenue),
            "expenses" | "expense" => Ok(AccountCategory::Expenses),
            _ => Err(format!("Invalid account category: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountCategory::Assets => write!(f, "Assets"),
            AccountCategory::Liabilities => write!(f, "Liabilities"),
            AccountCategory::Equity => write!(f, "Equity"),
            AccountCategory::Revenue => write!(f, "Revenue"),
            AccountCategory::Expenses => write!(f, "Expenses"),
        }
    }
}

const TRANSACTION_PREFIX: &str = "TRAN";
const ID_FORMAT: &str = "%Y%m%d%H%M%S";
const LEGACY_ID_FORMAT: &str = "%d%m%y%H%M%S";

/// Transaction identifier: `TRAN` followed by the transaction timestamp.
///
/// The id is the only place the timestamp is stored, so ordering ids orders
/// transactions by date and then time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TransactionId(NaiveDateTime);

impl TransactionId {
    /// Build an id from a timestamp, dropping sub-second precision
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        let truncated = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        TransactionId(truncated)
    }

    pub fn from_parts(date: NaiveDate, time: NaiveTime) -> Self {
        Self::from_timestamp(date.and_time(time))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    /// The same id moved forward by `seconds`
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        TransactionId(self.0 + chrono::Duration::seconds(seconds))
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", TRANSACTION_PREFIX, self.0.format(ID_FORMAT))
    }
}

impl std::str::FromStr for TransactionId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(TRANSACTION_PREFIX)
            .ok_or_else(|| format!("Invalid transaction id: {}", s))?;
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid transaction id: {}", s));
        }
        // Older files carry a two-digit-year day-first encoding.
        let format = match digits.len() {
            14 => ID_FORMAT,
            12 => LEGACY_ID_FORMAT,
            _ => return Err(format!("Invalid transaction id: {}", s)),
        };
        NaiveDateTime::parse_from_str(digits, format)
            .map(TransactionId)
            .map_err(|e| format!("Invalid transaction id {}: {}", s, e))
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TransactionId {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Key of one ledger partition file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Year { year: i32 },
    Month { year: i32, month: u32 },
}

const FILE_PREFIX: &str = "transactions_";
const FILE_SUFFIX: &str = ".csv";

impl PeriodKey {
    pub fn for_date(scheme: PartitionScheme, date: NaiveDate) -> Self {
        match scheme {
            PartitionScheme::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
            PartitionScheme::Year => PeriodKey::Year { year: date.year() },
        }
    }

    pub fn scheme(&self) -> PartitionScheme {
        match self {
            PeriodKey::Year { .. } => PartitionScheme::Year,
            PeriodKey::Month { .. } => PartitionScheme::Month,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}{}", FILE_PREFIX, self, FILE_SUFFIX)
    }

    /// Glob matching every partition file of a scheme
    pub fn file_pattern(scheme: PartitionScheme) -> String {
        let digits = match scheme {
            PartitionScheme::Month => 6,
            PartitionScheme::Year => 4,
        };
        format!("{}{}{}", FILE_PREFIX, "[0-9]".repeat(digits), FILE_SUFFIX)
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        name.strip_prefix(FILE_PREFIX)?
            .strip_suffix(FILE_SUFFIX)?
            .parse()
            .ok()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            PeriodKey::Year { year } => date.year() == year,
            PeriodKey::Month { year, month } => date.year() == year && date.month() == month,
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodKey::Year { year } => write!(f, "{:04}", year),
            PeriodKey::Month { year, month } => write!(f, "{:04}{:02}", year, month),
        }
    }
}

impl std::str::FromStr for PeriodKey {
    type Err = String;
    /// Accepts `YYYY`, `YYYYMM` and `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.trim().chars().filter(|c| *c != '-').collect();
        if !compact.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid period: {}", s));
        }
        let year = compact
            .get(0..4)
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(|| format!("Invalid period: {}", s))?;
        match compact.len() {
            4 => Ok(PeriodKey::Year { year }),
            6 => {
                let month: u32 = compact[4..6]
                    .parse()
                    .map_err(|_| format!("Invalid period: {}", s))?;
                if !(1..=12).contains(&month) {
                    return Err(format!("Invalid month in period: {}", s));
                }
                Ok(PeriodKey::Month { year, month })
            }
            _ => Err(format!("Invalid period: {}", s)),
        }
    }
}
