//! CSV persistence for the ledger
//!
//! Accounts, partitioned transaction files, recurrence templates and the
//! net-worth history, each as a headered CSV table rewritten whole on change.

pub mod accounts;
pub mod error;
pub mod ledger;
pub mod model;
pub mod recurrences;
pub mod reports;
pub mod table;
pub mod types;

pub use accounts::AccountStore;
pub use error::{StoreError, StoreResult};
pub use ledger::LedgerStore;
pub use model::{Account, Record, Recurrence, Transaction};
pub use recurrences::RecurrenceStore;
pub use reports::ReportStore;
pub use table::CsvRecord;
pub use types::{AccountCategory, PeriodKey, TransactionId};
