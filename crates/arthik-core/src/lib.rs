//! Ledger consistency and balance derivation
//!
//! Balances are kept up to date incrementally and are always re-derivable by
//! replaying the transaction history from opening balances. Reports are
//! regenerated from that history after every change.

pub mod audit;
pub mod balance;
pub mod error;
pub mod guard;
pub mod ledger;
pub mod recurrence;
pub mod reports;

pub use audit::{AuditEvent, AuditSink, FileAuditSink, LogAuditSink, MemoryAuditSink};
pub use balance::{BalanceDrift, Balances, Direction, Replay};
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger, ErrorSeverity};
pub use guard::{shared, spawn_periodic_recalculation, SharedLedger};
pub use ledger::{AccountDraft, AppliedRecurrence, Ledger, Recalculation, RecurrenceDraft, TransactionDraft};
pub use reports::{AssetShare, BudgetLine, BudgetReport, Dashboard, UpcomingBill, Urgency};

pub use arthik_store::{Account, AccountCategory, PeriodKey, Record, Recurrence, Transaction, TransactionId};
