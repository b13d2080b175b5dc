//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints and their request bodies

pub mod accounts;
pub mod recurrences;
pub mod reports;
pub mod transactions;

/// Current local wall-clock time, the default timestamp for new entries
pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
