//! Report routes - history, recalculation, dashboard and monthly budget

pub mod api;

pub use api::{budget, dashboard, list_reports, recalculate};
