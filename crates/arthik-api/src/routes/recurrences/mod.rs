//! Recurring template routes

pub mod api;

pub use api::{apply_recurrence, delete_recurrence, list_recurrences, save_recurrence, RecurrenceRequest};
