//! Transaction routes - period listing, create, edit and remove
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{create_transaction, delete_transaction, list_transactions, update_transaction, TransactionRequest};
