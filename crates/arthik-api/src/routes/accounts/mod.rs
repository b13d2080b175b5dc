//! Account routes - list, create, edit and remove accounts
//!
//! Renaming an account through `PUT` carries the new name into every
//! transaction and recurring template that refers to it.

pub mod api;

pub use api::{create_account, delete_account, list_accounts, update_account, AccountRequest};
