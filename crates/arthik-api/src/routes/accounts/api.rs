//! Accounts API endpoints

use crate::{ApiError, ApiResult, AppState};
use arthik_config::LimitsConfig;
use arthik_core::{Account, AccountCategory, AccountDraft};
use arthik_utils::{parse_date, sanitize_input, validate_account_name};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `POST /api/accounts` and `PUT /api/accounts/:name`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRequest {
    pub name: String,
    pub category: String,
    /// Defaults to true for Assets and Liabilities
    pub include_in_net_worth: Option<bool>,
    #[serde(default)]
    pub opening_balance: Decimal,
    #[serde(default)]
    pub budget: Decimal,
    pub due_date: Option<String>,
    pub last_payment_date: Option<String>,
    #[serde(default)]
    pub exclude_from_expense_rollup: bool,
}

impl AccountRequest {
    pub fn into_draft(self, limits: &LimitsConfig) -> ApiResult<AccountDraft> {
        let name = validate_account_name(&self.name, limits.max_name_length)?;
        let category: AccountCategory = self.category.parse().map_err(ApiError::bad_request)?;
        let optional_date = |field: &'static str, value: &Option<String>| match value.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_date(field, raw).map(Some),
            _ => Ok(None),
        };

        Ok(AccountDraft {
            name,
            category,
            include_in_net_worth: self.include_in_net_worth.unwrap_or_else(|| category.is_balance_sheet()),
            opening_balance: self.opening_balance,
            budget: self.budget,
            due_date: optional_date("due_date", &self.due_date)?,
            last_payment_date: optional_date("last_payment_date", &self.last_payment_date)?,
            exclude_from_expense_rollup: self.exclude_from_expense_rollup,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountFilter {
    pub category: Option<String>,
}

/// List accounts, optionally restricted to one category
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(filter): Query<AccountFilter>,
) -> ApiResult<Json<Vec<Account>>> {
    let ledger = state.ledger.read().await;
    let accounts = match filter.category.as_deref() {
        Some(raw) => {
            let category: AccountCategory = raw.parse().map_err(ApiError::bad_request)?;
            ledger.accounts_by_category(category).into_iter().cloned().collect()
        }
        None => ledger.accounts().to_vec(),
    };
    Ok(Json(accounts))
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<AccountRequest>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let draft = request.into_draft(&state.config.limits)?;
    let mut ledger = state.ledger.write().await;
    let account = ledger.create_account(draft)?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// The path carries the name as typed, so it is sanitized like stored names
pub async fn update_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<AccountRequest>,
) -> ApiResult<Json<Account>> {
    let draft = request.into_draft(&state.config.limits)?;
    let mut ledger = state.ledger.write().await;
    Ok(Json(ledger.update_account(&sanitize_input(&name), draft)?))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Account>> {
    let mut ledger = state.ledger.write().await;
    Ok(Json(ledger.delete_account(&sanitize_input(&name))?))
}
