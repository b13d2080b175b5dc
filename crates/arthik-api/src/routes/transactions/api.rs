//! Transactions API endpoints
//!
//! Endpoints:
//! - list_transactions: newest first, whole history or one `?period=`
//! - create_transaction / update_transaction / delete_transaction

use crate::routes::now;
use crate::{ApiError, ApiResult, AppState};
use arthik_config::LimitsConfig;
use arthik_core::{CoreError, PeriodKey, Transaction, TransactionDraft, TransactionId};
use arthik_utils::{resolve_timestamp, validate_account_name, validate_text};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `POST /api/transactions` and `PUT /api/transactions/:id`.
/// A missing date or time is taken from the current clock.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    pub description: String,
    pub amount: Decimal,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl TransactionRequest {
    pub fn into_draft(self, limits: &LimitsConfig, now: NaiveDateTime) -> ApiResult<TransactionDraft> {
        Ok(TransactionDraft {
            from: validate_account_name(&self.from, limits.max_name_length)?,
            to: validate_account_name(&self.to, limits.max_name_length)?,
            description: validate_text("description", &self.description, limits.max_description_length)?,
            amount: self.amount,
            timestamp: resolve_timestamp(self.date.as_deref(), self.time.as_deref(), now)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PeriodFilter {
    /// `YYYY`, `YYYYMM` or `YYYY-MM`
    pub period: Option<String>,
}

/// Unknown and malformed ids are both reported as not found
fn parse_id(raw: &str) -> ApiResult<TransactionId> {
    raw.parse()
        .map_err(|_| ApiError::Core(CoreError::TransactionNotFound { id: raw.to_string() }))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<PeriodFilter>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let period = match filter.period.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(raw) => Some(raw.parse::<PeriodKey>().map_err(ApiError::bad_request)?),
        None => None,
    };
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.transactions(period)?))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<TransactionRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let draft = request.into_draft(&state.config.limits, now())?;
    let mut ledger = state.ledger.write().await;
    let transaction = ledger.create_transaction(draft)?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TransactionRequest>,
) -> ApiResult<Json<Transaction>> {
    let id = parse_id(&id)?;
    let draft = request.into_draft(&state.config.limits, now())?;
    let mut ledger = state.ledger.write().await;
    Ok(Json(ledger.update_transaction(&id, draft)?))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    let id = parse_id(&id)?;
    let mut ledger = state.ledger.write().await;
    Ok(Json(ledger.delete_transaction(&id)?))
}
