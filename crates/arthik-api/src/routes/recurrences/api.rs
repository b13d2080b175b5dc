//! Recurring template endpoints

use crate::routes::now;
use crate::{ApiResult, AppState};
use arthik_config::LimitsConfig;
use arthik_core::{AppliedRecurrence, Recurrence, RecurrenceDraft};
use arthik_utils::{parse_date, validate_account_name, validate_text};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `POST /api/recurrences`. With an `id` the template is replaced,
/// otherwise a new one is created.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceRequest {
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    pub description: String,
    pub amount: Decimal,
    pub day_of_month: u32,
    pub next_date: Option<String>,
}

impl RecurrenceRequest {
    pub fn into_draft(self, limits: &LimitsConfig) -> ApiResult<(Option<String>, RecurrenceDraft)> {
        let next_date = match self.next_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_date("next_date", raw)?),
            _ => None,
        };
        let draft = RecurrenceDraft {
            from: validate_account_name(&self.from, limits.max_name_length)?,
            to: validate_account_name(&self.to, limits.max_name_length)?,
            description: validate_text("description", &self.description, limits.max_description_length)?,
            amount: self.amount,
            day_of_month: self.day_of_month,
            next_date,
        };
        Ok((self.id.filter(|id| !id.trim().is_empty()), draft))
    }
}

pub async fn list_recurrences(State(state): State<AppState>) -> ApiResult<Json<Vec<Recurrence>>> {
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.recurrences()?))
}

pub async fn save_recurrence(
    State(state): State<AppState>,
    Json(request): Json<RecurrenceRequest>,
) -> ApiResult<(StatusCode, Json<Recurrence>)> {
    let (id, draft) = request.into_draft(&state.config.limits)?;
    let status = if id.is_some() { StatusCode::OK } else { StatusCode::CREATED };
    let mut ledger = state.ledger.write().await;
    let template = ledger.save_recurrence(id.as_deref(), draft, now())?;
    Ok((status, Json(template)))
}

pub async fn delete_recurrence(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut ledger = state.ledger.write().await;
    ledger.delete_recurrence(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Materialize one transaction now and advance the template a month
pub async fn apply_recurrence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AppliedRecurrence>> {
    let mut ledger = state.ledger.write().await;
    Ok(Json(ledger.apply_recurrence(&id, now())?))
}
