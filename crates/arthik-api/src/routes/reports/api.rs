//! Report endpoints

use crate::{ApiError, ApiResult, AppState};
use arthik_core::{BudgetReport, Dashboard, Recalculation, Record};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

pub async fn list_reports(State(state): State<AppState>) -> ApiResult<Json<Vec<Record>>> {
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.reports()?))
}

/// Rebuild every balance and the report history from the ledger
pub async fn recalculate(State(state): State<AppState>) -> ApiResult<Json<Recalculation>> {
    let mut ledger = state.ledger.write().await;
    Ok(Json(ledger.recalculate_all()?))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<Dashboard>> {
    let today = crate::routes::now().date();
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.dashboard(today)?))
}

#[derive(Debug, Deserialize)]
pub struct MonthFilter {
    /// `YYYY-MM`, defaults to the current month
    pub month: Option<String>,
}

fn parse_month(raw: &str) -> ApiResult<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("invalid month '{}', expected YYYY-MM", raw)))?;
    Ok((first.year(), first.month()))
}

pub async fn budget(
    State(state): State<AppState>,
    Query(filter): Query<MonthFilter>,
) -> ApiResult<Json<BudgetReport>> {
    let (year, month) = match filter.month.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => {
            let today = crate::routes::now().date();
            (today.year(), today.month())
        }
    };
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.budget_report(year, month)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-02").unwrap(), (2025, 2));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("202502").is_err());
    }
}
