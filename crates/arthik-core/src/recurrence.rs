//! Recurrence scheduling: month arithmetic and template materialization

use crate::ledger::TransactionDraft;
use arthik_store::Recurrence;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Suffix appended to the description of materialized transactions
pub const RECURRING_SUFFIX: &str = " (Recurring)";

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// `day` of the given month, clamped to the month's last day
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last.day()))
}

/// `day_of_month` in the month after `date`'s month
pub fn advance(date: NaiveDate, day_of_month: u32) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    clamped_date(year, month, day_of_month)
}

/// First date on or after `today` that falls on `day_of_month`
pub fn first_occurrence(today: NaiveDate, day_of_month: u32) -> Option<NaiveDate> {
    let this_month = clamped_date(today.year(), today.month(), day_of_month)?;
    if this_month >= today {
        Some(this_month)
    } else {
        advance(today, day_of_month)
    }
}

/// The transaction a template produces when applied at `now`
pub fn materialize(recurrence: &Recurrence, now: NaiveDateTime) -> TransactionDraft {
    TransactionDraft {
        from: recurrence.from.clone(),
        to: recurrence.to.clone(),
        description: format!("{}{}", recurrence.description, RECURRING_SUFFIX),
        amount: recurrence.amount,
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(last_day_of_month(2025, 2), Some(date(2025, 2, 28)));
        assert_eq!(last_day_of_month(2025, 12), Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_advance_keeps_day_of_month() {
        assert_eq!(advance(date(2025, 1, 15), 15), Some(date(2025, 2, 15)));
        assert_eq!(advance(date(2025, 12, 15), 15), Some(date(2026, 1, 15)));
    }

    #[test]
    fn test_advance_clamps_to_month_end() {
        assert_eq!(advance(date(2025, 1, 31), 31), Some(date(2025, 2, 28)));
        assert_eq!(advance(date(2024, 1, 31), 31), Some(date(2024, 2, 29)));
        // The template day survives a short month.
        assert_eq!(advance(date(2025, 2, 28), 31), Some(date(2025, 3, 31)));
        assert_eq!(advance(date(2025, 3, 31), 31), Some(date(2025, 4, 30)));
    }

    #[test]
    fn test_first_occurrence() {
        assert_eq!(first_occurrence(date(2025, 1, 10), 15), Some(date(2025, 1, 15)));
        assert_eq!(first_occurrence(date(2025, 1, 15), 15), Some(date(2025, 1, 15)));
        assert_eq!(first_occurrence(date(2025, 1, 20), 15), Some(date(2025, 2, 15)));
        assert_eq!(first_occurrence(date(2025, 2, 1), 31), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_materialize_marks_description() {
        let template = Recurrence {
            id: "REC20250101000000".to_string(),
            from: "Bank".to_string(),
            to: "Rent".to_string(),
            description: "Rent".to_string(),
            amount: Decimal::new(900, 0),
            next_date: date(2025, 1, 15),
            day_of_month: 15,
        };
        let now = date(2025, 1, 16).and_hms_opt(10, 0, 0).unwrap();
        let draft = materialize(&template, now);
        assert_eq!(draft.description, "Rent (Recurring)");
        assert_eq!(draft.timestamp, now);
        assert_eq!(draft.amount, Decimal::new(900, 0));
    }
}
