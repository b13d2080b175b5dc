//! Utility functions and helpers

pub mod validation;

pub use validation::{
    parse_date, parse_time, resolve_timestamp, sanitize_input, text_length, validate_account_name,
    validate_amount, validate_budget, validate_day_of_month, validate_text, validate_transfer,
    ValidationError,
};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Format a money amount with thousands separators and two decimals
pub fn format_money(amount: &Decimal) -> String {
    let rounded = format!("{:.2}", amount.round_dp(2).abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::new();
    for (count, c) in integer.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let integer: String = grouped.chars().rev().collect();

    let sign = if amount.round_dp(2).is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, integer, fraction)
}

/// Recurrence template id: `REC` followed by the creation timestamp
pub fn generate_recurrence_id(now: NaiveDateTime) -> String {
    format!("REC{}", now.format("%Y%m%d%H%M%S"))
}

/// Percentage of `part` in `whole`, zero when `whole` is zero
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(&Decimal::new(123456789, 2)), "1,234,567.89");
        assert_eq!(format_money(&Decimal::new(-50, 0)), "-50.00");
        assert_eq!(format_money(&Decimal::new(999, 0)), "999.00");
        assert_eq!(format_money(&Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_generate_recurrence_id() {
        let now = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(8, 0, 1)
            .unwrap();
        assert_eq!(generate_recurrence_id(now), "REC20250115080001");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(Decimal::new(250, 0), Decimal::new(1000, 0)), Decimal::new(25, 0));
        assert_eq!(percentage(Decimal::ONE, Decimal::ZERO), Decimal::ZERO);
    }
}
