//! Input validation and sanitization for values entering the ledger

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("valid control character pattern")
});

static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)(?::([0-5]\d))?$").expect("valid time pattern")
});

/// Validation failure, carrying the offending field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::Invalid { field, .. } => field,
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Trim, drop control characters and escape HTML-significant characters
pub fn sanitize_input(input: &str) -> String {
    let stripped = CONTROL_CHARS.replace_all(input.trim(), "");
    let mut escaped = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const ESCAPES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&#34;", "&#39;"];

/// Length in characters of a sanitized value as it was before escaping
pub fn text_length(sanitized: &str) -> usize {
    let mut count = 0;
    let mut rest = sanitized;
    while let Some(c) = rest.chars().next() {
        let step = ESCAPES
            .iter()
            .find(|entity| rest.starts_with(*entity))
            .map_or(c.len_utf8(), |entity| entity.len());
        rest = &rest[step..];
        count += 1;
    }
    count
}

/// Sanitize and enforce a length bound counted in characters before escaping
pub fn validate_text(field: &'static str, input: &str, max_len: usize) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max_len {
        return Err(ValidationError::TooLong { field, max: max_len });
    }
    Ok(sanitize_input(trimmed))
}

pub fn validate_account_name(name: &str, max_len: usize) -> Result<String, ValidationError> {
    validate_text("name", name, max_len)
}

/// Amounts are strictly positive, bounded, and carry at most two decimal places
pub fn validate_amount(amount: Decimal, max: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::invalid("amount", "must be greater than zero"));
    }
    if amount > max {
        return Err(ValidationError::invalid("amount", format!("exceeds maximum of {}", max)));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::invalid("amount", "at most two decimal places"));
    }
    Ok(amount)
}

/// Budgets may be zero but never negative
pub fn validate_budget(budget: Decimal, max: Decimal) -> Result<Decimal, ValidationError> {
    if budget < Decimal::ZERO {
        return Err(ValidationError::invalid("budget", "cannot be negative"));
    }
    if budget > max {
        return Err(ValidationError::invalid("budget", format!("exceeds maximum of {}", max)));
    }
    Ok(budget)
}

pub fn validate_day_of_month(day: u32) -> Result<u32, ValidationError> {
    if !(1..=31).contains(&day) {
        return Err(ValidationError::invalid("day_of_month", "must be between 1 and 31"));
    }
    Ok(day)
}

/// Source and destination must both be present and differ
pub fn validate_transfer(from: &str, to: &str) -> Result<(), ValidationError> {
    if from.trim().is_empty() {
        return Err(ValidationError::Required { field: "from" });
    }
    if to.trim().is_empty() {
        return Err(ValidationError::Required { field: "to" });
    }
    if from.trim() == to.trim() {
        return Err(ValidationError::invalid("to", "from and to accounts must be different"));
    }
    Ok(())
}

/// `YYYY-MM-DD`
pub fn parse_date(field: &'static str, input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| ValidationError::invalid(field, format!("expected YYYY-MM-DD ({})", e)))
}

/// `HH:MM` or `HH:MM:SS`
pub fn parse_time(field: &'static str, input: &str) -> Result<NaiveTime, ValidationError> {
    let caps = TIME_OF_DAY
        .captures(input.trim())
        .ok_or_else(|| ValidationError::invalid(field, "expected HH:MM or HH:MM:SS"))?;
    let number = |i: usize| caps.get(i).map_or(Ok(0), |m| m.as_str().parse::<u32>());
    let (h, m, s) = match (number(1), number(2), number(3)) {
        (Ok(h), Ok(m), Ok(s)) => (h, m, s),
        _ => return Err(ValidationError::invalid(field, "expected HH:MM or HH:MM:SS")),
    };
    NaiveTime::from_hms_opt(h, m, s).ok_or_else(|| ValidationError::invalid(field, "time out of range"))
}

/// Combine an optional date and time; a missing part is taken from `now`
pub fn resolve_timestamp(
    date: Option<&str>,
    time: Option<&str>,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, ValidationError> {
    let date = match date.filter(|d| !d.trim().is_empty()) {
        Some(d) => parse_date("date", d)?,
        None => now.date(),
    };
    let time = match time.filter(|t| !t.trim().is_empty()) {
        Some(t) => parse_time("time", t)?,
        None => now.time(),
    };
    Ok(date.and_time(time))
}
