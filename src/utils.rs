use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::constants::*;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// Fixed-width so that lexical order of stored timestamps equals time order
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()))
}

pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), DATE_FORMAT).ok()
}

pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Problem with a required free-text field, if any
pub fn check_required_text(value: &str, field_label: &str, max_length: usize) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} is required", field_label));
    }
    check_max_length(value.trim(), field_label, max_length)
}

pub fn check_max_length(value: &str, field_label: &str, max_length: usize) -> Option<String> {
    if value.chars().count() > max_length {
        return Some(format!(
            "{} may not be longer than {} characters",
            field_label, max_length
        ));
    }
    None
}

/// Parse a monetary amount from a JSON number or numeric string, rounded to
/// two decimal places and checked against the accepted range.
///
/// Numbers are read from their textual form so no binary float is involved.
pub fn parse_amount(value: &serde_json::Value) -> Result<Decimal, String> {
    let text = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Null => return Err("Amount is required".to_string()),
        _ => return Err("Amount must be a number".to_string()),
    };

    let parsed = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| "Amount must be a number".to_string())?;

    let mut amount = parsed.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(AMOUNT_SCALE);

    if amount < Decimal::new(MIN_AMOUNT_CENTS, AMOUNT_SCALE) {
        return Err("Amount must be at least 0.01".to_string());
    }
    if amount > Decimal::new(MAX_AMOUNT_CENTS, AMOUNT_SCALE) {
        return Err("Amount may not be greater than 999999999999.99".to_string());
    }

    Ok(amount)
}
