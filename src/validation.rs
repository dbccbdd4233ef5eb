use time::Date;

use crate::constants::*;
use crate::error::{AppError, FieldErrors};
use crate::models::{CreateDebtPayload, DebtChanges, DebtStatus, NewDebt, UpdateDebtPayload};
use crate::utils::{check_max_length, check_required_text, parse_amount, parse_date};

/// Whether an update replaces the whole debt (`PUT`) or only the fields sent (`PATCH`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Full,
    Partial,
}

#[derive(Default)]
struct Collector {
    fields: FieldErrors,
}

impl Collector {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, AppError> {
        if self.fields.is_empty() {
            Ok(value())
        } else {
            Err(AppError::Validation(self.fields))
        }
    }
}

/// The string inside `raw`, or a field error when the JSON value is not a string
fn read_text<'v>(
    errors: &mut Collector,
    field: &str,
    label: &str,
    raw: &'v serde_json::Value,
) -> Option<&'v str> {
    match raw {
        serde_json::Value::String(text) => Some(text),
        _ => {
            errors.push(field, format!("{} must be a string", label));
            None
        }
    }
}

fn read_lender_name(errors: &mut Collector, raw: &str) -> Option<String> {
    match check_required_text(raw, "Lender name", MAX_LENDER_NAME_LENGTH) {
        Some(message) => {
            errors.push("lender_name", message);
            None
        }
        None => Some(raw.trim().to_string()),
    }
}

fn read_amount(errors: &mut Collector, raw: &serde_json::Value) -> Option<rust_decimal::Decimal> {
    match parse_amount(raw) {
        Ok(amount) => Some(amount),
        Err(message) => {
            errors.push("amount", message);
            None
        }
    }
}

fn read_due_date(errors: &mut Collector, raw: &str) -> Option<Date> {
    if raw.trim().is_empty() {
        errors.push("due_date", "Due date is required");
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.push("due_date", "Due date must be a valid date (YYYY-MM-DD)");
    }
    parsed
}

fn read_status(errors: &mut Collector, raw: &str) -> Option<DebtStatus> {
    let parsed = DebtStatus::parse(raw);
    if parsed.is_none() {
        errors.push("status", "Status must be one of: unpaid, paid");
    }
    parsed
}

/// Blank descriptions are stored as none
fn read_description(errors: &mut Collector, raw: &str) -> Option<Option<String>> {
    let trimmed = raw.trim();
    if let Some(message) = check_max_length(trimmed, "Description", MAX_DESCRIPTION_LENGTH) {
        errors.push("description", message);
        return None;
    }
    Some((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Validate a creation request. New debts always start unpaid and may not be
/// due before `today`.
pub fn validate_new_debt(payload: CreateDebtPayload, today: Date) -> Result<NewDebt, AppError> {
    let mut errors = Collector::default();

    let lender_name = match payload.lender_name.as_ref() {
        Some(raw) => read_text(&mut errors, "lender_name", "Lender name", raw)
            .and_then(|text| read_lender_name(&mut errors, text)),
        None => {
            errors.push("lender_name", "Lender name is required");
            None
        }
    };

    let amount = match payload.amount.as_ref() {
        Some(raw) => read_amount(&mut errors, raw),
        None => {
            errors.push("amount", "Amount is required");
            None
        }
    };

    let due_date = match payload.due_date.as_ref() {
        Some(raw) => read_text(&mut errors, "due_date", "Due date", raw)
            .and_then(|text| read_due_date(&mut errors, text)),
        None => {
            errors.push("due_date", "Due date is required");
            None
        }
    };
    if let Some(date) = due_date {
        if date < today {
            errors.push("due_date", "Due date may not be in the past");
        }
    }

    let description = match payload.description.as_ref() {
        Some(raw) => read_text(&mut errors, "description", "Description", raw)
            .and_then(|text| read_description(&mut errors, text))
            .flatten(),
        None => None,
    };

    match (lender_name, amount, due_date) {
        (Some(lender_name), Some(amount), Some(due_date)) => errors.finish(|| NewDebt {
            lender_name,
            amount,
            due_date,
            status: DebtStatus::Unpaid,
            description,
        }),
        _ => Err(AppError::Validation(errors.fields)),
    }
}

/// Validate an update request.
///
/// In `Full` mode every field except the description is required and a missing
/// description clears it. In `Partial` mode only the fields present change,
/// and at least one must be present.
pub fn validate_debt_changes(
    payload: UpdateDebtPayload,
    mode: UpdateMode,
) -> Result<DebtChanges, AppError> {
    let mut errors = Collector::default();
    let mut changes = DebtChanges::default();

    match payload.lender_name.as_ref() {
        Some(raw) => {
            changes.lender_name = read_text(&mut errors, "lender_name", "Lender name", raw)
                .and_then(|text| read_lender_name(&mut errors, text))
        }
        None if mode == UpdateMode::Full => errors.push("lender_name", "Lender name is required"),
        None => {}
    }

    match payload.amount.as_ref() {
        Some(raw) => changes.amount = read_amount(&mut errors, raw),
        None if mode == UpdateMode::Full => errors.push("amount", "Amount is required"),
        None => {}
    }

    match payload.due_date.as_ref() {
        Some(raw) => {
            changes.due_date = read_text(&mut errors, "due_date", "Due date", raw)
                .and_then(|text| read_due_date(&mut errors, text))
        }
        None if mode == UpdateMode::Full => errors.push("due_date", "Due date is required"),
        None => {}
    }

    match payload.status.as_ref() {
        Some(raw) => {
            changes.status = read_text(&mut errors, "status", "Status", raw)
                .and_then(|text| read_status(&mut errors, text))
        }
        None if mode == UpdateMode::Full => errors.push("status", "Status is required"),
        None => {}
    }

    match payload.description.as_ref() {
        Some(raw) => {
            changes.description = read_text(&mut errors, "description", "Description", raw)
                .and_then(|text| read_description(&mut errors, text))
        }
        None if mode == UpdateMode::Full => changes.description = Some(None),
        None => {}
    }

    if errors.fields.is_empty() && changes.is_empty() {
        return Err(AppError::BadRequest(
            "At least one field must be provided for update".to_string(),
        ));
    }

    errors.finish(|| changes)
}
