//! Derived due-state of a debt relative to a reference date.
//!
//! Nothing here is stored: callers pass the date they consider "today" and the
//! result is recomputed on every request.

use serde::Serialize;
use time::Date;

use crate::constants::DUE_SOON_WINDOW_DAYS;
use crate::models::{Debt, DebtStatus};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Normal,
    Paid,
}

/// Signed number of days from `reference_date` until `due_date`
pub fn days_until_due(due_date: Date, reference_date: Date) -> i64 {
    (due_date - reference_date).whole_days()
}

pub fn classify(status: DebtStatus, due_date: Date, reference_date: Date) -> DueStatus {
    if status == DebtStatus::Paid {
        return DueStatus::Paid;
    }

    let days = days_until_due(due_date, reference_date);
    if days < 0 {
        DueStatus::Overdue
    } else if days <= DUE_SOON_WINDOW_DAYS {
        DueStatus::DueSoon
    } else {
        DueStatus::Normal
    }
}

pub fn is_overdue(debt: &Debt, reference_date: Date) -> bool {
    classify(debt.status, debt.due_date, reference_date) == DueStatus::Overdue
}

pub fn is_due_soon(debt: &Debt, reference_date: Date) -> bool {
    classify(debt.status, debt.due_date, reference_date) == DueStatus::DueSoon
}

/// A debt annotated with its due-state for presentation
#[derive(Serialize, Debug, Clone)]
pub struct DebtView {
    #[serde(flatten)]
    pub debt: Debt,
    pub due_status: DueStatus,
    pub is_overdue: bool,
    pub is_due_soon: bool,
    pub days_until_due: i64,
}

impl DebtView {
    pub fn new(debt: Debt, reference_date: Date) -> Self {
        let due_status = classify(debt.status, debt.due_date, reference_date);
        let days_until_due = days_until_due(debt.due_date, reference_date);
        Self {
            debt,
            due_status,
            is_overdue: due_status == DueStatus::Overdue,
            is_due_soon: due_status == DueStatus::DueSoon,
            days_until_due,
        }
    }
}

pub fn annotate(debts: Vec<Debt>, reference_date: Date) -> Vec<DebtView> {
    debts
        .into_iter()
        .map(|debt| DebtView::new(debt, reference_date))
        .collect()
}
