use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::classifier::{DueStatus, classify};
use crate::constants::{AMOUNT_SCALE, MONTHLY_BUCKET_COUNT};
use crate::models::{Debt, DebtStatus};
use crate::month::YearMonth;

/// Paid and unpaid amounts due within one calendar month
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub unpaid_amount: Decimal,
    pub paid_amount: Decimal,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DebtStatistics {
    pub total_unpaid: Decimal,
    pub total_paid: Decimal,
    pub total_count: u64,
    pub unpaid_count: u64,
    pub paid_count: u64,
    pub due_soon_count: u64,
    pub overdue_count: u64,
    pub monthly: Vec<MonthlyBucket>,
}

pub fn zero_amount() -> Decimal {
    Decimal::new(0, AMOUNT_SCALE)
}

/// Summarise every debt of one owner as of `reference_date`.
///
/// `debts` must be the owner's full set, not a filtered list view. Buckets
/// cover the six months ending at the reference month, oldest first; debts due
/// outside that window still count towards the totals.
pub fn compute_statistics(debts: &[Debt], reference_date: Date) -> DebtStatistics {
    let window = YearMonth::of(reference_date).trailing(MONTHLY_BUCKET_COUNT);
    let mut monthly: Vec<MonthlyBucket> = window
        .iter()
        .map(|month| MonthlyBucket {
            month: *month,
            unpaid_amount: zero_amount(),
            paid_amount: zero_amount(),
        })
        .collect();

    let mut stats = DebtStatistics {
        total_unpaid: zero_amount(),
        total_paid: zero_amount(),
        total_count: 0,
        unpaid_count: 0,
        paid_count: 0,
        due_soon_count: 0,
        overdue_count: 0,
        monthly: Vec::new(),
    };

    for debt in debts {
        stats.total_count += 1;
        match debt.status {
            DebtStatus::Unpaid => {
                stats.total_unpaid += debt.amount;
                stats.unpaid_count += 1;
            }
            DebtStatus::Paid => {
                stats.total_paid += debt.amount;
                stats.paid_count += 1;
            }
        }

        match classify(debt.status, debt.due_date, reference_date) {
            DueStatus::Overdue => stats.overdue_count += 1,
            DueStatus::DueSoon => stats.due_soon_count += 1,
            DueStatus::Normal | DueStatus::Paid => {}
        }

        let due_month = YearMonth::of(debt.due_date);
        if let Some(bucket) = monthly.iter_mut().find(|b| b.month == due_month) {
            match debt.status {
                DebtStatus::Unpaid => bucket.unpaid_amount += debt.amount,
                DebtStatus::Paid => bucket.paid_amount += debt.amount,
            }
        }
    }

    stats.monthly = monthly;
    stats
}

/// Totals over an arbitrary (possibly filtered) set of debts, as printed on
/// an exported report
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total_amount: Decimal,
    pub total_unpaid: Decimal,
    pub total_paid: Decimal,
    pub total_count: u64,
    pub unpaid_count: u64,
    pub paid_count: u64,
}

pub fn summarize(debts: &[Debt]) -> ReportSummary {
    let mut summary = ReportSummary {
        total_amount: zero_amount(),
        total_unpaid: zero_amount(),
        total_paid: zero_amount(),
        total_count: 0,
        unpaid_count: 0,
        paid_count: 0,
    };

    for debt in debts {
        summary.total_amount += debt.amount;
        summary.total_count += 1;
        match debt.status {
            DebtStatus::Unpaid => {
                summary.total_unpaid += debt.amount;
                summary.unpaid_count += 1;
            }
            DebtStatus::Paid => {
                summary.total_paid += debt.amount;
                summary.paid_count += 1;
            }
        }
    }

    summary
}
