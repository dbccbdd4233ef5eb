//! List-view filters and the one query builder that consumes them.

use libsql::Value;
use serde::Serialize;
use tracing::warn;

use crate::constants::MAX_PAGE;
use crate::models::{Debt, DebtStatus};
use crate::month::YearMonth;
use crate::utils::format_date;

/// Optional constraints on an owner's debts, AND-composed.
///
/// An absent field imposes no constraint.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebtFilter {
    pub month: Option<YearMonth>,
    pub status: Option<DebtStatus>,
}

impl DebtFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Blank values count as absent. Values that do not parse are dropped
    /// (with a warning) so the request falls back to the unfiltered list.
    pub fn from_raw(month: Option<&str>, status: Option<&str>) -> Self {
        let month = month
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .and_then(|raw| {
                let parsed = YearMonth::parse(raw);
                if parsed.is_none() {
                    warn!(month = raw, "ignoring malformed month filter");
                }
                parsed
            });

        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|raw| {
                let parsed = DebtStatus::parse(raw);
                if parsed.is_none() {
                    warn!(status = raw, "ignoring unknown status filter");
                }
                parsed
            });

        Self { month, status }
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.status.is_none()
    }

    pub fn matches(&self, debt: &Debt) -> bool {
        if let Some(month) = self.month {
            if !month.contains(debt.due_date) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if debt.status != status {
                return false;
            }
        }
        true
    }
}

/// 1-based page number from the raw `page` query value.
///
/// Absent, blank, negative or non-numeric values mean the first page. Numbers
/// too large for a page index are capped at `MAX_PAGE`, which is always empty.
pub fn page_number(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|p| !p.is_empty()) else {
        return 1;
    };

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        warn!(page = raw, "ignoring malformed page number");
        return 1;
    }

    match raw.parse::<u32>() {
        Ok(page) => page.clamp(1, MAX_PAGE),
        // Only digits, so the sole failure left is overflow
        Err(_) => MAX_PAGE,
    }
}

/// `WHERE` clause (without the keyword) and its positional parameters
/// selecting `owner_id`'s debts that satisfy `filter`.
///
/// The month constraint is a half-open date range so the
/// `(owner_id, due_date)` index can serve it. It selects the same debts as
/// [`DebtFilter::matches`].
pub fn where_clause(owner_id: &str, filter: &DebtFilter) -> (String, Vec<Value>) {
    let mut conditions = vec!["owner_id = ?".to_string()];
    let mut params = vec![Value::Text(owner_id.to_string())];

    if let Some(month) = filter.month {
        if let Some(start) = month.first_day() {
            conditions.push("due_date >= ?".to_string());
            params.push(Value::Text(format_date(start)));
        }
        // The last representable month has no upper bound
        if let Some(end) = month.next().and_then(|next| next.first_day()) {
            conditions.push("due_date < ?".to_string());
            params.push(Value::Text(format_date(end)));
        }
    }

    if let Some(status) = filter.status {
        conditions.push("status = ?".to_string());
        params.push(Value::Text(status.as_str().to_string()));
    }

    (conditions.join(" AND "), params)
}
