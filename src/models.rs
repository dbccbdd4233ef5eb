use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::constants::*;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    Unpaid,
    Paid,
}

impl DebtStatus {
    pub const ALL: [DebtStatus; 2] = [DebtStatus::Unpaid, DebtStatus::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Unpaid => DEBT_STATUS_UNPAID,
            DebtStatus::Paid => DEBT_STATUS_PAID,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            DEBT_STATUS_UNPAID => Some(DebtStatus::Unpaid),
            DEBT_STATUS_PAID => Some(DebtStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Debt {
    pub id: String,
    pub owner_id: String,
    pub lender_name: String,
    pub amount: Decimal,
    pub due_date: Date,
    pub status: DebtStatus,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated fields for a debt about to be inserted
#[derive(Debug, Clone)]
pub struct NewDebt {
    pub lender_name: String,
    pub amount: Decimal,
    pub due_date: Date,
    pub status: DebtStatus,
    pub description: Option<String>,
}

/// Validated changes to an existing debt; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct DebtChanges {
    pub lender_name: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<Date>,
    pub status: Option<DebtStatus>,
    pub description: Option<Option<String>>,
}

impl DebtChanges {
    pub fn mark_paid() -> Self {
        Self {
            status: Some(DebtStatus::Paid),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lender_name.is_none()
            && self.amount.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.description.is_none()
    }

    pub fn apply_to(self, debt: &mut Debt) {
        if let Some(lender_name) = self.lender_name {
            debt.lender_name = lender_name;
        }
        if let Some(amount) = self.amount {
            debt.amount = amount;
        }
        if let Some(due_date) = self.due_date {
            debt.due_date = due_date;
        }
        if let Some(status) = self.status {
            debt.status = status;
        }
        if let Some(description) = self.description {
            debt.description = description;
        }
    }
}

/// Raw body of `POST /debts`. Every field is untyped JSON so that a wrong
/// type is reported per field instead of failing JSON extraction.
#[derive(Deserialize, Debug, Default)]
pub struct CreateDebtPayload {
    pub lender_name: Option<serde_json::Value>,
    pub amount: Option<serde_json::Value>,
    pub due_date: Option<serde_json::Value>,
    pub description: Option<serde_json::Value>,
}

/// Raw body of `PUT`/`PATCH /debts/{id}`
#[derive(Deserialize, Debug, Default)]
pub struct UpdateDebtPayload {
    pub lender_name: Option<serde_json::Value>,
    pub amount: Option<serde_json::Value>,
    pub due_date: Option<serde_json::Value>,
    pub status: Option<serde_json::Value>,
    pub description: Option<serde_json::Value>,
}

/// Query string of `GET /debts`. `page` is read leniently, like the filters.
#[derive(Deserialize, Debug, Default)]
pub struct ListDebtsQuery {
    pub month: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ReportQuery {
    pub month: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
        }
    }
}
