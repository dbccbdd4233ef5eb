//! Owner-scoped persistence for debts.
//!
//! [`DebtStore::for_owner`] is the only way in, so every read and write is
//! bound to one user. Touching another user's debt yields
//! [`AppError::Forbidden`] before any of its fields leave this module.

use std::str::FromStr;

use libsql::{Connection, Row, Value, params::Params};
use rust_decimal::Decimal;
use time::{Date, Duration};
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::*;
use crate::error::AppError;
use crate::filters::{DebtFilter, where_clause};
use crate::models::{Debt, DebtChanges, DebtStatus, NewDebt, Page};
use crate::utils::{format_date, now_timestamp, parse_date};
use crate::{Db, with_transaction};

const DEBT_COLUMNS: &str =
    "id, owner_id, lender_name, amount, due_date, status, description, created_at, updated_at";

fn text(value: impl Into<String>) -> Value {
    Value::Text(value.into())
}

fn optional_text(value: Option<&str>) -> Value {
    match value {
        Some(v) => Value::Text(v.to_string()),
        None => Value::Null,
    }
}

fn invalid_row() -> AppError {
    AppError::internal("invalid debt data")
}

pub fn extract_debt_from_row(row: &Row) -> Result<Debt, AppError> {
    let id: String = row.get(0).map_err(|_| invalid_row())?;
    let owner_id: String = row.get(1).map_err(|_| invalid_row())?;
    let lender_name: String = row.get(2).map_err(|_| invalid_row())?;
    let amount: String = row.get(3).map_err(|_| invalid_row())?;
    let due_date: String = row.get(4).map_err(|_| invalid_row())?;
    let status: String = row.get(5).map_err(|_| invalid_row())?;
    let description: Option<String> = row.get(6).map_err(|_| invalid_row())?;
    let created_at: String = row.get(7).map_err(|_| invalid_row())?;
    let updated_at: String = row.get(8).map_err(|_| invalid_row())?;

    Ok(Debt {
        id,
        owner_id,
        lender_name,
        amount: Decimal::from_str(&amount).map_err(|_| invalid_row())?,
        due_date: parse_date(&due_date).ok_or_else(invalid_row)?,
        status: DebtStatus::parse(&status).ok_or_else(invalid_row)?,
        description,
        created_at,
        updated_at,
    })
}

async fn query_debts(conn: &Connection, sql: &str, params: Vec<Value>) -> Result<Vec<Debt>, AppError> {
    let mut rows = conn.query(sql, Params::Positional(params)).await?;
    let mut debts = Vec::new();
    while let Some(row) = rows.next().await? {
        debts.push(extract_debt_from_row(&row)?);
    }
    Ok(debts)
}

async fn fetch_by_id(conn: &Connection, id: &str) -> Result<Option<Debt>, AppError> {
    let sql = format!("SELECT {} FROM debts WHERE id = ?", DEBT_COLUMNS);
    let mut debts = query_debts(conn, &sql, vec![text(id)]).await?;
    Ok(debts.pop())
}

fn ensure_owner(debt: &Debt, owner_id: &str) -> Result<(), AppError> {
    if debt.owner_id != owner_id {
        warn!(debt_id = %debt.id, user_id = owner_id, "rejected access to another user's debt");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Debts of a single owner
pub struct DebtStore<'a> {
    db: &'a Db,
    owner_id: &'a str,
}

impl<'a> DebtStore<'a> {
    pub fn for_owner(db: &'a Db, owner_id: &'a str) -> Self {
        Self { db, owner_id }
    }

    pub async fn insert(&self, new_debt: NewDebt) -> Result<Debt, AppError> {
        let now = now_timestamp();
        let mut amount = new_debt.amount;
        amount.rescale(AMOUNT_SCALE);
        let debt = Debt {
            id: Uuid::new_v4().to_string(),
            owner_id: self.owner_id.to_string(),
            lender_name: new_debt.lender_name,
            amount,
            due_date: new_debt.due_date,
            status: new_debt.status,
            description: new_debt.description,
            created_at: now.clone(),
            updated_at: now,
        };

        let conn = self.db.write().await;
        conn.execute(
            &format!(
                "INSERT INTO debts ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                DEBT_COLUMNS
            ),
            Params::Positional(vec![
                text(debt.id.as_str()),
                text(debt.owner_id.as_str()),
                text(debt.lender_name.as_str()),
                text(debt.amount.to_string()),
                text(format_date(debt.due_date)),
                text(debt.status.as_str()),
                optional_text(debt.description.as_deref()),
                text(debt.created_at.as_str()),
                text(debt.updated_at.as_str()),
            ]),
        )
        .await?;

        info!(debt_id = %debt.id, user_id = self.owner_id, "debt created");
        Ok(debt)
    }

    pub async fn find(&self, id: &str) -> Result<Debt, AppError> {
        let conn = self.db.read().await;
        let debt = fetch_by_id(&conn, id).await?.ok_or(AppError::NotFound)?;
        ensure_owner(&debt, self.owner_id)?;
        Ok(debt)
    }

    /// Apply `changes` and persist the result. Concurrent writers to the same
    /// debt overwrite each other; the last commit wins.
    pub async fn update(&self, id: &str, changes: DebtChanges) -> Result<Debt, AppError> {
        let owner_id = self.owner_id.to_string();
        let id = id.to_string();

        let debt = with_transaction(self.db, move |conn| {
            Box::pin(async move {
                let mut debt = fetch_by_id(conn, &id).await?.ok_or(AppError::NotFound)?;
                ensure_owner(&debt, &owner_id)?;

                changes.apply_to(&mut debt);
                debt.updated_at = now_timestamp();

                conn.execute(
                    "UPDATE debts SET lender_name = ?, amount = ?, due_date = ?, status = ?, description = ?, updated_at = ? WHERE id = ? AND owner_id = ?",
                    Params::Positional(vec![
                        text(debt.lender_name.as_str()),
                        text(debt.amount.to_string()),
                        text(format_date(debt.due_date)),
                        text(debt.status.as_str()),
                        optional_text(debt.description.as_deref()),
                        text(debt.updated_at.as_str()),
                        text(debt.id.as_str()),
                        text(owner_id.as_str()),
                    ]),
                )
                .await?;

                Ok::<Debt, AppError>(debt)
            })
        })
        .await?;

        info!(debt_id = %debt.id, user_id = self.owner_id, status = debt.status.as_str(), "debt updated");
        Ok(debt)
    }

    pub async fn mark_paid(&self, id: &str) -> Result<Debt, AppError> {
        self.update(id, DebtChanges::mark_paid()).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let owner_id = self.owner_id.to_string();
        let debt_id = id.to_string();

        with_transaction(self.db, move |conn| {
            Box::pin(async move {
                let debt = fetch_by_id(conn, &debt_id).await?.ok_or(AppError::NotFound)?;
                ensure_owner(&debt, &owner_id)?;

                let affected = conn
                    .execute(
                        "DELETE FROM debts WHERE id = ? AND owner_id = ?",
                        (debt_id.as_str(), owner_id.as_str()),
                    )
                    .await?;
                if affected == 0 {
                    return Err(AppError::NotFound);
                }
                Ok::<(), AppError>(())
            })
        })
        .await?;

        info!(debt_id = id, user_id = self.owner_id, "debt deleted");
        Ok(())
    }

    /// One page of the list view: filtered, nearest due date first.
    ///
    /// Pages are 1-based; a page past the end comes back empty.
    pub async fn page(&self, filter: &DebtFilter, page: u32) -> Result<Page<Debt>, AppError> {
        let current_page = page.clamp(1, MAX_PAGE);
        let per_page = DEBTS_PER_PAGE;
        let (clause, params) = where_clause(self.owner_id, filter);

        let conn = self.db.read().await;

        let mut count_rows = conn
            .query(
                &format!("SELECT COUNT(*) FROM debts WHERE {}", clause),
                Params::Positional(params.clone()),
            )
            .await?;
        let total: i64 = match count_rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        let total = u64::try_from(total).unwrap_or(0);

        let offset = i64::from(current_page - 1) * i64::from(per_page);
        let mut page_params = params;
        page_params.push(Value::Integer(i64::from(per_page)));
        page_params.push(Value::Integer(offset));

        let data = query_debts(
            &conn,
            &format!(
                "SELECT {} FROM debts WHERE {} ORDER BY due_date ASC, created_at ASC LIMIT ? OFFSET ?",
                DEBT_COLUMNS, clause
            ),
            page_params,
        )
        .await?;

        let last_page = total.div_ceil(u64::from(per_page)).max(1);

        Ok(Page {
            data,
            current_page,
            per_page,
            total,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        })
    }

    /// Every debt matching `filter`, nearest due date first
    pub async fn filtered(&self, filter: &DebtFilter) -> Result<Vec<Debt>, AppError> {
        let (clause, params) = where_clause(self.owner_id, filter);
        let conn = self.db.read().await;
        query_debts(
            &conn,
            &format!(
                "SELECT {} FROM debts WHERE {} ORDER BY due_date ASC, created_at ASC",
                DEBT_COLUMNS, clause
            ),
            params,
        )
        .await
    }

    /// The owner's full set, ignoring any list-view filter
    pub async fn all(&self) -> Result<Vec<Debt>, AppError> {
        self.filtered(&DebtFilter::default()).await
    }

    /// Most recently created first
    pub async fn recent(&self, limit: u32) -> Result<Vec<Debt>, AppError> {
        let conn = self.db.read().await;
        query_debts(
            &conn,
            &format!(
                "SELECT {} FROM debts WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
                DEBT_COLUMNS
            ),
            vec![text(self.owner_id), Value::Integer(i64::from(limit))],
        )
        .await
    }

    /// Unpaid debts due between `today` and seven days later, inclusive
    pub async fn upcoming(&self, today: Date, limit: u32) -> Result<Vec<Debt>, AppError> {
        let window_end = today
            .checked_add(Duration::days(DUE_SOON_WINDOW_DAYS))
            .unwrap_or(Date::MAX);
        let conn = self.db.read().await;
        query_debts(
            &conn,
            &format!(
                "SELECT {} FROM debts WHERE owner_id = ? AND status = ? AND due_date >= ? AND due_date <= ? ORDER BY due_date ASC, created_at ASC LIMIT ?",
                DEBT_COLUMNS
            ),
            vec![
                text(self.owner_id),
                text(DEBT_STATUS_UNPAID),
                text(format_date(today)),
                text(format_date(window_end)),
                Value::Integer(i64::from(limit)),
            ],
        )
        .await
    }

    /// Unpaid debts due before `today`, oldest due date first
    pub async fn overdue(&self, today: Date, limit: u32) -> Result<Vec<Debt>, AppError> {
        let conn = self.db.read().await;
        query_debts(
            &conn,
            &format!(
                "SELECT {} FROM debts WHERE owner_id = ? AND status = ? AND due_date < ? ORDER BY due_date ASC, created_at ASC LIMIT ?",
                DEBT_COLUMNS
            ),
            vec![
                text(self.owner_id),
                text(DEBT_STATUS_UNPAID),
                text(format_date(today)),
                Value::Integer(i64::from(limit)),
            ],
        )
        .await
    }
}
