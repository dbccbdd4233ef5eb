use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;
use time::Date;
use tower_sessions::Session;

use crate::AppState;
use crate::auth::get_current_user;
use crate::classifier::{DebtView, annotate};
use crate::error::AppError;
use crate::filters::{DebtFilter, page_number};
use crate::models::{
    CreateDebtPayload, DebtStatus, ListDebtsQuery, Page, ReportQuery, UpdateDebtPayload,
};
use crate::statistics::{DebtStatistics, ReportSummary, compute_statistics, summarize};
use crate::store::DebtStore;
use crate::validation::{UpdateMode, validate_debt_changes, validate_new_debt};

#[derive(Serialize)]
pub struct ListDebtsResponse {
    pub debts: Page<DebtView>,
    pub filters: DebtFilter,
    /// Always over the owner's full set, whatever the filters
    pub statistics: DebtStatistics,
}

#[derive(Serialize)]
pub struct DebtFormResponse {
    pub statuses: Vec<DebtStatus>,
    pub default_status: DebtStatus,
    pub min_due_date: Date,
}

#[derive(Serialize)]
pub struct EditDebtResponse {
    pub debt: DebtView,
    pub statuses: Vec<DebtStatus>,
}

#[derive(Serialize)]
pub struct DebtReportResponse {
    pub owner: String,
    pub generated_on: Date,
    pub filters: DebtFilter,
    pub summary: ReportSummary,
    pub debts: Vec<DebtView>,
}

pub async fn list_debts(
    State(app_state): State<AppState>,
    session: Session,
    Query(query): Query<ListDebtsQuery>,
) -> Result<Json<ListDebtsResponse>, AppError> {
    let user = get_current_user(&session).await?;
    let store = DebtStore::for_owner(&app_state.db, &user.id);
    let today = app_state.today();

    let filter = DebtFilter::from_raw(query.month.as_deref(), query.status.as_deref());
    let page = store.page(&filter, page_number(query.page.as_deref())).await?;
    let all_debts = store.all().await?;

    Ok(Json(ListDebtsResponse {
        debts: page.map(|debt| DebtView::new(debt, today)),
        filters: filter,
        statistics: compute_statistics(&all_debts, today),
    }))
}

pub async fn create_form(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<Json<DebtFormResponse>, AppError> {
    get_current_user(&session).await?;

    Ok(Json(DebtFormResponse {
        statuses: DebtStatus::ALL.to_vec(),
        default_status: DebtStatus::Unpaid,
        min_due_date: app_state.today(),
    }))
}

pub async fn create_debt(
    State(app_state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateDebtPayload>,
) -> Result<(StatusCode, Json<DebtView>), AppError> {
    let user = get_current_user(&session).await?;
    let today = app_state.today();

    let new_debt = validate_new_debt(payload, today)?;
    let debt = DebtStore::for_owner(&app_state.db, &user.id)
        .insert(new_debt)
        .await?;

    Ok((StatusCode::CREATED, Json(DebtView::new(debt, today))))
}

pub async fn show_debt(
    State(app_state): State<AppState>,
    session: Session,
    Path(debt_id): Path<String>,
) -> Result<Json<DebtView>, AppError> {
    let user = get_current_user(&session).await?;
    let debt = DebtStore::for_owner(&app_state.db, &user.id)
        .find(&debt_id)
        .await?;

    Ok(Json(DebtView::new(debt, app_state.today())))
}

pub async fn edit_form(
    State(app_state): State<AppState>,
    session: Session,
    Path(debt_id): Path<String>,
) -> Result<Json<EditDebtResponse>, AppError> {
    let user = get_current_user(&session).await?;
    let debt = DebtStore::for_owner(&app_state.db, &user.id)
        .find(&debt_id)
        .await?;

    Ok(Json(EditDebtResponse {
        debt: DebtView::new(debt, app_state.today()),
        statuses: DebtStatus::ALL.to_vec(),
    }))
}

async fn apply_update(
    app_state: &AppState,
    session: &Session,
    debt_id: &str,
    payload: UpdateDebtPayload,
    mode: UpdateMode,
) -> Result<Json<DebtView>, AppError> {
    let user = get_current_user(session).await?;
    let store = DebtStore::for_owner(&app_state.db, &user.id);

    // Ownership is settled before validation so a stranger learns nothing
    // about the debt from field errors
    store.find(debt_id).await?;
    let changes = validate_debt_changes(payload, mode)?;
    let debt = store.update(debt_id, changes).await?;

    Ok(Json(DebtView::new(debt, app_state.today())))
}

pub async fn replace_debt(
    State(app_state): State<AppState>,
    session: Session,
    Path(debt_id): Path<String>,
    Json(payload): Json<UpdateDebtPayload>,
) -> Result<Json<DebtView>, AppError> {
    apply_update(&app_state, &session, &debt_id, payload, UpdateMode::Full).await
}

pub async fn patch_debt(
    State(app_state): State<AppState>,
    session: Session,
    Path(debt_id): Path<String>,
    Json(payload): Json<UpdateDebtPayload>,
) -> Result<Json<DebtView>, AppError> {
    apply_update(&app_state, &session, &debt_id, payload, UpdateMode::Partial).await
}

pub async fn mark_paid(
    State(app_state): State<AppState>,
    session: Session,
    Path(debt_id): Path<String>,
) -> Result<Json<DebtView>, AppError> {
    let user = get_current_user(&session).await?;
    let debt = DebtStore::for_owner(&app_state.db, &user.id)
        .mark_paid(&debt_id)
        .await?;

    Ok(Json(DebtView::new(debt, app_state.today())))
}

pub async fn delete_debt(
    State(app_state): State<AppState>,
    session: Session,
    Path(debt_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = get_current_user(&session).await?;
    DebtStore::for_owner(&app_state.db, &user.id)
        .delete(&debt_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Everything an exported report needs, unpaginated. Rendering is left to
/// the caller.
pub async fn debt_report(
    State(app_state): State<AppState>,
    session: Session,
    Query(query): Query<ReportQuery>,
) -> Result<Json<DebtReportResponse>, AppError> {
    let user = get_current_user(&session).await?;
    let today = app_state.today();

    let filter = DebtFilter::from_raw(query.month.as_deref(), query.status.as_deref());
    let debts = DebtStore::for_owner(&app_state.db, &user.id)
        .filtered(&filter)
        .await?;

    Ok(Json(DebtReportResponse {
        owner: user.username,
        generated_on: today,
        filters: filter,
        summary: summarize(&debts),
        debts: annotate(debts, today),
    }))
}
