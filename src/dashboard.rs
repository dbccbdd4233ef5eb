use axum::{
    Json,
    extract::State,
};
use serde::Serialize;
use tower_sessions::Session;

use crate::AppState;
use crate::auth::get_current_user;
use crate::classifier::{DebtView, annotate};
use crate::constants::DASHBOARD_LIST_LIMIT;
use crate::error::AppError;
use crate::statistics::{DebtStatistics, compute_statistics};
use crate::store::DebtStore;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub statistics: DebtStatistics,
    pub recent_debts: Vec<DebtView>,
    pub upcoming_debts: Vec<DebtView>,
    pub overdue_debts: Vec<DebtView>,
}

pub async fn get_dashboard(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = get_current_user(&session).await?;
    let store = DebtStore::for_owner(&app_state.db, &user.id);
    let today = app_state.today();

    let all_debts = store.all().await?;
    let recent = store.recent(DASHBOARD_LIST_LIMIT).await?;
    let upcoming = store.upcoming(today, DASHBOARD_LIST_LIMIT).await?;
    let overdue = store.overdue(today, DASHBOARD_LIST_LIMIT).await?;

    Ok(Json(DashboardResponse {
        statistics: compute_statistics(&all_debts, today),
        recent_debts: annotate(recent, today),
        upcoming_debts: annotate(upcoming, today),
        overdue_debts: annotate(overdue, today),
    }))
}
