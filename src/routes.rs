use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::error::AppError;
use crate::{AppState, auth, dashboard, debts};

/// Every endpoint, without session or CORS layers
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/debts", get(debts::list_debts).post(debts::create_debt))
        .route("/debts/create", get(debts::create_form))
        .route("/debts/report", get(debts::debt_report))
        .route(
            "/debts/{id}",
            get(debts::show_debt)
                .put(debts::replace_debt)
                .patch(debts::patch_debt)
                .delete(debts::delete_debt),
        )
        .route("/debts/{id}/edit", get(debts::edit_form))
        .route("/debts/{id}/mark-paid", put(debts::mark_paid))
}

async fn health(State(app_state): State<AppState>) -> Result<StatusCode, AppError> {
    let conn = app_state.db.read().await;
    conn.query("SELECT 1", ()).await?;
    Ok(StatusCode::OK)
}
