//! `/admin/reports` routes.

use admissions_core::models::{DailyCount, MaritalStatusCount, MonthlyCount};
use admissions_core::services::MARITAL_STATUS_THRESHOLD;
use admissions_core::Reports;
use axum::{extract::State, routing::get, Json, Router};

use crate::{ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/dailyAdmissions", get(daily_admissions))
        .route("/dailyVisitors", get(daily_visitors))
        .route("/monthlyAdmissions", get(monthly_admissions))
        .route("/monthlyVisitors", get(monthly_visitors))
        .route("/maritalStatus", get(marital_status))
}

async fn daily_admissions(State(state): State<AppState>) -> ApiResult<Json<Vec<DailyCount>>> {
    let db = state.db()?;
    Ok(Json(Reports::new(&db).daily_admissions()?))
}

async fn daily_visitors(State(state): State<AppState>) -> ApiResult<Json<Vec<DailyCount>>> {
    let db = state.db()?;
    Ok(Json(Reports::new(&db).daily_visitors()?))
}

async fn monthly_admissions(State(state): State<AppState>) -> ApiResult<Json<Vec<MonthlyCount>>> {
    let db = state.db()?;
    Ok(Json(Reports::new(&db).monthly_admissions()?))
}

async fn monthly_visitors(State(state): State<AppState>) -> ApiResult<Json<Vec<MonthlyCount>>> {
    let db = state.db()?;
    Ok(Json(Reports::new(&db).monthly_visitors()?))
}

async fn marital_status(State(state): State<AppState>) -> ApiResult<Json<Vec<MaritalStatusCount>>> {
    let db = state.db()?;
    Ok(Json(Reports::new(&db).marital_statuses(MARITAL_STATUS_THRESHOLD)?))
}
