//! `/patient` routes.

use admissions_core::models::{NewVisitor, Patient, PatientAdmission, PatientDetails, Total, Visitor};
use admissions_core::{AdmissionLifecycle, PatientRegistry, VisitorLog};
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::{change_patient_password, login_patient, total, PasswordChange};
use crate::{ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/:id/details", put(update_details))
        .route("/:id/password", put(change_password))
        .route("/:id/admissions", get(admissions))
        .route("/:id/admissions/total", get(admissions_total))
        .route("/:id/visitors", get(visitors).post(log_visitor))
        .route("/:id/visitors/total", get(visitors_total))
}

#[derive(Debug, Deserialize)]
struct PatientLogin {
    #[serde(rename = "patientID")]
    patient_id: String,
    password: String,
}

async fn login(State(state): State<AppState>, Json(payload): Json<PatientLogin>) -> ApiResult<Json<Patient>> {
    let patient = login_patient(&state, &payload.patient_id, &payload.password)?;
    Ok(Json(patient))
}

async fn update_details(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(details): Json<PatientDetails>,
) -> ApiResult<Json<Patient>> {
    let db = state.db()?;
    Ok(Json(PatientRegistry::new(&db).update_details(&patient_id, &details)?))
}

async fn change_password(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(payload): Json<PasswordChange>,
) -> ApiResult<Json<Value>> {
    change_patient_password(&state, &patient_id, &payload)
}

async fn admissions(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Vec<PatientAdmission>>> {
    let db = state.db()?;
    Ok(Json(AdmissionLifecycle::new(&db).list_for_patient(&patient_id)?))
}

async fn admissions_total(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Total>> {
    let db = state.db()?;
    Ok(total(AdmissionLifecycle::new(&db).count_for_patient(&patient_id)?))
}

async fn visitors(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Vec<Visitor>>> {
    let db = state.db()?;
    Ok(Json(VisitorLog::new(&db).list_for_patient(&patient_id)?))
}

async fn visitors_total(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Total>> {
    let db = state.db()?;
    Ok(total(VisitorLog::new(&db).count_for_patient(&patient_id)?))
}

async fn log_visitor(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(visitor): Json<NewVisitor>,
) -> ApiResult<Json<Visitor>> {
    let db = state.db()?;
    Ok(Json(VisitorLog::new(&db).log(&patient_id, &visitor)?))
}
