//! `/admission` routes: patient intake.

use admissions_core::auth::hash_password;
use admissions_core::models::{Admission, NewAdmission, NewPatient, Patient};
use admissions_core::{AdmissionLifecycle, PatientRegistry};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::login_patient;
use crate::{ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/new", post(admit_new_patient))
        .route("/returning", post(admit_returning_patient))
        .route("/returning/login", post(admit_after_login))
}

/// Registered patient together with the admission opened for them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdmittedPatient {
    pub patient: Patient,
    pub admission: Admission,
}

#[derive(Debug, Deserialize)]
struct NewPatientAdmission {
    #[serde(flatten)]
    patient: NewPatient,
    #[serde(flatten)]
    intake: NewAdmission,
    password: Option<String>,
}

async fn admit_new_patient(
    State(state): State<AppState>,
    Json(payload): Json<NewPatientAdmission>,
) -> ApiResult<Json<AdmittedPatient>> {
    let password_hash = payload.password.as_deref().map(hash_password).transpose()?;

    let db = state.db()?;
    let patient = PatientRegistry::new(&db).create(&payload.patient, password_hash.as_deref())?;
    let admission = AdmissionLifecycle::new(&db).create(&patient.patient_id, &payload.intake)?;
    Ok(Json(AdmittedPatient { patient, admission }))
}

#[derive(Debug, Deserialize)]
struct ReturningAdmission {
    #[serde(rename = "patientID")]
    patient_id: String,
    #[serde(flatten)]
    intake: NewAdmission,
}

async fn admit_returning_patient(
    State(state): State<AppState>,
    Json(payload): Json<ReturningAdmission>,
) -> ApiResult<Json<AdmittedPatient>> {
    let db = state.db()?;
    let patient = PatientRegistry::new(&db).get(&payload.patient_id)?;
    let admission = AdmissionLifecycle::new(&db).create(&patient.patient_id, &payload.intake)?;
    Ok(Json(AdmittedPatient { patient, admission }))
}

#[derive(Debug, Deserialize)]
struct ReturningLoginAdmission {
    #[serde(rename = "patientID")]
    patient_id: String,
    password: String,
    #[serde(flatten)]
    intake: NewAdmission,
}

async fn admit_after_login(
    State(state): State<AppState>,
    Json(payload): Json<ReturningLoginAdmission>,
) -> ApiResult<Json<AdmittedPatient>> {
    let patient = login_patient(&state, &payload.patient_id, &payload.password)?;

    let db = state.db()?;
    let admission = AdmissionLifecycle::new(&db).create(&patient.patient_id, &payload.intake)?;
    Ok(Json(AdmittedPatient { patient, admission }))
}
