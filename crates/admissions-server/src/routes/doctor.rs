//! `/doctor` routes: the attending doctor's view of their ward.

use admissions_core::auth::authenticate;
use admissions_core::models::{Admission, Doctor, DoctorPatient};
use admissions_core::{AdmissionLifecycle, DoctorDirectory};
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;

use crate::{ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/:id/patients", get(patients))
        .route("/admissions/:id/procedure", put(record_procedure))
        .route("/admissions/:id/diagnosis", put(record_diagnosis))
        .route("/admissions/:id/discharge", put(discharge))
}

#[derive(Debug, Deserialize)]
struct DoctorLogin {
    #[serde(rename = "doctorID")]
    doctor_id: i64,
    password: String,
}

async fn login(State(state): State<AppState>, Json(payload): Json<DoctorLogin>) -> ApiResult<Json<Doctor>> {
    let db = state.db()?;
    let candidate = DoctorDirectory::new(&db).find(payload.doctor_id)?;
    drop(db);

    let doctor = authenticate(candidate, &payload.password)
        .inspect_err(|_| warn!(doctor_id = payload.doctor_id, "rejected doctor login"))?;
    Ok(Json(doctor))
}

async fn patients(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> ApiResult<Json<Vec<DoctorPatient>>> {
    let db = state.db()?;
    Ok(Json(AdmissionLifecycle::new(&db).patients_of_doctor(doctor_id)?))
}

#[derive(Debug, Deserialize)]
struct ProcedureNote {
    procedure: String,
}

async fn record_procedure(
    State(state): State<AppState>,
    Path(admission_id): Path<i64>,
    Json(note): Json<ProcedureNote>,
) -> ApiResult<Json<Admission>> {
    let db = state.db()?;
    Ok(Json(AdmissionLifecycle::new(&db).record_procedure(admission_id, &note.procedure)?))
}

#[derive(Debug, Deserialize)]
struct DiagnosisNote {
    diagnosis: String,
}

async fn record_diagnosis(
    State(state): State<AppState>,
    Path(admission_id): Path<i64>,
    Json(note): Json<DiagnosisNote>,
) -> ApiResult<Json<Admission>> {
    let db = state.db()?;
    Ok(Json(AdmissionLifecycle::new(&db).record_diagnosis(admission_id, &note.diagnosis)?))
}

async fn discharge(
    State(state): State<AppState>,
    Path(admission_id): Path<i64>,
) -> ApiResult<Json<Admission>> {
    let db = state.db()?;
    Ok(Json(AdmissionLifecycle::new(&db).discharge(admission_id)?))
}
