//! `/admin` routes.

use admissions_core::auth::hash_password;
use admissions_core::models::{
    Admission, AdmissionFilter, Doctor, DoctorFilter, DoctorOnShift, DoctorStatus, NewDoctor,
    Patient, PatientDetails, RetentionWindow, ShiftUpdate, Total, Visitor,
};
use admissions_core::{AdmissionLifecycle, DoctorDirectory, PatientRegistry, VisitorLog};
use axum::{
    extract::{Path, State},
    routing::{delete, get, put, MethodRouter},
    Json, Router,
};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{reports, success, total, PasswordChange};
use crate::{ApiError, ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        // Admissions
        .route("/admissions", admission_list(AdmissionFilter::All))
        .route("/admissions/total", admission_total(AdmissionFilter::All))
        .route("/admissions/noDoctor", admission_list(AdmissionFilter::NoDoctor))
        .route("/admissions/noDoctor/total", admission_total(AdmissionFilter::NoDoctor))
        .route("/admissions/notDischarge", admission_list(AdmissionFilter::NotDischarged))
        .route("/admissions/notDischarge/total", admission_total(AdmissionFilter::NotDischarged))
        .route("/admissions/:id", put(assign_doctor).delete(delete_admission))
        // Doctors
        .route("/doctors", get(doctor_list_all).post(create_doctor))
        .route("/doctors/total", doctor_total(DoctorFilter::All))
        .route("/doctors/active", doctor_list(DoctorFilter::Active))
        .route("/doctors/active/total", doctor_total(DoctorFilter::Active))
        .route("/doctors/inactive", doctor_list(DoctorFilter::Inactive))
        .route("/doctors/inactive/total", doctor_total(DoctorFilter::Inactive))
        .route("/doctors/onLeave", doctor_list(DoctorFilter::OnLeave))
        .route("/doctors/onLeave/total", doctor_total(DoctorFilter::OnLeave))
        .route("/doctors/onDuty", doctor_list(DoctorFilter::ActiveOnDuty))
        .route("/doctors/onDuty/total", doctor_total(DoctorFilter::ActiveOnDuty))
        .route("/doctors/offDuty", doctor_list(DoctorFilter::ActiveOffDuty))
        .route("/doctors/offDuty/total", doctor_total(DoctorFilter::ActiveOffDuty))
        .route("/doctors/:id", put(update_doctor_shift))
        .route("/doctors/:id/password", put(update_doctor_password))
        // Patients
        .route("/patients", get(list_patients))
        .route("/patients/total", get(patients_total))
        .route("/patients/:id", put(update_patient_details))
        .route("/patients/:id/password", put(change_patient_password))
        // Visitors
        .route("/visitors", get(list_visitors).delete(delete_visitors))
        .route("/visitors/total", get(visitors_total))
        .route("/visitors/all", delete(delete_all_visitors))
        .route("/visitors/older/:window", delete(purge_visitors))
        .route("/visitors/:id", delete(delete_visitor))
        .nest("/reports", reports::routes())
}

// =========================================================================
// Admissions
// =========================================================================

fn admission_list(filter: AdmissionFilter) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move {
        let db = state.db()?;
        let admissions = AdmissionLifecycle::new(&db).list(filter)?;
        Ok::<Json<Vec<Admission>>, ApiError>(Json(admissions))
    })
}

fn admission_total(filter: AdmissionFilter) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move {
        let db = state.db()?;
        let count = AdmissionLifecycle::new(&db).count(filter)?;
        Ok::<Json<Total>, ApiError>(total(count))
    })
}

#[derive(Debug, Deserialize)]
struct AssignDoctor {
    #[serde(rename = "doctorID")]
    doctor_id: i64,
}

async fn assign_doctor(
    State(state): State<AppState>,
    Path(admission_id): Path<i64>,
    Json(payload): Json<AssignDoctor>,
) -> ApiResult<Json<Admission>> {
    let db = state.db()?;
    let admission = AdmissionLifecycle::new(&db).assign_doctor(admission_id, payload.doctor_id)?;
    Ok(Json(admission))
}

async fn delete_admission(
    State(state): State<AppState>,
    Path(admission_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let db = state.db()?;
    AdmissionLifecycle::new(&db).delete(admission_id)?;
    Ok(success("Admission deleted successfully"))
}

// =========================================================================
// Doctors
// =========================================================================

fn doctor_list(filter: DoctorFilter) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move {
        let db = state.db()?;
        let doctors = DoctorDirectory::new(&db).list(filter)?;
        Ok::<Json<Vec<DoctorOnShift>>, ApiError>(Json(doctors))
    })
}

fn doctor_total(filter: DoctorFilter) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move {
        let db = state.db()?;
        let count = DoctorDirectory::new(&db).count(filter)?;
        Ok::<Json<Total>, ApiError>(total(count))
    })
}

async fn doctor_list_all(State(state): State<AppState>) -> ApiResult<Json<Vec<DoctorOnShift>>> {
    let db = state.db()?;
    Ok(Json(DoctorDirectory::new(&db).list(DoctorFilter::All)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDoctor {
    doctor_name: String,
    shift_start: NaiveTime,
    shift_end: NaiveTime,
    #[serde(default)]
    status: DoctorStatus,
    password: Option<String>,
}

async fn create_doctor(
    State(state): State<AppState>,
    Json(payload): Json<CreateDoctor>,
) -> ApiResult<Json<Doctor>> {
    // Hash before taking the lock.
    let password_hash = payload.password.as_deref().map(hash_password).transpose()?;
    let doctor = NewDoctor {
        doctor_name: payload.doctor_name,
        shift_start: payload.shift_start,
        shift_end: payload.shift_end,
        status: payload.status,
    };

    let db = state.db()?;
    let created = DoctorDirectory::new(&db).create(&doctor, password_hash.as_deref())?;
    Ok(Json(created))
}

async fn update_doctor_shift(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    Json(update): Json<ShiftUpdate>,
) -> ApiResult<Json<Doctor>> {
    let db = state.db()?;
    let doctor = DoctorDirectory::new(&db).update_shift(doctor_id, &update)?;
    Ok(Json(doctor))
}

#[derive(Debug, Deserialize)]
struct NewPassword {
    password: String,
}

async fn update_doctor_password(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    Json(payload): Json<NewPassword>,
) -> ApiResult<Json<Value>> {
    if payload.password.is_empty() {
        return Err(ApiError::InvalidInput("Password must not be empty".into()));
    }
    let hash = hash_password(&payload.password)?;

    let db = state.db()?;
    DoctorDirectory::new(&db).update_password(doctor_id, &hash)?;
    Ok(success("Doctor password updated successfully"))
}

// =========================================================================
// Patients
// =========================================================================

async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<Vec<Patient>>> {
    let db = state.db()?;
    Ok(Json(PatientRegistry::new(&db).list()?))
}

async fn patients_total(State(state): State<AppState>) -> ApiResult<Json<Total>> {
    let db = state.db()?;
    Ok(total(PatientRegistry::new(&db).count()?))
}

async fn update_patient_details(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(details): Json<PatientDetails>,
) -> ApiResult<Json<Patient>> {
    let db = state.db()?;
    let patient = PatientRegistry::new(&db).update_details(&patient_id, &details)?;
    Ok(Json(patient))
}

async fn change_patient_password(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(payload): Json<PasswordChange>,
) -> ApiResult<Json<Value>> {
    super::change_patient_password(&state, &patient_id, &payload)
}

// =========================================================================
// Visitors
// =========================================================================

async fn list_visitors(State(state): State<AppState>) -> ApiResult<Json<Vec<Visitor>>> {
    let db = state.db()?;
    Ok(Json(VisitorLog::new(&db).list()?))
}

async fn visitors_total(State(state): State<AppState>) -> ApiResult<Json<Total>> {
    let db = state.db()?;
    Ok(total(VisitorLog::new(&db).count()?))
}

async fn delete_visitor(
    State(state): State<AppState>,
    Path(visitor_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let db = state.db()?;
    VisitorLog::new(&db).delete(visitor_id)?;
    Ok(success("Visitor deleted successfully"))
}

#[derive(Debug, Deserialize)]
struct VisitorIds {
    ids: Vec<i64>,
}

async fn delete_visitors(
    State(state): State<AppState>,
    Json(payload): Json<VisitorIds>,
) -> ApiResult<Json<Value>> {
    let db = state.db()?;
    let deleted = VisitorLog::new(&db).delete_many(&payload.ids)?;
    Ok(Json(json!({ "status": "success", "deleted": deleted })))
}

async fn delete_all_visitors(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let db = state.db()?;
    let deleted = VisitorLog::new(&db).delete_all()?;
    Ok(Json(json!({ "status": "success", "deleted": deleted })))
}

async fn purge_visitors(
    State(state): State<AppState>,
    Path(window): Path<RetentionWindow>,
) -> ApiResult<Json<Value>> {
    let db = state.db()?;
    let deleted = VisitorLog::new(&db).purge(window)?;
    Ok(Json(json!({ "status": "success", "deleted": deleted })))
}
