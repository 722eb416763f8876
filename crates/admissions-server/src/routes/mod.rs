//! Route handlers, one module per URL prefix.

pub(crate) mod admin;
pub(crate) mod admission;
pub(crate) mod doctor;
pub(crate) mod patient;
pub(crate) mod reports;

use admissions_core::auth::{authenticate, hash_password, password_matches, INCORRECT_ORIGINAL_PASSWORD};
use admissions_core::models::{Patient, Total};
use admissions_core::{AdmissionsError, PatientRegistry};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::{ApiResult, AppState};

/// `{"status":"success","message":...}` acknowledgement body.
pub(crate) fn success(message: impl Into<String>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": message.into(),
    }))
}

pub(crate) fn total(count: i64) -> Json<Total> {
    Json(Total::from(count))
}

/// Password change form; the original password must match before the new one is stored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordChange {
    pub original_password: String,
    pub new_password: String,
}

/// Verify a patient login with the database unlocked during the hash check.
pub(crate) fn login_patient(state: &AppState, patient_id: &str, password: &str) -> ApiResult<Patient> {
    let db = state.db()?;
    let candidate = PatientRegistry::new(&db).find(patient_id)?;
    drop(db);

    let patient = authenticate(candidate, password)
        .inspect_err(|_| warn!(patient_id, "rejected patient login"))?;
    Ok(patient)
}

/// Confirm the original password, then store the new one.
///
/// Argon2 runs between two short database locks; a password changed in
/// between makes this call fail instead of overwriting it.
pub(crate) fn change_patient_password(
    state: &AppState,
    patient_id: &str,
    change: &PasswordChange,
) -> ApiResult<Json<Value>> {
    let db = state.db()?;
    let patient = PatientRegistry::new(&db).get(patient_id)?;
    drop(db);

    if !password_matches(&patient, &change.original_password) {
        warn!(patient_id, "rejected password change");
        return Err(AdmissionsError::Unauthorized(INCORRECT_ORIGINAL_PASSWORD.into()).into());
    }
    let hash = hash_password(&change.new_password)?;

    let db = state.db()?;
    PatientRegistry::new(&db).replace_password(&patient, &hash)?;
    Ok(success("Password successfully changed"))
}
