//! Hospital Admissions Core Library
//!
//! Record keeping for a hospital ward: patient registration, admissions,
//! doctor rosters and visitor logs, backed by SQLite.
//!
//! # Architecture
//!
//! ```text
//!   Intake ──► PatientRegistry ──► identifier (PAT-<initials>-<n>)
//!                   │
//!                   ▼
//!            AdmissionLifecycle ◄──── DoctorDirectory (duty status)
//!   Admitted ──► DoctorAssigned ──► Discharged
//!                   │
//!                   ▼
//!               VisitorLog            Reports (read-only aggregates)
//! ```
//!
//! Every service borrows a [`Database`] handle; nothing holds a global
//! connection. Callers that share one database across threads wrap it in
//! `Arc<Mutex<Database>>` and build services per request.
//!
//! # Modules
//!
//! - [`db`]: SQLite storage layer
//! - [`models`]: Domain types (Patient, Doctor, Admission, Visitor, report rows)
//! - [`identifier`]: Patient identifier generation
//! - [`auth`]: Argon2 password hashing
//! - [`services`]: Component operations with validation and lifecycle rules

pub mod auth;
pub mod db;
pub mod identifier;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    Admission, AdmissionFilter, AdmissionStage, Doctor, DoctorFilter, DoctorStatus, DutyStatus,
    NewAdmission, NewDoctor, NewPatient, NewVisitor, Patient, PatientDetails, RetentionWindow,
    ShiftUpdate, Visitor,
};
pub use services::{AdmissionLifecycle, DoctorDirectory, PatientRegistry, Reports, VisitorLog};

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum AdmissionsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage timeout: {0}")]
    StorageTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<db::DbError> for AdmissionsError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::Busy(_) => AdmissionsError::StorageTimeout(e.to_string()),
            db::DbError::Constraint(msg) => AdmissionsError::Validation(msg),
            db::DbError::NotFound(msg) => AdmissionsError::NotFound(msg),
            db::DbError::Sqlite(_) | db::DbError::InvalidData(_) => {
                AdmissionsError::Storage(e.to_string())
            }
        }
    }
}

impl From<auth::HashError> for AdmissionsError {
    fn from(e: auth::HashError) -> Self {
        AdmissionsError::Internal(e.to_string())
    }
}

pub type AdmissionsResult<T> = Result<T, AdmissionsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_classification() {
        let err: AdmissionsError = db::DbError::Constraint("FOREIGN KEY constraint failed".into()).into();
        assert!(matches!(err, AdmissionsError::Validation(_)));

        let err: AdmissionsError = db::DbError::NotFound("PAT-AB-1".into()).into();
        assert!(matches!(err, AdmissionsError::NotFound(_)));

        let err: AdmissionsError = db::DbError::InvalidData("bad status".into()).into();
        assert!(matches!(err, AdmissionsError::Storage(_)));
    }

    #[test]
    fn test_unauthorized_message_is_verbatim() {
        let err = AdmissionsError::Unauthorized(auth::WRONG_CREDENTIALS.into());
        assert_eq!(err.to_string(), "Wrong credentials");
    }
}
