//! Admission lifecycle.
//!
//! ```text
//! Admitted ──assign_doctor──► DoctorAssigned ──discharge──► Discharged
//!     │                          │  ▲
//!     │                          └──┘ record_procedure / record_diagnosis
//!     └──────────────────discharge───────────────────────────►
//! ```
//!
//! Discharged admissions are read-only; `delete` removes a row in any stage.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::models::{Admission, AdmissionFilter, DoctorPatient, NewAdmission, PatientAdmission};
use crate::{AdmissionsError, AdmissionsResult};

/// Admission records and their transitions.
pub struct AdmissionLifecycle<'a> {
    db: &'a Database,
    today: NaiveDate,
}

impl<'a> AdmissionLifecycle<'a> {
    /// Lifecycle dated with the current local date.
    pub fn new(db: &'a Database) -> Self {
        Self::as_of(db, super::today())
    }

    /// Lifecycle that stamps admissions and discharges with `today`.
    pub fn as_of(db: &'a Database, today: NaiveDate) -> Self {
        Self { db, today }
    }

    /// Admit a registered patient. The admission starts without a doctor.
    pub fn create(&self, patient_id: &str, intake: &NewAdmission) -> AdmissionsResult<Admission> {
        if !self.db.patient_exists(patient_id)? {
            return Err(AdmissionsError::Validation(format!(
                "Patient {} does not exist",
                patient_id
            )));
        }

        let admission_id = self.db.insert_admission(patient_id, intake, self.today)?;
        info!(admission_id, patient_id, "created admission");
        self.get(admission_id)
    }

    pub fn get(&self, admission_id: i64) -> AdmissionsResult<Admission> {
        self.db
            .get_admission(admission_id)?
            .ok_or_else(|| AdmissionsError::NotFound(format!("Admission {}", admission_id)))
    }

    /// Set or replace the attending doctor.
    pub fn assign_doctor(&self, admission_id: i64, doctor_id: i64) -> AdmissionsResult<Admission> {
        self.open_admission(admission_id)?;
        if !self.db.doctor_exists(doctor_id)? {
            return Err(AdmissionsError::Validation(format!(
                "Doctor {} does not exist",
                doctor_id
            )));
        }

        let updated = self.db.set_admission_doctor(admission_id, doctor_id)?;
        self.require_updated(admission_id, updated)?;
        info!(admission_id, doctor_id, "assigned doctor");
        self.get(admission_id)
    }

    pub fn record_procedure(&self, admission_id: i64, procedure: &str) -> AdmissionsResult<Admission> {
        self.open_admission(admission_id)?;
        let updated = self.db.set_admission_procedure(admission_id, procedure)?;
        self.require_updated(admission_id, updated)?;
        info!(admission_id, "recorded procedure");
        self.get(admission_id)
    }

    pub fn record_diagnosis(&self, admission_id: i64, diagnosis: &str) -> AdmissionsResult<Admission> {
        self.open_admission(admission_id)?;
        let updated = self.db.set_admission_diagnosis(admission_id, diagnosis)?;
        self.require_updated(admission_id, updated)?;
        info!(admission_id, "recorded diagnosis");
        self.get(admission_id)
    }

    /// Discharge the patient today. A second discharge is a conflict.
    pub fn discharge(&self, admission_id: i64) -> AdmissionsResult<Admission> {
        self.open_admission(admission_id)?;
        let updated = self.db.set_admission_discharge(admission_id, self.today)?;
        self.require_updated(admission_id, updated)?;
        info!(admission_id, discharge_date = %self.today, "discharged admission");
        self.get(admission_id)
    }

    /// Remove an admission permanently.
    pub fn delete(&self, admission_id: i64) -> AdmissionsResult<()> {
        if !self.db.delete_admission(admission_id)? {
            return Err(AdmissionsError::NotFound(format!("Admission {}", admission_id)));
        }
        info!(admission_id, "deleted admission");
        Ok(())
    }

    pub fn list(&self, filter: AdmissionFilter) -> AdmissionsResult<Vec<Admission>> {
        let admissions = self.db.list_admissions(filter)?;
        debug!(?filter, count = admissions.len(), "listed admissions");
        Ok(admissions)
    }

    pub fn count(&self, filter: AdmissionFilter) -> AdmissionsResult<i64> {
        Ok(self.db.count_admissions(filter)?)
    }

    /// A patient's admission history, newest first.
    pub fn list_for_patient(&self, patient_id: &str) -> AdmissionsResult<Vec<PatientAdmission>> {
        self.require_patient(patient_id)?;
        Ok(self.db.list_patient_admissions(patient_id)?)
    }

    pub fn count_for_patient(&self, patient_id: &str) -> AdmissionsResult<i64> {
        self.require_patient(patient_id)?;
        Ok(self.db.count_patient_admissions(patient_id)?)
    }

    /// Patients currently admitted under a doctor.
    pub fn patients_of_doctor(&self, doctor_id: i64) -> AdmissionsResult<Vec<DoctorPatient>> {
        if !self.db.doctor_exists(doctor_id)? {
            return Err(AdmissionsError::NotFound(format!("Doctor {}", doctor_id)));
        }
        Ok(self.db.list_doctor_patients(doctor_id)?)
    }

    fn require_patient(&self, patient_id: &str) -> AdmissionsResult<()> {
        if !self.db.patient_exists(patient_id)? {
            return Err(AdmissionsError::NotFound(format!("Patient {}", patient_id)));
        }
        Ok(())
    }

    /// Explain an update that matched no open admission.
    ///
    /// The row was deleted or discharged after [`Self::open_admission`] ran,
    /// possibly through another connection.
    fn require_updated(&self, admission_id: i64, updated: bool) -> AdmissionsResult<()> {
        if updated {
            return Ok(());
        }
        self.open_admission(admission_id)?;
        Err(AdmissionsError::Conflict(format!(
            "Admission {} changed while it was being updated",
            admission_id
        )))
    }

    /// Fetch an admission that still accepts changes.
    fn open_admission(&self, admission_id: i64) -> AdmissionsResult<Admission> {
        let admission = self.get(admission_id)?;
        if let Some(discharged) = admission.discharge_date {
            warn!(admission_id, %discharged, "rejected change to discharged admission");
            return Err(AdmissionsError::Conflict(format!(
                "Admission {} was discharged on {}",
                admission_id, discharged
            )));
        }
        Ok(admission)
    }
}
