//! Doctor directory.

use chrono::NaiveTime;
use tracing::{debug, info, warn};

use crate::auth::authenticate;
use crate::db::Database;
use crate::models::{Doctor, DoctorFilter, DoctorOnShift, NewDoctor, ShiftUpdate};
use crate::{AdmissionsError, AdmissionsResult};

/// Doctor records with duty status evaluated at a fixed time of day.
pub struct DoctorDirectory<'a> {
    db: &'a Database,
    now: NaiveTime,
}

impl<'a> DoctorDirectory<'a> {
    /// Directory evaluated at the current local time.
    pub fn new(db: &'a Database) -> Self {
        Self::at(db, chrono::Local::now().time())
    }

    /// Directory evaluated at `now`.
    pub fn at(db: &'a Database, now: NaiveTime) -> Self {
        Self { db, now }
    }

    /// Add a doctor. `password_hash` must already be hashed.
    pub fn create(&self, doctor: &NewDoctor, password_hash: Option<&str>) -> AdmissionsResult<Doctor> {
        if doctor.doctor_name.trim().is_empty() {
            return Err(AdmissionsError::Validation("Missing required fields: doctorName".into()));
        }

        let doctor_id = self.db.insert_doctor(doctor, password_hash)?;
        info!(doctor_id, "created doctor");
        self.get(doctor_id)
    }

    pub fn get(&self, doctor_id: i64) -> AdmissionsResult<Doctor> {
        self.db
            .get_doctor(doctor_id)?
            .ok_or_else(|| AdmissionsError::NotFound(format!("Doctor {}", doctor_id)))
    }

    /// Look up a doctor, returning `None` when the identifier is unknown.
    pub fn find(&self, doctor_id: i64) -> AdmissionsResult<Option<Doctor>> {
        Ok(self.db.get_doctor(doctor_id)?)
    }

    /// Doctors in a filter, each annotated with duty status.
    pub fn list(&self, filter: DoctorFilter) -> AdmissionsResult<Vec<DoctorOnShift>> {
        let doctors: Vec<DoctorOnShift> = self
            .db
            .list_doctors(filter.status())?
            .into_iter()
            .map(|doctor| DoctorOnShift::at(doctor, self.now))
            .filter(|d| filter.duty().map_or(true, |duty| d.duty_status == duty))
            .collect();
        debug!(?filter, count = doctors.len(), "listed doctors");
        Ok(doctors)
    }

    pub fn count(&self, filter: DoctorFilter) -> AdmissionsResult<i64> {
        if filter.duty().is_some() {
            return Ok(self.list(filter)?.len() as i64);
        }
        Ok(self.db.count_doctors(filter.status())?)
    }

    pub fn update_shift(&self, doctor_id: i64, update: &ShiftUpdate) -> AdmissionsResult<Doctor> {
        if !self.db.update_doctor_shift(doctor_id, update)? {
            return Err(AdmissionsError::NotFound(format!("Doctor {}", doctor_id)));
        }
        info!(doctor_id, status = ?update.status, "updated doctor shift");
        self.get(doctor_id)
    }

    /// Store an already hashed password.
    pub fn update_password(&self, doctor_id: i64, password_hash: &str) -> AdmissionsResult<()> {
        if !self.db.update_doctor_password(doctor_id, password_hash)? {
            return Err(AdmissionsError::NotFound(format!("Doctor {}", doctor_id)));
        }
        info!(doctor_id, "updated doctor password");
        Ok(())
    }

    /// Check a login attempt and return the doctor on success.
    pub fn verify_credentials(&self, doctor_id: i64, password: &str) -> AdmissionsResult<Doctor> {
        authenticate(self.find(doctor_id)?, password)
            .inspect_err(|_| warn!(doctor_id, "rejected doctor login"))
    }
}
