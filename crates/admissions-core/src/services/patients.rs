//! Patient registry.

use tracing::{debug, info, warn};

use crate::auth::{authenticate, hash_password, password_matches, INCORRECT_ORIGINAL_PASSWORD};
use crate::db::Database;
use crate::models::{NewPatient, Patient, PatientDetails};
use crate::{AdmissionsError, AdmissionsResult};

/// Registration, lookup and credential management for patients.
pub struct PatientRegistry<'a> {
    db: &'a Database,
}

impl<'a> PatientRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a patient and return the stored record with its new identifier.
    ///
    /// `password_hash` must already be hashed; see [`crate::auth::hash_password`].
    pub fn create(&self, new: &NewPatient, password_hash: Option<&str>) -> AdmissionsResult<Patient> {
        let missing = new.missing_fields();
        if !missing.is_empty() {
            return Err(AdmissionsError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let patient = self.db.insert_patient(new, password_hash)?;
        info!(patient_id = %patient.patient_id, "registered patient");
        Ok(patient)
    }

    pub fn get(&self, patient_id: &str) -> AdmissionsResult<Patient> {
        self.db
            .get_patient(patient_id)?
            .ok_or_else(|| AdmissionsError::NotFound(format!("Patient {}", patient_id)))
    }

    /// Look up a patient, returning `None` when the identifier is unknown.
    pub fn find(&self, patient_id: &str) -> AdmissionsResult<Option<Patient>> {
        Ok(self.db.get_patient(patient_id)?)
    }

    pub fn list(&self) -> AdmissionsResult<Vec<Patient>> {
        let patients = self.db.list_patients()?;
        debug!(count = patients.len(), "listed patients");
        Ok(patients)
    }

    pub fn count(&self) -> AdmissionsResult<i64> {
        Ok(self.db.count_patients()?)
    }

    /// Overwrite the mutable details present in `details`.
    ///
    /// Identifier, names, date of birth and sex never change here.
    pub fn update_details(&self, patient_id: &str, details: &PatientDetails) -> AdmissionsResult<Patient> {
        if details.is_empty() {
            return self.get(patient_id);
        }
        if !self.db.update_patient_details(patient_id, details)? {
            return Err(AdmissionsError::NotFound(format!("Patient {}", patient_id)));
        }
        info!(patient_id, "updated patient details");
        self.get(patient_id)
    }

    /// Store an already hashed password.
    pub fn update_password(&self, patient_id: &str, password_hash: &str) -> AdmissionsResult<()> {
        if !self.db.update_patient_password(patient_id, password_hash)? {
            return Err(AdmissionsError::NotFound(format!("Patient {}", patient_id)));
        }
        info!(patient_id, "updated patient password");
        Ok(())
    }

    /// Check a login attempt and return the patient on success.
    ///
    /// Unknown identifiers and wrong passwords fail identically.
    pub fn verify_credentials(&self, patient_id: &str, password: &str) -> AdmissionsResult<Patient> {
        authenticate(self.find(patient_id)?, password)
            .inspect_err(|_| warn!(patient_id, "rejected patient login"))
    }

    /// Replace the password after confirming the current one.
    pub fn change_password(
        &self,
        patient_id: &str,
        original_password: &str,
        new_password: &str,
    ) -> AdmissionsResult<()> {
        let patient = self.get(patient_id)?;
        if !password_matches(&patient, original_password) {
            warn!(patient_id, "rejected password change");
            return Err(AdmissionsError::Unauthorized(INCORRECT_ORIGINAL_PASSWORD.into()));
        }

        let hash = hash_password(new_password)?;
        self.replace_password(&patient, &hash)
    }

    /// Store `password_hash` unless the password changed since `current` was read.
    ///
    /// `current` is the record the caller checked the original password
    /// against; a newer password wins and this call is rejected.
    pub fn replace_password(&self, current: &Patient, password_hash: &str) -> AdmissionsResult<()> {
        let patient_id = current.patient_id.as_str();
        if !self
            .db
            .replace_patient_password(patient_id, current.password_hash.as_deref(), password_hash)?
        {
            self.get(patient_id)?;
            warn!(patient_id, "password changed concurrently");
            return Err(AdmissionsError::Unauthorized(INCORRECT_ORIGINAL_PASSWORD.into()));
        }
        info!(patient_id, "updated patient password");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn intake() -> NewPatient {
        let mut new = NewPatient::new(
            "Emilio",
            "Aguinaldo",
            NaiveDate::from_ymd_opt(1969, 3, 22).unwrap(),
            "M",
        );
        new.middle_name = Some("Famy".into());
        new.details = PatientDetails {
            height: Some(170.0),
            weight: Some(68.2),
            marital_status: Some("Married".into()),
            contact_number: Some("09171234567".into()),
            email_address: Some("emilio@example.com".into()),
            street_address: Some("1 Kawit St".into()),
            city: Some("Kawit".into()),
            province: Some("Cavite".into()),
            zip_code: Some("4104".into()),
            emergency_name: Some("Hilaria".into()),
            emergency_relationship: Some("Spouse".into()),
            emergency_contact_number: Some("09179876543".into()),
        };
        new
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);

        let new = intake();
        let created = registry.create(&new, None).unwrap();
        let fetched = registry.get(&created.patient_id).unwrap();

        assert_eq!(fetched, Patient::from_new(created.patient_id.clone(), new, None));
        assert!(created.patient_id.starts_with("PAT-EA-"));
    }

    #[test]
    fn test_create_requires_fields() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);

        let mut new = intake();
        new.last_name = "  ".into();
        let err = registry.create(&new, None).unwrap_err();
        assert!(matches!(err, AdmissionsError::Validation(msg) if msg.contains("lastName")));
        assert_eq!(registry.count().unwrap(), 0);
    }

    #[test]
    fn test_get_missing() {
        let db = setup_db();
        let err = PatientRegistry::new(&db).get("PAT-NO-1").unwrap_err();
        assert!(matches!(err, AdmissionsError::NotFound(_)));
    }

    #[test]
    fn test_update_details_keeps_identity() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);
        let created = registry.create(&intake(), None).unwrap();

        let updated = registry
            .update_details(
                &created.patient_id,
                &PatientDetails {
                    weight: Some(70.0),
                    city: Some("Imus".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.patient_id, created.patient_id);
        assert_eq!(updated.first_name, "Emilio");
        assert_eq!(updated.date_of_birth, created.date_of_birth);
        assert_eq!(updated.details.weight, Some(70.0));
        assert_eq!(updated.details.city, Some("Imus".into()));
        assert_eq!(updated.details.province, Some("Cavite".into()));
    }

    #[test]
    fn test_empty_update_returns_patient_unchanged() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);
        let created = registry.create(&intake(), None).unwrap();

        let unchanged = registry
            .update_details(&created.patient_id, &PatientDetails::default())
            .unwrap();
        assert_eq!(unchanged, created);
    }

    #[test]
    fn test_update_details_missing_patient() {
        let db = setup_db();
        let err = PatientRegistry::new(&db)
            .update_details("PAT-NO-1", &PatientDetails::default())
            .unwrap_err();
        assert!(matches!(err, AdmissionsError::NotFound(_)));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);
        let hash = hash_password("malolos").unwrap();
        let created = registry.create(&intake(), Some(&hash)).unwrap();

        let ok = registry.verify_credentials(&created.patient_id, "malolos").unwrap();
        assert_eq!(ok.patient_id, created.patient_id);

        let wrong_password = registry
            .verify_credentials(&created.patient_id, "biak-na-bato")
            .unwrap_err();
        let unknown_id = registry.verify_credentials("PAT-ZZ-9", "malolos").unwrap_err();

        assert!(matches!(wrong_password, AdmissionsError::Unauthorized(_)));
        assert!(matches!(unknown_id, AdmissionsError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_id.to_string());
    }

    #[test]
    fn test_login_without_password_fails() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);
        let created = registry.create(&intake(), None).unwrap();

        let err = registry.verify_credentials(&created.patient_id, "").unwrap_err();
        assert!(matches!(err, AdmissionsError::Unauthorized(_)));
    }

    #[test]
    fn test_change_password() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);
        let hash = hash_password("old").unwrap();
        let created = registry.create(&intake(), Some(&hash)).unwrap();

        let err = registry.change_password(&created.patient_id, "nope", "new").unwrap_err();
        assert!(matches!(err, AdmissionsError::Unauthorized(_)));

        registry.change_password(&created.patient_id, "old", "new").unwrap();
        assert!(registry.verify_credentials(&created.patient_id, "new").is_ok());
        assert!(registry.verify_credentials(&created.patient_id, "old").is_err());

        let err = registry.change_password("PAT-NO-1", "old", "new").unwrap_err();
        assert!(matches!(err, AdmissionsError::NotFound(_)));
    }

    #[test]
    fn test_replace_password_loses_to_newer_change() {
        let db = setup_db();
        let registry = PatientRegistry::new(&db);
        let hash = hash_password("old").unwrap();
        let created = registry.create(&intake(), Some(&hash)).unwrap();

        let read_before_change = registry.get(&created.patient_id).unwrap();
        registry.change_password(&created.patient_id, "old", "newer").unwrap();

        let stale = hash_password("stale").unwrap();
        let err = registry.replace_password(&read_before_change, &stale).unwrap_err();
        assert!(matches!(err, AdmissionsError::Unauthorized(_)));
        assert!(registry.verify_credentials(&created.patient_id, "newer").is_ok());
    }
}
