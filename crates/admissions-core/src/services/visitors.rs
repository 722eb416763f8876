//! Visitor log with retention purges.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::db::Database;
use crate::models::{NewVisitor, RetentionWindow, Visitor};
use crate::{AdmissionsError, AdmissionsResult};

/// Visit records for admitted patients.
pub struct VisitorLog<'a> {
    db: &'a Database,
    today: NaiveDate,
}

impl<'a> VisitorLog<'a> {
    /// Log dated with the current local date.
    pub fn new(db: &'a Database) -> Self {
        Self::as_of(db, super::today())
    }

    /// Log that dates visits and retention cutoffs from `today`.
    pub fn as_of(db: &'a Database, today: NaiveDate) -> Self {
        Self { db, today }
    }

    /// Record a visit to a registered patient, dated today.
    pub fn log(&self, patient_id: &str, visitor: &NewVisitor) -> AdmissionsResult<Visitor> {
        if visitor.visitor_name.trim().is_empty() {
            return Err(AdmissionsError::Validation("Missing required fields: visitorName".into()));
        }
        if !self.db.patient_exists(patient_id)? {
            return Err(AdmissionsError::Validation(format!(
                "Patient {} does not exist",
                patient_id
            )));
        }

        let visitor_id = self.db.insert_visitor(patient_id, visitor, self.today)?;
        info!(visitor_id, patient_id, "logged visitor");
        self.get(visitor_id)
    }

    pub fn get(&self, visitor_id: i64) -> AdmissionsResult<Visitor> {
        self.db
            .get_visitor(visitor_id)?
            .ok_or_else(|| AdmissionsError::NotFound(format!("Visitor {}", visitor_id)))
    }

    /// Every visitor, most recently logged first.
    pub fn list(&self) -> AdmissionsResult<Vec<Visitor>> {
        let visitors = self.db.list_visitors()?;
        debug!(count = visitors.len(), "listed visitors");
        Ok(visitors)
    }

    pub fn count(&self) -> AdmissionsResult<i64> {
        Ok(self.db.count_visitors()?)
    }

    /// A patient's visitors, latest visit first.
    pub fn list_for_patient(&self, patient_id: &str) -> AdmissionsResult<Vec<Visitor>> {
        self.require_patient(patient_id)?;
        Ok(self.db.list_patient_visitors(patient_id)?)
    }

    pub fn count_for_patient(&self, patient_id: &str) -> AdmissionsResult<i64> {
        self.require_patient(patient_id)?;
        Ok(self.db.count_patient_visitors(patient_id)?)
    }

    pub fn delete(&self, visitor_id: i64) -> AdmissionsResult<()> {
        if !self.db.delete_visitor(visitor_id)? {
            return Err(AdmissionsError::NotFound(format!("Visitor {}", visitor_id)));
        }
        info!(visitor_id, "deleted visitor");
        Ok(())
    }

    /// Delete the listed visitors. Unknown identifiers are skipped.
    pub fn delete_many(&self, visitor_ids: &[i64]) -> AdmissionsResult<usize> {
        let deleted = self.db.delete_visitors(visitor_ids)?;
        info!(requested = visitor_ids.len(), deleted, "deleted visitors");
        Ok(deleted)
    }

    pub fn delete_all(&self) -> AdmissionsResult<usize> {
        let deleted = self.db.delete_all_visitors()?;
        info!(deleted, "deleted all visitors");
        Ok(deleted)
    }

    /// Delete visits strictly older than the window.
    pub fn purge(&self, window: RetentionWindow) -> AdmissionsResult<usize> {
        let cutoff = window.cutoff(self.today);
        let deleted = self.db.delete_visitors_before(cutoff)?;
        info!(?window, %cutoff, deleted, "purged visitors");
        Ok(deleted)
    }

    pub fn delete_past_month(&self) -> AdmissionsResult<usize> {
        self.purge(RetentionWindow::OneMonth)
    }

    pub fn delete_past_three_months(&self) -> AdmissionsResult<usize> {
        self.purge(RetentionWindow::ThreeMonths)
    }

    pub fn delete_past_six_months(&self) -> AdmissionsResult<usize> {
        self.purge(RetentionWindow::SixMonths)
    }

    pub fn delete_past_year(&self) -> AdmissionsResult<usize> {
        self.purge(RetentionWindow::OneYear)
    }

    fn require_patient(&self, patient_id: &str) -> AdmissionsResult<()> {
        if !self.db.patient_exists(patient_id)? {
            return Err(AdmissionsError::NotFound(format!("Patient {}", patient_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn setup_db() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let patient = db
            .insert_patient(&NewPatient::new("Melchora", "Aquino", d(1812, 1, 6), "F"), None)
            .unwrap();
        (db, patient.patient_id)
    }

    fn visitor(name: &str) -> NewVisitor {
        NewVisitor {
            visitor_name: name.into(),
            relationship: Some("Child".into()),
            contact_number: Some("09170000000".into()),
        }
    }

    #[test]
    fn test_log_and_list() {
        let (db, patient_id) = setup_db();
        VisitorLog::as_of(&db, d(2024, 5, 1)).log(&patient_id, &visitor("Early")).unwrap();
        let log = VisitorLog::as_of(&db, d(2024, 5, 3));
        let late = log.log(&patient_id, &visitor("Late")).unwrap();
        assert_eq!(late.visit_date, d(2024, 5, 3));

        let all = log.list().unwrap();
        assert_eq!(all[0].visitor_name, "Late");
        let for_patient = log.list_for_patient(&patient_id).unwrap();
        assert_eq!(for_patient[0].visitor_name, "Late");
        assert_eq!(log.count().unwrap(), 2);
        assert_eq!(log.count_for_patient(&patient_id).unwrap(), 2);
    }

    #[test]
    fn test_log_rejects_unknown_patient() {
        let (db, _) = setup_db();
        let log = VisitorLog::new(&db);

        let err = log.log("PAT-NO-1", &visitor("Ghost")).unwrap_err();
        assert!(matches!(err, AdmissionsError::Validation(_)));
        let err = log.log("PAT-NO-1", &visitor("")).unwrap_err();
        assert!(matches!(err, AdmissionsError::Validation(_)));
        assert_eq!(log.count().unwrap(), 0);

        assert!(matches!(log.list_for_patient("PAT-NO-1"), Err(AdmissionsError::NotFound(_))));
    }

    #[test]
    fn test_purge_keeps_boundary_day() {
        let (db, patient_id) = setup_db();
        VisitorLog::as_of(&db, d(2024, 3, 15)).log(&patient_id, &visitor("Boundary")).unwrap();
        VisitorLog::as_of(&db, d(2024, 3, 14)).log(&patient_id, &visitor("Older")).unwrap();

        let log = VisitorLog::as_of(&db, d(2024, 6, 15));
        assert_eq!(log.delete_past_three_months().unwrap(), 1);

        let remaining = log.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].visitor_name, "Boundary");
    }

    #[test]
    fn test_fixed_windows() {
        let (db, patient_id) = setup_db();
        for date in [d(2024, 6, 1), d(2024, 4, 1), d(2024, 1, 1), d(2023, 6, 1)] {
            VisitorLog::as_of(&db, date).log(&patient_id, &visitor("V")).unwrap();
        }

        let log = VisitorLog::as_of(&db, d(2024, 6, 10));
        assert_eq!(log.delete_past_year().unwrap(), 1);
        assert_eq!(log.delete_past_six_months().unwrap(), 0);
        assert_eq!(log.delete_past_three_months().unwrap(), 1);
        assert_eq!(log.delete_past_month().unwrap(), 1);
        assert_eq!(log.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_variants() {
        let (db, patient_id) = setup_db();
        let log = VisitorLog::new(&db);
        let ids: Vec<i64> = (0..4)
            .map(|i| log.log(&patient_id, &visitor(&format!("V{}", i))).unwrap().visitor_id)
            .collect();

        log.delete(ids[0]).unwrap();
        assert!(matches!(log.delete(ids[0]), Err(AdmissionsError::NotFound(_))));

        assert_eq!(log.delete_many(&[]).unwrap(), 0);
        assert_eq!(log.delete_many(&[ids[1], ids[2], 9999]).unwrap(), 2);
        assert_eq!(log.delete_all().unwrap(), 1);
        assert_eq!(log.count().unwrap(), 0);
    }
}
