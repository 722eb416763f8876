//! Admission database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{full_name, Admission, AdmissionFilter, DoctorPatient, NewAdmission, PatientAdmission};

const ADMISSION_COLUMNS: &str = r#"
    admission_id, patient_id, doctor_id, admission_date,
    complaints, medications, "procedure", diagnosis, discharge_date
"#;

impl AdmissionFilter {
    fn where_clause(&self) -> &'static str {
        match self {
            AdmissionFilter::All => "1 = 1",
            AdmissionFilter::NoDoctor => "doctor_id IS NULL",
            AdmissionFilter::NotDischarged => "discharge_date IS NULL",
        }
    }

    /// Unassigned admissions list oldest first; every other filter newest first.
    fn order_clause(&self) -> &'static str {
        match self {
            AdmissionFilter::NoDoctor => "admission_date ASC, admission_id ASC",
            _ => "admission_date DESC, admission_id DESC",
        }
    }
}

impl Database {
    /// Insert a new admission with no doctor, returning its identifier.
    pub fn insert_admission(
        &self,
        patient_id: &str,
        admission: &NewAdmission,
        admission_date: NaiveDate,
    ) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO admissions (patient_id, admission_date, complaints, medications)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                patient_id,
                admission_date,
                admission.complaints,
                admission.medications,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get an admission by identifier.
    pub fn get_admission(&self, admission_id: i64) -> DbResult<Option<Admission>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM admissions WHERE admission_id = ?", ADMISSION_COLUMNS),
                [admission_id],
                admission_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List admissions matching a filter.
    pub fn list_admissions(&self, filter: AdmissionFilter) -> DbResult<Vec<Admission>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM admissions WHERE {} ORDER BY {}",
            ADMISSION_COLUMNS,
            filter.where_clause(),
            filter.order_clause()
        ))?;

        let rows = stmt.query_map([], admission_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count admissions matching a filter.
    pub fn count_admissions(&self, filter: AdmissionFilter) -> DbResult<i64> {
        self.conn
            .query_row(
                &format!("SELECT COUNT(*) FROM admissions WHERE {}", filter.where_clause()),
                [],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    /// Set the attending doctor on an admission that is not yet discharged.
    pub fn set_admission_doctor(&self, admission_id: i64, doctor_id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE admissions SET doctor_id = ? WHERE admission_id = ? AND discharge_date IS NULL",
            [doctor_id, admission_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Overwrite the recorded procedure of an open admission.
    pub fn set_admission_procedure(&self, admission_id: i64, procedure: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"UPDATE admissions SET "procedure" = ? WHERE admission_id = ? AND discharge_date IS NULL"#,
            params![procedure, admission_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Overwrite the recorded diagnosis of an open admission.
    pub fn set_admission_diagnosis(&self, admission_id: i64, diagnosis: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE admissions SET diagnosis = ? WHERE admission_id = ? AND discharge_date IS NULL",
            params![diagnosis, admission_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Record the discharge date. A date already set is never overwritten.
    pub fn set_admission_discharge(&self, admission_id: i64, discharge_date: NaiveDate) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE admissions SET discharge_date = ? WHERE admission_id = ? AND discharge_date IS NULL",
            params![discharge_date, admission_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete an admission.
    pub fn delete_admission(&self, admission_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM admissions WHERE admission_id = ?", [admission_id])?;
        Ok(rows_affected > 0)
    }

    /// A patient's admission history, newest first, with doctor names.
    pub fn list_patient_admissions(&self, patient_id: &str) -> DbResult<Vec<PatientAdmission>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT a.admission_id, d.doctor_name, a.complaints, a.medications,
                   a."procedure", a.diagnosis, a.admission_date, a.discharge_date
            FROM admissions a
            LEFT JOIN doctors d ON a.doctor_id = d.doctor_id
            WHERE a.patient_id = ?
            ORDER BY a.admission_date DESC, a.discharge_date DESC, a.admission_id DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(PatientAdmission {
                admission_id: row.get(0)?,
                doctor_name: row.get(1)?,
                complaints: row.get(2)?,
                medications: row.get(3)?,
                procedure: row.get(4)?,
                diagnosis: row.get(5)?,
                admission_date: row.get(6)?,
                discharge_date: row.get(7)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count a patient's admissions.
    pub fn count_patient_admissions(&self, patient_id: &str) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM admissions WHERE patient_id = ?",
                [patient_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    /// Patients currently admitted under a doctor.
    pub fn list_doctor_patients(&self, doctor_id: i64) -> DbResult<Vec<DoctorPatient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT a.admission_id, p.patient_id, p.first_name, p.last_name, p.middle_name,
                   p.sex, p.height, p.weight,
                   a.complaints, a.medications, a."procedure", a.diagnosis
            FROM admissions a
            JOIN patients p ON p.patient_id = a.patient_id
            WHERE a.doctor_id = ?
              AND a.discharge_date IS NULL
            ORDER BY a.admission_date ASC, a.admission_id ASC
            "#,
        )?;

        let rows = stmt.query_map([doctor_id], |row| {
            let first: String = row.get(2)?;
            let last: String = row.get(3)?;
            let middle: Option<String> = row.get(4)?;
            Ok(DoctorPatient {
                admission_id: row.get(0)?,
                patient_id: row.get(1)?,
                full_name: full_name(&first, &last, middle.as_deref()),
                sex: row.get(5)?,
                height: row.get(6)?,
                weight: row.get(7)?,
                complaints: row.get(8)?,
                medications: row.get(9)?,
                procedure: row.get(10)?,
                diagnosis: row.get(11)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn admission_from_row(row: &Row<'_>) -> rusqlite::Result<Admission> {
    Ok(Admission {
        admission_id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        admission_date: row.get(3)?,
        complaints: row.get(4)?,
        medications: row.get(5)?,
        procedure: row.get(6)?,
        diagnosis: row.get(7)?,
        discharge_date: row.get(8)?,
    })
}
