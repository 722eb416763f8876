//! Patient database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::identifier::{format_patient_id, parse_sequence, patient_id_prefix};
use crate::models::{NewPatient, Patient, PatientDetails};

const PATIENT_COLUMNS: &str = r#"
    patient_id, first_name, last_name, middle_name, date_of_birth, sex,
    height, weight, marital_status, contact_number, email_address,
    street_address, city, province, zip_code,
    emergency_name, emergency_relationship, emergency_contact_number,
    password_hash
"#;

impl Database {
    /// Insert a new patient under a freshly generated identifier.
    ///
    /// The sequence bump, the insert and the read-back share one
    /// immediate transaction, so concurrent writers with the same
    /// initials never receive the same identifier.
    pub fn insert_patient(&self, new: &NewPatient, password_hash: Option<&str>) -> DbResult<Patient> {
        let prefix = patient_id_prefix(&new.first_name, &new.last_name).ok_or_else(|| {
            DbError::Constraint("Patient first and last name are required".into())
        })?;

        let tx = self.write_transaction()?;
        let sequence = next_patient_sequence(&tx, &prefix)?;
        let patient_id = format_patient_id(&prefix, sequence);

        tx.execute(
            r#"
            INSERT INTO patients (
                patient_id, first_name, last_name, middle_name, date_of_birth, sex,
                height, weight, marital_status, contact_number, email_address,
                street_address, city, province, zip_code,
                emergency_name, emergency_relationship, emergency_contact_number,
                password_hash
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            "#,
            params![
                patient_id,
                new.first_name,
                new.last_name,
                new.middle_name,
                new.date_of_birth,
                new.sex,
                new.details.height,
                new.details.weight,
                new.details.marital_status,
                new.details.contact_number,
                new.details.email_address,
                new.details.street_address,
                new.details.city,
                new.details.province,
                new.details.zip_code,
                new.details.emergency_name,
                new.details.emergency_relationship,
                new.details.emergency_contact_number,
                password_hash,
            ],
        )?;

        let patient = query_patient(&tx, &patient_id)?
            .ok_or_else(|| DbError::NotFound(format!("Patient {} after insert", patient_id)))?;
        tx.commit()?;
        Ok(patient)
    }

    /// Get a patient by identifier. Matching is case-sensitive.
    pub fn get_patient(&self, patient_id: &str) -> DbResult<Option<Patient>> {
        query_patient(&self.conn, patient_id)
    }

    /// Check whether a patient exists.
    pub fn patient_exists(&self, patient_id: &str) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM patients WHERE patient_id = ?",
                [patient_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// List all patients in registration order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients ORDER BY rowid",
            PATIENT_COLUMNS
        ))?;

        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count all patients.
    pub fn count_patients(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Overwrite the mutable details that are set in `details`.
    ///
    /// Returns false when no such patient exists.
    pub fn update_patient_details(&self, patient_id: &str, details: &PatientDetails) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                height = COALESCE(?2, height),
                weight = COALESCE(?3, weight),
                marital_status = COALESCE(?4, marital_status),
                contact_number = COALESCE(?5, contact_number),
                email_address = COALESCE(?6, email_address),
                street_address = COALESCE(?7, street_address),
                city = COALESCE(?8, city),
                province = COALESCE(?9, province),
                zip_code = COALESCE(?10, zip_code),
                emergency_name = COALESCE(?11, emergency_name),
                emergency_relationship = COALESCE(?12, emergency_relationship),
                emergency_contact_number = COALESCE(?13, emergency_contact_number)
            WHERE patient_id = ?1
            "#,
            params![
                patient_id,
                details.height,
                details.weight,
                details.marital_status,
                details.contact_number,
                details.email_address,
                details.street_address,
                details.city,
                details.province,
                details.zip_code,
                details.emergency_name,
                details.emergency_relationship,
                details.emergency_contact_number,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Replace a patient's password hash.
    pub fn update_patient_password(&self, patient_id: &str, password_hash: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE patients SET password_hash = ? WHERE patient_id = ?",
            [password_hash, patient_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Replace the password only while the stored hash still equals `current`.
    pub fn replace_patient_password(
        &self,
        patient_id: &str,
        current: Option<&str>,
        password_hash: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE patients SET password_hash = ?1 WHERE patient_id = ?2 AND password_hash IS ?3",
            params![password_hash, patient_id, current],
        )?;
        Ok(rows_affected > 0)
    }
}

fn query_patient(conn: &Connection, patient_id: &str) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!("SELECT {} FROM patients WHERE patient_id = ?", PATIENT_COLUMNS),
        [patient_id],
        patient_from_row,
    )
    .optional()
    .map_err(Into::into)
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        patient_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        middle_name: row.get(3)?,
        date_of_birth: row.get(4)?,
        sex: row.get(5)?,
        details: PatientDetails {
            height: row.get(6)?,
            weight: row.get(7)?,
            marital_status: row.get(8)?,
            contact_number: row.get(9)?,
            email_address: row.get(10)?,
            street_address: row.get(11)?,
            city: row.get(12)?,
            province: row.get(13)?,
            zip_code: row.get(14)?,
            emergency_name: row.get(15)?,
            emergency_relationship: row.get(16)?,
            emergency_contact_number: row.get(17)?,
        },
        password_hash: row.get(18)?,
    })
}

/// Advance and return the sequence counter for a prefix.
///
/// A prefix seen for the first time is seeded from the numerically largest
/// identifier already stored under it.
fn next_patient_sequence(conn: &Connection, prefix: &str) -> DbResult<u64> {
    let last: Option<i64> = conn
        .query_row(
            "SELECT last_value FROM patient_id_sequences WHERE prefix = ?",
            [prefix],
            |row| row.get(0),
        )
        .optional()?;

    let last = match last {
        Some(value) => u64::try_from(value)
            .map_err(|_| DbError::InvalidData(format!("Negative sequence for {}", prefix)))?,
        None => highest_stored_sequence(conn, prefix)?,
    };
    let next = last + 1;

    conn.execute(
        r#"
        INSERT INTO patient_id_sequences (prefix, last_value) VALUES (?1, ?2)
        ON CONFLICT(prefix) DO UPDATE SET last_value = excluded.last_value
        "#,
        params![prefix, next as i64],
    )?;
    Ok(next)
}

fn highest_stored_sequence(conn: &Connection, prefix: &str) -> DbResult<u64> {
    let mut stmt = conn.prepare(
        "SELECT patient_id FROM patients WHERE substr(patient_id, 1, length(?1)) = ?1",
    )?;
    let ids = stmt.query_map([prefix], |row| row.get::<_, String>(0))?;

    let mut highest = 0;
    for id in ids {
        if let Some(sequence) = parse_sequence(&id?, prefix) {
            highest = highest.max(sequence);
        }
    }
    Ok(highest)
}
