//! Doctor database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Doctor, DoctorStatus, NewDoctor, ShiftUpdate};

const DOCTOR_COLUMNS: &str =
    "doctor_id, doctor_name, shift_start, shift_end, status, password_hash";

impl Database {
    /// Insert a new doctor, returning the assigned identifier.
    pub fn insert_doctor(&self, doctor: &NewDoctor, password_hash: Option<&str>) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO doctors (doctor_name, shift_start, shift_end, status, password_hash)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                doctor.doctor_name,
                doctor.shift_start,
                doctor.shift_end,
                doctor.status.code(),
                password_hash,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a doctor by identifier.
    pub fn get_doctor(&self, doctor_id: i64) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM doctors WHERE doctor_id = ?", DOCTOR_COLUMNS),
                [doctor_id],
                DoctorRow::from_row,
            )
            .optional()?
            .map(Doctor::try_from)
            .transpose()
    }

    /// Check whether a doctor exists.
    pub fn doctor_exists(&self, doctor_id: i64) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM doctors WHERE doctor_id = ?",
                [doctor_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// List doctors, optionally restricted to one status.
    pub fn list_doctors(&self, status: Option<DoctorStatus>) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM doctors WHERE (?1 IS NULL OR status = ?1) ORDER BY doctor_id",
            DOCTOR_COLUMNS
        ))?;

        let rows = stmt.query_map([status.map(|s| s.code())], DoctorRow::from_row)?;

        let mut doctors = Vec::new();
        for row in rows {
            doctors.push(row?.try_into()?);
        }
        Ok(doctors)
    }

    /// Count doctors, optionally restricted to one status.
    pub fn count_doctors(&self, status: Option<DoctorStatus>) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM doctors WHERE (?1 IS NULL OR status = ?1)",
                [status.map(|s| s.code())],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    /// Update shift window and status.
    pub fn update_doctor_shift(&self, doctor_id: i64, update: &ShiftUpdate) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE doctors SET
                shift_start = ?2,
                shift_end = ?3,
                status = ?4
            WHERE doctor_id = ?1
            "#,
            params![
                doctor_id,
                update.shift_start,
                update.shift_end,
                update.status.code(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Replace a doctor's password hash.
    pub fn update_doctor_password(&self, doctor_id: i64, password_hash: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE doctors SET password_hash = ? WHERE doctor_id = ?",
            params![password_hash, doctor_id],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct DoctorRow {
    doctor_id: i64,
    doctor_name: String,
    shift_start: chrono::NaiveTime,
    shift_end: chrono::NaiveTime,
    status: String,
    password_hash: Option<String>,
}

impl DoctorRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            doctor_id: row.get(0)?,
            doctor_name: row.get(1)?,
            shift_start: row.get(2)?,
            shift_end: row.get(3)?,
            status: row.get(4)?,
            password_hash: row.get(5)?,
        })
    }
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = DbError;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        let status = DoctorStatus::from_code(&row.status)
            .ok_or_else(|| DbError::InvalidData(format!("Unknown doctor status: {}", row.status)))?;

        Ok(Doctor {
            doctor_id: row.doctor_id,
            doctor_name: row.doctor_name,
            shift_start: row.shift_start,
            shift_end: row.shift_end,
            status,
            password_hash: row.password_hash,
        })
    }
}
