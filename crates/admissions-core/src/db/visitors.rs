//! Visitor database operations.

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::{placeholders, Database, DbResult};
use crate::models::{NewVisitor, Visitor};

const VISITOR_COLUMNS: &str =
    "visitor_id, patient_id, visitor_name, relationship, contact_number, visit_date";

/// Identifiers bound per `DELETE`; stays well under SQLite's variable limit.
const DELETE_BATCH_SIZE: usize = 500;

impl Database {
    /// Log a visit, returning the visitor identifier.
    pub fn insert_visitor(&self, patient_id: &str, visitor: &NewVisitor, visit_date: NaiveDate) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO visitors (patient_id, visit_date, visitor_name, relationship, contact_number)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                patient_id,
                visit_date,
                visitor.visitor_name,
                visitor.relationship,
                visitor.contact_number,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a visitor by identifier.
    pub fn get_visitor(&self, visitor_id: i64) -> DbResult<Option<Visitor>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM visitors WHERE visitor_id = ?", VISITOR_COLUMNS),
                [visitor_id],
                visitor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all visitors, most recently logged first.
    pub fn list_visitors(&self) -> DbResult<Vec<Visitor>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM visitors ORDER BY visitor_id DESC",
            VISITOR_COLUMNS
        ))?;

        let rows = stmt.query_map([], visitor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count all visitors.
    pub fn count_visitors(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM visitors", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// A patient's visitors, latest visit first.
    pub fn list_patient_visitors(&self, patient_id: &str) -> DbResult<Vec<Visitor>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM visitors WHERE patient_id = ? ORDER BY visit_date DESC, visitor_id DESC",
            VISITOR_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], visitor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count a patient's visitors.
    pub fn count_patient_visitors(&self, patient_id: &str) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM visitors WHERE patient_id = ?",
                [patient_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    /// Delete one visitor.
    pub fn delete_visitor(&self, visitor_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM visitors WHERE visitor_id = ?", [visitor_id])?;
        Ok(rows_affected > 0)
    }

    /// Delete a set of visitors, returning how many were removed.
    ///
    /// Large sets are deleted in batches inside one transaction, so the
    /// call removes every listed visitor or none of them.
    pub fn delete_visitors(&self, visitor_ids: &[i64]) -> DbResult<usize> {
        if visitor_ids.is_empty() {
            return Ok(0);
        }

        let tx = self.write_transaction()?;
        let mut deleted = 0;
        for batch in visitor_ids.chunks(DELETE_BATCH_SIZE) {
            let sql = format!(
                "DELETE FROM visitors WHERE visitor_id IN ({})",
                placeholders(batch.len())
            );
            deleted += tx.execute(&sql, params_from_iter(batch))?;
        }
        tx.commit()?;
        Ok(deleted)
    }

    /// Delete every visitor.
    pub fn delete_all_visitors(&self) -> DbResult<usize> {
        Ok(self.conn.execute("DELETE FROM visitors", [])?)
    }

    /// Delete visitors whose visit date is strictly before `cutoff`.
    pub fn delete_visitors_before(&self, cutoff: NaiveDate) -> DbResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM visitors WHERE visit_date < ?", [cutoff])?)
    }
}

fn visitor_from_row(row: &Row<'_>) -> rusqlite::Result<Visitor> {
    Ok(Visitor {
        visitor_id: row.get(0)?,
        patient_id: row.get(1)?,
        visitor_name: row.get(2)?,
        relationship: row.get(3)?,
        contact_number: row.get(4)?,
        visit_date: row.get(5)?,
    })
}
