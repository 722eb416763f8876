//! Aggregate reporting queries.

use chrono::{Datelike, Month, NaiveDate};

use super::{Database, DbError, DbResult};
use crate::models::{DailyCount, MaritalStatusCount, MonthlyCount};

/// Dated tables that can be broken down by day or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatedTable {
    Admissions,
    Visitors,
}

impl DatedTable {
    fn table(&self) -> &'static str {
        match self {
            DatedTable::Admissions => "admissions",
            DatedTable::Visitors => "visitors",
        }
    }

    fn date_column(&self) -> &'static str {
        match self {
            DatedTable::Admissions => "admission_date",
            DatedTable::Visitors => "visit_date",
        }
    }
}

impl Database {
    /// Per-day row counts for the month containing `today`.
    ///
    /// Days without rows are omitted.
    pub fn daily_counts(&self, table: DatedTable, today: NaiveDate) -> DbResult<Vec<DailyCount>> {
        let sql = format!(
            r#"
            SELECT CAST(strftime('%d', {col}) AS INTEGER) AS day, COUNT(*) AS total
            FROM {table}
            WHERE strftime('%Y-%m', {col}) = ?
            GROUP BY day
            ORDER BY day
            "#,
            col = table.date_column(),
            table = table.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let month = today.format("%Y-%m").to_string();

        let rows = stmt.query_map([month], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?)))?;

        let mut counts = Vec::new();
        for row in rows {
            let (day, total) = row?;
            counts.push(DailyCount { day, total });
        }
        Ok(counts)
    }

    /// Per-month row counts for the year containing `today`, in calendar order.
    ///
    /// Months without rows are omitted.
    pub fn monthly_counts(&self, table: DatedTable, today: NaiveDate) -> DbResult<Vec<MonthlyCount>> {
        let sql = format!(
            r#"
            SELECT CAST(strftime('%m', {col}) AS INTEGER) AS month, COUNT(*) AS total
            FROM {table}
            WHERE strftime('%Y', {col}) = ?
            GROUP BY month
            ORDER BY month
            "#,
            col = table.date_column(),
            table = table.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let year = format!("{:04}", today.year());

        let rows = stmt.query_map([year], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)?)))?;

        let mut counts = Vec::new();
        for row in rows {
            let (number, total) = row?;
            let month = Month::try_from(number)
                .map_err(|_| DbError::InvalidData(format!("Invalid month number: {}", number)))?;
            counts.push(MonthlyCount {
                month: month.name().to_string(),
                total,
            });
        }
        Ok(counts)
    }

    /// Marital statuses shared by more than `min_exclusive` patients.
    pub fn marital_status_counts(&self, min_exclusive: i64) -> DbResult<Vec<MaritalStatusCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT marital_status, COUNT(*) AS patient_count
            FROM patients
            GROUP BY marital_status
            HAVING patient_count > ?
            ORDER BY patient_count DESC, marital_status
            "#,
        )?;

        let rows = stmt.query_map([min_exclusive], |row| {
            Ok(MaritalStatusCount {
                marital_status: row.get(0)?,
                patient_count: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
