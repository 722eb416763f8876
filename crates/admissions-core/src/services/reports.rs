//! Read-only aggregate reports.

use chrono::NaiveDate;

use crate::db::{Database, DatedTable};
use crate::models::{DailyCount, MaritalStatusCount, MonthlyCount};
use crate::AdmissionsResult;

/// Marital statuses are reported only when shared by more patients than this.
pub const MARITAL_STATUS_THRESHOLD: i64 = 5;

/// Daily, monthly and marital-status breakdowns.
pub struct Reports<'a> {
    db: &'a Database,
    today: NaiveDate,
}

impl<'a> Reports<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self::as_of(db, super::today())
    }

    /// Reports whose current month and year are taken from `today`.
    pub fn as_of(db: &'a Database, today: NaiveDate) -> Self {
        Self { db, today }
    }

    /// Admissions per day of the current month.
    pub fn daily_admissions(&self) -> AdmissionsResult<Vec<DailyCount>> {
        Ok(self.db.daily_counts(DatedTable::Admissions, self.today)?)
    }

    /// Visits per day of the current month.
    pub fn daily_visitors(&self) -> AdmissionsResult<Vec<DailyCount>> {
        Ok(self.db.daily_counts(DatedTable::Visitors, self.today)?)
    }

    /// Admissions per month of the current year.
    pub fn monthly_admissions(&self) -> AdmissionsResult<Vec<MonthlyCount>> {
        Ok(self.db.monthly_counts(DatedTable::Admissions, self.today)?)
    }

    /// Visits per month of the current year.
    pub fn monthly_visitors(&self) -> AdmissionsResult<Vec<MonthlyCount>> {
        Ok(self.db.monthly_counts(DatedTable::Visitors, self.today)?)
    }

    /// Marital statuses held by more than `min_exclusive` patients, most common first.
    pub fn marital_statuses(&self, min_exclusive: i64) -> AdmissionsResult<Vec<MaritalStatusCount>> {
        Ok(self.db.marital_status_counts(min_exclusive)?)
    }
}
