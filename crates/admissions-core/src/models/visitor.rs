//! Visitor models.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A logged visit to an admitted patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub visitor_id: i64,
    pub patient_id: String,
    pub visitor_name: String,
    pub relationship: Option<String>,
    pub contact_number: Option<String>,
    pub visit_date: NaiveDate,
}

/// Visit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVisitor {
    pub visitor_name: String,
    pub relationship: Option<String>,
    pub contact_number: Option<String>,
}

/// Fixed retention windows for purging old visitor records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RetentionWindow {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl RetentionWindow {
    pub fn months(&self) -> u32 {
        match self {
            RetentionWindow::OneMonth => 1,
            RetentionWindow::ThreeMonths => 3,
            RetentionWindow::SixMonths => 6,
            RetentionWindow::OneYear => 12,
        }
    }

    /// Oldest visit date that is kept. Visits strictly before it are purged.
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (31 March minus one month is 29 February in a leap year).
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }
}
