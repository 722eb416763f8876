//! Aggregate report rows.

use serde::{Deserialize, Serialize};

/// Row count wrapper, serialized as `{"total": n}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Total {
    pub total: i64,
}

impl From<i64> for Total {
    fn from(total: i64) -> Self {
        Self { total }
    }
}

/// Count for one day of the month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub day: u32,
    pub total: i64,
}

/// Count for one calendar month, named in English.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: String,
    pub total: i64,
}

/// Number of patients sharing a marital status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaritalStatusCount {
    pub marital_status: Option<String>,
    pub patient_count: i64,
}
