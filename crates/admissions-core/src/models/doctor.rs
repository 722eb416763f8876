//! Doctor models and duty-status derivation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Employment status of a doctor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DoctorStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

impl DoctorStatus {
    /// Single-letter code stored in the database.
    pub fn code(&self) -> &'static str {
        match self {
            DoctorStatus::Active => "A",
            DoctorStatus::Inactive => "I",
            DoctorStatus::OnLeave => "L",
        }
    }

    /// Parse a stored status code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(DoctorStatus::Active),
            "I" => Some(DoctorStatus::Inactive),
            "L" => Some(DoctorStatus::OnLeave),
            _ => None,
        }
    }
}

/// Whether a doctor is currently inside their shift window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DutyStatus {
    #[serde(rename = "On Duty")]
    OnDuty,
    #[serde(rename = "Off Duty")]
    OffDuty,
}

/// Derive duty status from a shift window and the time of day.
///
/// The start is inclusive and the end exclusive. A shift with
/// `start > end` crosses midnight. A zero-length shift (`start == end`)
/// is never on duty.
pub fn duty_status(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> DutyStatus {
    let on_duty = if start < end {
        start <= now && now < end
    } else if start > end {
        now >= start || now < end
    } else {
        false
    };

    if on_duty {
        DutyStatus::OnDuty
    } else {
        DutyStatus::OffDuty
    }
}

/// A doctor record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub status: DoctorStatus,
    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
}

impl Doctor {
    /// Duty status at the given time of day.
    pub fn duty_status_at(&self, now: NaiveTime) -> DutyStatus {
        duty_status(now, self.shift_start, self.shift_end)
    }
}

/// A doctor annotated with duty status at lookup time.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorOnShift {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub duty_status: DutyStatus,
}

impl DoctorOnShift {
    pub fn at(doctor: Doctor, now: NaiveTime) -> Self {
        let duty_status = doctor.duty_status_at(now);
        Self {
            doctor,
            duty_status,
        }
    }
}

/// Doctor registration form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub doctor_name: String,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    #[serde(default)]
    pub status: DoctorStatus,
}

/// Shift and status change for an existing doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUpdate {
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub status: DoctorStatus,
}

/// Subsets of the doctor directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorFilter {
    All,
    Active,
    Inactive,
    OnLeave,
    ActiveOnDuty,
    ActiveOffDuty,
}

impl DoctorFilter {
    /// Status the filter restricts to, if any.
    pub fn status(&self) -> Option<DoctorStatus> {
        match self {
            DoctorFilter::All => None,
            DoctorFilter::Inactive => Some(DoctorStatus::Inactive),
            DoctorFilter::OnLeave => Some(DoctorStatus::OnLeave),
            DoctorFilter::Active | DoctorFilter::ActiveOnDuty | DoctorFilter::ActiveOffDuty => {
                Some(DoctorStatus::Active)
            }
        }
    }

    /// Duty status the filter restricts to, if any.
    pub fn duty(&self) -> Option<DutyStatus> {
        match self {
            DoctorFilter::ActiveOnDuty => Some(DutyStatus::OnDuty),
            DoctorFilter::ActiveOffDuty => Some(DutyStatus::OffDuty),
            _ => None,
        }
    }
}
