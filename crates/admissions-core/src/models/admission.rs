//! Admission models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where an admission is in its lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStage {
    /// Admitted, no doctor yet
    Admitted,
    /// A doctor has been assigned
    DoctorAssigned,
    /// Terminal
    Discharged,
}

/// One hospital stay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub admission_id: i64,
    pub patient_id: String,
    pub doctor_id: Option<i64>,
    pub admission_date: NaiveDate,
    pub complaints: Option<String>,
    pub medications: Option<String>,
    pub procedure: Option<String>,
    pub diagnosis: Option<String>,
    /// `None` while the patient is still admitted
    pub discharge_date: Option<NaiveDate>,
}

impl Admission {
    /// An admission is active until discharged.
    pub fn is_active(&self) -> bool {
        self.discharge_date.is_none()
    }

    pub fn stage(&self) -> AdmissionStage {
        if self.discharge_date.is_some() {
            AdmissionStage::Discharged
        } else if self.doctor_id.is_some() {
            AdmissionStage::DoctorAssigned
        } else {
            AdmissionStage::Admitted
        }
    }
}

/// Admission intake for a registered patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmission {
    pub complaints: Option<String>,
    pub medications: Option<String>,
}

/// Subsets of the admission list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionFilter {
    All,
    /// No doctor assigned yet
    NoDoctor,
    /// Not yet discharged
    NotDischarged,
}

/// An admission as shown in a patient's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientAdmission {
    pub admission_id: i64,
    pub doctor_name: Option<String>,
    pub complaints: Option<String>,
    pub medications: Option<String>,
    pub procedure: Option<String>,
    pub diagnosis: Option<String>,
    pub admission_date: NaiveDate,
    pub discharge_date: Option<NaiveDate>,
}

/// An admitted patient as shown on a doctor's ward list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPatient {
    pub admission_id: i64,
    pub patient_id: String,
    pub full_name: String,
    pub sex: String,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub complaints: Option<String>,
    pub medications: Option<String>,
    pub procedure: Option<String>,
    pub diagnosis: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admission() -> Admission {
        Admission {
            admission_id: 1,
            patient_id: "PAT-AS-1".into(),
            doctor_id: None,
            admission_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            complaints: Some("Fever".into()),
            medications: None,
            procedure: None,
            diagnosis: None,
            discharge_date: None,
        }
    }

    #[test]
    fn test_stage_progression() {
        let mut a = admission();
        assert_eq!(a.stage(), AdmissionStage::Admitted);
        assert!(a.is_active());

        a.doctor_id = Some(7);
        assert_eq!(a.stage(), AdmissionStage::DoctorAssigned);

        a.discharge_date = NaiveDate::from_ymd_opt(2024, 3, 4);
        assert_eq!(a.stage(), AdmissionStage::Discharged);
        assert!(!a.is_active());
    }

    #[test]
    fn test_discharged_without_doctor() {
        let mut a = admission();
        a.discharge_date = NaiveDate::from_ymd_opt(2024, 3, 2);
        assert_eq!(a.stage(), AdmissionStage::Discharged);
    }
}
