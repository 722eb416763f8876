//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mutable patient details: vitals, contact, address and emergency contact.
///
/// Used both as part of a stored [`Patient`] and as a partial update, where
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    /// Height in centimetres
    pub height: Option<f64>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    pub marital_status: Option<String>,
    pub contact_number: Option<String>,
    pub email_address: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub zip_code: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_relationship: Option<String>,
    pub emergency_contact_number: Option<String>,
}

impl PatientDetails {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Generated identifier, `PAT-<initials>-<sequence>`; never changes
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub sex: String,
    #[serde(flatten)]
    pub details: PatientDetails,
    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
}

impl Patient {
    /// Build the stored form of a new patient under an assigned identifier.
    pub fn from_new(patient_id: String, new: NewPatient, password_hash: Option<String>) -> Self {
        Self {
            patient_id,
            first_name: new.first_name,
            last_name: new.last_name,
            middle_name: new.middle_name,
            date_of_birth: new.date_of_birth,
            sex: new.sex,
            details: new.details,
            password_hash,
        }
    }

    /// "First Last Middle", skipping an absent middle name.
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name, self.middle_name.as_deref())
    }
}

/// Patient intake form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub sex: String,
    #[serde(flatten)]
    pub details: PatientDetails,
}

impl NewPatient {
    /// Create an intake form with the required fields only.
    pub fn new(first_name: &str, last_name: &str, date_of_birth: NaiveDate, sex: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            middle_name: None,
            date_of_birth,
            sex: sex.to_string(),
            details: PatientDetails::default(),
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.first_name.trim().is_empty() {
            missing.push("firstName");
        }
        if self.last_name.trim().is_empty() {
            missing.push("lastName");
        }
        if self.sex.trim().is_empty() {
            missing.push("sex");
        }
        missing
    }
}

/// Join name parts as "First Last Middle", skipping a blank middle name.
pub fn full_name(first: &str, last: &str, middle: Option<&str>) -> String {
    let mut parts = vec![first, last];
    if let Some(m) = middle.filter(|m| !m.trim().is_empty()) {
        parts.push(m);
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 4, 12).unwrap()
    }

    #[test]
    fn test_missing_fields() {
        let new = NewPatient::new(" ", "Santos", dob(), "");
        assert_eq!(new.missing_fields(), vec!["firstName", "sex"]);

        let new = NewPatient::new("Ana", "Santos", dob(), "F");
        assert!(new.missing_fields().is_empty());
    }

    #[test]
    fn test_full_name() {
        let mut patient = Patient::from_new("PAT-AS-1".into(), NewPatient::new("Ana", "Santos", dob(), "F"), None);
        assert_eq!(patient.full_name(), "Ana Santos");

        patient.middle_name = Some("Lopez".into());
        assert_eq!(patient.full_name(), "Ana Santos Lopez");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let patient = Patient::from_new(
            "PAT-AS-1".into(),
            NewPatient::new("Ana", "Santos", dob(), "F"),
            Some("$argon2id$secret".into()),
        );
        let json = serde_json::to_string(&patient).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"patientId\":\"PAT-AS-1\""));
        assert!(json.contains("\"dateOfBirth\":\"1990-04-12\""));
    }

    #[test]
    fn test_intake_form_from_json() {
        let json = r#"{
            "firstName": "Ana",
            "lastName": "Santos",
            "dateOfBirth": "1990-04-12",
            "sex": "F",
            "height": 160.5,
            "city": "Cebu"
        }"#;
        let new: NewPatient = serde_json::from_str(json).unwrap();
        assert_eq!(new.details.height, Some(160.5));
        assert_eq!(new.details.city, Some("Cebu".into()));
        assert_eq!(new.middle_name, None);
    }

    #[test]
    fn test_details_is_empty() {
        assert!(PatientDetails::default().is_empty());
        let details = PatientDetails {
            weight: Some(60.0),
            ..Default::default()
        };
        assert!(!details.is_empty());
    }
}
