//! Shared plain data types for the intake form toolkit.
//!
//! These are the wire and form-level shapes exchanged between the core
//! validators, the HTTP client and the page controllers. No behaviour beyond
//! construction, parsing and display lives here.

use serde::{Deserialize, Serialize};

/// Patient record as returned by the search endpoint and mirrored into
/// selection-list options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: i64,
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub age_approx: u32,
    pub sex: Sex,
}

impl PatientSummary {
    /// Label shown in the selection list: `<dni> - <first> <last>`.
    pub fn option_label(&self) -> String {
        format!("{} - {} {}", self.dni, self.first_name, self.last_name)
    }
}

/// Biological sex as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

/// Whether a field message blocks submission or is advisory only.
///
/// Warnings mark empty optional fields; they are rendered but never make a
/// form invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies a form field across pages.
///
/// The string forms match the backend's form-field names, so server error
/// bodies keyed by field name parse directly into `FieldKey`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKey {
    FirstName,
    LastName,
    Dni,
    Phone,
    Email,
    AgeApprox,
    Sex,
    Address,
    City,
    Image,
    AnatomSite,
    ProfilePicture,
    Patient,
    Password,
    PasswordConfirm,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FirstName => "first_name",
            FieldKey::LastName => "last_name",
            FieldKey::Dni => "dni",
            FieldKey::Phone => "phone",
            FieldKey::Email => "email",
            FieldKey::AgeApprox => "age_approx",
            FieldKey::Sex => "sex",
            FieldKey::Address => "address",
            FieldKey::City => "city",
            FieldKey::Image => "image",
            FieldKey::AnatomSite => "anatom_site_general",
            FieldKey::ProfilePicture => "profile_picture",
            FieldKey::Patient => "patient",
            FieldKey::Password => "password",
            FieldKey::PasswordConfirm => "password_confirm",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown field key: {0}")]
pub struct UnknownFieldKey(pub String);

impl std::str::FromStr for FieldKey {
    type Err = UnknownFieldKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "first_name" => FieldKey::FirstName,
            "last_name" => FieldKey::LastName,
            "dni" => FieldKey::Dni,
            "phone" => FieldKey::Phone,
            "email" => FieldKey::Email,
            "age_approx" => FieldKey::AgeApprox,
            "sex" => FieldKey::Sex,
            "address" => FieldKey::Address,
            "city" => FieldKey::City,
            "image" => FieldKey::Image,
            "anatom_site_general" => FieldKey::AnatomSite,
            "profile_picture" => FieldKey::ProfilePicture,
            "patient" => FieldKey::Patient,
            "password" => FieldKey::Password,
            "password_confirm" => FieldKey::PasswordConfirm,
            other => return Err(UnknownFieldKey(other.to_string())),
        };
        Ok(key)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_field_key_round_trips_through_server_names() {
        for key in [
            FieldKey::FirstName,
            FieldKey::Dni,
            FieldKey::AnatomSite,
            FieldKey::Image,
            FieldKey::Patient,
        ] {
            assert_eq!(FieldKey::from_str(key.as_str()).unwrap(), key);
        }
    }

    #[test]
    fn test_unknown_field_key_is_rejected() {
        let err = FieldKey::from_str("__all__").unwrap_err();
        assert!(err.to_string().contains("__all__"));
    }

    #[test]
    fn test_patient_summary_deserializes_search_payload() {
        let json = r#"{
            "id": 42,
            "dni": "0123456782",
            "first_name": "Maria",
            "last_name": "Paredes",
            "phone": "0999999999",
            "email": "maria@example.com",
            "age_approx": 34,
            "sex": "female"
        }"#;
        let patient: PatientSummary = serde_json::from_str(json).unwrap();
        assert_eq!(patient.sex, Sex::Female);
        assert_eq!(patient.option_label(), "0123456782 - Maria Paredes");
    }
}
