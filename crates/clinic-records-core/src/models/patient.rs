//! Patient models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Gender as captured on the registration form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    /// Single-letter form code.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" => Ok(Gender::Male),
            "F" | "FEMALE" => Ok(Gender::Female),
            "O" | "OTHER" => Ok(Gender::Other),
            _ => Err(ParseEnumError::new("gender", s)),
        }
    }
}

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Internal record ID (UUID), never shown to staff
    pub id: String,
    /// Display patient number, e.g. "P001"
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    /// Whole years at the last edit; recomputed from `date_of_birth`
    pub age: Option<u32>,
    /// Unique across all patients
    pub email: String,
    /// Unique across all patients
    pub mobile_phone: String,
    pub landline_phone: Option<String>,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub occupation: String,
    pub assigned_doctor: String,
    pub referred_by: String,
    /// Record number from the previous records system
    pub old_mrd_id: String,
    pub remarks: String,
    /// Entry date, set once
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful create or update
    pub last_edited_date: DateTime<Utc>,
}

impl Patient {
    /// Build a new record from form input.
    pub(crate) fn from_input(
        patient_id: String,
        input: PatientInput,
        now: DateTime<Utc>,
    ) -> Self {
        let age = input
            .date_of_birth
            .map(|dob| compute_age(dob, now.date_naive()));
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            first_name: input.first_name,
            last_name: input.last_name,
            gender: input.gender,
            date_of_birth: input.date_of_birth,
            age,
            email: input.email,
            mobile_phone: input.mobile_phone,
            landline_phone: input.landline_phone,
            address1: input.address1,
            address2: input.address2,
            city: input.city,
            state: input.state,
            pincode: input.pincode,
            country: input.country,
            occupation: input.occupation,
            assigned_doctor: input.assigned_doctor,
            referred_by: input.referred_by,
            old_mrd_id: input.old_mrd_id,
            remarks: input.remarks,
            created_at: now,
            last_edited_date: now,
        }
    }

    /// Overwrite the editable fields, keeping identity and entry date.
    pub(crate) fn apply(&mut self, patient_id: String, input: PatientInput, now: DateTime<Utc>) {
        let id = std::mem::take(&mut self.id);
        let created_at = self.created_at;
        *self = Patient::from_input(patient_id, input, now);
        self.id = id;
        self.created_at = created_at;
    }

    /// "First Last", as shown on appointments and bills.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age on a given date, falling back to the stored age when no date of birth is known.
    pub fn age_on(&self, as_of: NaiveDate) -> Option<u32> {
        self.date_of_birth
            .map(|dob| compute_age(dob, as_of))
            .or(self.age)
    }

    pub fn has_assigned_doctor(&self) -> bool {
        !self.assigned_doctor.is_empty()
    }

    /// Whether the record was last edited in the same calendar month as `now`.
    pub fn edited_in_month_of(&self, now: DateTime<Utc>) -> bool {
        self.last_edited_date.year() == now.year() && self.last_edited_date.month() == now.month()
    }
}

/// Form input for creating or editing a patient.
///
/// Age, timestamps and the internal ID are derived by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    /// Display patient number; generated on create when absent
    pub patient_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub email: String,
    pub mobile_phone: String,
    pub landline_phone: Option<String>,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub occupation: String,
    pub assigned_doctor: String,
    pub referred_by: String,
    pub old_mrd_id: String,
    pub remarks: String,
}

impl PatientInput {
    /// Create input with the identifying fields; everything else blank.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: Gender,
        email: impl Into<String>,
        mobile_phone: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            date_of_birth: None,
            email: email.into(),
            mobile_phone: mobile_phone.into(),
            landline_phone: None,
            address1: String::new(),
            address2: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: String::new(),
            country: String::new(),
            occupation: String::new(),
            assigned_doctor: String::new(),
            referred_by: String::new(),
            old_mrd_id: String::new(),
            remarks: String::new(),
        }
    }
}

impl From<&Patient> for PatientInput {
    fn from(patient: &Patient) -> Self {
        Self {
            patient_id: Some(patient.patient_id.clone()),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            gender: patient.gender,
            date_of_birth: patient.date_of_birth,
            email: patient.email.clone(),
            mobile_phone: patient.mobile_phone.clone(),
            landline_phone: patient.landline_phone.clone(),
            address1: patient.address1.clone(),
            address2: patient.address2.clone(),
            city: patient.city.clone(),
            state: patient.state.clone(),
            pincode: patient.pincode.clone(),
            country: patient.country.clone(),
            occupation: patient.occupation.clone(),
            assigned_doctor: patient.assigned_doctor.clone(),
            referred_by: patient.referred_by.clone(),
            old_mrd_id: patient.old_mrd_id.clone(),
            remarks: patient.remarks.clone(),
        }
    }
}

/// Whole years between `date_of_birth` and `as_of`.
///
/// One year is subtracted when the birthday has not yet come round in
/// `as_of`'s year. Dates of birth after `as_of` yield 0.
pub fn compute_age(date_of_birth: NaiveDate, as_of: NaiveDate) -> u32 {
    let mut age = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compute_age_birthday_passed() {
        assert_eq!(compute_age(date(2000, 1, 1), date(2024, 1, 1)), 24);
    }

    #[test]
    fn test_compute_age_birthday_not_reached() {
        assert_eq!(compute_age(date(2000, 6, 15), date(2024, 1, 1)), 23);
        assert_eq!(compute_age(date(2000, 6, 15), date(2024, 6, 14)), 23);
        assert_eq!(compute_age(date(2000, 6, 15), date(2024, 6, 15)), 24);
    }

    #[test]
    fn test_compute_age_leap_day() {
        assert_eq!(compute_age(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(compute_age(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn test_compute_age_future_birth() {
        assert_eq!(compute_age(date(2030, 1, 1), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("m".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("O".parse::<Gender>().unwrap(), Gender::Other);
        assert!("X".parse::<Gender>().is_err());
    }

    #[test]
    fn test_from_input_derives_age_and_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let mut input = PatientInput::new("John", "Doe", Gender::Male, "j@x.com", "+1");
        input.date_of_birth = Some(date(1990, 5, 15));

        let patient = Patient::from_input("P001".into(), input, now);
        assert_eq!(patient.age, Some(33));
        assert_eq!(patient.full_name(), "John Doe");
        assert_eq!(patient.created_at, now);
        assert_eq!(patient.last_edited_date, now);
        assert_eq!(patient.id.len(), 36); // UUID format
    }

    #[test]
    fn test_apply_keeps_identity() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let edited = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let input = PatientInput::new("John", "Doe", Gender::Male, "j@x.com", "+1");
        let mut patient = Patient::from_input("P001".into(), input.clone(), created);
        let id = patient.id.clone();

        let mut changed = input;
        changed.city = "Boston".into();
        patient.apply("P001".into(), changed, edited);

        assert_eq!(patient.id, id);
        assert_eq!(patient.city, "Boston");
        assert_eq!(patient.created_at, created);
        assert_eq!(patient.last_edited_date, edited);
    }

    #[test]
    fn test_serde_uses_form_field_names() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let input = PatientInput::new("John", "Doe", Gender::Female, "j@x.com", "+1");
        let patient = Patient::from_input("P001".into(), input, now);
        let json = serde_json::to_string(&patient).unwrap();
        assert!(json.contains("\"patientId\":\"P001\""));
        assert!(json.contains("\"gender\":\"F\""));
        assert!(json.contains("\"lastEditedDate\""));
    }
}
