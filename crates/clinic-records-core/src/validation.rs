//! Validation rules run before any collection is modified.

use crate::config::ClinicConfig;
use crate::models::{AppointmentType, BookingRequest, Patient, PatientInput};
use crate::records::{ContactField, RecordError, RecordResult};

/// Reject input whose e-mail or mobile phone belongs to another patient.
///
/// `exclude_id` is the internal ID of the record being edited. Values are
/// compared as stored, so a blank value collides with another blank one.
/// E-mail is checked before phone.
pub fn check_contact_unique(
    patients: &[Patient],
    input: &PatientInput,
    exclude_id: Option<&str>,
) -> RecordResult<()> {
    let email_taken = patients
        .iter()
        .any(|p| is_other(p, exclude_id) && p.email == input.email);
    if email_taken {
        return Err(RecordError::DuplicateContact {
            field: ContactField::Email,
            value: input.email.clone(),
        });
    }

    let phone_taken = patients
        .iter()
        .any(|p| is_other(p, exclude_id) && p.mobile_phone == input.mobile_phone);
    if phone_taken {
        return Err(RecordError::DuplicateContact {
            field: ContactField::MobilePhone,
            value: input.mobile_phone.clone(),
        });
    }

    Ok(())
}

/// Reject a display patient number already used by another patient.
pub fn check_patient_id_free(
    patients: &[Patient],
    patient_id: &str,
    exclude_id: Option<&str>,
) -> RecordResult<()> {
    let taken = patients
        .iter()
        .any(|p| is_other(p, exclude_id) && p.patient_id == patient_id);
    if taken {
        return Err(RecordError::DuplicatePatientId(patient_id.to_string()));
    }
    Ok(())
}

fn is_other(patient: &Patient, exclude_id: Option<&str>) -> bool {
    exclude_id != Some(patient.id.as_str())
}

/// A booking request whose fields passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    /// Trimmed
    pub patient_id: String,
    pub appointment_type: AppointmentType,
    pub time: String,
}

/// Check the required booking fields, reporting every failing one at once.
pub fn validate_booking(
    request: &BookingRequest,
    config: &ClinicConfig,
) -> RecordResult<ValidatedBooking> {
    let mut fields = Vec::new();

    let patient_id = request.patient_id.trim();
    if patient_id.is_empty() {
        fields.push("patientId".to_string());
    }

    let appointment_type = request.appointment_type.parse::<AppointmentType>().ok();
    if appointment_type.is_none() {
        fields.push("type".to_string());
    }

    let time = request.time.trim();
    if !config.is_time_slot(time) {
        fields.push("time".to_string());
    }

    match appointment_type {
        Some(appointment_type) if fields.is_empty() => Ok(ValidatedBooking {
            patient_id: patient_id.to_string(),
            appointment_type,
            time: time.to_string(),
        }),
        _ => Err(RecordError::Validation { fields }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::Utc;

    fn patient(patient_id: &str, email: &str, phone: &str) -> Patient {
        let mut input = PatientInput::new("Test", "Patient", Gender::Other, email, phone);
        input.patient_id = Some(patient_id.into());
        Patient::from_input(patient_id.into(), input, Utc::now())
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let patients = vec![patient("P001", "a@x.com", "+1")];
        let input = PatientInput::new("New", "One", Gender::Male, "a@x.com", "+2");

        let err = check_contact_unique(&patients, &input, None).unwrap_err();
        assert_eq!(
            err,
            RecordError::DuplicateContact {
                field: ContactField::Email,
                value: "a@x.com".into()
            }
        );
    }

    #[test]
    fn test_duplicate_phone_rejected() {
        let patients = vec![patient("P001", "a@x.com", "+1")];
        let input = PatientInput::new("New", "One", Gender::Male, "b@x.com", "+1");

        let err = check_contact_unique(&patients, &input, None).unwrap_err();
        assert!(matches!(
            err,
            RecordError::DuplicateContact {
                field: ContactField::MobilePhone,
                ..
            }
        ));
    }

    #[test]
    fn test_record_being_edited_is_excluded() {
        let patients = vec![patient("P001", "a@x.com", "+1")];
        let input = PatientInput::from(&patients[0]);
        assert!(check_contact_unique(&patients, &input, Some(&patients[0].id)).is_ok());
    }

    #[test]
    fn test_blank_email_collides_with_blank_email() {
        let patients = vec![patient("P001", "", "+1")];
        let input = PatientInput::new("New", "One", Gender::Male, "", "+2");

        let err = check_contact_unique(&patients, &input, None).unwrap_err();
        assert_eq!(
            err,
            RecordError::DuplicateContact {
                field: ContactField::Email,
                value: String::new()
            }
        );
    }

    #[test]
    fn test_values_compared_as_stored() {
        let patients = vec![patient("P001", "a@x.com", "+1")];
        let input = PatientInput::new("New", "One", Gender::Male, "b@x.com", " +1");
        assert!(check_contact_unique(&patients, &input, None).is_ok());
    }

    #[test]
    fn test_patient_id_taken() {
        let patients = vec![patient("P001", "a@x.com", "+1")];
        assert_eq!(
            check_patient_id_free(&patients, "P001", None),
            Err(RecordError::DuplicatePatientId("P001".into()))
        );
        assert!(check_patient_id_free(&patients, "P001", Some(&patients[0].id)).is_ok());
        assert!(check_patient_id_free(&patients, "P002", None).is_ok());
    }

    #[test]
    fn test_validate_booking_ok() {
        let config = ClinicConfig::default();
        let request = BookingRequest::new("  P001 ", None, "10:00", "Glaucoma Screening");
        let valid = validate_booking(&request, &config).unwrap();
        assert_eq!(valid.patient_id, "P001");
        assert_eq!(valid.appointment_type, AppointmentType::GlaucomaScreening);
        assert_eq!(valid.time, "10:00");
    }

    #[test]
    fn test_validate_booking_names_all_missing_fields() {
        let config = ClinicConfig::default();
        let err = validate_booking(&BookingRequest::default(), &config).unwrap_err();
        assert_eq!(
            err,
            RecordError::Validation {
                fields: vec!["patientId".into(), "type".into(), "time".into()]
            }
        );
    }

    #[test]
    fn test_validate_booking_rejects_unknown_values() {
        let config = ClinicConfig::default();
        let request = BookingRequest::new("P001", None, "12:00", "Dental Cleaning");
        let err = validate_booking(&request, &config).unwrap_err();
        assert_eq!(
            err,
            RecordError::Validation {
                fields: vec!["type".into(), "time".into()]
            }
        );
    }
}
