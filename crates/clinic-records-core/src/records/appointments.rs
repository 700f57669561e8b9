//! Appointment booking.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::{find_patient, ClinicStore, RecordError, RecordResult};
use crate::config::ClinicConfig;
use crate::models::{
    Appointment, AppointmentStatus, BookingRequest, NotificationChannel, NotificationIntent,
    Patient,
};
use crate::validation::validate_booking;

/// A successful booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub appointment: Appointment,
    /// Confirmations for the host to deliver
    pub notifications: Vec<NotificationIntent>,
}

/// Validate a request and book it against the given snapshots.
///
/// Returns the new appointment collection alongside the booking. Neither
/// input slice is modified, and the patient record is not touched.
pub fn book_appointment(
    patients: &[Patient],
    appointments: &[Appointment],
    request: &BookingRequest,
    config: &ClinicConfig,
    today: NaiveDate,
) -> RecordResult<(Vec<Appointment>, Booking)> {
    let valid = validate_booking(request, config)?;

    let patient = find_patient(patients, &valid.patient_id)
        .ok_or_else(|| RecordError::PatientNotFound(valid.patient_id.clone()))?;

    let appointment = Appointment {
        id: appointments.len() as u64 + 1,
        patient_id: patient.patient_id.clone(),
        patient_name: patient.full_name(),
        date: request.date.unwrap_or(today),
        time: valid.time,
        appointment_type: valid.appointment_type,
        status: AppointmentStatus::Scheduled,
    };
    let notifications = confirmation_intents(patient, &appointment);

    let mut updated = appointments.to_vec();
    updated.push(appointment.clone());

    Ok((
        updated,
        Booking {
            appointment,
            notifications,
        },
    ))
}

/// E-mail and WhatsApp confirmations, skipping blank contacts.
fn confirmation_intents(patient: &Patient, appointment: &Appointment) -> Vec<NotificationIntent> {
    let message = format!(
        "Dear {}, your {} appointment is confirmed for {} at {}.",
        appointment.patient_name,
        appointment.appointment_type,
        appointment.date.format("%Y-%m-%d"),
        appointment.time
    );

    [
        (NotificationChannel::Email, patient.email.trim()),
        (NotificationChannel::WhatsApp, patient.mobile_phone.trim()),
    ]
    .into_iter()
    .filter(|(_, recipient)| !recipient.is_empty())
    .map(|(channel, recipient)| NotificationIntent {
        channel,
        recipient: recipient.to_string(),
        appointment_id: appointment.id,
        patient_id: appointment.patient_id.clone(),
        message: message.clone(),
    })
    .collect()
}

/// Appointments on `date`, in booking order.
pub fn list_appointments_for_date(appointments: &[Appointment], date: NaiveDate) -> Vec<&Appointment> {
    appointments.iter().filter(|a| a.date == date).collect()
}

impl ClinicStore {
    /// Book an appointment for an existing patient.
    pub fn book_appointment(&mut self, request: &BookingRequest) -> RecordResult<Booking> {
        let today = self.clock.now().date_naive();
        let (appointments, booking) =
            book_appointment(&self.patients, &self.appointments, request, &self.config, today)
                .inspect_err(|e| warn!(error = %e, "Rejected booking"))?;
        self.appointments = appointments;

        let appointment = &booking.appointment;
        info!(
            appointment_id = appointment.id,
            patient_id = %appointment.patient_id,
            patient_name = %appointment.patient_name,
            "Appointment booked"
        );
        for intent in &booking.notifications {
            info!(channel = %intent.channel, recipient = %intent.recipient, "Confirmation queued");
        }

        Ok(booking)
    }

    pub fn appointments_on(&self, date: NaiveDate) -> Vec<&Appointment> {
        list_appointments_for_date(&self.appointments, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentType, Gender, PatientInput};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patients() -> Vec<Patient> {
        let mut input = PatientInput::new(
            "Emma",
            "Wilson",
            Gender::Female,
            "emma.wilson@email.com",
            "+1-555-0125",
        );
        input.patient_id = Some("P002".into());
        vec![Patient::from_input("P002".into(), input, Utc::now())]
    }

    #[test]
    fn test_book_appends_scheduled_appointment() {
        let patients = patients();
        let request = BookingRequest::new("P002", Some(date(2024, 3, 28)), "14:30", "Glaucoma Screening");

        let (appointments, booking) = book_appointment(
            &patients,
            &[],
            &request,
            &ClinicConfig::default(),
            date(2024, 3, 1),
        )
        .unwrap();

        assert_eq!(appointments.len(), 1);
        let appointment = &booking.appointment;
        assert_eq!(appointment.id, 1);
        assert_eq!(appointment.patient_name, "Emma Wilson");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.appointment_type, AppointmentType::GlaucomaScreening);
        assert_eq!(appointment.date, date(2024, 3, 28));
        assert_eq!(&appointments[0], appointment);
    }

    #[test]
    fn test_book_defaults_date_to_today() {
        let request = BookingRequest::new("P002", None, "09:00", "Emergency Visit");
        let (_, booking) = book_appointment(
            &patients(),
            &[],
            &request,
            &ClinicConfig::default(),
            date(2024, 3, 1),
        )
        .unwrap();
        assert_eq!(booking.appointment.date, date(2024, 3, 1));
    }

    #[test]
    fn test_book_unknown_patient() {
        let request = BookingRequest::new("P999", None, "09:00", "Emergency Visit");
        let err = book_appointment(
            &patients(),
            &[],
            &request,
            &ClinicConfig::default(),
            date(2024, 3, 1),
        )
        .unwrap_err();
        assert_eq!(err, RecordError::PatientNotFound("P999".into()));
    }

    #[test]
    fn test_validation_runs_before_lookup() {
        let request = BookingRequest::new("P999", None, "", "Emergency Visit");
        let err = book_appointment(
            &patients(),
            &[],
            &request,
            &ClinicConfig::default(),
            date(2024, 3, 1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RecordError::Validation {
                fields: vec!["time".into()]
            }
        );
    }

    #[test]
    fn test_notifications_carry_contacts() {
        let request = BookingRequest::new("P002", None, "09:00", "Emergency Visit");
        let (_, booking) = book_appointment(
            &patients(),
            &[],
            &request,
            &ClinicConfig::default(),
            date(2024, 3, 1),
        )
        .unwrap();

        assert_eq!(booking.notifications.len(), 2);
        assert_eq!(booking.notifications[0].channel, NotificationChannel::Email);
        assert_eq!(booking.notifications[0].recipient, "emma.wilson@email.com");
        assert_eq!(booking.notifications[1].channel, NotificationChannel::WhatsApp);
        assert_eq!(booking.notifications[1].recipient, "+1-555-0125");
        assert!(booking.notifications[0].message.contains("Emergency Visit"));
    }

    #[test]
    fn test_blank_contact_skips_channel() {
        let mut patients = patients();
        patients[0].mobile_phone.clear();
        let request = BookingRequest::new("P002", None, "09:00", "Emergency Visit");
        let (_, booking) = book_appointment(
            &patients,
            &[],
            &request,
            &ClinicConfig::default(),
            date(2024, 3, 1),
        )
        .unwrap();

        assert_eq!(booking.notifications.len(), 1);
        assert_eq!(booking.notifications[0].channel, NotificationChannel::Email);
    }

    #[test]
    fn test_list_for_date() {
        let make = |id, d| Appointment {
            id,
            patient_id: "P002".into(),
            patient_name: "Emma Wilson".into(),
            date: d,
            time: "10:00".into(),
            appointment_type: AppointmentType::FollowUpVisit,
            status: AppointmentStatus::Scheduled,
        };
        let appointments = vec![
            make(1, date(2024, 3, 28)),
            make(2, date(2024, 3, 29)),
            make(3, date(2024, 3, 28)),
        ];

        let ids: Vec<u64> = list_appointments_for_date(&appointments, date(2024, 3, 28))
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(list_appointments_for_date(&appointments, date(2024, 1, 1)).is_empty());
    }
}
