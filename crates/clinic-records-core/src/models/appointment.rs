//! Appointment models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Procedure types offered at booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentType {
    #[serde(rename = "General Eye Exam")]
    GeneralEyeExam,
    #[serde(rename = "Cataract Consultation")]
    CataractConsultation,
    #[serde(rename = "Glaucoma Screening")]
    GlaucomaScreening,
    #[serde(rename = "Retinal Examination")]
    RetinalExamination,
    #[serde(rename = "Refractive Surgery Consultation")]
    RefractiveSurgeryConsultation,
    #[serde(rename = "Contact Lens Fitting")]
    ContactLensFitting,
    #[serde(rename = "Emergency Visit")]
    EmergencyVisit,
    #[serde(rename = "Follow-up Visit")]
    FollowUpVisit,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 8] = [
        AppointmentType::GeneralEyeExam,
        AppointmentType::CataractConsultation,
        AppointmentType::GlaucomaScreening,
        AppointmentType::RetinalExamination,
        AppointmentType::RefractiveSurgeryConsultation,
        AppointmentType::ContactLensFitting,
        AppointmentType::EmergencyVisit,
        AppointmentType::FollowUpVisit,
    ];

    /// Label shown in the booking form.
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentType::GeneralEyeExam => "General Eye Exam",
            AppointmentType::CataractConsultation => "Cataract Consultation",
            AppointmentType::GlaucomaScreening => "Glaucoma Screening",
            AppointmentType::RetinalExamination => "Retinal Examination",
            AppointmentType::RefractiveSurgeryConsultation => "Refractive Surgery Consultation",
            AppointmentType::ContactLensFitting => "Contact Lens Fitting",
            AppointmentType::EmergencyVisit => "Emergency Visit",
            AppointmentType::FollowUpVisit => "Follow-up Visit",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AppointmentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseEnumError::new("appointment type", s))
    }
}

/// Appointment status. No transition rules are enforced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ParseEnumError::new("appointment status", s)),
        }
    }
}

/// A booked appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Sequential ID, starting at 1
    pub id: u64,
    /// Display patient number; existed when the appointment was booked
    pub patient_id: String,
    /// Patient name at booking time; not kept in sync with later edits
    pub patient_name: String,
    pub date: NaiveDate,
    /// Time slot, e.g. "09:30"
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
}

/// Booking form contents, as entered.
///
/// Fields stay raw strings so validation can name every missing or invalid one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_id: String,
    /// Defaults to today when absent
    pub date: Option<NaiveDate>,
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
}

impl BookingRequest {
    pub fn new(
        patient_id: impl Into<String>,
        date: Option<NaiveDate>,
        time: impl Into<String>,
        appointment_type: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            date,
            time: time.into(),
            appointment_type: appointment_type.into(),
        }
    }
}
