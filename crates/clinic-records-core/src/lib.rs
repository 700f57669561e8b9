//! Clinic Records Core Library
//!
//! In-memory patient, appointment and billing records behind the clinic
//! dashboard.
//!
//! # Architecture
//!
//! ```text
//!   Dashboard UI (forms, tables, charts)
//!            │ calls
//!            ▼
//!   ┌──────────────────────────────────────────────┐
//!   │                 ClinicStore                  │
//!   │  patients ─ appointments ─ bills (Vec each)  │
//!   │                                              │
//!   │  mutation → validation → replace snapshot    │
//!   └───────┬──────────────────────────┬───────────┘
//!           │ snapshot                 │ booking
//!           ▼                          ▼
//!       Analytics               Notification intents
//!   (recomputed per call)     (delivered by the host)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Appointment, Bill, ...)
//! - [`records`]: The store, its mutators and lookups
//! - [`validation`]: Uniqueness and booking checks
//! - [`analytics`]: Dashboard summaries and drill-down filters
//! - [`export`]: Bill export as JSON or CSV
//! - [`config`]: Clinic settings
//! - [`sample`]: Demo records

pub mod analytics;
pub mod config;
pub mod export;
pub mod models;
pub mod records;
pub mod sample;
pub mod validation;

// Re-export commonly used types
pub use analytics::{BillingSummary, PatientAnalytics, PatientFilter};
pub use config::{AgeBand, BillNumbering, ClinicConfig};
pub use models::{
    compute_age, Appointment, AppointmentStatus, AppointmentType, Bill, BillInput, BillItem,
    BillStatus, BookingRequest, Gender, NotificationChannel, NotificationIntent, Patient,
    PatientInput,
};
pub use records::{Booking, ClinicStore, Clock, RecordError, RecordResult, SystemClock};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate contact: {0}")]
    DuplicateContact(String),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RecordError> for ClinicError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Validation { .. } => ClinicError::Validation(e.to_string()),
            RecordError::DuplicateContact { .. } | RecordError::DuplicatePatientId(_) => {
                ClinicError::DuplicateContact(e.to_string())
            }
            RecordError::PatientNotFound(_) => ClinicError::PatientNotFound(e.to_string()),
            RecordError::NotFound { .. } => ClinicError::NotFound(e.to_string()),
        }
    }
}

impl From<config::ConfigError> for ClinicError {
    fn from(e: config::ConfigError) -> Self {
        ClinicError::InvalidInput(e.to_string())
    }
}

impl From<models::ParseEnumError> for ClinicError {
    fn from(e: models::ParseEnumError) -> Self {
        ClinicError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(e: serde_json::Error) -> Self {
        ClinicError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::Internal(format!("Lock poisoned: {}", e))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ClinicError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ClinicError::InvalidInput(format!("date '{}': {}", value, e)))
}

fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>, ClinicError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_date(&v))
        .transpose()
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the log subscriber. `RUST_LOG` takes precedence over `filter`.
///
/// Safe to call more than once; later calls are ignored.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) {
    let fallback = filter.unwrap_or_else(|| config::DEFAULT_LOG_FILTER.to_string());
    install_subscriber(config::env_filter(&fallback));
}

fn install_subscriber(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Create an empty store. `config_json` may be empty for defaults.
///
/// Installs the config's `log_filter` unless a subscriber is already set.
#[uniffi::export]
pub fn open_store(config_json: String) -> Result<Arc<ClinicRecordsCore>, ClinicError> {
    let config = load_config(&config_json)?;
    install_subscriber(config.env_filter());
    Ok(ClinicRecordsCore::wrap(ClinicStore::with_config(config)))
}

/// Create a store pre-filled with the demo records.
#[uniffi::export]
pub fn open_sample_store(config_json: String) -> Result<Arc<ClinicRecordsCore>, ClinicError> {
    let config = load_config(&config_json)?;
    install_subscriber(config.env_filter());
    Ok(ClinicRecordsCore::wrap(ClinicStore::with_sample_data(config)))
}

fn load_config(config_json: &str) -> Result<ClinicConfig, ClinicError> {
    if config_json.trim().is_empty() {
        return Ok(ClinicConfig::default());
    }
    Ok(ClinicConfig::from_json(config_json)?)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicRecordsCore {
    store: Arc<Mutex<ClinicStore>>,
}

impl ClinicRecordsCore {
    fn wrap(store: ClinicStore) -> Arc<Self> {
        Arc::new(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }
}

#[uniffi::export]
impl ClinicRecordsCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a new patient.
    pub fn add_patient(&self, input: FfiPatientInput) -> Result<FfiPatient, ClinicError> {
        let input = input.try_into()?;
        let mut store = self.store.lock()?;
        Ok(store.add_patient(input)?.into())
    }

    /// Edit the patient with internal ID `id`.
    pub fn update_patient(
        &self,
        id: String,
        input: FfiPatientInput,
    ) -> Result<FfiPatient, ClinicError> {
        let input = input.try_into()?;
        let mut store = self.store.lock()?;
        Ok(store.update_patient(&id, input)?.into())
    }

    /// Delete a patient. Returns false if there was none.
    pub fn delete_patient(&self, id: String) -> Result<bool, ClinicError> {
        let mut store = self.store.lock()?;
        Ok(store.delete_patient(&id))
    }

    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let store = self.store.lock()?;
        Ok(store.patients().iter().cloned().map(Into::into).collect())
    }

    pub fn search_patients(&self, term: String) -> Result<Vec<FfiPatient>, ClinicError> {
        let store = self.store.lock()?;
        Ok(store
            .search_patients(&term)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Whole years between two YYYY-MM-DD dates.
    pub fn compute_age(&self, date_of_birth: String, as_of: String) -> Result<u32, ClinicError> {
        Ok(compute_age(parse_date(&date_of_birth)?, parse_date(&as_of)?))
    }

    pub fn patient_analytics(&self) -> Result<FfiPatientAnalytics, ClinicError> {
        let store = self.store.lock()?;
        Ok(store.patient_analytics().into())
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Book an appointment for an existing patient.
    pub fn book_appointment(&self, request: FfiBookingRequest) -> Result<FfiBooking, ClinicError> {
        let request = BookingRequest {
            patient_id: request.patient_id,
            date: parse_optional_date(request.date)?,
            time: request.time,
            appointment_type: request.appointment_type,
        };
        let mut store = self.store.lock()?;
        Ok(store.book_appointment(&request)?.into())
    }

    /// Appointments on a YYYY-MM-DD date.
    pub fn appointments_on(&self, date: String) -> Result<Vec<FfiAppointment>, ClinicError> {
        let date = parse_date(&date)?;
        let store = self.store.lock()?;
        Ok(store
            .appointments_on(date)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Billing Operations
    // =========================================================================

    pub fn create_bill(&self, input: FfiBillInput) -> Result<FfiBill, ClinicError> {
        let input = input.try_into()?;
        let mut store = self.store.lock()?;
        Ok(store.create_bill(input).into())
    }

    pub fn update_bill(&self, id: u64, input: FfiBillInput) -> Result<FfiBill, ClinicError> {
        let input = input.try_into()?;
        let mut store = self.store.lock()?;
        Ok(store.update_bill(id, input)?.into())
    }

    /// Delete a bill. Returns false if there was none.
    pub fn delete_bill(&self, id: u64) -> Result<bool, ClinicError> {
        let mut store = self.store.lock()?;
        Ok(store.delete_bill(id))
    }

    pub fn search_bills(&self, term: String) -> Result<Vec<FfiBill>, ClinicError> {
        let store = self.store.lock()?;
        Ok(store
            .search_bills(&term)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn billing_summary(&self) -> Result<FfiBillingSummary, ClinicError> {
        let store = self.store.lock()?;
        Ok(store.billing_summary().into())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export all bills as JSON.
    pub fn export_bills_json(&self) -> Result<String, ClinicError> {
        let store = self.store.lock()?;
        let batch = export::BillExporter::new(&store).export_all();
        Ok(batch.to_json()?)
    }

    /// Export all bills as CSV.
    pub fn export_bills_csv(&self) -> Result<String, ClinicError> {
        let store = self.store.lock()?;
        Ok(export::BillExporter::new(&store).export_all().to_csv())
    }

    /// Export one bill as JSON, e.g. for printing.
    pub fn export_bill_json(&self, id: u64) -> Result<String, ClinicError> {
        let store = self.store.lock()?;
        let export = export::BillExporter::new(&store).export_by_id(id)?;
        Ok(export.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: Option<String>,
    pub age: Option<u32>,
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
    pub created_at: String,
    pub last_edited_date: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            patient_id: patient.patient_id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            gender: patient.gender.to_string(),
            date_of_birth: patient.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
            age: patient.age,
            email: patient.email,
            mobile_phone: patient.mobile_phone,
            landline_phone: patient.landline_phone,
            address1: patient.address1,
            address2: patient.address2,
            city: patient.city,
            state: patient.state,
            pincode: patient.pincode,
            country: patient.country,
            occupation: patient.occupation,
            assigned_doctor: patient.assigned_doctor,
            referred_by: patient.referred_by,
            old_mrd_id: patient.old_mrd_id,
            remarks: patient.remarks,
            created_at: patient.created_at.to_rfc3339(),
            last_edited_date: patient.last_edited_date.to_rfc3339(),
        }
    }
}

/// FFI-safe patient form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub patient_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// "M", "F" or "O"
    pub gender: String,
    /// YYYY-MM-DD
    pub date_of_birth: Option<String>,
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

impl TryFrom<FfiPatientInput> for PatientInput {
    type Error = ClinicError;

    fn try_from(input: FfiPatientInput) -> Result<Self, Self::Error> {
        Ok(PatientInput {
            patient_id: input.patient_id,
            first_name: input.first_name,
            last_name: input.last_name,
            gender: input.gender.parse::<Gender>()?,
            date_of_birth: parse_optional_date(input.date_of_birth)?,
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
        })
    }
}

/// FFI-safe booking request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBookingRequest {
    pub patient_id: String,
    /// YYYY-MM-DD; today when absent
    pub date: Option<String>,
    pub time: String,
    pub appointment_type: String,
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: u64,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    pub appointment_type: String,
    pub status: String,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            patient_name: appointment.patient_name,
            date: appointment.date.format("%Y-%m-%d").to_string(),
            time: appointment.time,
            appointment_type: appointment.appointment_type.to_string(),
            status: appointment.status.to_string(),
        }
    }
}

/// FFI-safe notification intent.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    /// "email" or "whatsapp"
    pub channel: String,
    pub recipient: String,
    pub appointment_id: u64,
    pub patient_id: String,
    pub message: String,
}

impl From<NotificationIntent> for FfiNotification {
    fn from(intent: NotificationIntent) -> Self {
        Self {
            channel: intent.channel.to_string(),
            recipient: intent.recipient,
            appointment_id: intent.appointment_id,
            patient_id: intent.patient_id,
            message: intent.message,
        }
    }
}

/// FFI-safe booking result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBooking {
    pub appointment: FfiAppointment,
    pub notifications: Vec<FfiNotification>,
}

impl From<Booking> for FfiBooking {
    fn from(booking: Booking) -> Self {
        Self {
            appointment: booking.appointment.into(),
            notifications: booking.notifications.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe bill line item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBillItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

impl From<BillItem> for FfiBillItem {
    fn from(item: BillItem) -> Self {
        Self {
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            amount: item.amount,
        }
    }
}

/// FFI-safe bill.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBill {
    pub id: u64,
    pub bill_number: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub items: Vec<FfiBillItem>,
    pub total_amount: f64,
    pub status: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl From<Bill> for FfiBill {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id,
            bill_number: bill.bill_number,
            patient_id: bill.patient_id,
            patient_name: bill.patient_name,
            date: bill.date.format("%Y-%m-%d").to_string(),
            items: bill.items.into_iter().map(Into::into).collect(),
            total_amount: bill.total_amount,
            status: bill.status.to_string(),
            payment_method: bill.payment_method,
            notes: bill.notes,
        }
    }
}

/// FFI-safe bill form input. Line amounts are derived from quantity and price.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBillInput {
    pub patient_id: String,
    pub patient_name: String,
    pub date: Option<String>,
    pub items: Vec<FfiBillItem>,
    pub total_amount: f64,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<FfiBillInput> for BillInput {
    type Error = ClinicError;

    fn try_from(input: FfiBillInput) -> Result<Self, Self::Error> {
        Ok(BillInput {
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            date: parse_optional_date(input.date)?,
            items: input
                .items
                .into_iter()
                .map(|i| BillItem::new(i.description, i.quantity, i.unit_price))
                .collect(),
            total_amount: input.total_amount,
            status: input.status.map(|s| s.parse::<BillStatus>()).transpose()?,
            payment_method: input.payment_method,
            notes: input.notes,
        })
    }
}

/// FFI-safe patient analytics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientAnalytics {
    pub total_patients: u32,
    pub male_patients: u32,
    pub female_patients: u32,
    pub other_patients: u32,
    pub average_age: u32,
    pub edited_this_month: u32,
    pub with_assigned_doctor: u32,
    pub age_band_labels: Vec<String>,
    pub age_band_counts: Vec<u32>,
    pub most_common_city: Option<String>,
    pub male_percentage: f64,
    pub female_percentage: f64,
    pub assigned_doctor_percentage: f64,
}

impl From<PatientAnalytics> for FfiPatientAnalytics {
    fn from(analytics: PatientAnalytics) -> Self {
        Self {
            total_patients: analytics.total_patients as u32,
            male_patients: analytics.by_gender.male as u32,
            female_patients: analytics.by_gender.female as u32,
            other_patients: analytics.by_gender.other as u32,
            average_age: analytics.average_age,
            edited_this_month: analytics.edited_this_month as u32,
            with_assigned_doctor: analytics.with_assigned_doctor as u32,
            age_band_labels: analytics.by_age_band.iter().map(|b| b.label.clone()).collect(),
            age_band_counts: analytics.by_age_band.iter().map(|b| b.count as u32).collect(),
            male_percentage: analytics.male_percentage(),
            female_percentage: analytics.female_percentage(),
            assigned_doctor_percentage: analytics.assigned_doctor_percentage(),
            most_common_city: analytics.most_common_city,
        }
    }
}

/// FFI-safe billing summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBillingSummary {
    pub total_bills: u32,
    pub total_revenue: f64,
    pub paid: u32,
    pub pending: u32,
    pub cancelled: u32,
}

impl From<BillingSummary> for FfiBillingSummary {
    fn from(summary: BillingSummary) -> Self {
        Self {
            total_bills: summary.total_bills as u32,
            total_revenue: summary.total_revenue,
            paid: summary.paid as u32,
            pending: summary.pending as u32,
            cancelled: summary.cancelled as u32,
        }
    }
}
