//! In-memory record collections for the clinic.
//!
//! [`ClinicStore`] owns the three insertion-ordered collections. Mutators run
//! every validation rule before touching a collection, so a failed call
//! leaves the store exactly as it was.

mod appointments;
mod bills;
mod patients;

pub use appointments::*;
pub use bills::*;
pub use patients::*;

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::ClinicConfig;
use crate::models::{Appointment, Bill, Patient};

/// Kind of record an ID refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Patient,
    Appointment,
    Bill,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Patient => "Patient",
            RecordKind::Appointment => "Appointment",
            RecordKind::Bill => "Bill",
        })
    }
}

/// Contact field that must be unique across patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Email,
    MobilePhone,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactField::Email => "email",
            ContactField::MobilePhone => "mobile phone",
        })
    }
}

/// Record errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Missing or invalid fields: {}", .fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("A patient with this {field} already exists: {value}")]
    DuplicateContact { field: ContactField, value: String },

    #[error("Patient ID '{0}' is already in use")]
    DuplicatePatientId(String),

    #[error("Patient with ID '{0}' not found")]
    PatientNotFound(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },
}

impl RecordError {
    pub(crate) fn not_found(kind: RecordKind, id: impl ToString) -> Self {
        RecordError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Source of the current time for timestamps and "today".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to, or by a fixed step per reading.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    /// Always reads `start` until [`ManualClock::set`] is called.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::ticking(start, Duration::zero())
    }

    /// Advances by `step` after every reading.
    pub fn ticking(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            now: Mutex::new(start),
            step,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        let current = *guard;
        *guard = current + self.step;
        current
    }
}

/// Owner of the patient, appointment and bill collections.
///
/// Not internally synchronized; wrap it in a lock to share it across threads.
pub struct ClinicStore {
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    bills: Vec<Bill>,
    next_bill_id: u64,
    config: ClinicConfig,
    clock: Arc<dyn Clock>,
}

impl Default for ClinicStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClinicStore {
    /// Empty store with default config and the system clock.
    pub fn new() -> Self {
        Self::with_config(ClinicConfig::default())
    }

    pub fn with_config(config: ClinicConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ClinicConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            patients: Vec::new(),
            appointments: Vec::new(),
            bills: Vec::new(),
            next_bill_id: 1,
            config,
            clock,
        }
    }

    /// Store seeded from existing collections, e.g. the demo data.
    pub fn from_records(
        config: ClinicConfig,
        clock: Arc<dyn Clock>,
        patients: Vec<Patient>,
        appointments: Vec<Appointment>,
        bills: Vec<Bill>,
    ) -> Self {
        let next_bill_id = bills.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        Self {
            patients,
            appointments,
            bills,
            next_bill_id,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Patient collection snapshot.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Appointment collection snapshot.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Bill collection snapshot.
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_store_is_empty() {
        let store = ClinicStore::new();
        assert!(store.patients().is_empty());
        assert!(store.appointments().is_empty());
        assert!(store.bills().is_empty());
    }

    #[test]
    fn test_manual_clock_ticks() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::ticking(start, Duration::seconds(1));
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::seconds(1));

        let fixed = ManualClock::new(start);
        assert_eq!(fixed.now(), fixed.now());
        fixed.set(start + Duration::days(1));
        assert_eq!(fixed.now(), start + Duration::days(1));
    }

    #[test]
    fn test_error_messages() {
        let err = RecordError::Validation {
            fields: vec!["patientId".into(), "time".into()],
        };
        assert_eq!(err.to_string(), "Missing or invalid fields: patientId, time");

        let err = RecordError::DuplicateContact {
            field: ContactField::Email,
            value: "a@b.com".into(),
        };
        assert_eq!(err.to_string(), "A patient with this email already exists: a@b.com");

        let err = RecordError::not_found(RecordKind::Bill, 7);
        assert_eq!(err.to_string(), "Bill not found: 7");
    }
}
