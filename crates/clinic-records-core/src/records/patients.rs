//! Patient record operations.

use tracing::{debug, info, warn};

use super::{ClinicStore, RecordError, RecordKind, RecordResult};
use crate::models::{Patient, PatientInput};
use crate::validation::{check_contact_unique, check_patient_id_free};

impl ClinicStore {
    /// Register a new patient.
    ///
    /// A blank `patient_id` gets the next free generated number.
    pub fn add_patient(&mut self, input: PatientInput) -> RecordResult<Patient> {
        check_contact_unique(&self.patients, &input, None)
            .inspect_err(|e| warn!(error = %e, "Rejected new patient"))?;

        let patient_id = match requested_patient_id(&input) {
            Some(requested) => {
                check_patient_id_free(&self.patients, &requested, None)
                    .inspect_err(|e| warn!(error = %e, "Rejected new patient"))?;
                requested
            }
            None => self.next_patient_number(),
        };

        let patient = Patient::from_input(patient_id, input, self.clock.now());
        info!(patient_id = %patient.patient_id, "Patient added");
        self.patients.push(patient.clone());
        Ok(patient)
    }

    /// Replace the editable fields of the patient with internal ID `id`.
    ///
    /// A blank `patient_id` keeps the current display number.
    pub fn update_patient(&mut self, id: &str, input: PatientInput) -> RecordResult<Patient> {
        let index = self
            .patients
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RecordError::not_found(RecordKind::Patient, id))?;

        check_contact_unique(&self.patients, &input, Some(id))
            .inspect_err(|e| warn!(error = %e, id, "Rejected patient update"))?;

        let patient_id = match requested_patient_id(&input) {
            Some(requested) => {
                check_patient_id_free(&self.patients, &requested, Some(id))
                    .inspect_err(|e| warn!(error = %e, id, "Rejected patient update"))?;
                requested
            }
            None => self.patients[index].patient_id.clone(),
        };

        let now = self.clock.now();
        let patient = &mut self.patients[index];
        patient.apply(patient_id, input, now);
        info!(patient_id = %patient.patient_id, "Patient updated");
        Ok(patient.clone())
    }

    /// Remove the patient with internal ID `id`. Returns whether one was removed.
    ///
    /// Appointments and bills referring to the patient are left alone.
    pub fn delete_patient(&mut self, id: &str) -> bool {
        let before = self.patients.len();
        self.patients.retain(|p| p.id != id);
        let removed = self.patients.len() < before;
        if removed {
            info!(id, "Patient deleted");
        } else {
            debug!(id, "No patient to delete");
        }
        removed
    }

    /// Get a patient by internal ID.
    pub fn get_patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Get a patient by display number, e.g. "P001".
    pub fn find_patient(&self, patient_id: &str) -> Option<&Patient> {
        find_patient(&self.patients, patient_id)
    }

    pub fn search_patients(&self, term: &str) -> Vec<&Patient> {
        search_patients(&self.patients, term)
    }

    /// Count + 1, bumped past any number already taken.
    fn next_patient_number(&self) -> String {
        let mut n = self.patients.len() + 1;
        loop {
            let candidate = self.config.patient_number(n);
            if find_patient(&self.patients, &candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

fn requested_patient_id(input: &PatientInput) -> Option<String> {
    input
        .patient_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Exact lookup by display patient number.
pub fn find_patient<'a>(patients: &'a [Patient], patient_id: &str) -> Option<&'a Patient> {
    patients.iter().find(|p| p.patient_id == patient_id)
}

/// Patients matching a search term, in collection order.
///
/// Patient number, names and e-mail match case-insensitively; the mobile
/// phone matches as typed.
pub fn search_patients<'a>(patients: &'a [Patient], term: &str) -> Vec<&'a Patient> {
    let needle = term.to_lowercase();
    patients
        .iter()
        .filter(|p| {
            p.patient_id.to_lowercase().contains(&needle)
                || p.first_name.to_lowercase().contains(&needle)
                || p.last_name.to_lowercase().contains(&needle)
                || p.email.to_lowercase().contains(&needle)
                || p.mobile_phone.contains(term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClinicConfig;
    use crate::models::Gender;
    use crate::records::{ContactField, ManualClock};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn setup_store() -> ClinicStore {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::ticking(start, Duration::seconds(1));
        ClinicStore::with_clock(ClinicConfig::default(), Arc::new(clock))
    }

    fn input(first: &str, email: &str, phone: &str) -> PatientInput {
        PatientInput::new(first, "Doe", Gender::Male, email, phone)
    }

    #[test]
    fn test_add_generates_patient_number() {
        let mut store = setup_store();

        let first = store.add_patient(input("John", "john@x.com", "+1")).unwrap();
        let second = store.add_patient(input("Jane", "jane@x.com", "+2")).unwrap();

        assert_eq!(first.patient_id, "P001");
        assert_eq!(second.patient_id, "P002");
        assert_eq!(store.patients().len(), 2);
    }

    #[test]
    fn test_generated_number_skips_taken() {
        let mut store = setup_store();
        let a = store.add_patient(input("A", "a@x.com", "+1")).unwrap();
        store.add_patient(input("B", "b@x.com", "+2")).unwrap();
        store.delete_patient(&a.id);

        // One patient left, so count + 1 = P002, which B still holds
        let c = store.add_patient(input("C", "c@x.com", "+3")).unwrap();
        assert_eq!(c.patient_id, "P003");
    }

    #[test]
    fn test_add_keeps_requested_patient_id() {
        let mut store = setup_store();
        let mut new = input("John", "john@x.com", "+1");
        new.patient_id = Some(" P100 ".into());

        let patient = store.add_patient(new).unwrap();
        assert_eq!(patient.patient_id, "P100");
    }

    #[test]
    fn test_add_rejects_duplicate_contact_without_mutation() {
        let mut store = setup_store();
        store.add_patient(input("John", "john@x.com", "+1")).unwrap();

        let err = store
            .add_patient(input("Jane", "john@x.com", "+2"))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::DuplicateContact {
                field: ContactField::Email,
                ..
            }
        ));
        assert_eq!(store.patients().len(), 1);
    }

    #[test]
    fn test_add_rejects_taken_patient_id() {
        let mut store = setup_store();
        store.add_patient(input("John", "john@x.com", "+1")).unwrap();

        let mut dup = input("Jane", "jane@x.com", "+2");
        dup.patient_id = Some("P001".into());
        assert_eq!(
            store.add_patient(dup),
            Err(RecordError::DuplicatePatientId("P001".into()))
        );
        assert_eq!(store.patients().len(), 1);
    }

    #[test]
    fn test_update_refreshes_last_edited() {
        let mut store = setup_store();
        let patient = store.add_patient(input("John", "john@x.com", "+1")).unwrap();

        let mut changed = PatientInput::from(&patient);
        changed.remarks = "Follow-up in 2 weeks".into();
        let updated = store.update_patient(&patient.id, changed).unwrap();

        assert_eq!(updated.id, patient.id);
        assert_eq!(updated.remarks, "Follow-up in 2 weeks");
        assert_eq!(updated.created_at, patient.created_at);
        assert!(updated.last_edited_date > patient.last_edited_date);
    }

    #[test]
    fn test_update_blank_patient_id_keeps_number() {
        let mut store = setup_store();
        let patient = store.add_patient(input("John", "john@x.com", "+1")).unwrap();

        let mut changed = PatientInput::from(&patient);
        changed.patient_id = None;
        let updated = store.update_patient(&patient.id, changed).unwrap();
        assert_eq!(updated.patient_id, "P001");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = setup_store();
        let err = store
            .update_patient("missing", input("John", "john@x.com", "+1"))
            .unwrap_err();
        assert_eq!(err, RecordError::not_found(RecordKind::Patient, "missing"));
    }

    #[test]
    fn test_update_rejects_other_patients_phone() {
        let mut store = setup_store();
        let john = store.add_patient(input("John", "john@x.com", "+1")).unwrap();
        store.add_patient(input("Jane", "jane@x.com", "+2")).unwrap();

        let mut changed = PatientInput::from(&john);
        changed.mobile_phone = "+2".into();
        let err = store.update_patient(&john.id, changed).unwrap_err();
        assert!(matches!(
            err,
            RecordError::DuplicateContact {
                field: ContactField::MobilePhone,
                ..
            }
        ));
        assert_eq!(store.get_patient(&john.id).unwrap().mobile_phone, "+1");
    }

    #[test]
    fn test_delete_missing_is_silent() {
        let mut store = setup_store();
        store.add_patient(input("John", "john@x.com", "+1")).unwrap();

        assert!(!store.delete_patient("missing"));
        assert_eq!(store.patients().len(), 1);
    }

    #[test]
    fn test_search_case_insensitive_fields() {
        let mut store = setup_store();
        store.add_patient(input("John", "John.Doe@Example.com", "+1234567890")).unwrap();
        store.add_patient(input("Sarah", "sarah@example.com", "+1987654321")).unwrap();

        assert_eq!(store.search_patients("p001").len(), 1);
        assert_eq!(store.search_patients("JOHN")[0].first_name, "John");
        assert_eq!(store.search_patients("john.doe@").len(), 1);
        assert_eq!(store.search_patients("doe").len(), 2);
        assert_eq!(store.search_patients("98765").len(), 1);
        assert_eq!(store.search_patients("").len(), 2);
        assert!(store.search_patients("nobody").is_empty());
    }

    #[test]
    fn test_search_preserves_order() {
        let mut store = setup_store();
        store.add_patient(input("Zed", "z@x.com", "+1")).unwrap();
        store.add_patient(input("Amy", "a@x.com", "+2")).unwrap();

        let names: Vec<_> = store
            .search_patients("@x.com")
            .iter()
            .map(|p| p.first_name.as_str())
            .collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
    }
}
