//! Derived summaries for the dashboard cards.
//!
//! Everything here is a pure pass over a collection snapshot, recomputed on
//! each call. Nothing is cached.

mod billing;
mod patients;

pub use billing::*;
pub use patients::*;

use tracing::debug;

use crate::records::ClinicStore;

impl ClinicStore {
    /// Patient analytics as of the store clock, using the configured age bands.
    pub fn patient_analytics(&self) -> PatientAnalytics {
        let analytics =
            aggregate_patient_analytics(self.patients(), &self.config().age_bands, self.now());
        debug!(total = analytics.total_patients, "Computed patient analytics");
        analytics
    }

    pub fn billing_summary(&self) -> BillingSummary {
        aggregate_billing_summary(self.bills())
    }

    /// Patients behind a dashboard card, as of the store clock.
    pub fn filter_patients(&self, filter: &PatientFilter) -> Vec<&crate::models::Patient> {
        filter_patients(self.patients(), filter, self.now())
    }
}
