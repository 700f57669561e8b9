//! Bill record operations.

use tracing::{debug, info};

use super::{ClinicStore, RecordError, RecordKind, RecordResult};
use crate::config::BillNumbering;
use crate::models::{Bill, BillInput};

impl ClinicStore {
    /// Create a bill. Items and total are stored as given.
    pub fn create_bill(&mut self, input: BillInput) -> Bill {
        let id = self.next_bill_id;
        self.next_bill_id += 1;

        let bill_number = match self.config.bill_numbering {
            BillNumbering::CollectionLength => {
                self.config.bill_number(self.bills.len() as u64 + 1)
            }
            BillNumbering::Monotonic => self.config.bill_number(id),
        };

        let bill = Bill {
            id,
            bill_number,
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            date: input
                .date
                .unwrap_or_else(|| self.clock.now().date_naive()),
            items: input.items,
            total_amount: input.total_amount,
            status: input.status.unwrap_or_default(),
            payment_method: input.payment_method,
            notes: input.notes,
        };
        if !bill.total_is_consistent() {
            debug!(bill_number = %bill.bill_number, "Bill total differs from its items");
        }

        info!(bill_number = %bill.bill_number, patient_id = %bill.patient_id, "Bill created");
        self.bills.push(bill.clone());
        bill
    }

    /// Replace the contents of bill `id`, keeping its ID and number.
    ///
    /// An absent date or status keeps the current one.
    pub fn update_bill(&mut self, id: u64, input: BillInput) -> RecordResult<Bill> {
        let bill = self
            .bills
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| RecordError::not_found(RecordKind::Bill, id))?;

        bill.patient_id = input.patient_id;
        bill.patient_name = input.patient_name;
        if let Some(date) = input.date {
            bill.date = date;
        }
        bill.items = input.items;
        bill.total_amount = input.total_amount;
        if let Some(status) = input.status {
            bill.status = status;
        }
        bill.payment_method = input.payment_method;
        bill.notes = input.notes;

        info!(bill_number = %bill.bill_number, status = %bill.status, "Bill updated");
        Ok(bill.clone())
    }

    /// Remove bill `id`. Returns whether one was removed.
    pub fn delete_bill(&mut self, id: u64) -> bool {
        let before = self.bills.len();
        self.bills.retain(|b| b.id != id);
        let removed = self.bills.len() < before;
        if removed {
            info!(id, "Bill deleted");
        } else {
            debug!(id, "No bill to delete");
        }
        removed
    }

    pub fn get_bill(&self, id: u64) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == id)
    }

    pub fn search_bills(&self, term: &str) -> Vec<&Bill> {
        search_bills(&self.bills, term)
    }
}

/// Bills whose number, patient name or patient ID contain `term`, ignoring case.
pub fn search_bills<'a>(bills: &'a [Bill], term: &str) -> Vec<&'a Bill> {
    let needle = term.to_lowercase();
    bills
        .iter()
        .filter(|b| {
            b.bill_number.to_lowercase().contains(&needle)
                || b.patient_name.to_lowercase().contains(&needle)
                || b.patient_id.to_lowercase().contains(&needle)
        })
        .collect()
}
