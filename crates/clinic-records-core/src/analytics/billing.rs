//! Billing summary.

use serde::{Deserialize, Serialize};

use crate::models::{Bill, BillStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BillingSummary {
    pub total_bills: usize,
    /// Sum of `total_amount` over every bill, whatever its status
    pub total_revenue: f64,
    pub paid: usize,
    pub pending: usize,
    pub cancelled: usize,
}

pub fn aggregate_billing_summary(bills: &[Bill]) -> BillingSummary {
    bills.iter().fold(
        BillingSummary {
            total_bills: bills.len(),
            ..BillingSummary::default()
        },
        |mut summary, bill| {
            summary.total_revenue += bill.total_amount;
            match bill.status {
                BillStatus::Paid => summary.paid += 1,
                BillStatus::Pending => summary.pending += 1,
                BillStatus::Cancelled => summary.cancelled += 1,
            }
            summary
        },
    )
}
