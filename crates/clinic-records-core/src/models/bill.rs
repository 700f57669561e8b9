//! Billing models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Payment status of a bill. Any status may be set on edit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BillStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "Pending",
            BillStatus::Paid => "Paid",
            BillStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BillStatus::Pending),
            "paid" => Ok(BillStatus::Paid),
            "cancelled" => Ok(BillStatus::Cancelled),
            _ => Err(ParseEnumError::new("bill status", s)),
        }
    }
}

/// A single charge on a bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// quantity × unit price
    pub amount: f64,
}

impl BillItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            amount: quantity * unit_price,
        }
    }
}

/// A patient bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: u64,
    /// e.g. "BILL-001"; may repeat after deletions
    pub bill_number: String,
    /// Not checked against the patient collection
    pub patient_id: String,
    pub patient_name: String,
    pub date: NaiveDate,
    pub items: Vec<BillItem>,
    /// Caller-supplied; see [`Bill::total_is_consistent`]
    pub total_amount: f64,
    pub status: BillStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl Bill {
    /// Sum of line item amounts.
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Whether the stored total matches the line items (to the cent).
    pub fn total_is_consistent(&self) -> bool {
        (self.items_total() - self.total_amount).abs() < 0.005
    }
}

/// Bill form contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillInput {
    pub patient_id: String,
    pub patient_name: String,
    /// Today on create when absent; unchanged on update when absent
    pub date: Option<NaiveDate>,
    pub items: Vec<BillItem>,
    pub total_amount: f64,
    /// Pending on create when absent; unchanged on update when absent
    pub status: Option<BillStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl BillInput {
    /// Input whose total is the sum of `items`.
    pub fn with_items(
        patient_id: impl Into<String>,
        patient_name: impl Into<String>,
        items: Vec<BillItem>,
    ) -> Self {
        let total_amount = items.iter().map(|item| item.amount).sum();
        Self {
            patient_id: patient_id.into(),
            patient_name: patient_name.into(),
            date: None,
            items,
            total_amount,
            status: None,
            payment_method: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_amount_derived() {
        let item = BillItem::new("Medicine", 2.0, 50.0);
        assert_eq!(item.amount, 100.0);
    }

    #[test]
    fn test_total_consistency() {
        let input = BillInput::with_items(
            "P001",
            "John Doe",
            vec![
                BillItem::new("Consultation Fee", 1.0, 100.0),
                BillItem::new("Medicine", 2.0, 50.0),
            ],
        );
        assert_eq!(input.total_amount, 200.0);

        let mut bill = Bill {
            id: 1,
            bill_number: "BILL-001".into(),
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            items: input.items,
            total_amount: input.total_amount,
            status: BillStatus::Paid,
            payment_method: Some("Credit Card".into()),
            notes: None,
        };
        assert!(bill.total_is_consistent());

        bill.total_amount = 150.0;
        assert!(!bill.total_is_consistent());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("paid".parse::<BillStatus>().unwrap(), BillStatus::Paid);
        assert_eq!("Cancelled".parse::<BillStatus>().unwrap(), BillStatus::Cancelled);
        assert!("refunded".parse::<BillStatus>().is_err());
        assert_eq!(BillStatus::default(), BillStatus::Pending);
    }
}
