//! Bill export for printing and accounting hand-off.

use serde::{Deserialize, Serialize};

use crate::models::Bill;
use crate::records::{search_bills, ClinicStore, RecordError, RecordKind, RecordResult};

const CSV_HEADER: &str =
    "bill_number,patient_id,patient_name,date,status,payment_method,description,quantity,unit_price,amount,total_amount\n";

/// Export of a single bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillExport {
    /// Export metadata
    pub metadata: BillMetadata,
    /// Line items as billed
    pub line_items: Vec<BillExportLine>,
}

/// Bill export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillMetadata {
    pub bill_number: String,
    pub patient_id: String,
    pub patient_name: String,
    /// Bill date (YYYY-MM-DD)
    pub date: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    /// Stored total, which may differ from the line items
    pub total_amount: f64,
    /// Export timestamp
    pub exported_at: String,
}

/// Single line on an exported bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillExportLine {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

impl BillExport {
    /// Create an export from a bill.
    pub fn from_bill(bill: &Bill, exported_at: &str) -> Self {
        let line_items = bill
            .items
            .iter()
            .map(|item| BillExportLine {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                amount: item.amount,
            })
            .collect();

        Self {
            metadata: BillMetadata {
                bill_number: bill.bill_number.clone(),
                patient_id: bill.patient_id.clone(),
                patient_name: bill.patient_name.clone(),
                date: bill.date.format("%Y-%m-%d").to_string(),
                status: bill.status.to_string(),
                payment_method: bill.payment_method.clone(),
                notes: bill.notes.clone(),
                total_amount: bill.total_amount,
                exported_at: exported_at.to_string(),
            },
            line_items,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV, one row per line item.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        self.push_csv_rows(&mut csv);
        csv
    }

    fn push_csv_rows(&self, csv: &mut String) {
        let meta = &self.metadata;
        for item in &self.line_items {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{:.2},{:.2},{:.2}\n",
                escape_csv(&meta.bill_number),
                escape_csv(&meta.patient_id),
                escape_csv(&meta.patient_name),
                meta.date,
                meta.status,
                escape_csv(meta.payment_method.as_deref().unwrap_or("")),
                escape_csv(&item.description),
                item.quantity,
                item.unit_price,
                item.amount,
                meta.total_amount,
            ));
        }
    }
}

/// Batch bill export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchBillExport {
    /// Export timestamp
    pub exported_at: String,
    pub bills: Vec<BillExport>,
    /// Total line item count
    pub total_items: usize,
    /// Sum of stored bill totals
    pub total_amount: f64,
}

impl BatchBillExport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV, one row per line item across all bills.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        for export in &self.bills {
            export.push_csv_rows(&mut csv);
        }
        csv
    }
}

/// Bill exporter.
pub struct BillExporter<'a> {
    store: &'a ClinicStore,
}

impl<'a> BillExporter<'a> {
    /// Create a new bill exporter.
    pub fn new(store: &'a ClinicStore) -> Self {
        Self { store }
    }

    fn timestamp(&self) -> String {
        self.store.now().to_rfc3339()
    }

    /// Export a single bill.
    pub fn export_by_id(&self, id: u64) -> RecordResult<BillExport> {
        let bill = self
            .store
            .get_bill(id)
            .ok_or_else(|| RecordError::not_found(RecordKind::Bill, id))?;
        Ok(BillExport::from_bill(bill, &self.timestamp()))
    }

    /// Export every bill.
    pub fn export_all(&self) -> BatchBillExport {
        self.batch(self.store.bills().iter())
    }

    /// Export the bills a search term would list.
    pub fn export_matching(&self, term: &str) -> BatchBillExport {
        self.batch(search_bills(self.store.bills(), term).into_iter())
    }

    fn batch<'b>(&self, bills: impl Iterator<Item = &'b Bill>) -> BatchBillExport {
        let exported_at = self.timestamp();
        let bills: Vec<BillExport> = bills
            .map(|bill| BillExport::from_bill(bill, &exported_at))
            .collect();
        let total_items = bills.iter().map(|b| b.line_items.len()).sum();
        let total_amount = bills.iter().map(|b| b.metadata.total_amount).sum();

        BatchBillExport {
            exported_at,
            bills,
            total_items,
            total_amount,
        }
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
