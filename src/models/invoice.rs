use std::fmt;

use chrono::NaiveDate;

use crate::store::StoreError;

/// Payment state of an invoice. The only legal transition is Unpaid -> Paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: u64,
    pub customer: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
}

/// Input for creating or editing an invoice. The status is not part of the
/// draft: new invoices start Unpaid and edits never touch payment state.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub customer: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: f64,
}

impl InvoiceDraft {
    /// Applies the field rules and returns the draft with the customer name
    /// trimmed, or the first violation found.
    pub fn validated(mut self) -> Result<Self, StoreError> {
        let customer = self.customer.trim();
        if customer.is_empty() {
            return Err(StoreError::invalid("customer", "customer name is required"));
        }
        if self.amount <= 0.0 || !self.amount.is_finite() {
            return Err(StoreError::invalid("amount", "amount must be greater than zero"));
        }
        self.customer = customer.to_string();
        Ok(self)
    }
}
