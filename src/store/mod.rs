//! In-memory record store. The `Session` owns the invoice and expense lists
//! plus their id counters for the lifetime of the process; every other
//! component reads and mutates them exclusively through this interface.

use thiserror::Error;
use tracing::debug;

use crate::models::{Expense, ExpenseDraft, Invoice, InvoiceDraft, InvoiceStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("{record} {id} not found")]
    NotFound { record: &'static str, id: u64 },
}

impl StoreError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        StoreError::Invalid { field, reason }
    }
}

pub struct Session {
    invoices: Vec<Invoice>,
    expenses: Vec<Expense>,
    next_invoice_id: u64,
    next_expense_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            invoices: Vec::new(),
            expenses: Vec::new(),
            next_invoice_id: 1,
            next_expense_id: 1,
        }
    }

    // Invoice operations

    /// Validates the draft, appends a new Unpaid invoice and returns its id.
    pub fn add_invoice(&mut self, draft: InvoiceDraft) -> Result<u64, StoreError> {
        let draft = draft.validated()?;
        let id = self.next_invoice_id;
        self.next_invoice_id += 1;
        self.invoices.push(Invoice {
            id,
            customer: draft.customer,
            invoice_date: draft.invoice_date,
            due_date: draft.due_date,
            amount: draft.amount,
            status: InvoiceStatus::Unpaid,
        });
        debug!(id, "invoice added");
        Ok(id)
    }

    /// Replaces the editable fields of an existing invoice. The payment
    /// status is not editable through this path.
    pub fn update_invoice(&mut self, id: u64, draft: InvoiceDraft) -> Result<(), StoreError> {
        let pos = self
            .invoices
            .iter()
            .position(|inv| inv.id == id)
            .ok_or(StoreError::NotFound { record: "invoice", id })?;
        let draft = draft.validated()?;
        let invoice = &mut self.invoices[pos];
        invoice.customer = draft.customer;
        invoice.invoice_date = draft.invoice_date;
        invoice.due_date = draft.due_date;
        invoice.amount = draft.amount;
        debug!(id, "invoice updated");
        Ok(())
    }

    /// Moves an invoice to Paid. Idempotent: marking a Paid invoice again
    /// changes nothing. There is no path back to Unpaid.
    pub fn mark_invoice_paid(&mut self, id: u64) -> Result<(), StoreError> {
        let invoice = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or(StoreError::NotFound { record: "invoice", id })?;
        invoice.status = InvoiceStatus::Paid;
        debug!(id, "invoice marked paid");
        Ok(())
    }

    /// Deletes every invoice whose id is in `ids`. Unmatched ids are a no-op.
    pub fn remove_invoices(&mut self, ids: &[u64]) {
        self.invoices.retain(|inv| !ids.contains(&inv.id));
    }

    pub fn invoice(&self, id: u64) -> Result<&Invoice, StoreError> {
        self.invoices
            .iter()
            .find(|inv| inv.id == id)
            .ok_or(StoreError::NotFound { record: "invoice", id })
    }

    /// All invoices in insertion order.
    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.iter()
    }

    /// Invoices whose customer name contains `query`, case-insensitively.
    /// An empty (or all-whitespace) query matches everything.
    pub fn search_invoices<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Invoice> + 'a {
        let needle = query.trim().to_lowercase();
        self.invoices
            .iter()
            .filter(move |inv| needle.is_empty() || inv.customer.to_lowercase().contains(&needle))
    }

    // Expense operations

    /// Validates the draft, appends a new expense and returns its id.
    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<u64, StoreError> {
        let draft = draft.validated()?;
        let id = self.next_expense_id;
        self.next_expense_id += 1;
        self.expenses.push(Expense {
            id,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            amount: draft.amount,
        });
        debug!(id, "expense added");
        Ok(id)
    }

    pub fn update_expense(&mut self, id: u64, draft: ExpenseDraft) -> Result<(), StoreError> {
        let pos = self
            .expenses
            .iter()
            .position(|exp| exp.id == id)
            .ok_or(StoreError::NotFound { record: "expense", id })?;
        let draft = draft.validated()?;
        let expense = &mut self.expenses[pos];
        expense.category = draft.category;
        expense.description = draft.description;
        expense.date = draft.date;
        expense.amount = draft.amount;
        debug!(id, "expense updated");
        Ok(())
    }

    /// Deletes every expense whose id is in `ids`. Unmatched ids are a no-op.
    pub fn remove_expenses(&mut self, ids: &[u64]) {
        self.expenses.retain(|exp| !ids.contains(&exp.id));
    }

    pub fn expense(&self, id: u64) -> Result<&Expense, StoreError> {
        self.expenses
            .iter()
            .find(|exp| exp.id == id)
            .ok_or(StoreError::NotFound { record: "expense", id })
    }

    /// All expenses in insertion order.
    pub fn expenses(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter()
    }

    /// Expenses whose description contains `query`, case-insensitively.
    pub fn search_expenses<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Expense> + 'a {
        let needle = query.trim().to_lowercase();
        self.expenses
            .iter()
            .filter(move |exp| needle.is_empty() || exp.description.to_lowercase().contains(&needle))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::ExpenseCategory;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn invoice_draft(customer: &str, amount: f64) -> InvoiceDraft {
        InvoiceDraft {
            customer: customer.to_string(),
            invoice_date: date("2025-03-01"),
            due_date: date("2025-03-31"),
            amount,
        }
    }

    fn expense_draft(description: &str, amount: f64) -> ExpenseDraft {
        ExpenseDraft {
            category: ExpenseCategory::Travel,
            description: description.to_string(),
            date: date("2025-03-10"),
            amount,
        }
    }

    #[test]
    fn add_then_find_returns_the_stored_record() {
        let mut session = Session::new();
        let id = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();

        let invoice = session.invoice(id).unwrap();
        assert_eq!(invoice.customer, "Acme");
        assert_eq!(invoice.invoice_date, date("2025-03-01"));
        assert_eq!(invoice.due_date, date("2025-03-31"));
        assert_eq!(invoice.amount, 100.0);
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
    }

    #[test]
    fn customer_name_is_trimmed_before_storage() {
        let mut session = Session::new();
        let id = session.add_invoice(invoice_draft("  Acme  ", 100.0)).unwrap();
        assert_eq!(session.invoice(id).unwrap().customer, "Acme");
    }

    #[test]
    fn blank_customer_is_rejected() {
        let mut session = Session::new();
        let err = session.add_invoice(invoice_draft("   ", 100.0)).unwrap_err();
        assert_eq!(
            err,
            StoreError::Invalid {
                field: "customer",
                reason: "customer name is required"
            }
        );
        assert_eq!(session.invoices().count(), 0);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut session = Session::new();
        assert!(session.add_invoice(invoice_draft("Acme", 0.0)).is_err());
        assert!(session.add_invoice(invoice_draft("Acme", -5.0)).is_err());
        assert!(session.add_expense(expense_draft("Taxi", 0.0)).is_err());
        assert_eq!(session.invoices().count(), 0);
        assert_eq!(session.expenses().count(), 0);
    }

    #[test]
    fn rejected_update_leaves_the_record_unchanged() {
        let mut session = Session::new();
        let id = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();

        let err = session.update_invoice(id, invoice_draft("", 250.0)).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "customer", .. }));

        let invoice = session.invoice(id).unwrap();
        assert_eq!(invoice.customer, "Acme");
        assert_eq!(invoice.amount, 100.0);
    }

    #[test]
    fn update_of_unknown_id_fails_with_not_found() {
        let mut session = Session::new();
        let err = session.update_invoice(7, invoice_draft("Acme", 10.0)).unwrap_err();
        assert_eq!(err, StoreError::NotFound { record: "invoice", id: 7 });
    }

    #[test]
    fn update_does_not_touch_payment_status() {
        let mut session = Session::new();
        let id = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();
        session.mark_invoice_paid(id).unwrap();

        session.update_invoice(id, invoice_draft("Acme Corp", 120.0)).unwrap();

        let invoice = session.invoice(id).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.customer, "Acme Corp");
    }

    #[test]
    fn remove_then_find_yields_not_found() {
        let mut session = Session::new();
        let id = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();

        session.remove_invoices(&[id]);
        assert_eq!(
            session.invoice(id).unwrap_err(),
            StoreError::NotFound { record: "invoice", id }
        );
    }

    #[test]
    fn removing_unknown_ids_is_a_no_op() {
        let mut session = Session::new();
        let id = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();

        session.remove_invoices(&[999]);
        session.remove_expenses(&[999]);
        assert!(session.invoice(id).is_ok());
    }

    #[test]
    fn ids_keep_increasing_after_removal() {
        let mut session = Session::new();
        let first = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();
        let second = session.add_invoice(invoice_draft("Beta", 50.0)).unwrap();
        assert!(second > first);

        session.remove_invoices(&[first, second]);
        let third = session.add_invoice(invoice_draft("Gamma", 25.0)).unwrap();
        assert!(third > second);
    }

    #[test]
    fn expense_ids_are_independent_of_invoice_ids() {
        let mut session = Session::new();
        let invoice_id = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();
        let expense_id = session.add_expense(expense_draft("Taxi", 30.0)).unwrap();
        assert_eq!(invoice_id, 1);
        assert_eq!(expense_id, 1);
    }

    #[test]
    fn mark_paid_is_idempotent() {
        let mut session = Session::new();
        let id = session.add_invoice(invoice_draft("Acme", 100.0)).unwrap();

        session.mark_invoice_paid(id).unwrap();
        let before = session.invoice(id).unwrap().clone();

        session.mark_invoice_paid(id).unwrap();
        assert_eq!(*session.invoice(id).unwrap(), before);
    }

    #[test]
    fn mark_paid_on_unknown_id_fails_with_not_found() {
        let mut session = Session::new();
        let err = session.mark_invoice_paid(3).unwrap_err();
        assert_eq!(err, StoreError::NotFound { record: "invoice", id: 3 });
    }

    #[test]
    fn search_matches_substrings_case_insensitively() {
        let mut session = Session::new();
        for customer in ["Acme", "Beta", "Zebra"] {
            session.add_invoice(invoice_draft(customer, 10.0)).unwrap();
        }

        let hits: Vec<_> = session.search_invoices("be").map(|inv| inv.customer.as_str()).collect();
        assert_eq!(hits, ["Beta"]);
    }

    #[test]
    fn empty_search_matches_everything_in_insertion_order() {
        let mut session = Session::new();
        for customer in ["Acme", "Beta", "Zebra"] {
            session.add_invoice(invoice_draft(customer, 10.0)).unwrap();
        }

        let all: Vec<_> = session.search_invoices("  ").map(|inv| inv.customer.as_str()).collect();
        assert_eq!(all, ["Acme", "Beta", "Zebra"]);
    }

    #[test]
    fn expense_search_matches_on_description() {
        let mut session = Session::new();
        session.add_expense(expense_draft("Team lunch", 40.0)).unwrap();
        session.add_expense(expense_draft("Server hosting", 15.0)).unwrap();

        let hits: Vec<_> = session
            .search_expenses("LUNCH")
            .map(|exp| exp.description.as_str())
            .collect();
        assert_eq!(hits, ["Team lunch"]);
    }
}
