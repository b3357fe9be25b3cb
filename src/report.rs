//! Aggregates derived from the current session snapshot. Everything here is
//! recomputed on demand; nothing is cached or invalidated.

use crate::models::InvoiceStatus;
use crate::store::Session;

/// Flat tax estimate applied to positive net profit.
pub const TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub total_invoiced: f64,
    pub total_paid: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub tax_due: f64,
    pub paid_count: usize,
    pub unpaid_count: usize,
}

impl Summary {
    pub fn compute(session: &Session) -> Self {
        let mut total_invoiced = 0.0;
        let mut total_paid = 0.0;
        let mut paid_count = 0;
        let mut unpaid_count = 0;
        for invoice in session.invoices() {
            total_invoiced += invoice.amount;
            match invoice.status {
                InvoiceStatus::Paid => {
                    total_paid += invoice.amount;
                    paid_count += 1;
                }
                InvoiceStatus::Unpaid => unpaid_count += 1,
            }
        }

        let total_expenses: f64 = session.expenses().map(|exp| exp.amount).sum();
        let net_profit = total_paid - total_expenses;
        let tax_due = if net_profit > 0.0 { net_profit * TAX_RATE } else { 0.0 };

        Self {
            total_invoiced,
            total_paid,
            total_expenses,
            net_profit,
            tax_due,
            paid_count,
            unpaid_count,
        }
    }

    /// Share of invoices that are paid, 0.0 when there are none.
    pub fn paid_ratio(&self) -> f64 {
        let total = self.paid_count + self.unpaid_count;
        if total == 0 {
            0.0
        } else {
            self.paid_count as f64 / total as f64
        }
    }

    pub fn has_invoices(&self) -> bool {
        self.paid_count + self.unpaid_count > 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{ExpenseCategory, ExpenseDraft, InvoiceDraft};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn session_with(invoices: &[(&str, f64, bool)], expenses: &[f64]) -> Session {
        let mut session = Session::new();
        for (customer, amount, paid) in invoices {
            let id = session
                .add_invoice(InvoiceDraft {
                    customer: customer.to_string(),
                    invoice_date: date("2025-01-01"),
                    due_date: date("2025-01-31"),
                    amount: *amount,
                })
                .unwrap();
            if *paid {
                session.mark_invoice_paid(id).unwrap();
            }
        }
        for amount in expenses {
            session
                .add_expense(ExpenseDraft {
                    category: ExpenseCategory::Travel,
                    description: "expense".to_string(),
                    date: date("2025-01-15"),
                    amount: *amount,
                })
                .unwrap();
        }
        session
    }

    #[test]
    fn worked_example_from_two_invoices_and_one_expense() {
        let session = session_with(&[("Acme", 100.0, false), ("Beta", 50.0, true)], &[30.0]);
        let summary = Summary::compute(&session);

        assert_eq!(summary.total_invoiced, 150.0);
        assert_eq!(summary.total_paid, 50.0);
        assert_eq!(summary.total_expenses, 30.0);
        assert_eq!(summary.net_profit, 20.0);
        assert_eq!(summary.tax_due, 2.0);
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.unpaid_count, 1);
    }

    #[test]
    fn empty_session_yields_zeroes_without_error() {
        let summary = Summary::compute(&Session::new());
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.paid_ratio(), 0.0);
        assert!(!summary.has_invoices());
    }

    #[test]
    fn losses_owe_no_tax() {
        let session = session_with(&[("Acme", 40.0, true)], &[100.0]);
        let summary = Summary::compute(&session);
        assert_eq!(summary.net_profit, -60.0);
        assert_eq!(summary.tax_due, 0.0);
    }

    #[test]
    fn total_paid_never_exceeds_total_invoiced() {
        let session = session_with(
            &[("Acme", 100.0, true), ("Beta", 50.0, true), ("Gamma", 75.0, false)],
            &[],
        );
        let summary = Summary::compute(&session);
        assert!(summary.total_paid <= summary.total_invoiced);
    }

    #[test]
    fn paid_ratio_reflects_counts() {
        let session = session_with(
            &[("Acme", 10.0, true), ("Beta", 10.0, false), ("Gamma", 10.0, false), ("Delta", 10.0, true)],
            &[],
        );
        assert_eq!(Summary::compute(&session).paid_ratio(), 0.5);
    }
}
