//! CSV export of the current session: an `Invoices` section and an
//! `Expenses` section separated by one blank row, rows in insertion order.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use tracing::info;

use crate::store::Session;

/// Writes both record sections to `path`, creating or truncating the file.
/// Only reads the session; a failed write leaves it untouched.
pub fn write_csv(path: &Path, session: &Session) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_sections(file, session)?;
    info!(path = %path.display(), "exported csv");
    Ok(())
}

pub fn write_sections<W: Write>(out: W, session: &Session) -> Result<()> {
    // Flexible: section header rows have a single field, data rows five or six.
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(out);

    wtr.write_record(["Invoices"])?;
    wtr.write_record(["ID", "Customer", "Invoice Date", "Due Date", "Amount", "Status"])?;
    for invoice in session.invoices() {
        wtr.write_record([
            invoice.id.to_string(),
            invoice.customer.clone(),
            invoice.invoice_date.format("%Y-%m-%d").to_string(),
            invoice.due_date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", invoice.amount),
            invoice.status.to_string(),
        ])?;
    }

    // Blank separator row between the two sections.
    wtr.write_record(None::<&[u8]>)?;

    wtr.write_record(["Expenses"])?;
    wtr.write_record(["ID", "Category", "Description", "Date", "Amount"])?;
    for expense in session.expenses() {
        wtr.write_record([
            expense.id.to_string(),
            expense.category.to_string(),
            expense.description.clone(),
            expense.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", expense.amount),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{ExpenseCategory, ExpenseDraft, InvoiceDraft};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn example_session() -> Session {
        let mut session = Session::new();
        session
            .add_invoice(InvoiceDraft {
                customer: "Acme".to_string(),
                invoice_date: date("2025-01-05"),
                due_date: date("2025-02-04"),
                amount: 100.0,
            })
            .unwrap();
        let beta = session
            .add_invoice(InvoiceDraft {
                customer: "Beta".to_string(),
                invoice_date: date("2025-01-10"),
                due_date: date("2025-02-09"),
                amount: 50.0,
            })
            .unwrap();
        session.mark_invoice_paid(beta).unwrap();
        session
            .add_expense(ExpenseDraft {
                category: ExpenseCategory::Travel,
                description: "Client visit".to_string(),
                date: date("2025-01-12"),
                amount: 30.0,
            })
            .unwrap();
        session
    }

    fn export_to_string(session: &Session) -> String {
        let mut buf = Vec::new();
        write_sections(&mut buf, session).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn sections_match_the_fixed_layout_byte_for_byte() {
        let expected = "\
Invoices
ID,Customer,Invoice Date,Due Date,Amount,Status
1,Acme,2025-01-05,2025-02-04,100.00,Unpaid
2,Beta,2025-01-10,2025-02-09,50.00,Paid

Expenses
ID,Category,Description,Date,Amount
1,Travel,Client visit,2025-01-12,30.00
";
        assert_eq!(export_to_string(&example_session()), expected);
    }

    #[test]
    fn empty_session_still_produces_both_sections() {
        let expected = "\
Invoices
ID,Customer,Invoice Date,Due Date,Amount,Status

Expenses
ID,Category,Description,Date,Amount
";
        assert_eq!(export_to_string(&Session::new()), expected);
    }

    #[test]
    fn fields_containing_the_delimiter_are_quoted() {
        let mut session = Session::new();
        session
            .add_invoice(InvoiceDraft {
                customer: "Acme, Inc.".to_string(),
                invoice_date: date("2025-01-05"),
                due_date: date("2025-02-04"),
                amount: 100.0,
            })
            .unwrap();

        let out = export_to_string(&session);
        assert!(out.contains("1,\"Acme, Inc.\",2025-01-05"));
    }
}
