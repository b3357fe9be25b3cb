use chrono::NaiveDate;

use bizbooks::export;
use bizbooks::models::{ExpenseCategory, ExpenseDraft, InvoiceDraft, InvoiceStatus};
use bizbooks::report::Summary;
use bizbooks::store::{Session, StoreError};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn invoice(customer: &str, amount: f64) -> InvoiceDraft {
    InvoiceDraft {
        customer: customer.to_string(),
        invoice_date: date("2025-01-05"),
        due_date: date("2025-02-04"),
        amount,
    }
}

fn expense(description: &str, amount: f64) -> ExpenseDraft {
    ExpenseDraft {
        category: ExpenseCategory::Travel,
        description: description.to_string(),
        date: date("2025-01-12"),
        amount,
    }
}

#[test]
fn a_full_bookkeeping_session() {
    let mut session = Session::new();

    // Record two invoices and an expense, collect one payment.
    let acme = session.add_invoice(invoice("Acme", 100.0)).unwrap();
    let beta = session.add_invoice(invoice("Beta", 50.0)).unwrap();
    let travel = session.add_expense(expense("Client visit", 30.0)).unwrap();
    session.mark_invoice_paid(beta).unwrap();

    // The dashboard numbers line up.
    let summary = Summary::compute(&session);
    assert_eq!(summary.total_invoiced, 150.0);
    assert_eq!(summary.total_paid, 50.0);
    assert_eq!(summary.total_expenses, 30.0);
    assert_eq!(summary.net_profit, 20.0);
    assert_eq!(summary.tax_due, 2.0);

    // A bad edit bounces without touching the books.
    let err = session.update_invoice(acme, invoice("Acme", -1.0)).unwrap_err();
    assert!(matches!(err, StoreError::Invalid { field: "amount", .. }));
    assert_eq!(session.invoice(acme).unwrap().amount, 100.0);

    // Filtering narrows the view, not the store.
    let hits: Vec<_> = session.search_invoices("be").map(|inv| inv.id).collect();
    assert_eq!(hits, [beta]);
    assert_eq!(session.invoices().count(), 2);

    // Deleting the paid invoice works the same as any other.
    session.remove_invoices(&[beta]);
    assert_eq!(
        session.invoice(beta).unwrap_err(),
        StoreError::NotFound { record: "invoice", id: beta }
    );

    // A later invoice gets a fresh id, never a recycled one.
    let gamma = session.add_invoice(invoice("Gamma", 75.0)).unwrap();
    assert!(gamma > beta);

    session.remove_expenses(&[travel]);
    assert_eq!(session.expenses().count(), 0);
    assert_eq!(Summary::compute(&session).total_expenses, 0.0);
}

#[test]
fn export_writes_the_file_and_leaves_the_session_intact() {
    let mut session = Session::new();
    session.add_invoice(invoice("Acme", 100.0)).unwrap();
    let beta = session.add_invoice(invoice("Beta", 50.0)).unwrap();
    session.mark_invoice_paid(beta).unwrap();
    session.add_expense(expense("Client visit", 30.0)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    export::write_csv(&path, &session).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let expected = "\
Invoices
ID,Customer,Invoice Date,Due Date,Amount,Status
1,Acme,2025-01-05,2025-02-04,100.00,Unpaid
2,Beta,2025-01-05,2025-02-04,50.00,Paid

Expenses
ID,Category,Description,Date,Amount
1,Travel,Client visit,2025-01-12,30.00
";
    assert_eq!(contents, expected);

    // Export only reads.
    assert_eq!(session.invoices().count(), 2);
    assert_eq!(session.expenses().count(), 1);
    assert_eq!(session.invoice(beta).unwrap().status, InvoiceStatus::Paid);
}

#[test]
fn export_to_an_unwritable_path_fails_without_corrupting_state() {
    let mut session = Session::new();
    session.add_invoice(invoice("Acme", 100.0)).unwrap();

    let missing_dir = std::path::Path::new("/nonexistent-bizbooks-dir/export.csv");
    assert!(export::write_csv(missing_dir, &session).is_err());
    assert_eq!(session.invoices().count(), 1);
}
