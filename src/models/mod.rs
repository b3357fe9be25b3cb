mod expense;
mod invoice;

pub use expense::{Expense, ExpenseCategory, ExpenseDraft};
pub use invoice::{Invoice, InvoiceDraft, InvoiceStatus};
