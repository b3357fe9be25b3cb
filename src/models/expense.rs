use std::fmt;

use chrono::NaiveDate;

use crate::store::StoreError;

/// Fixed set of expense categories. New expenses default to the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseCategory {
    #[default]
    OfficeSupplies,
    Travel,
    Utilities,
    Software,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::OfficeSupplies,
        ExpenseCategory::Travel,
        ExpenseCategory::Utilities,
        ExpenseCategory::Software,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::OfficeSupplies => "Office Supplies",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Software => "Software",
            ExpenseCategory::Other => "Other",
        }
    }

    /// The category after this one, wrapping around. Used by the form selector.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The category before this one, wrapping around.
    pub fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: u64,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Input for creating or editing an expense.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
    pub amount: f64,
}

impl ExpenseDraft {
    /// Applies the field rules and returns the draft with the description
    /// trimmed, or the first violation found.
    pub fn validated(mut self) -> Result<Self, StoreError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(StoreError::invalid("description", "description is required"));
        }
        if self.amount <= 0.0 || !self.amount.is_finite() {
            return Err(StoreError::invalid("amount", "amount must be greater than zero"));
        }
        self.description = description.to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_cycle_visits_every_variant_in_order() {
        let mut cat = ExpenseCategory::default();
        assert_eq!(cat, ExpenseCategory::OfficeSupplies);
        for expected in ExpenseCategory::ALL.iter().skip(1) {
            cat = cat.next();
            assert_eq!(cat, *expected);
        }
        assert_eq!(cat.next(), ExpenseCategory::OfficeSupplies);
        assert_eq!(ExpenseCategory::OfficeSupplies.previous(), ExpenseCategory::Other);
    }
}
