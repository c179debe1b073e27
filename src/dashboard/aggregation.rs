//! Transaction aggregation and filtering.
//!
//! Provides pure functions to compute running totals, apply the dashboard's
//! compound filter, and derive the set of years available for filtering.
//! All derived values are recomputed from the full transaction snapshot on
//! every request, never updated incrementally.

use crate::transaction::{Transaction, TransactionKind};

/// The running totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Totals {
    /// Sum of all income amounts.
    pub(crate) income: f64,
    /// Sum of all expense amounts.
    pub(crate) expense: f64,
}

impl Totals {
    /// The current balance: total income minus total expense.
    pub(crate) fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Sum the income and expense amounts over `transactions`.
///
/// The result does not depend on the order of the input list.
pub(crate) fn calculate_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => totals.income += transaction.amount,
            TransactionKind::Expense => totals.expense += transaction.amount,
        }
    }

    totals
}

/// The dashboard's compound filter.
///
/// Fields set to `None` (or an empty search term) do not constrain the
/// result. Active predicates compose as a logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TransactionFilter {
    /// Case-insensitive substring to match against category or description.
    pub(crate) search_term: String,
    /// Keep only transactions of this kind.
    pub(crate) kind: Option<TransactionKind>,
    /// Keep only transactions in this calendar month (1-indexed).
    pub(crate) month: Option<u8>,
    /// Keep only transactions in this calendar year.
    pub(crate) year: Option<i32>,
}

impl TransactionFilter {
    fn matches(&self, transaction: &Transaction) -> bool {
        if !self.search_term.is_empty() {
            let term = self.search_term.to_lowercase();
            let matches_category = transaction.category.to_lowercase().contains(&term);
            let matches_description = transaction.description.to_lowercase().contains(&term);

            if !matches_category && !matches_description {
                return false;
            }
        }

        if let Some(kind) = self.kind
            && transaction.kind != kind
        {
            return false;
        }

        if let Some(month) = self.month
            && u8::from(transaction.date.month()) != month
        {
            return false;
        }

        if let Some(year) = self.year
            && transaction.date.year() != year
        {
            return false;
        }

        true
    }
}

/// Apply `filter` to `transactions`, preserving the input order.
///
/// An empty result is a normal outcome, not an error.
pub(crate) fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}

/// The distinct calendar years present in `transactions`, most recent first.
///
/// Used to populate the year filter's choices. Empty when there are no
/// transactions.
pub(crate) fn available_years(transactions: &[Transaction]) -> Vec<i32> {
    let mut years: Vec<i32> = transactions
        .iter()
        .map(|transaction| transaction.date.year())
        .collect();

    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
