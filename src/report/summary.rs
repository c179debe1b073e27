//! Per-category aggregation for the reports page.
//!
//! Groups a transaction set by category name, computes income and expense
//! totals for every category known to the registry, and ranks the nonzero
//! categories of each kind with their percentage share of that kind's total.

use std::collections::HashMap;

use crate::{
    category::RegistryEntry,
    transaction::{Transaction, TransactionKind},
};

/// The cumulative income and expense recorded against one category name.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CategoryTotals {
    /// Sum of income amounts filed under this category.
    pub(crate) income: f64,
    /// Sum of expense amounts filed under this category.
    pub(crate) expense: f64,
}

impl CategoryTotals {
    fn amount_for(&self, kind: TransactionKind) -> f64 {
        match kind {
            TransactionKind::Income => self.income,
            TransactionKind::Expense => self.expense,
        }
    }
}

/// Compute income/expense totals per category name.
///
/// Every category in `registry_entries` gets an entry, even when no
/// transaction references it (most categories will have a zero total for at
/// least one kind). Category names that appear on transactions but are
/// missing from the registry still get synthesized entries so that deleting
/// a category never drops its historical amounts from reports.
pub(crate) fn summarize_by_category(
    transactions: &[Transaction],
    registry_entries: &[RegistryEntry],
) -> HashMap<String, CategoryTotals> {
    let mut totals: HashMap<String, CategoryTotals> = registry_entries
        .iter()
        .map(|entry| (entry.name.clone(), CategoryTotals::default()))
        .collect();

    for transaction in transactions {
        let entry = totals.entry(transaction.category.clone()).or_default();

        match transaction.kind {
            TransactionKind::Income => entry.income += transaction.amount,
            TransactionKind::Expense => entry.expense += transaction.amount,
        }
    }

    totals
}

/// One row of the ranked per-kind report table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankedShare {
    /// The category name.
    pub(crate) name: String,
    /// The category's total for the ranked kind.
    pub(crate) amount: f64,
    /// The category's share of the kind total, rounded to one decimal place.
    pub(crate) percentage: f64,
}

/// Rank the categories with a nonzero total for `kind` by descending amount.
///
/// Percentages are computed against the sum of the listed categories and
/// rounded to one decimal place. When that sum is zero every percentage is
/// reported as zero instead of dividing by zero.
pub(crate) fn ranked_shares(
    totals: &HashMap<String, CategoryTotals>,
    kind: TransactionKind,
) -> Vec<RankedShare> {
    let mut listed: Vec<(&String, f64)> = totals
        .iter()
        .map(|(name, category_totals)| (name, category_totals.amount_for(kind)))
        .filter(|(_, amount)| *amount > 0.0)
        .collect();

    // Descending by amount, name as the tiebreak so the order is stable.
    listed.sort_by(|(a_name, a_amount), (b_name, b_amount)| {
        b_amount
            .partial_cmp(a_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a_name.cmp(b_name))
    });

    let kind_total: f64 = listed.iter().map(|(_, amount)| amount).sum();

    listed
        .into_iter()
        .map(|(name, amount)| {
            let percentage = if kind_total == 0.0 {
                0.0
            } else {
                (amount / kind_total * 1000.0).round() / 10.0
            };

            RankedShare {
                name: name.clone(),
                amount,
                percentage,
            }
        })
        .collect()
}
