//! Dashboard module
//!
//! Provides the overview page showing the current balance, income and
//! expense totals, and the filtered transaction history.

mod aggregation;
mod cards;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;

pub(crate) use aggregation::{TransactionFilter, available_years, filter_transactions};
