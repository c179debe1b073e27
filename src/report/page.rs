//! The reports page: per-category income and expense breakdowns.
//!
//! The report keeps its own month/year filter in the query string, separate
//! from the dashboard's filter state. Both pages read the same underlying
//! transaction set but filter it independently.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserId,
    category::{RegistryEntry, category_color, get_categories_by_user, merged_categories},
    currency::{Currency, format_amount},
    dashboard::{TransactionFilter, available_years, filter_transactions},
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, FORM_SELECT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
    report::summary::{RankedShare, ranked_shares, summarize_by_category},
    settings::get_currency,
    transaction::{TransactionKind, get_transactions_by_user},
};

/// The state needed for displaying the reports page.
#[derive(Debug, Clone)]
pub struct ReportPageState {
    /// The database connection for reading transactions and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The report's own filter values as they arrive in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// "all" or a calendar month 1-12.
    pub month: Option<String>,
    /// "all" or a calendar year.
    pub year: Option<String>,
}

impl ReportQuery {
    fn into_filter(self) -> TransactionFilter {
        let month = self
            .month
            .as_deref()
            .and_then(|month| month.parse::<u8>().ok())
            .filter(|month| (1..=12).contains(month));
        let year = self
            .year
            .as_deref()
            .and_then(|year| year.parse::<i32>().ok());

        TransactionFilter {
            month,
            year,
            ..Default::default()
        }
    }
}

/// Display the per-category report page.
pub async fn get_reports_page(
    State(state): State<ReportPageState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let user_categories = get_categories_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    let currency = get_currency(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get currency preference: {error}"))?;

    let filter = query.into_filter();
    let years = available_years(&transactions);
    let filtered: Vec<_> = filter_transactions(&transactions, &filter)
        .into_iter()
        .cloned()
        .collect();

    let registry: Vec<RegistryEntry> = merged_categories(TransactionKind::Income, &user_categories)
        .into_iter()
        .chain(merged_categories(TransactionKind::Expense, &user_categories))
        .collect();

    let totals = summarize_by_category(&filtered, &registry);
    let income_shares = ranked_shares(&totals, TransactionKind::Income);
    let expense_shares = ranked_shares(&totals, TransactionKind::Expense);

    Ok(report_view(
        &income_shares,
        &expense_shares,
        &user_categories,
        currency,
        &filter,
        &years,
    )
    .into_response())
}

fn report_filter_panel(filter: &TransactionFilter, years: &[i32]) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class="flex flex-wrap gap-3 w-full bg-white dark:bg-gray-800 p-4 rounded-xl shadow-md"
        {
            select name="month" class={ (FORM_SELECT_STYLE) " max-w-48" }
            {
                option value="all" { "All Months" }

                @for month in 1..=12u8 {
                    option
                        value=(month)
                        selected[filter.month == Some(month)]
                    {
                        "Month " (month)
                    }
                }
            }

            select name="year" class={ (FORM_SELECT_STYLE) " max-w-48" }
            {
                option value="all" { "All Years" }

                @for year in years {
                    option
                        value=(year)
                        selected[filter.year == Some(*year)]
                    {
                        (year)
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                    hover:dark:bg-blue-700 text-white rounded"
            {
                "Apply"
            }
        }
    )
}

fn share_table(
    title: &str,
    kind: TransactionKind,
    shares: &[RankedShare],
    user_categories: &[crate::category::Category],
    currency: Currency,
) -> Markup {
    html!(
        div class="w-full bg-white dark:bg-gray-800 p-6 rounded-xl shadow-md"
        {
            h2 class="text-xl font-semibold mb-4 text-gray-700 dark:text-gray-200" { (title) }

            @if shares.is_empty() {
                p class="text-gray-500 italic p-4 text-center border border-dashed rounded-lg"
                {
                    "No " (kind.as_str()) " recorded for this period."
                }
            } @else {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Total" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Share" }
                        }
                    }

                    tbody
                    {
                        @for share in shares {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class={
                                        (CATEGORY_BADGE_STYLE) " "
                                        (category_color(kind, &share.name, user_categories).badge_class())
                                    }
                                    {
                                        (share.name)
                                    }
                                }

                                td class={ (TABLE_CELL_STYLE) " text-right" }
                                {
                                    (format_amount(share.amount, currency))
                                }

                                td class={ (TABLE_CELL_STYLE) " text-right" }
                                {
                                    (share.percentage) "%"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn report_view(
    income_shares: &[RankedShare],
    expense_shares: &[RankedShare],
    user_categories: &[crate::category::Category],
    currency: Currency,
    filter: &TransactionFilter,
    years: &[i32],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            class="flex flex-col items-center gap-6 px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-md text-gray-900 dark:text-white"
        {
            h1 class="text-xl font-bold self-start" { "Reports" }

            (report_filter_panel(filter, years))

            (share_table(
                "Income by Category",
                TransactionKind::Income,
                income_shares,
                user_categories,
                currency,
            ))

            (share_table(
                "Expenses by Category",
                TransactionKind::Expense,
                expense_shares,
                user_categories,
                currency,
            ))
        }
    );

    base("Reports", &[], &content)
}
