//! Dashboard HTTP handler and view rendering.
//!
//! The dashboard shows the running totals, the filter controls, and the
//! filtered transaction list. Filter state lives in the query string so the
//! page is bookmarkable and every request recomputes all derived data from a
//! fresh snapshot.

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
    category::{Category, get_categories_by_user},
    currency::Currency,
    dashboard::{
        aggregation::{
            Totals, TransactionFilter, available_years, calculate_totals, filter_transactions,
        },
        cards::summary_cards,
        tables::transaction_list,
    },
    endpoints,
    html::{FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, base, link},
    navigation::NavBar,
    settings::get_currency,
    transaction::{Transaction, TransactionKind, get_transactions_by_user},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and preferences.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The dashboard's filter controls as they arrive in the query string.
///
/// Missing values and the literal string "all" both mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Free text matched against category and description.
    #[serde(default)]
    pub search: String,
    /// "all", "income" or "expense".
    pub kind: Option<String>,
    /// "all" or a calendar month 1-12.
    pub month: Option<String>,
    /// "all" or a calendar year.
    pub year: Option<String>,
}

impl DashboardQuery {
    /// Convert the raw query values into filter predicates.
    ///
    /// Values that do not parse ("all", garbage, out-of-range months) leave
    /// the corresponding predicate off rather than failing the request.
    fn into_filter(self) -> TransactionFilter {
        let kind = self
            .kind
            .as_deref()
            .and_then(|kind| kind.parse::<TransactionKind>().ok());
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
            search_term: self.search,
            kind,
            month,
            year,
        }
    }
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<DashboardQuery>,
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
    let totals = calculate_totals(&transactions);
    let years = available_years(&transactions);
    let filtered = filter_transactions(&transactions, &filter);

    Ok(dashboard_view(
        &filtered,
        &transactions,
        &user_categories,
        totals,
        currency,
        &filter,
        &years,
    )
    .into_response())
}

/// The filter controls. Submitting the form reloads the dashboard with the
/// chosen filters in the query string.
fn filter_panel(filter: &TransactionFilter, years: &[i32]) -> Markup {
    let selected_kind = filter.kind.map(|kind| kind.as_str()).unwrap_or("all");

    html!(
        div class="bg-white dark:bg-gray-800 p-4 rounded-xl shadow-lg w-full"
        {
            h2 class="text-lg font-semibold mb-3 text-gray-700 dark:text-gray-200" { "Filters" }

            form
                method="get"
                action=(endpoints::DASHBOARD_VIEW)
                class="grid grid-cols-1 sm:grid-cols-4 gap-3"
            {
                input
                    type="text"
                    name="search"
                    placeholder="Category or description..."
                    value=(filter.search_term)
                    class=(FORM_TEXT_INPUT_STYLE);

                select name="kind" class=(FORM_SELECT_STYLE)
                {
                    option value="all" { "All Types" }

                    @for kind in [TransactionKind::Income, TransactionKind::Expense] {
                        option
                            value=(kind.as_str())
                            selected[selected_kind == kind.as_str()]
                        {
                            (kind.label())
                        }
                    }
                }

                select name="month" class=(FORM_SELECT_STYLE)
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

                select name="year" class=(FORM_SELECT_STYLE)
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
                    class="sm:col-span-4 px-4 py-2 bg-blue-500 dark:bg-blue-600
                        hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
                {
                    "Apply Filters"
                }
            }
        }
    )
}

fn dashboard_view(
    filtered: &[&Transaction],
    all_transactions: &[Transaction],
    user_categories: &[Category],
    totals: Totals,
    currency: Currency,
    filter: &TransactionFilter,
    years: &[i32],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = if all_transactions.is_empty() {
        html!(
            (nav_bar)

            div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
            {
                h2 class="text-xl font-bold" { "Nothing here yet..." }

                p
                {
                    "Your balance and transactions will show up here once you
                    add some. Head over to "
                    (link(endpoints::NEW_TRANSACTION_VIEW, "New Transaction"))
                    " to record your first one."
                }
            }
        )
    } else {
        html!(
            (nav_bar)

            div
                class="flex flex-col items-center gap-6 px-2 lg:px-6 lg:py-8 mx-auto
                    max-w-screen-md text-gray-900 dark:text-white"
            {
                (summary_cards(&totals, currency))

                (filter_panel(filter, years))

                (transaction_list(filtered, user_categories, currency))
            }
        )
    };

    base("Dashboard", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        auth::UserId,
        db::initialize,
        transaction::{TransactionBuilder, TransactionKind, create_transaction},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page};

    fn get_test_state() -> (DashboardState, UserId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO user (email, password) VALUES ('foo@bar.baz', 'hunter2')",
            (),
        )
        .unwrap();
        let user_id = conn.last_insert_rowid();

        (
            DashboardState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            user_id,
        )
    }

    fn add_transaction(
        state: &DashboardState,
        user_id: UserId,
        kind: TransactionKind,
        amount: f64,
        category: &str,
        date: time::Date,
    ) {
        let connection = state.db_connection.lock().unwrap();
        create_transaction(
            TransactionBuilder {
                kind,
                amount,
                category: category.to_owned(),
                description: String::new(),
                date,
                user_id,
            },
            &connection,
        )
        .unwrap();
    }

    async fn get_page(state: DashboardState, user_id: UserId, query: DashboardQuery) -> Html {
        let response = get_dashboard_page(State(state), Extension(user_id), Query(query))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[test]
    fn query_parses_filters_and_ignores_all() {
        let query = DashboardQuery {
            search: "lunch".to_owned(),
            kind: Some("expense".to_owned()),
            month: Some("3".to_owned()),
            year: Some("2024".to_owned()),
        };

        let filter = query.into_filter();

        assert_eq!(filter.search_term, "lunch");
        assert_eq!(filter.kind, Some(TransactionKind::Expense));
        assert_eq!(filter.month, Some(3));
        assert_eq!(filter.year, Some(2024));

        let all_query = DashboardQuery {
            search: String::new(),
            kind: Some("all".to_owned()),
            month: Some("all".to_owned()),
            year: Some("all".to_owned()),
        };

        let filter = all_query.into_filter();

        assert_eq!(filter.kind, None);
        assert_eq!(filter.month, None);
        assert_eq!(filter.year, None);
    }

    #[test]
    fn query_ignores_out_of_range_months() {
        let query = DashboardQuery {
            search: String::new(),
            kind: None,
            month: Some("13".to_owned()),
            year: None,
        };

        assert_eq!(query.into_filter().month, None);
    }

    #[tokio::test]
    async fn dashboard_shows_prompt_text_on_no_data() {
        let (state, user_id) = get_test_state();

        let html = get_page(state, user_id, DashboardQuery::default()).await;

        let heading_selector = Selector::parse("h2").unwrap();
        let headings: Vec<String> = html
            .select(&heading_selector)
            .map(|heading| heading.text().collect())
            .collect();
        assert!(
            headings.iter().any(|text| text.contains("Nothing here yet")),
            "expected empty-state prompt, got {headings:?}"
        );
    }

    #[tokio::test]
    async fn dashboard_shows_totals_and_transactions() {
        let (state, user_id) = get_test_state();
        add_transaction(
            &state,
            user_id,
            TransactionKind::Income,
            100.0,
            "Salary",
            date!(2024 - 01 - 05),
        );
        add_transaction(
            &state,
            user_id,
            TransactionKind::Expense,
            40.0,
            "Food",
            date!(2024 - 01 - 10),
        );

        let html = get_page(state, user_id, DashboardQuery::default()).await;

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Current Balance"));
        assert!(text.contains("$60.00"), "expected balance of $60.00");
        assert!(text.contains("$100.00"), "expected total income of $100.00");
        assert!(text.contains("$40.00"), "expected total expense of $40.00");
        assert!(text.contains("Transactions (2 found)"));
    }

    #[tokio::test]
    async fn month_filter_reduces_transaction_list() {
        let (state, user_id) = get_test_state();
        add_transaction(
            &state,
            user_id,
            TransactionKind::Income,
            100.0,
            "Salary",
            date!(2024 - 01 - 05),
        );
        add_transaction(
            &state,
            user_id,
            TransactionKind::Expense,
            40.0,
            "Food",
            date!(2024 - 01 - 10),
        );
        add_transaction(
            &state,
            user_id,
            TransactionKind::Expense,
            10.0,
            "Food",
            date!(2024 - 02 - 01),
        );

        let html = get_page(
            state,
            user_id,
            DashboardQuery {
                month: Some("1".to_owned()),
                ..Default::default()
            },
        )
        .await;

        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("Transactions (2 found)"),
            "expected the January filter to keep 2 of 3 transactions"
        );
    }

    #[tokio::test]
    async fn delete_buttons_require_confirmation() {
        let (state, user_id) = get_test_state();
        add_transaction(
            &state,
            user_id,
            TransactionKind::Expense,
            40.0,
            "Food",
            date!(2024 - 01 - 10),
        );

        let html = get_page(state, user_id, DashboardQuery::default()).await;

        let delete_selector = Selector::parse("button[hx-delete]").unwrap();
        let delete_buttons: Vec<_> = html.select(&delete_selector).collect();
        assert_eq!(delete_buttons.len(), 1);
        assert!(
            delete_buttons[0].value().attr("hx-confirm").is_some(),
            "delete button must ask for confirmation before calling the API"
        );
    }

    #[tokio::test]
    async fn year_filter_options_come_from_transactions() {
        let (state, user_id) = get_test_state();
        add_transaction(
            &state,
            user_id,
            TransactionKind::Expense,
            40.0,
            "Food",
            date!(2023 - 01 - 10),
        );
        add_transaction(
            &state,
            user_id,
            TransactionKind::Expense,
            10.0,
            "Food",
            date!(2024 - 02 - 01),
        );

        let html = get_page(state, user_id, DashboardQuery::default()).await;

        let option_selector = Selector::parse("select[name=year] option").unwrap();
        let options: Vec<String> = html
            .select(&option_selector)
            .map(|option| option.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(options, vec!["All Years", "2024", "2023"]);
    }
}
