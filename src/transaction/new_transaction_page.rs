//! The page with the form for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserId,
    category::{RegistryEntry, get_categories_by_user, merged_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
    },
    navigation::NavBar,
    timezone::today_in,
    transaction::TransactionKind,
};

/// The state needed to render the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Phnom_Penh".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the form for creating a new transaction.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user_categories = get_categories_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    let today = today_in(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let categories = merged_categories(TransactionKind::Expense, &user_categories);

    Ok(new_transaction_view(&categories, today).into_response())
}

/// The query parameters for the category options partial.
#[derive(Debug, Deserialize)]
pub struct CategoryOptionsQuery {
    /// The transaction kind to list the categories of.
    pub kind: TransactionKind,
}

/// Render the category select for the chosen transaction kind.
///
/// Used by HTMX to swap the category choices when the user toggles between
/// expense and income.
pub async fn get_category_options(
    State(state): State<NewTransactionPageState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<CategoryOptionsQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user_categories = get_categories_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    let categories = merged_categories(query.kind, &user_categories);

    Ok(category_select(&categories).into_response())
}

fn kind_radio(kind: TransactionKind, is_checked: bool) -> Markup {
    let options_endpoint = format!(
        "{}?kind={}",
        endpoints::NEW_TRANSACTION_CATEGORY_OPTIONS,
        kind.as_str()
    );

    html! {
        div class="flex items-center gap-x-2"
        {
            input
                type="radio"
                name="kind"
                id=(kind.as_str())
                value=(kind.as_str())
                checked[is_checked]
                hx-get=(options_endpoint)
                hx-target="#category-select"
                hx-swap="outerHTML"
                class=(FORM_RADIO_INPUT_STYLE);

            label
                for=(kind.as_str())
                class=(FORM_RADIO_LABEL_STYLE)
            {
                (kind.label())
            }
        }
    }
}

fn category_select(categories: &[RegistryEntry]) -> Markup {
    html! {
        select
            id="category-select"
            name="category"
            required
            class=(FORM_SELECT_STYLE)
        {
            @for category in categories {
                option value=(category.name) { (category.name) }
            }
        }
    }
}

fn new_transaction_view(categories: &[RegistryEntry], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Transaction" }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    span class=(FORM_LABEL_STYLE) { "Type" }

                    div class="flex gap-4"
                    {
                        (kind_radio(TransactionKind::Expense, true))
                        (kind_radio(TransactionKind::Income, false))
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        id="amount"
                        type="number"
                        name="amount"
                        step="0.01"
                        min="0.01"
                        placeholder="e.g. 15.50"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category-select" class=(FORM_LABEL_STYLE) { "Category" }

                    (category_select(categories))
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    textarea
                        id="description"
                        name="description"
                        rows="2"
                        placeholder="What was this for?"
                        class=(FORM_TEXT_INPUT_STYLE) {}
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        id="date"
                        type="date"
                        name="date"
                        value=(today)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    "Save Transaction"
                }

                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("New Transaction", &[], &content)
}
