//! The settings page: display currency, category management, and account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserId, get_user_by_id},
    category::{RegistryEntry, get_categories_by_user, merged_categories},
    currency::Currency,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    settings::preferences::get_currency,
    transaction::TransactionKind,
};

/// The state needed for displaying the settings page.
#[derive(Debug, Clone)]
pub struct SettingsPageState {
    /// The database connection for reading preferences and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the settings page.
pub async fn get_settings_page(
    State(state): State<SettingsPageState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user: {error}"))?;

    let currency = get_currency(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get currency preference: {error}"))?;

    let user_categories = get_categories_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    let expense_categories = merged_categories(TransactionKind::Expense, &user_categories);
    let income_categories = merged_categories(TransactionKind::Income, &user_categories);

    Ok(settings_view(
        &user.email.to_string(),
        currency,
        &expense_categories,
        &income_categories,
    )
    .into_response())
}

fn currency_section(current: Currency) -> Markup {
    let option_class = |is_current: bool| -> &'static str {
        if is_current {
            "flex items-center justify-between w-full p-3 rounded-lg border \
            bg-blue-100 border-blue-500 dark:bg-blue-900/30"
        } else {
            "flex items-center justify-between w-full p-3 rounded-lg border \
            bg-gray-50 hover:bg-gray-100 border-gray-200 \
            dark:bg-gray-700 dark:border-gray-600"
        }
    };

    html!(
        section class="w-full bg-white dark:bg-gray-800 p-6 rounded-xl shadow-md"
        {
            h2 class="text-xl font-semibold text-gray-800 dark:text-gray-100 mb-4 border-b pb-2"
            {
                "Currency Settings"
            }

            p class="text-sm text-gray-600 dark:text-gray-400 mb-3"
            {
                "Choose your preferred display currency. Amounts are stored as
                plain numbers and only formatted for display."
            }

            div class="space-y-3"
            {
                @for currency in Currency::all() {
                    form
                        hx-post=(endpoints::CURRENCY_API)
                        hx-target-error="#alert-container"
                    {
                        input type="hidden" name="currency_code" value=(currency.code());

                        button
                            type="submit"
                            class=(option_class(currency == current))
                        {
                            span class="flex items-center gap-3"
                            {
                                span class="text-xl font-bold w-6 text-center" { (currency.symbol()) }
                                span class="font-medium" { (currency.display_name()) " (" (currency.code()) ")" }
                            }

                            @if currency == current {
                                span class="text-blue-600 dark:text-blue-300 font-semibold text-xs"
                                {
                                    "Current"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn category_list(title: &str, categories: &[RegistryEntry]) -> Markup {
    html!(
        div class="bg-gray-50 dark:bg-gray-700 border border-gray-200 dark:border-gray-600 p-3 rounded-lg"
        {
            h3 class="font-bold text-gray-700 dark:text-gray-200 mb-2" { (title) }

            ul class="space-y-1"
            {
                @for category in categories {
                    li class="flex justify-between items-center text-sm p-1 rounded"
                    {
                        span class={ (CATEGORY_BADGE_STYLE) " " (category.color.badge_class()) }
                        {
                            (category.name)
                        }

                        @if let Some(id) = category.id {
                            button
                                hx-delete=(endpoints::format_endpoint(endpoints::DELETE_CATEGORY, id))
                                hx-confirm={
                                    "Delete the category '" (category.name) "'? \
                                    Existing transactions keep their category label."
                                }
                                hx-target="closest li"
                                hx-target-error="#alert-container"
                                hx-swap="delete"
                                class=(BUTTON_DELETE_STYLE)
                            {
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    )
}

fn category_section(
    expense_categories: &[RegistryEntry],
    income_categories: &[RegistryEntry],
) -> Markup {
    html!(
        section class="w-full bg-white dark:bg-gray-800 p-6 rounded-xl shadow-md"
        {
            h2 class="text-xl font-semibold text-gray-800 dark:text-gray-100 mb-4 border-b pb-2"
            {
                "Category Management"
            }

            form
                hx-post=(endpoints::CATEGORIES_API)
                hx-target-error="#alert-container"
                class="space-y-3 mb-6 p-4 bg-blue-50 dark:bg-gray-700 rounded-lg"
            {
                h3 class="font-medium text-blue-700 dark:text-blue-300" { "Create a category" }

                div class="flex flex-col sm:flex-row gap-2"
                {
                    select name="kind" class={ (FORM_SELECT_STYLE) " sm:w-1/3" }
                    {
                        option value="expense" { "Expense" }
                        option value="income" { "Income" }
                    }

                    input
                        type="text"
                        name="name"
                        placeholder="Category name (e.g. Coffee)"
                        required
                        class={ (FORM_TEXT_INPUT_STYLE) " sm:w-2/3" };
                }

                button
                    type="submit"
                    class="w-full py-2 bg-blue-600 hover:bg-blue-700 text-white font-semibold rounded-lg text-sm"
                {
                    "+ Add Category"
                }
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                (category_list("Expense", expense_categories))
                (category_list("Income", income_categories))
            }
        }
    )
}

fn account_section(email: &str) -> Markup {
    html!(
        section class="w-full bg-gray-50 dark:bg-gray-800 p-4 rounded-xl border border-gray-200 dark:border-gray-700 shadow-md"
        {
            div class="flex flex-col sm:flex-row justify-between items-center gap-2"
            {
                p class="text-sm font-medium text-gray-700 dark:text-gray-300"
                {
                    "Account: "
                    span class="font-mono text-xs p-1 bg-gray-100 dark:bg-gray-700 rounded break-all"
                    {
                        (email)
                    }
                }

                a
                    href=(endpoints::LOG_OUT)
                    class="bg-red-500 text-white text-sm font-semibold py-2 px-4 rounded-lg hover:bg-red-600"
                {
                    "Sign Out"
                }
            }
        }
    )
}

fn settings_view(
    email: &str,
    currency: Currency,
    expense_categories: &[RegistryEntry],
    income_categories: &[RegistryEntry],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class={ (PAGE_CONTAINER_STYLE) " gap-6 max-w-screen-md" }
        {
            h1 class="text-xl font-bold self-start" { "Settings" }

            (account_section(email))

            (currency_section(currency))

            (category_section(expense_categories, income_categories))
        }
    );

    base("Settings", &[], &content)
}
