//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserId,
    category::{get_categories_by_user, merged_categories},
    endpoints,
    timezone::today_in,
    transaction::{TransactionBuilder, TransactionKind, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Phnom_Penh".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The value of the transaction.
    pub amount: f64,
    /// The name of the category the transaction is filed under.
    pub category: String,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The date when the transaction occurred. Defaults to today when empty.
    #[serde(default)]
    pub date: Option<Date>,
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
///
/// The amount and category are validated before anything is written: invalid
/// input renders an error alert and the store is left untouched.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if !form.amount.is_finite() || form.amount <= 0.0 {
        return Error::InvalidAmount(form.amount).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user_categories = match get_categories_by_user(user_id, &connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("could not get categories: {error}");
            return error.into_alert_response();
        }
    };

    let category_is_known = merged_categories(form.kind, &user_categories)
        .iter()
        .any(|entry| entry.name == form.category);

    if form.category.is_empty() || !category_is_known {
        return Error::UnknownCategory(form.category).into_alert_response();
    }

    let date = match form.date {
        Some(date) => date,
        None => match today_in(&state.local_timezone) {
            Some(today) => today,
            None => {
                return Error::InvalidTimezoneError(state.local_timezone.clone())
                    .into_alert_response();
            }
        },
    };

    let builder = TransactionBuilder {
        kind: form.kind,
        amount: form.amount,
        category: form.category,
        description: form.description,
        date,
        user_id,
    };

    if let Err(error) = create_transaction(builder, &connection) {
        tracing::error!("could not create transaction: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
