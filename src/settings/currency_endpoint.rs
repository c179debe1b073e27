//! Endpoint for saving the preferred display currency.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserId,
    currency::Currency,
    endpoints,
    settings::preferences::set_currency,
};

/// The state needed for saving the currency preference.
#[derive(Debug, Clone)]
pub struct SetCurrencyEndpointState {
    /// The database connection for writing preferences.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SetCurrencyEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for the currency preference.
#[derive(Debug, Deserialize)]
pub struct CurrencyForm {
    /// The code of the currency to display amounts in.
    pub currency_code: String,
}

/// Save the preferred display currency and reload the settings page.
pub async fn set_currency_endpoint(
    State(state): State<SetCurrencyEndpointState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<CurrencyForm>,
) -> Response {
    let currency = Currency::from_code(&form.currency_code);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_currency(user_id, currency, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not save currency preference: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod set_currency_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        auth::UserId, currency::Currency, db::initialize, settings::preferences::get_currency,
    };

    use super::{CurrencyForm, SetCurrencyEndpointState, set_currency_endpoint};

    fn get_test_state() -> (SetCurrencyEndpointState, UserId) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute(
                "INSERT INTO user (email, password) VALUES ('foo@bar.baz', 'hunter2')",
                (),
            )
            .unwrap();
        let user_id = connection.last_insert_rowid();

        (
            SetCurrencyEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user_id,
        )
    }

    #[tokio::test]
    async fn saves_currency_preference() {
        let (state, user_id) = get_test_state();

        let response = set_currency_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(CurrencyForm {
                currency_code: "KHR".to_owned(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_currency(user_id, &connection).unwrap(), Currency::Khr);
    }

    #[tokio::test]
    async fn unknown_code_saves_the_default() {
        let (state, user_id) = get_test_state();

        set_currency_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(CurrencyForm {
                currency_code: "EUR".to_owned(),
            }),
        )
        .await
        .into_response();

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_currency(user_id, &connection).unwrap(), Currency::Usd);
    }
}
