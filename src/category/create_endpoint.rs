//! Category creation endpoint.

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
    category::{CategoryColor, db::create_category, validate_new_category_name},
    endpoints,
    transaction::TransactionKind,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for category creation.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    /// Whether the category labels income or expense transactions.
    pub kind: TransactionKind,
    /// The name of the new category.
    pub name: String,
}

/// Handle category creation form submission.
///
/// The name is validated before anything is written: an empty name or a name
/// that clashes with a built-in category of the same kind renders an error
/// alert and the store is left untouched.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let name = match validate_new_category_name(form.kind, &form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let color = CategoryColor::assign(&name);

    match create_category(name, form.kind, color, user_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        auth::UserId, category::get_categories_by_user, db::initialize,
        transaction::TransactionKind,
    };

    use super::{CategoryForm, CreateCategoryEndpointState, create_category_endpoint};

    fn get_test_state() -> (CreateCategoryEndpointState, UserId) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        connection
            .execute(
                "INSERT INTO user (email, password) VALUES ('foo@bar.baz', 'hunter2')",
                (),
            )
            .unwrap();
        let user_id = connection.last_insert_rowid();

        (
            CreateCategoryEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user_id,
        )
    }

    #[tokio::test]
    async fn creates_category() {
        let (state, user_id) = get_test_state();

        let response = create_category_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(CategoryForm {
                kind: TransactionKind::Expense,
                name: "Coffee".to_owned(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let categories = get_categories_by_user(user_id, &connection).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_ref(), "Coffee");
    }

    #[tokio::test]
    async fn rejects_builtin_duplicate_without_writing() {
        let (state, user_id) = get_test_state();

        let response = create_category_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(CategoryForm {
                kind: TransactionKind::Expense,
                name: "food".to_owned(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_categories_by_user(user_id, &connection)
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn rejects_empty_name_without_writing() {
        let (state, user_id) = get_test_state();

        let response = create_category_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(CategoryForm {
                kind: TransactionKind::Income,
                name: "   ".to_owned(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_categories_by_user(user_id, &connection)
            .unwrap()
            .is_empty());
    }
}
