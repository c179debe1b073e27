//! Transaction deletion endpoint.
//!
//! The delete buttons rendered by the dashboard carry an `hx-confirm`
//! attribute, so this endpoint is only invoked after the user has explicitly
//! confirmed the deletion.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserId,
    database_id::TransactionId,
    transaction::core::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Returns an empty body on success so HTMX removes the table row, or an
/// error alert when the transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(0) => Error::DeleteMissingTransaction.into_alert_response(),
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(_) => Alert::SuccessSimple {
            message: "Transaction deleted".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        auth::UserId,
        db::initialize,
        transaction::{
            TransactionBuilder, TransactionKind, create_transaction, get_transactions_by_user,
        },
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn get_test_state() -> (DeleteTransactionState, UserId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO user (email, password) VALUES ('foo@bar.baz', 'hunter2')",
            (),
        )
        .unwrap();
        let user_id = conn.last_insert_rowid();

        (
            DeleteTransactionState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            user_id,
        )
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let (state, user_id) = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TransactionBuilder {
                    kind: TransactionKind::Expense,
                    amount: 1.23,
                    category: "Food".to_owned(),
                    description: "Test".to_owned(),
                    date: date!(2025 - 10 - 26),
                    user_id,
                },
                &connection,
            )
            .unwrap()
        };

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(transaction.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_transactions_by_user(user_id, &connection)
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn missing_transaction_returns_not_found_and_changes_nothing() {
        let (state, user_id) = get_test_state();

        let response =
            delete_transaction_endpoint(State(state.clone()), Extension(user_id), Path(999))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_transactions_by_user(user_id, &connection)
            .unwrap()
            .is_empty());
    }
}
