//! The endpoint for deleting a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{Error, database_id::TransactionId};

use super::{core::delete_transaction, create::CreateTransactionState};

/// Delete a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::delete};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        AppState, endpoints,
        transaction::core::{Transaction, count_transactions, create_transaction},
    };

    use super::delete_transaction_endpoint;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let (server, state) = test_server();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(10.0, date!(2026 - 02 - 05), "Coffee".to_owned()),
                &connection,
            )
            .unwrap()
        };

        let response = server
            .delete(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id,
            ))
            .await;

        response.assert_status_ok();
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (server, _) = test_server();

        let response = server
            .delete(&endpoints::format_endpoint(endpoints::TRANSACTION, 999))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
