//! The endpoint for deleting a subscription.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::Error;

use super::{
    create::CreateSubscriptionState,
    db::{SubscriptionId, delete_subscription},
};

/// Delete the subscription with the ID in the URL path.
pub async fn delete_subscription_endpoint(
    State(state): State<CreateSubscriptionState>,
    Path(subscription_id): Path<SubscriptionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_subscription(subscription_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not delete subscription {subscription_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_subscription_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::delete};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, endpoints,
        subscription::db::{create_subscription, get_subscriptions},
    };

    use super::delete_subscription_endpoint;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(
                endpoints::DELETE_SUBSCRIPTION,
                delete(delete_subscription_endpoint),
            )
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn deletes_subscription() {
        let (server, state) = test_server();
        let subscription = {
            let connection = state.db_connection.lock().unwrap();
            create_subscription("Streaming", 15.99, 12, "Entertainment", &connection).unwrap()
        };

        let response = server
            .delete(&endpoints::format_endpoint(
                endpoints::DELETE_SUBSCRIPTION,
                subscription.id,
            ))
            .await;

        response.assert_status_ok();

        let connection = state.db_connection.lock().unwrap();
        assert!(get_subscriptions(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_subscription_returns_not_found() {
        let (server, _) = test_server();

        let response = server
            .delete(&endpoints::format_endpoint(
                endpoints::DELETE_SUBSCRIPTION,
                999,
            ))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
