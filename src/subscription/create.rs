//! The endpoint for creating a subscription.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::{AppState, Error, endpoints, transaction::UNCATEGORIZED};

use super::{db::create_subscription, list::new_subscription_form};

/// The state needed for creating a subscription.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSubscriptionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a subscription.
#[derive(Debug, Deserialize)]
pub struct NewSubscriptionForm {
    /// The name of the service.
    pub name: String,
    /// The monthly cost in dollars.
    pub amount: f64,
    /// The day of the month the subscription is billed.
    pub billing_day: u8,
    /// The category the subscription counts towards. Blank means
    /// uncategorised.
    pub category: Option<String>,
}

/// Create a subscription and redirect back to the subscriptions page.
pub async fn create_subscription_endpoint(
    State(state): State<CreateSubscriptionState>,
    Form(form): Form<NewSubscriptionForm>,
) -> Response {
    let name = form.name.trim();

    if name.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            new_subscription_form(Some("Error: the subscription needs a name.")),
        )
            .into_response();
    }

    let category = form
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unwrap_or(UNCATEGORIZED);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_subscription(name, form.amount, form.billing_day, category, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SUBSCRIPTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create subscription: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_subscription_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, endpoints, subscription::db::get_subscriptions,
        transaction::UNCATEGORIZED,
    };

    use super::create_subscription_endpoint;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(
                endpoints::POST_SUBSCRIPTION,
                post(create_subscription_endpoint),
            )
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn creates_subscription_and_redirects() {
        let (server, state) = test_server();

        let response = server
            .post(endpoints::POST_SUBSCRIPTION)
            .form(&[
                ("name", "Streaming"),
                ("amount", "15.99"),
                ("billing_day", "12"),
                ("category", "Entertainment"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("HX-Redirect"),
            endpoints::SUBSCRIPTIONS_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        let subscriptions = get_subscriptions(&connection).unwrap();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].billing_day, 12);
    }

    #[tokio::test]
    async fn blank_category_defaults_to_uncategorised() {
        let (server, state) = test_server();

        server
            .post(endpoints::POST_SUBSCRIPTION)
            .form(&[
                ("name", "Gym"),
                ("amount", "49"),
                ("billing_day", "1"),
                ("category", ""),
            ])
            .await;

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_subscriptions(&connection).unwrap()[0].category,
            UNCATEGORIZED
        );
    }

    #[tokio::test]
    async fn out_of_range_billing_day_is_rejected() {
        let (server, state) = test_server();

        let response = server
            .post(endpoints::POST_SUBSCRIPTION)
            .form(&[
                ("name", "Bad"),
                ("amount", "10"),
                ("billing_day", "32"),
            ])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_subscriptions(&connection).unwrap().is_empty());
    }
}
