//! The endpoint for pausing and resuming a subscription.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{Error, endpoints};

use super::{
    create::CreateSubscriptionState,
    db::{SubscriptionId, toggle_subscription},
};

/// Flip a subscription between active and paused.
pub async fn toggle_subscription_endpoint(
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

    match toggle_subscription(subscription_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::SUBSCRIPTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not toggle subscription {subscription_id}: {error}");
            error.into_alert_response()
        }
    }
}
