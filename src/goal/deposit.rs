//! The endpoint for depositing money into a goal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{Error, endpoints};

use super::{
    create::CreateGoalState,
    db::{GoalId, add_to_goal},
};

/// The form data for a deposit.
#[derive(Debug, Deserialize)]
pub struct DepositForm {
    /// The amount to add to the goal in dollars.
    pub amount: f64,
}

/// Add money to a goal and refresh the goals page.
pub async fn goal_deposit_endpoint(
    State(state): State<CreateGoalState>,
    Path(goal_id): Path<GoalId>,
    Form(form): Form<DepositForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match add_to_goal(goal_id, form.amount, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not deposit into goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod goal_deposit_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, endpoints,
        goal::db::{create_goal, get_goals},
    };

    use super::goal_deposit_endpoint;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::GOAL_DEPOSIT, post(goal_deposit_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn deposit_increases_saved_amount() {
        let (server, state) = test_server();
        let goal = {
            let connection = state.db_connection.lock().unwrap();
            create_goal("Holiday", 2000.0, None, &connection).unwrap()
        };

        let response = server
            .post(&endpoints::format_endpoint(endpoints::GOAL_DEPOSIT, goal.id))
            .form(&[("amount", "500")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_goals(&connection).unwrap()[0].saved, 500.0);
    }

    #[tokio::test]
    async fn deposit_to_missing_goal_is_not_found() {
        let (server, _) = test_server();

        let response = server
            .post(&endpoints::format_endpoint(endpoints::GOAL_DEPOSIT, 999))
            .form(&[("amount", "500")])
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn negative_deposit_is_rejected() {
        let (server, state) = test_server();
        let goal = {
            let connection = state.db_connection.lock().unwrap();
            create_goal("Holiday", 2000.0, None, &connection).unwrap()
        };

        let response = server
            .post(&endpoints::format_endpoint(endpoints::GOAL_DEPOSIT, goal.id))
            .form(&[("amount", "-500")])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_goals(&connection).unwrap()[0].saved, 0.0);
    }
}
