//! The endpoint for creating a goal.

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
use time::{Date, macros::format_description};

use crate::{AppState, Error, endpoints};

use super::{db::create_goal, list::new_goal_form};

/// The state needed for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a goal.
#[derive(Debug, Deserialize)]
pub struct NewGoalForm {
    /// What is being saved for.
    pub name: String,
    /// The amount of money to save in dollars.
    pub target: f64,
    /// When the goal should be reached, as "YYYY-MM-DD". Blank for no
    /// deadline.
    pub due_date: Option<String>,
}

/// Create a goal and redirect back to the goals page.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalState>,
    Form(form): Form<NewGoalForm>,
) -> Response {
    let name = form.name.trim();

    if name.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            new_goal_form(Some("Error: the goal needs a name.")),
        )
            .into_response();
    }

    let due_date = form
        .due_date
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| Date::parse(text, format_description!("[year]-[month]-[day]")));

    let due_date = match due_date {
        None => None,
        Some(Ok(date)) => Some(date),
        Some(Err(_)) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                new_goal_form(Some("Error: the date could not be read.")),
            )
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_goal(name, form.target, due_date, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create goal: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_goal_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{AppState, endpoints, goal::db::get_goals};

    use super::create_goal_endpoint;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::POST_GOAL, post(create_goal_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn creates_goal_and_redirects() {
        let (server, state) = test_server();

        let response = server
            .post(endpoints::POST_GOAL)
            .form(&[
                ("name", "Holiday"),
                ("target", "2000"),
                ("due_date", "2026-12-01"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("HX-Redirect"), endpoints::GOALS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let goals = get_goals(&connection).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].due_date, Some(date!(2026 - 12 - 01)));
    }

    #[tokio::test]
    async fn blank_due_date_means_no_deadline() {
        let (server, state) = test_server();

        server
            .post(endpoints::POST_GOAL)
            .form(&[("name", "Laptop"), ("target", "1500"), ("due_date", "")])
            .await;

        let connection = state.db_connection.lock().unwrap();
        let goals = get_goals(&connection).unwrap();
        assert_eq!(goals[0].due_date, None);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (server, state) = test_server();

        let response = server
            .post(endpoints::POST_GOAL)
            .form(&[("name", "  "), ("target", "100")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_goals(&connection).unwrap().is_empty());
    }
}
