//! The endpoint for deleting a goal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::Error;

use super::{
    create::CreateGoalState,
    db::{GoalId, delete_goal},
};

/// Delete a goal.
pub async fn delete_goal_endpoint(
    State(state): State<CreateGoalState>,
    Path(goal_id): Path<GoalId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_goal(goal_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not delete goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}
