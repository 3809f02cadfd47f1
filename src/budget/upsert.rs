//! The endpoint for setting a budget.

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

use crate::{AppState, Error, endpoints};

use super::db::upsert_budget;

/// The state needed for setting a budget.
#[derive(Debug, Clone)]
pub struct UpsertBudgetState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpsertBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for setting a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    /// The category the budget applies to.
    pub category: String,
    /// The monthly spending limit in dollars.
    pub amount: f64,
}

/// Set the budget for a category, overwriting any existing budget, then
/// redirect back to the budgets page.
pub async fn upsert_budget_endpoint(
    State(state): State<UpsertBudgetState>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match upsert_budget(form.category.trim(), form.amount, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set budget for {:?}: {error}", form.category);
            error.into_alert_response()
        }
    }
}
